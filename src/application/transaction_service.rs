use super::audit_service::AuditService;
use crate::domain::audit::{AuditAction, EntityType};
use crate::domain::bank::Bank;
use crate::domain::ports::{BankStore, Clock, TransactionStore};
use crate::domain::security::{SecurityContext, TenantId};
use crate::domain::transaction::{
    ApprovalRequest, BulkTransactionDraft, RejectionRequest, Transaction, TransactionDraft,
    TransactionStatus,
};
use crate::domain::validation::Validate;
use crate::error::{PayStreamError, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

/// Summary written to the audit log when a batch is created.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchCreated<'a> {
    batch_identifier: &'a str,
    count: usize,
}

/// Transaction creation and the four-eyes approval workflow.
#[derive(Clone)]
pub struct TransactionService {
    transactions: Arc<dyn TransactionStore>,
    banks: Arc<dyn BankStore>,
    audit: AuditService,
    clock: Arc<dyn Clock>,
    // Held from reading a transaction's status to writing the decision.
    decision_lock: Arc<Mutex<()>>,
}

impl TransactionService {
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        banks: Arc<dyn BankStore>,
        audit: AuditService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transactions,
            banks,
            audit,
            clock,
            decision_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Resolves the bank a draft is routed to. The bank must exist in the
    /// caller's tenant and be active.
    async fn resolve_bank(&self, tenant: &TenantId, draft: &TransactionDraft) -> Result<Bank> {
        let code = &draft.bank_branch_code;
        let bank = self
            .banks
            .find_by_branch_code(tenant, code)
            .await?
            .ok_or_else(|| {
                PayStreamError::BadRequest(format!("Bank not found with branch code: {}", code))
            })?;

        if !bank.active {
            return Err(PayStreamError::BadRequest(format!(
                "Bank with branch code {} is inactive",
                code
            )));
        }
        Ok(bank)
    }

    pub async fn create_transaction(
        &self,
        ctx: &SecurityContext,
        draft: &TransactionDraft,
    ) -> Result<Transaction> {
        draft.validate()?;
        let bank = self.resolve_bank(&ctx.tenant_id, draft).await?;
        let tx = Transaction::from_draft(draft, bank, &ctx.user_id, self.clock.now())?;
        let tx = self.transactions.insert(tx).await?;

        self.audit
            .log_event(
                &ctx.tenant_id,
                EntityType::Transaction,
                Some(tx.id),
                AuditAction::Create,
                &ctx.user_id,
                Some(draft),
            )
            .await?;

        info!(tenant = %ctx.tenant_id, tx_id = tx.id, created_by = %ctx.user_id, "transaction created");
        Ok(tx)
    }

    /// Creates every draft under one fresh batch id.
    ///
    /// All rows are validated and their banks resolved before anything is
    /// written, so a bad row leaves no partial batch behind.
    pub async fn create_bulk_transactions(
        &self,
        ctx: &SecurityContext,
        bulk: &BulkTransactionDraft,
    ) -> Result<(String, Vec<Transaction>)> {
        bulk.validate()?;

        let batch_id = Uuid::new_v4().to_string();
        let now = self.clock.now();

        let mut prepared = Vec::with_capacity(bulk.transactions.len());
        for draft in &bulk.transactions {
            let bank = self.resolve_bank(&ctx.tenant_id, draft).await?;
            let mut tx = Transaction::from_draft(draft, bank, &ctx.user_id, now)?;
            tx.batch_id = Some(batch_id.clone());
            prepared.push((draft, tx));
        }

        let mut created = Vec::with_capacity(prepared.len());
        for (draft, tx) in prepared {
            let tx = self.transactions.insert(tx).await?;
            self.audit
                .log_event(
                    &ctx.tenant_id,
                    EntityType::Transaction,
                    Some(tx.id),
                    AuditAction::Create,
                    &ctx.user_id,
                    Some(draft),
                )
                .await?;
            created.push(tx);
        }

        self.audit
            .log_event(
                &ctx.tenant_id,
                EntityType::TransactionBatch,
                None,
                AuditAction::Create,
                &ctx.user_id,
                Some(&BatchCreated {
                    batch_identifier: &batch_id,
                    count: created.len(),
                }),
            )
            .await?;

        info!(tenant = %ctx.tenant_id, batch_id = %batch_id, count = created.len(), "batch created");
        Ok((batch_id, created))
    }

    pub async fn get_transaction(&self, tenant: &TenantId, id: u64) -> Result<Transaction> {
        self.transactions
            .get(tenant, id)
            .await?
            .ok_or_else(|| {
                PayStreamError::NotFound(format!("Transaction not found with id: {}", id))
            })
    }

    pub async fn transactions_by_batch(
        &self,
        tenant: &TenantId,
        batch_id: &str,
    ) -> Result<Vec<Transaction>> {
        self.transactions.find_by_batch(tenant, batch_id).await
    }

    pub async fn transactions_by_status(
        &self,
        tenant: &TenantId,
        status: TransactionStatus,
    ) -> Result<Vec<Transaction>> {
        self.transactions.find_by_status(tenant, status).await
    }

    pub async fn approve_transaction(
        &self,
        ctx: &SecurityContext,
        id: u64,
        request: &ApprovalRequest,
    ) -> Result<Transaction> {
        let _guard = self.decision_lock.lock().await;
        let mut tx = self.get_transaction(&ctx.tenant_id, id).await?;
        if let Err(e) = tx.approve(&ctx.user_id, request.notes.clone(), self.clock.now()) {
            warn!(tenant = %ctx.tenant_id, tx_id = id, approver = %ctx.user_id, error = %e, "approval refused");
            return Err(e);
        }
        self.record_decision(ctx, &tx, AuditAction::Approve, request)
            .await?;
        Ok(tx)
    }

    pub async fn reject_transaction(
        &self,
        ctx: &SecurityContext,
        id: u64,
        request: &RejectionRequest,
    ) -> Result<Transaction> {
        request.validate()?;
        let _guard = self.decision_lock.lock().await;
        let mut tx = self.get_transaction(&ctx.tenant_id, id).await?;
        if let Err(e) = tx.reject(&ctx.user_id, request.reason.clone(), self.clock.now()) {
            warn!(tenant = %ctx.tenant_id, tx_id = id, rejecter = %ctx.user_id, error = %e, "rejection refused");
            return Err(e);
        }
        self.record_decision(ctx, &tx, AuditAction::Reject, request)
            .await?;
        Ok(tx)
    }

    /// Approves every member of the batch the caller may approve: pending and
    /// not created by the caller. Other members are left untouched.
    pub async fn batch_approve(
        &self,
        ctx: &SecurityContext,
        batch_id: &str,
        request: &ApprovalRequest,
    ) -> Result<Vec<Transaction>> {
        let _guard = self.decision_lock.lock().await;
        let members = self.batch_members(&ctx.tenant_id, batch_id).await?;
        let now = self.clock.now();

        let mut approved = Vec::new();
        for mut tx in members {
            if !tx.approvable_by(&ctx.user_id) {
                continue;
            }
            tx.approve(&ctx.user_id, request.notes.clone(), now)?;
            self.record_decision(ctx, &tx, AuditAction::Approve, request)
                .await?;
            approved.push(tx);
        }

        info!(tenant = %ctx.tenant_id, batch_id, approved = approved.len(), "batch approved");
        Ok(approved)
    }

    /// Rejects every pending member of the batch.
    pub async fn batch_reject(
        &self,
        ctx: &SecurityContext,
        batch_id: &str,
        request: &RejectionRequest,
    ) -> Result<Vec<Transaction>> {
        request.validate()?;
        let _guard = self.decision_lock.lock().await;
        let members = self.batch_members(&ctx.tenant_id, batch_id).await?;
        let now = self.clock.now();

        let mut rejected = Vec::new();
        for mut tx in members {
            if !tx.is_pending() {
                continue;
            }
            tx.reject(&ctx.user_id, request.reason.clone(), now)?;
            self.record_decision(ctx, &tx, AuditAction::Reject, request)
                .await?;
            rejected.push(tx);
        }

        info!(tenant = %ctx.tenant_id, batch_id, rejected = rejected.len(), "batch rejected");
        Ok(rejected)
    }

    async fn batch_members(&self, tenant: &TenantId, batch_id: &str) -> Result<Vec<Transaction>> {
        let members = self.transactions.find_by_batch(tenant, batch_id).await?;
        if members.is_empty() {
            return Err(PayStreamError::NotFound(format!(
                "No transactions found for batch: {}",
                batch_id
            )));
        }
        Ok(members)
    }

    /// Callers hold `decision_lock`.
    async fn record_decision<T: Serialize>(
        &self,
        ctx: &SecurityContext,
        tx: &Transaction,
        action: AuditAction,
        request: &T,
    ) -> Result<()> {
        self.transactions.update(tx.clone()).await?;
        self.audit
            .log_event(
                &ctx.tenant_id,
                EntityType::Transaction,
                Some(tx.id),
                action,
                &ctx.user_id,
                Some(request),
            )
            .await?;
        info!(tenant = %ctx.tenant_id, tx_id = tx.id, status = %tx.status, by = %ctx.user_id, "transaction decided");
        Ok(())
    }
}
