use super::ApiResponse;
use super::dto::{BatchView, TransactionView, transaction_views};
use super::links::LinkBuilder;
use crate::application::transaction_service::TransactionService;
use crate::domain::security::SecurityContext;
use crate::domain::transaction::{
    ApprovalRequest, BulkTransactionDraft, RejectionRequest, Transaction, TransactionDraft,
    TransactionStatus,
};
use crate::error::{PayStreamError, Result};
use serde_json::{Value, json};
use tracing::debug;

/// `/api/v1/transactions`
pub struct TransactionResource<'a> {
    service: &'a TransactionService,
    links: &'a LinkBuilder,
}

impl<'a> TransactionResource<'a> {
    pub fn new(service: &'a TransactionService, links: &'a LinkBuilder) -> Self {
        Self { service, links }
    }

    fn item(&self, tx: &Transaction, ctx: &SecurityContext) -> Value {
        json!({
            "transaction": TransactionView::from(tx),
            "_links": self.links.transaction_links(tx, ctx),
        })
    }

    fn batch_body(&self, batch_id: &str, txs: &[Transaction], ctx: &SecurityContext) -> Value {
        json!({
            "batch": BatchView::new(batch_id, txs),
            "_links": self.links.batch_links(batch_id, txs, ctx),
        })
    }

    fn decision_body(
        &self,
        batch_id: &str,
        decision: &str,
        count_field: &str,
        txs: &[Transaction],
        ctx: &SecurityContext,
    ) -> Value {
        let mut body = json!({
            "batchId": batch_id,
            "transactions": transaction_views(txs),
            "_links": self.links.batch_decision_links(batch_id, decision, txs, ctx),
        });
        body[count_field] = json!(txs.len());
        body
    }

    pub async fn create(
        &self,
        ctx: &SecurityContext,
        draft: &TransactionDraft,
    ) -> Result<ApiResponse> {
        let tx = self.service.create_transaction(ctx, draft).await?;
        Ok(ApiResponse::created(
            self.links.transaction(tx.id),
            self.item(&tx, ctx),
        ))
    }

    pub async fn create_bulk(
        &self,
        ctx: &SecurityContext,
        bulk: &BulkTransactionDraft,
    ) -> Result<ApiResponse> {
        let (batch_id, txs) = self.service.create_bulk_transactions(ctx, bulk).await?;
        Ok(ApiResponse::created(
            self.links.batch(&batch_id),
            self.batch_body(&batch_id, &txs, ctx),
        ))
    }

    pub async fn get(&self, ctx: &SecurityContext, id: u64) -> Result<ApiResponse> {
        let tx = self.service.get_transaction(&ctx.tenant_id, id).await?;
        Ok(ApiResponse::ok(self.item(&tx, ctx)))
    }

    pub async fn batch(&self, ctx: &SecurityContext, batch_id: &str) -> Result<ApiResponse> {
        let txs = self
            .service
            .transactions_by_batch(&ctx.tenant_id, batch_id)
            .await?;
        if txs.is_empty() {
            return Err(PayStreamError::NotFound(format!(
                "No transactions found for batch: {}",
                batch_id
            )));
        }
        debug!(tenant = %ctx.tenant_id, batch_id, count = txs.len(), "batch fetched");
        Ok(ApiResponse::ok(self.batch_body(batch_id, &txs, ctx)))
    }

    pub async fn by_status(&self, ctx: &SecurityContext, status: &str) -> Result<ApiResponse> {
        let status: TransactionStatus = status.parse()?;
        let txs = self
            .service
            .transactions_by_status(&ctx.tenant_id, status)
            .await?;
        debug!(tenant = %ctx.tenant_id, status = %status, count = txs.len(), "transactions listed");

        Ok(ApiResponse::ok(json!({
            "count": txs.len(),
            "status": status,
            "transactions": transaction_views(&txs),
            "_links": self.links.status_links(status, &txs, ctx),
        })))
    }

    pub async fn approve(
        &self,
        ctx: &SecurityContext,
        id: u64,
        request: &ApprovalRequest,
    ) -> Result<ApiResponse> {
        let tx = self.service.approve_transaction(ctx, id, request).await?;
        Ok(ApiResponse::ok(self.item(&tx, ctx)))
    }

    pub async fn reject(
        &self,
        ctx: &SecurityContext,
        id: u64,
        request: &RejectionRequest,
    ) -> Result<ApiResponse> {
        let tx = self.service.reject_transaction(ctx, id, request).await?;
        Ok(ApiResponse::ok(self.item(&tx, ctx)))
    }

    pub async fn approve_batch(
        &self,
        ctx: &SecurityContext,
        batch_id: &str,
        request: &ApprovalRequest,
    ) -> Result<ApiResponse> {
        let txs = self.service.batch_approve(ctx, batch_id, request).await?;
        Ok(ApiResponse::ok(self.decision_body(
            batch_id,
            "approve",
            "approvedCount",
            &txs,
            ctx,
        )))
    }

    pub async fn reject_batch(
        &self,
        ctx: &SecurityContext,
        batch_id: &str,
        request: &RejectionRequest,
    ) -> Result<ApiResponse> {
        let txs = self.service.batch_reject(ctx, batch_id, request).await?;
        Ok(ApiResponse::ok(self.decision_body(
            batch_id,
            "reject",
            "rejectedCount",
            &txs,
            ctx,
        )))
    }
}
