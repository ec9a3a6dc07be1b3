use super::audit_service::AuditService;
use crate::domain::audit::{AuditAction, EntityType};
use crate::domain::bank::{Bank, BankDraft};
use crate::domain::ports::BankStore;
use crate::domain::security::{SecurityContext, TenantId};
use crate::domain::validation::Validate;
use crate::error::{PayStreamError, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Bank registry use cases.
#[derive(Clone)]
pub struct BankService {
    banks: Arc<dyn BankStore>,
    audit: AuditService,
    // Held from the branch-code check to the write.
    write_lock: Arc<Mutex<()>>,
}

impl BankService {
    pub fn new(banks: Arc<dyn BankStore>, audit: AuditService) -> Self {
        Self {
            banks,
            audit,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn create_bank(&self, ctx: &SecurityContext, draft: &BankDraft) -> Result<Bank> {
        draft.validate()?;
        let _guard = self.write_lock.lock().await;
        self.ensure_branch_code_free(&ctx.tenant_id, &draft.branch_code, None)
            .await?;

        let bank = self
            .banks
            .insert(Bank::from_draft(ctx.tenant_id.clone(), draft))
            .await?;

        self.audit
            .log_event(
                &ctx.tenant_id,
                EntityType::Bank,
                Some(bank.id),
                AuditAction::Create,
                &ctx.user_id,
                Some(draft),
            )
            .await?;

        info!(tenant = %ctx.tenant_id, bank_id = bank.id, branch_code = %bank.branch_code, "bank created");
        Ok(bank)
    }

    pub async fn update_bank(
        &self,
        ctx: &SecurityContext,
        id: u64,
        draft: &BankDraft,
    ) -> Result<Bank> {
        draft.validate()?;
        let _guard = self.write_lock.lock().await;
        self.apply_update(ctx, id, draft).await
    }

    /// Soft delete: the bank stays on record but can no longer take new transactions.
    pub async fn delete_bank(&self, ctx: &SecurityContext, id: u64) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut bank = self.get_bank(&ctx.tenant_id, id).await?;
        bank.active = false;
        self.banks.update(bank).await?;

        self.audit
            .log_event::<()>(
                &ctx.tenant_id,
                EntityType::Bank,
                Some(id),
                AuditAction::Delete,
                &ctx.user_id,
                None,
            )
            .await?;

        info!(tenant = %ctx.tenant_id, bank_id = id, "bank deactivated");
        Ok(())
    }

    pub async fn toggle_bank_status(&self, ctx: &SecurityContext, id: u64) -> Result<Bank> {
        let _guard = self.write_lock.lock().await;
        let bank = self.get_bank(&ctx.tenant_id, id).await?;
        let draft = BankDraft::toggled(&bank);
        draft.validate()?;
        self.apply_update(ctx, id, &draft).await
    }

    /// Callers hold `write_lock`.
    async fn apply_update(
        &self,
        ctx: &SecurityContext,
        id: u64,
        draft: &BankDraft,
    ) -> Result<Bank> {
        let mut bank = self.get_bank(&ctx.tenant_id, id).await?;
        self.ensure_branch_code_free(&ctx.tenant_id, &draft.branch_code, Some(id))
            .await?;

        bank.apply(draft);
        self.banks.update(bank.clone()).await?;

        self.audit
            .log_event(
                &ctx.tenant_id,
                EntityType::Bank,
                Some(bank.id),
                AuditAction::Update,
                &ctx.user_id,
                Some(draft),
            )
            .await?;

        info!(tenant = %ctx.tenant_id, bank_id = bank.id, active = bank.active, "bank updated");
        Ok(bank)
    }

    pub async fn get_bank(&self, tenant: &TenantId, id: u64) -> Result<Bank> {
        self.banks
            .get(tenant, id)
            .await?
            .ok_or_else(|| PayStreamError::NotFound(format!("Bank not found with id: {}", id)))
    }

    pub async fn get_bank_by_branch_code(&self, tenant: &TenantId, code: &str) -> Result<Bank> {
        self.banks
            .find_by_branch_code(tenant, code)
            .await?
            .ok_or_else(|| {
                PayStreamError::NotFound(format!("Bank not found with branch code: {}", code))
            })
    }

    pub async fn all_banks(&self, tenant: &TenantId) -> Result<Vec<Bank>> {
        self.banks.list(tenant).await
    }

    pub async fn active_banks(&self, tenant: &TenantId) -> Result<Vec<Bank>> {
        self.banks.list_active(tenant).await
    }

    async fn ensure_branch_code_free(
        &self,
        tenant: &TenantId,
        code: &str,
        owner: Option<u64>,
    ) -> Result<()> {
        match self.banks.find_by_branch_code(tenant, code).await? {
            Some(existing) if Some(existing.id) != owner => Err(PayStreamError::Conflict(format!(
                "Bank with branch code {} already exists",
                code
            ))),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audit::AuditAction;
    use crate::domain::ports::SystemClock;
    use crate::infrastructure::in_memory::{InMemoryAuditLogStore, InMemoryBankStore};
    use async_trait::async_trait;

    /// Yields to the scheduler after every lookup, the way a store doing
    /// real I/O would.
    struct YieldingBankStore(InMemoryBankStore);

    #[async_trait]
    impl BankStore for YieldingBankStore {
        async fn insert(&self, bank: Bank) -> Result<Bank> {
            self.0.insert(bank).await
        }

        async fn update(&self, bank: Bank) -> Result<()> {
            self.0.update(bank).await
        }

        async fn get(&self, tenant: &TenantId, id: u64) -> Result<Option<Bank>> {
            let bank = self.0.get(tenant, id).await;
            tokio::task::yield_now().await;
            bank
        }

        async fn find_by_branch_code(
            &self,
            tenant: &TenantId,
            code: &str,
        ) -> Result<Option<Bank>> {
            let bank = self.0.find_by_branch_code(tenant, code).await;
            tokio::task::yield_now().await;
            bank
        }

        async fn list(&self, tenant: &TenantId) -> Result<Vec<Bank>> {
            self.0.list(tenant).await
        }
    }

    fn fixture() -> (BankService, AuditService) {
        let audit = AuditService::new(
            Arc::new(InMemoryAuditLogStore::new()),
            Arc::new(SystemClock),
        );
        let banks = BankService::new(Arc::new(InMemoryBankStore::new()), audit.clone());
        (banks, audit)
    }

    fn yielding_fixture() -> BankService {
        let audit = AuditService::new(
            Arc::new(InMemoryAuditLogStore::new()),
            Arc::new(SystemClock),
        );
        BankService::new(
            Arc::new(YieldingBankStore(InMemoryBankStore::new())),
            audit,
        )
    }

    fn ctx(tenant: &str) -> SecurityContext {
        SecurityContext::new(TenantId::new(tenant).unwrap(), "admin-1")
    }

    fn draft(code: &str) -> BankDraft {
        BankDraft {
            name: "First Bank".to_string(),
            branch_code: code.to_string(),
            address: None,
            contact_phone: None,
            contact_email: Some("ops@first.example".to_string()),
            active: true,
        }
    }

    #[tokio::test]
    async fn test_create_bank_audits() {
        let (banks, audit) = fixture();
        let ctx = ctx("t1");
        let bank = banks.create_bank(&ctx, &draft("FB001")).await.unwrap();

        let logs = audit.all_audit_logs(&ctx.tenant_id).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].entity_id, Some(bank.id));
        assert_eq!(logs[0].action, AuditAction::Create);
        assert!(logs[0].details.as_deref().unwrap().contains("\"branchCode\":\"FB001\""));
    }

    #[tokio::test]
    async fn test_duplicate_branch_code_conflicts_within_tenant_only() {
        let (banks, _) = fixture();
        banks.create_bank(&ctx("t1"), &draft("FB001")).await.unwrap();

        assert!(matches!(
            banks.create_bank(&ctx("t1"), &draft("FB001")).await,
            Err(PayStreamError::Conflict(_))
        ));
        assert!(banks.create_bank(&ctx("t2"), &draft("FB001")).await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_creates_keep_branch_code_unique() {
        let banks = yielding_fixture();
        let (first, second) = (ctx("t1"), ctx("t1"));

        let (draft_a, draft_b) = (draft("FB001"), draft("FB001"));
        let (a, b) = tokio::join!(
            banks.create_bank(&first, &draft_a),
            banks.create_bank(&second, &draft_b)
        );

        assert!(a.is_ok() ^ b.is_ok());
        assert!(matches!(
            a.err().or(b.err()),
            Some(PayStreamError::Conflict(_))
        ));
        let stored = banks.all_banks(&first.tenant_id).await.unwrap();
        assert_eq!(
            stored.iter().filter(|b| b.branch_code == "FB001").count(),
            1
        );
    }

    #[tokio::test]
    async fn test_concurrent_update_and_create_keep_branch_code_unique() {
        let banks = yielding_fixture();
        let ctx = ctx("t1");
        let existing = banks.create_bank(&ctx, &draft("FB001")).await.unwrap();

        let (draft_a, draft_b) = (draft("FB002"), draft("FB002"));
        let (updated, created) = tokio::join!(
            banks.update_bank(&ctx, existing.id, &draft_a),
            banks.create_bank(&ctx, &draft_b)
        );

        assert!(updated.is_ok() ^ created.is_ok());
        let stored = banks.all_banks(&ctx.tenant_id).await.unwrap();
        assert_eq!(
            stored.iter().filter(|b| b.branch_code == "FB002").count(),
            1
        );
    }

    #[tokio::test]
    async fn test_update_keeps_own_branch_code() {
        let (banks, _) = fixture();
        let ctx = ctx("t1");
        let bank = banks.create_bank(&ctx, &draft("FB001")).await.unwrap();
        let other = banks.create_bank(&ctx, &draft("FB002")).await.unwrap();

        let mut renamed = draft("FB001");
        renamed.name = "Renamed".to_string();
        let updated = banks.update_bank(&ctx, bank.id, &renamed).await.unwrap();
        assert_eq!(updated.name, "Renamed");

        assert!(matches!(
            banks.update_bank(&ctx, other.id, &draft("FB001")).await,
            Err(PayStreamError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_toggle_and_delete() {
        let (banks, audit) = fixture();
        let ctx = ctx("t1");
        let bank = banks.create_bank(&ctx, &draft("FB001")).await.unwrap();

        let toggled = banks.toggle_bank_status(&ctx, bank.id).await.unwrap();
        assert!(!toggled.active);
        assert!(banks.active_banks(&ctx.tenant_id).await.unwrap().is_empty());

        let toggled = banks.toggle_bank_status(&ctx, bank.id).await.unwrap();
        assert!(toggled.active);

        banks.delete_bank(&ctx, bank.id).await.unwrap();
        let stored = banks.get_bank(&ctx.tenant_id, bank.id).await.unwrap();
        assert!(!stored.active);

        let actions: Vec<_> = audit
            .all_audit_logs(&ctx.tenant_id)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.action)
            .collect();
        assert_eq!(
            actions,
            vec![
                AuditAction::Create,
                AuditAction::Update,
                AuditAction::Update,
                AuditAction::Delete
            ]
        );
    }

    #[tokio::test]
    async fn test_lookup_errors() {
        let (banks, _) = fixture();
        let tenant = TenantId::new("t1").unwrap();
        assert_eq!(
            banks.get_bank(&tenant, 9).await.unwrap_err().to_string(),
            "Bank not found with id: 9"
        );
        assert_eq!(
            banks
                .get_bank_by_branch_code(&tenant, "NOPE1")
                .await
                .unwrap_err()
                .to_string(),
            "Bank not found with branch code: NOPE1"
        );
    }

    #[tokio::test]
    async fn test_invalid_draft_is_not_persisted() {
        let (banks, _) = fixture();
        let ctx = ctx("t1");
        assert!(matches!(
            banks.create_bank(&ctx, &draft("X")).await,
            Err(PayStreamError::InvalidRequest(_))
        ));
        assert!(banks.all_banks(&ctx.tenant_id).await.unwrap().is_empty());
    }
}
