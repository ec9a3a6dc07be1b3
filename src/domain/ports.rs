use super::audit::AuditLog;
use super::bank::Bank;
use super::security::TenantId;
use super::transaction::{Transaction, TransactionStatus};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage for banks. Every lookup is scoped to one tenant.
#[async_trait]
pub trait BankStore: Send + Sync {
    /// Persists a new bank and returns it with its assigned id.
    async fn insert(&self, bank: Bank) -> Result<Bank>;
    async fn update(&self, bank: Bank) -> Result<()>;
    async fn get(&self, tenant: &TenantId, id: u64) -> Result<Option<Bank>>;
    async fn find_by_branch_code(&self, tenant: &TenantId, code: &str) -> Result<Option<Bank>>;
    async fn list(&self, tenant: &TenantId) -> Result<Vec<Bank>>;

    async fn list_active(&self, tenant: &TenantId) -> Result<Vec<Bank>> {
        let banks = self.list(tenant).await?;
        Ok(banks.into_iter().filter(|b| b.active).collect())
    }
}

/// Storage for transactions. Every lookup is scoped to one tenant.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persists a new transaction and returns it with its assigned id.
    async fn insert(&self, tx: Transaction) -> Result<Transaction>;
    async fn update(&self, tx: Transaction) -> Result<()>;
    async fn get(&self, tenant: &TenantId, id: u64) -> Result<Option<Transaction>>;
    async fn list(&self, tenant: &TenantId) -> Result<Vec<Transaction>>;

    async fn find_by_batch(&self, tenant: &TenantId, batch_id: &str) -> Result<Vec<Transaction>> {
        let txs = self.list(tenant).await?;
        Ok(txs
            .into_iter()
            .filter(|tx| tx.batch_id.as_deref() == Some(batch_id))
            .collect())
    }

    async fn find_by_status(
        &self,
        tenant: &TenantId,
        status: TransactionStatus,
    ) -> Result<Vec<Transaction>> {
        let txs = self.list(tenant).await?;
        Ok(txs.into_iter().filter(|tx| tx.status == status).collect())
    }
}

/// Append-only storage for audit events.
#[async_trait]
pub trait AuditLogStore: Send + Sync {
    /// Persists a new event and returns it with its assigned id.
    async fn append(&self, log: AuditLog) -> Result<AuditLog>;
    async fn list(&self, tenant: &TenantId) -> Result<Vec<AuditLog>>;
}

/// Source of "now" for timestamps, swappable in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub type BankStoreBox = Box<dyn BankStore>;
pub type TransactionStoreBox = Box<dyn TransactionStore>;
pub type AuditLogStoreBox = Box<dyn AuditLogStore>;
pub type ClockBox = Box<dyn Clock>;
