use crate::domain::audit::AuditLog;
use crate::domain::bank::Bank;
use crate::domain::ports::{AuditLogStore, BankStore, TransactionStore};
use crate::domain::security::TenantId;
use crate::domain::transaction::Transaction;
use crate::error::{PayStreamError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Rows of one entity kind, keyed by `(tenant, id)` so a tenant's rows are
/// contiguous and come back in insertion order.
struct Table<T> {
    next_id: u64,
    rows: BTreeMap<(TenantId, u64), T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn tenant_rows(&self, tenant: &TenantId) -> Vec<T> {
        self.rows
            .iter()
            .filter(|((owner, _), _)| owner == tenant)
            .map(|(_, row)| row.clone())
            .collect()
    }
}

/// A thread-safe in-memory store for banks.
///
/// Uses `Arc<RwLock<..>>` to allow shared concurrent access.
/// Ideal for testing or short-lived runs where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryBankStore {
    table: Arc<RwLock<Table<Bank>>>,
}

impl InMemoryBankStore {
    /// Creates a new, empty in-memory bank store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BankStore for InMemoryBankStore {
    async fn insert(&self, mut bank: Bank) -> Result<Bank> {
        let mut table = self.table.write().await;
        bank.id = table.allocate();
        table
            .rows
            .insert((bank.tenant_id.clone(), bank.id), bank.clone());
        Ok(bank)
    }

    async fn update(&self, bank: Bank) -> Result<()> {
        let mut table = self.table.write().await;
        let key = (bank.tenant_id.clone(), bank.id);
        if !table.rows.contains_key(&key) {
            return Err(PayStreamError::NotFound(format!(
                "Bank not found with id: {}",
                bank.id
            )));
        }
        table.rows.insert(key, bank);
        Ok(())
    }

    async fn get(&self, tenant: &TenantId, id: u64) -> Result<Option<Bank>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&(tenant.clone(), id)).cloned())
    }

    async fn find_by_branch_code(&self, tenant: &TenantId, code: &str) -> Result<Option<Bank>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .find(|((owner, _), bank)| owner == tenant && bank.branch_code == code)
            .map(|(_, bank)| bank.clone()))
    }

    async fn list(&self, tenant: &TenantId) -> Result<Vec<Bank>> {
        let table = self.table.read().await;
        Ok(table.tenant_rows(tenant))
    }
}

/// A thread-safe in-memory store for transactions.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    table: Arc<RwLock<Table<Transaction>>>,
}

impl InMemoryTransactionStore {
    /// Creates a new, empty in-memory transaction store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn insert(&self, mut tx: Transaction) -> Result<Transaction> {
        let mut table = self.table.write().await;
        tx.id = table.allocate();
        table.rows.insert((tx.tenant_id.clone(), tx.id), tx.clone());
        Ok(tx)
    }

    async fn update(&self, tx: Transaction) -> Result<()> {
        let mut table = self.table.write().await;
        let key = (tx.tenant_id.clone(), tx.id);
        if !table.rows.contains_key(&key) {
            return Err(PayStreamError::NotFound(format!(
                "Transaction not found with id: {}",
                tx.id
            )));
        }
        table.rows.insert(key, tx);
        Ok(())
    }

    async fn get(&self, tenant: &TenantId, id: u64) -> Result<Option<Transaction>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&(tenant.clone(), id)).cloned())
    }

    async fn list(&self, tenant: &TenantId) -> Result<Vec<Transaction>> {
        let table = self.table.read().await;
        Ok(table.tenant_rows(tenant))
    }
}

/// A thread-safe in-memory, append-only audit log.
#[derive(Default, Clone)]
pub struct InMemoryAuditLogStore {
    table: Arc<RwLock<Table<AuditLog>>>,
}

impl InMemoryAuditLogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditLogStore for InMemoryAuditLogStore {
    async fn append(&self, mut log: AuditLog) -> Result<AuditLog> {
        let mut table = self.table.write().await;
        log.id = table.allocate();
        table.rows.insert((log.tenant_id.clone(), log.id), log.clone());
        Ok(log)
    }

    async fn list(&self, tenant: &TenantId) -> Result<Vec<AuditLog>> {
        let table = self.table.read().await;
        Ok(table.tenant_rows(tenant))
    }
}
