use crate::domain::audit::AuditLog;
use crate::domain::bank::Bank;
use crate::domain::ports::{AuditLogStore, BankStore, TransactionStore};
use crate::domain::security::TenantId;
use crate::domain::transaction::Transaction;
use crate::error::{PayStreamError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing banks.
pub const CF_BANKS: &str = "banks";
/// Column Family for storing transactions.
pub const CF_TRANSACTIONS: &str = "transactions";
/// Column Family for storing audit events.
pub const CF_AUDIT_LOGS: &str = "audit_logs";
/// Column Family holding the id sequence of every other family.
pub const CF_META: &str = "meta";

/// A persistent store implementation using RocksDB.
///
/// Handles storage for banks, transactions and audit events using separate
/// Column Families. Keys are `tenant \0 id` (id big-endian) so a tenant's rows
/// are contiguous and ordered by id.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    sequence_lock: Arc<Mutex<()>>,
}

fn tenant_prefix(tenant: &TenantId) -> Vec<u8> {
    let mut prefix = tenant.as_str().as_bytes().to_vec();
    prefix.push(0);
    prefix
}

fn row_key(tenant: &TenantId, id: u64) -> Vec<u8> {
    let mut key = tenant_prefix(tenant);
    key.extend_from_slice(&id.to_be_bytes());
    key
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value)
        .map_err(|e| PayStreamError::internal(format!("Serialization error: {}", e)))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| PayStreamError::internal(format!("Deserialization error: {}", e)))
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families exist.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let families = [CF_BANKS, CF_TRANSACTIONS, CF_AUDIT_LOGS, CF_META]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, families)?;

        Ok(Self {
            db: Arc::new(db),
            sequence_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| PayStreamError::internal(format!("{} column family not found", name)))
    }

    /// Hands out the next id for `family`, starting at 1.
    async fn next_id(&self, family: &str) -> Result<u64> {
        let _guard = self.sequence_lock.lock().await;
        let meta = self.cf(CF_META)?;
        let current = match self.db.get_cf(meta, family.as_bytes())? {
            Some(bytes) => {
                let raw: [u8; 8] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| PayStreamError::internal("Corrupt id sequence"))?;
                u64::from_be_bytes(raw)
            }
            None => 0,
        };
        let next = current + 1;
        self.db.put_cf(meta, family.as_bytes(), next.to_be_bytes())?;
        Ok(next)
    }

    fn put<T: Serialize>(&self, family: &str, tenant: &TenantId, id: u64, value: &T) -> Result<()> {
        let cf = self.cf(family)?;
        self.db.put_cf(cf, row_key(tenant, id), encode(value)?)?;
        Ok(())
    }

    fn fetch<T: DeserializeOwned>(&self, family: &str, tenant: &TenantId, id: u64) -> Result<Option<T>> {
        let cf = self.cf(family)?;
        match self.db.get_pinned_cf(cf, row_key(tenant, id))? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn exists(&self, family: &str, tenant: &TenantId, id: u64) -> Result<bool> {
        let cf = self.cf(family)?;
        Ok(self.db.get_pinned_cf(cf, row_key(tenant, id))?.is_some())
    }

    fn scan<T: DeserializeOwned>(&self, family: &str, tenant: &TenantId) -> Result<Vec<T>> {
        let cf = self.cf(family)?;
        let prefix = tenant_prefix(tenant);
        let mut rows = Vec::new();

        for item in self
            .db
            .iterator_cf(cf, IteratorMode::From(&prefix, Direction::Forward))
        {
            let (key, value) = item?;
            if !key.starts_with(&prefix) {
                break;
            }
            rows.push(decode(&value)?);
        }

        Ok(rows)
    }
}

#[async_trait]
impl BankStore for RocksDBStore {
    async fn insert(&self, mut bank: Bank) -> Result<Bank> {
        bank.id = self.next_id(CF_BANKS).await?;
        self.put(CF_BANKS, &bank.tenant_id, bank.id, &bank)?;
        Ok(bank)
    }

    async fn update(&self, bank: Bank) -> Result<()> {
        if !self.exists(CF_BANKS, &bank.tenant_id, bank.id)? {
            return Err(PayStreamError::NotFound(format!(
                "Bank not found with id: {}",
                bank.id
            )));
        }
        self.put(CF_BANKS, &bank.tenant_id, bank.id, &bank)
    }

    async fn get(&self, tenant: &TenantId, id: u64) -> Result<Option<Bank>> {
        self.fetch(CF_BANKS, tenant, id)
    }

    async fn find_by_branch_code(&self, tenant: &TenantId, code: &str) -> Result<Option<Bank>> {
        let banks: Vec<Bank> = self.scan(CF_BANKS, tenant)?;
        Ok(banks.into_iter().find(|b| b.branch_code == code))
    }

    async fn list(&self, tenant: &TenantId) -> Result<Vec<Bank>> {
        self.scan(CF_BANKS, tenant)
    }
}

#[async_trait]
impl TransactionStore for RocksDBStore {
    async fn insert(&self, mut tx: Transaction) -> Result<Transaction> {
        tx.id = self.next_id(CF_TRANSACTIONS).await?;
        self.put(CF_TRANSACTIONS, &tx.tenant_id, tx.id, &tx)?;
        Ok(tx)
    }

    async fn update(&self, tx: Transaction) -> Result<()> {
        if !self.exists(CF_TRANSACTIONS, &tx.tenant_id, tx.id)? {
            return Err(PayStreamError::NotFound(format!(
                "Transaction not found with id: {}",
                tx.id
            )));
        }
        self.put(CF_TRANSACTIONS, &tx.tenant_id, tx.id, &tx)
    }

    async fn get(&self, tenant: &TenantId, id: u64) -> Result<Option<Transaction>> {
        self.fetch(CF_TRANSACTIONS, tenant, id)
    }

    async fn list(&self, tenant: &TenantId) -> Result<Vec<Transaction>> {
        self.scan(CF_TRANSACTIONS, tenant)
    }
}

#[async_trait]
impl AuditLogStore for RocksDBStore {
    async fn append(&self, mut log: AuditLog) -> Result<AuditLog> {
        log.id = self.next_id(CF_AUDIT_LOGS).await?;
        self.put(CF_AUDIT_LOGS, &log.tenant_id, log.id, &log)?;
        Ok(log)
    }

    async fn list(&self, tenant: &TenantId) -> Result<Vec<AuditLog>> {
        self.scan(CF_AUDIT_LOGS, tenant)
    }
}
