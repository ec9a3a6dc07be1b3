//! Application layer containing the use-case orchestration.
//!
//! `PayStream` wires the bank, transaction and audit services over one set of
//! stores. Every operation takes the caller's tenant (or full security
//! context) explicitly; nothing is held in ambient request state.

pub mod audit_service;
pub mod bank_service;
pub mod transaction_service;

use crate::domain::ports::{
    AuditLogStoreBox, BankStore, BankStoreBox, Clock, ClockBox, SystemClock, TransactionStoreBox,
};
use crate::infrastructure::in_memory::{
    InMemoryAuditLogStore, InMemoryBankStore, InMemoryTransactionStore,
};
use audit_service::AuditService;
use bank_service::BankService;
use std::sync::Arc;
use transaction_service::TransactionService;

/// The main entry point for the service.
#[derive(Clone)]
pub struct PayStream {
    banks: BankService,
    transactions: TransactionService,
    audit: AuditService,
}

impl PayStream {
    /// Creates a new `PayStream` over the given stores.
    ///
    /// # Arguments
    ///
    /// * `bank_store` - The store for banks.
    /// * `transaction_store` - The store for transactions.
    /// * `audit_store` - The store for audit events.
    /// * `clock` - Source of timestamps.
    pub fn new(
        bank_store: BankStoreBox,
        transaction_store: TransactionStoreBox,
        audit_store: AuditLogStoreBox,
        clock: ClockBox,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::from(clock);
        let bank_store: Arc<dyn BankStore> = Arc::from(bank_store);
        let audit = AuditService::new(Arc::from(audit_store), Arc::clone(&clock));
        let banks = BankService::new(Arc::clone(&bank_store), audit.clone());
        let transactions = TransactionService::new(
            Arc::from(transaction_store),
            bank_store,
            audit.clone(),
            clock,
        );

        Self {
            banks,
            transactions,
            audit,
        }
    }

    /// A service backed by fresh in-memory stores and the system clock.
    pub fn in_memory() -> Self {
        Self::new(
            Box::new(InMemoryBankStore::new()),
            Box::new(InMemoryTransactionStore::new()),
            Box::new(InMemoryAuditLogStore::new()),
            Box::new(SystemClock),
        )
    }

    pub fn banks(&self) -> &BankService {
        &self.banks
    }

    pub fn transactions(&self) -> &TransactionService {
        &self.transactions
    }

    pub fn audit(&self) -> &AuditService {
        &self.audit
    }
}
