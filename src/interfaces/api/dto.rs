//! Response payloads. Tenant ids stay internal and are never rendered.

use crate::domain::audit::{AuditAction, AuditLog, EntityType};
use crate::domain::bank::Bank;
use crate::domain::transaction::{Transaction, TransactionStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankView {
    pub id: u64,
    pub name: String,
    pub branch_code: String,
    pub address: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub active: bool,
}

impl From<&Bank> for BankView {
    fn from(bank: &Bank) -> Self {
        Self {
            id: bank.id,
            name: bank.name.clone(),
            branch_code: bank.branch_code.clone(),
            address: bank.address.clone(),
            contact_phone: bank.contact_phone.clone(),
            contact_email: bank.contact_email.clone(),
            active: bank.active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    pub id: u64,
    pub account_name: String,
    pub account_number: String,
    pub bank: BankView,
    pub currency: String,
    pub amount: Decimal,
    pub exchange_rate: Option<Decimal>,
    pub status: TransactionStatus,
    pub batch_id: Option<String>,
    pub created_by: String,
    pub approved_by: Option<String>,
    pub rejected_by: Option<String>,
    pub approval_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Transaction> for TransactionView {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id,
            account_name: tx.account_name.clone(),
            account_number: tx.account_number.clone(),
            bank: BankView::from(&tx.bank),
            currency: tx.money.currency.clone(),
            amount: tx.money.amount.value(),
            exchange_rate: tx.money.exchange_rate,
            status: tx.status,
            batch_id: tx.batch_id.clone(),
            created_by: tx.created_by.clone(),
            approved_by: tx.approved_by.clone(),
            rejected_by: tx.rejected_by.clone(),
            approval_notes: tx.approval_notes.clone(),
            rejection_reason: tx.rejection_reason.clone(),
            created_at: tx.created_at,
            approved_at: tx.approved_at,
            rejected_at: tx.rejected_at,
            updated_at: tx.updated_at,
        }
    }
}

pub fn transaction_views(txs: &[Transaction]) -> Vec<TransactionView> {
    txs.iter().map(TransactionView::from).collect()
}

/// A batch of transactions created together.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchView {
    pub batch_id: String,
    pub transaction_count: usize,
    pub transactions: Vec<TransactionView>,
}

impl BatchView {
    pub fn new(batch_id: &str, txs: &[Transaction]) -> Self {
        Self {
            batch_id: batch_id.to_string(),
            transaction_count: txs.len(),
            transactions: transaction_views(txs),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogView {
    pub id: u64,
    pub entity_type: EntityType,
    pub entity_id: Option<u64>,
    pub action: AuditAction,
    pub user_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub details: Option<String>,
}

impl From<&AuditLog> for AuditLogView {
    fn from(log: &AuditLog) -> Self {
        Self {
            id: log.id,
            entity_type: log.entity_type,
            entity_id: log.entity_id,
            action: log.action,
            user_id: log.user_id.clone(),
            timestamp: log.timestamp,
            details: log.details.clone(),
        }
    }
}
