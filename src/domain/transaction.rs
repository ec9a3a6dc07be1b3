use super::bank::Bank;
use super::money::Money;
use super::security::TenantId;
use super::validation::{Validate, Violations};
use crate::error::{PayStreamError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    PendingApproval,
    Approved,
    Rejected,
    Submitted,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 6] = [
        Self::PendingApproval,
        Self::Approved,
        Self::Rejected,
        Self::Submitted,
        Self::Completed,
        Self::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingApproval => "PENDING_APPROVAL",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Submitted => "SUBMITTED",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = PayStreamError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == upper)
            .ok_or_else(|| PayStreamError::BadRequest(format!("Invalid status: {}", s)))
    }
}

/// A payment instruction awaiting (or past) four-eyes approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: u64,
    pub tenant_id: TenantId,
    pub account_name: String,
    pub account_number: String,
    pub bank: Bank,
    pub money: Money,
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

impl Transaction {
    /// Builds an unsaved transaction in `PENDING_APPROVAL`. The bank must
    /// already be resolved for the draft's branch code.
    pub fn from_draft(
        draft: &TransactionDraft,
        bank: Bank,
        created_by: &str,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let amount = draft.amount.ok_or_else(|| {
            PayStreamError::ValidationError("Amount is required".to_string())
        })?;
        Ok(Self {
            id: 0,
            tenant_id: bank.tenant_id.clone(),
            account_name: draft.account_name.clone(),
            account_number: draft.account_number.clone(),
            money: Money::new(draft.currency.clone(), amount, draft.exchange_rate)?,
            bank,
            status: TransactionStatus::PendingApproval,
            batch_id: None,
            created_by: created_by.to_string(),
            approved_by: None,
            rejected_by: None,
            approval_notes: None,
            rejection_reason: None,
            created_at: now,
            approved_at: None,
            rejected_at: None,
            updated_at: None,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::PendingApproval
    }

    /// Whether `user_id` is allowed to approve this transaction right now.
    pub fn approvable_by(&self, user_id: &str) -> bool {
        self.is_pending() && self.created_by != user_id
    }

    pub fn approve(
        &mut self,
        approver_id: &str,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if !self.is_pending() {
            return Err(PayStreamError::BadRequest(
                "Only pending transactions can be approved".to_string(),
            ));
        }
        // Four-eyes rule
        if self.created_by == approver_id {
            return Err(PayStreamError::BadRequest(
                "Cannot approve a transaction you created".to_string(),
            ));
        }

        self.status = TransactionStatus::Approved;
        self.approved_by = Some(approver_id.to_string());
        self.approved_at = Some(now);
        self.approval_notes = notes;
        self.updated_at = Some(now);
        Ok(())
    }

    pub fn reject(&mut self, rejecter_id: &str, reason: String, now: DateTime<Utc>) -> Result<()> {
        if !self.is_pending() {
            return Err(PayStreamError::BadRequest(
                "Only pending transactions can be rejected".to_string(),
            ));
        }

        self.status = TransactionStatus::Rejected;
        self.rejected_by = Some(rejecter_id.to_string());
        self.rejected_at = Some(now);
        self.rejection_reason = Some(reason);
        self.updated_at = Some(now);
        Ok(())
    }
}

/// Request payload describing one transaction to create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub bank_branch_code: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub exchange_rate: Option<Decimal>,
}

impl TransactionDraft {
    fn violations(&self) -> Violations {
        let mut v = Violations::new();
        v.not_blank("accountName", &self.account_name, "Account name is required")
            .not_blank(
                "accountNumber",
                &self.account_number,
                "Account number is required",
            )
            .not_blank(
                "bankBranchCode",
                &self.bank_branch_code,
                "Bank branch code is required",
            )
            .not_blank("currency", &self.currency, "Currency is required")
            .check(self.amount.is_some(), "amount", "Amount is required")
            .check(
                self.amount.is_none_or(|a| a > Decimal::ZERO),
                "amount",
                "Amount must be positive",
            );
        v
    }
}

impl Validate for TransactionDraft {
    fn validate(&self) -> Result<()> {
        self.violations().into_result()
    }
}

/// Request payload for creating several transactions as one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkTransactionDraft {
    #[serde(default)]
    pub transactions: Vec<TransactionDraft>,
}

impl Validate for BulkTransactionDraft {
    fn validate(&self) -> Result<()> {
        let mut v = Violations::new();
        v.check(
            !self.transactions.is_empty(),
            "transactions",
            "At least one transaction is required",
        );
        for (i, draft) in self.transactions.iter().enumerate() {
            if let Err(PayStreamError::InvalidRequest(inner)) = draft.violations().into_result() {
                v.nested(&format!("transactions[{}]", i), inner);
            }
        }
        v.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RejectionRequest {
    #[serde(default)]
    pub reason: String,
}

impl Validate for RejectionRequest {
    fn validate(&self) -> Result<()> {
        let mut v = Violations::new();
        v.not_blank("reason", &self.reason, "Rejection reason is required");
        v.into_result()
    }
}
