use super::security::TenantId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum EntityType {
    Bank,
    Transaction,
    TransactionBatch,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bank => "Bank",
            Self::Transaction => "Transaction",
            Self::TransactionBatch => "TransactionBatch",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Approve,
    Reject,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Approve => "APPROVE",
            Self::Reject => "REJECT",
        };
        f.write_str(name)
    }
}

/// An immutable record of one mutation performed inside a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: u64,
    pub tenant_id: TenantId,
    pub entity_type: EntityType,
    /// Absent for events about a group of entities (e.g. a whole batch).
    pub entity_id: Option<u64>,
    pub action: AuditAction,
    pub user_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// JSON rendering of the payload that caused the event.
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&AuditAction::Approve).unwrap(),
            "\"APPROVE\""
        );
        assert_eq!(
            serde_json::to_string(&EntityType::TransactionBatch).unwrap(),
            "\"TransactionBatch\""
        );
        assert_eq!(AuditAction::Delete.to_string(), "DELETE");
    }
}
