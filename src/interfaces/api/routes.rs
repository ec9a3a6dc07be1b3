use super::Method;
use crate::domain::security::{
    ROLE_ADMIN, ROLE_TRANSACTION_APPROVER, ROLE_TRANSACTION_CREATOR, ROLE_TRANSACTION_VIEWER,
    RoleRequirement,
};

pub const BANKS_PATH: &str = "/api/v1/banks";
pub const TRANSACTIONS_PATH: &str = "/api/v1/transactions";
pub const AUDIT_PATH: &str = "/api/v1/audit";

const ADMIN: RoleRequirement = RoleRequirement::any_of(&[ROLE_ADMIN]);
const CREATOR: RoleRequirement = RoleRequirement::any_of(&[ROLE_TRANSACTION_CREATOR]);
const APPROVER: RoleRequirement = RoleRequirement::any_of(&[ROLE_TRANSACTION_APPROVER]);
const READER: RoleRequirement = RoleRequirement::any_of(&[
    ROLE_TRANSACTION_CREATOR,
    ROLE_TRANSACTION_APPROVER,
    ROLE_TRANSACTION_VIEWER,
]);

/// A resource path the API knows about, with its path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Health,
    Banks,
    ActiveBanks,
    Bank(u64),
    BankToggle(u64),
    Transactions,
    BulkTransactions,
    Transaction(u64),
    ApproveTransaction(u64),
    RejectTransaction(u64),
    Batch(String),
    ApproveBatch(String),
    RejectBatch(String),
    TransactionsByStatus(String),
    AuditLogs,
}

/// A resource paired with one of the methods it accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Health,
    CreateBank,
    ListBanks,
    ListActiveBanks,
    GetBank(u64),
    UpdateBank(u64),
    DeleteBank(u64),
    ToggleBank(u64),
    CreateTransaction,
    CreateBulk,
    GetTransaction(u64),
    ApproveTransaction(u64),
    RejectTransaction(u64),
    GetBatch(String),
    ApproveBatch(String),
    RejectBatch(String),
    TransactionsByStatus(String),
    ListAuditLogs,
}

/// Why a request could not be routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    NotFound,
    MethodNotAllowed,
}

impl Resource {
    /// Matches a request path (query string and trailing slash ignored).
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split('?').next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let resource = match segments.as_slice() {
            ["health"] => Self::Health,
            ["api", "v1", "banks"] => Self::Banks,
            ["api", "v1", "banks", "active"] => Self::ActiveBanks,
            ["api", "v1", "banks", id] => Self::Bank(id.parse().ok()?),
            ["api", "v1", "banks", id, "toggle-status"] => Self::BankToggle(id.parse().ok()?),
            ["api", "v1", "transactions"] => Self::Transactions,
            ["api", "v1", "transactions", "bulk"] => Self::BulkTransactions,
            ["api", "v1", "transactions", "batch", batch] => Self::Batch(batch.to_string()),
            ["api", "v1", "transactions", "batch", batch, "approve"] => {
                Self::ApproveBatch(batch.to_string())
            }
            ["api", "v1", "transactions", "batch", batch, "reject"] => {
                Self::RejectBatch(batch.to_string())
            }
            ["api", "v1", "transactions", "status", status] => {
                Self::TransactionsByStatus(status.to_string())
            }
            ["api", "v1", "transactions", id] => Self::Transaction(id.parse().ok()?),
            ["api", "v1", "transactions", id, "approve"] => {
                Self::ApproveTransaction(id.parse().ok()?)
            }
            ["api", "v1", "transactions", id, "reject"] => {
                Self::RejectTransaction(id.parse().ok()?)
            }
            ["api", "v1", "audit"] => Self::AuditLogs,
            _ => return None,
        };
        Some(resource)
    }

    pub fn route(self, method: Method) -> Result<Route, RouteError> {
        use Method::*;
        let route = match (self, method) {
            (Self::Health, Get) => Route::Health,
            (Self::Banks, Post) => Route::CreateBank,
            (Self::Banks, Get) => Route::ListBanks,
            (Self::ActiveBanks, Get) => Route::ListActiveBanks,
            (Self::Bank(id), Get) => Route::GetBank(id),
            (Self::Bank(id), Put) => Route::UpdateBank(id),
            (Self::Bank(id), Delete) => Route::DeleteBank(id),
            (Self::BankToggle(id), Put) => Route::ToggleBank(id),
            (Self::Transactions, Post) => Route::CreateTransaction,
            (Self::BulkTransactions, Post) => Route::CreateBulk,
            (Self::Transaction(id), Get) => Route::GetTransaction(id),
            (Self::ApproveTransaction(id), Put) => Route::ApproveTransaction(id),
            (Self::RejectTransaction(id), Put) => Route::RejectTransaction(id),
            (Self::Batch(batch), Get) => Route::GetBatch(batch),
            (Self::ApproveBatch(batch), Put) => Route::ApproveBatch(batch),
            (Self::RejectBatch(batch), Put) => Route::RejectBatch(batch),
            (Self::TransactionsByStatus(status), Get) => Route::TransactionsByStatus(status),
            (Self::AuditLogs, Get) => Route::ListAuditLogs,
            _ => return Err(RouteError::MethodNotAllowed),
        };
        Ok(route)
    }
}

impl Route {
    /// Resolves a method and path to a route.
    pub fn resolve(method: Method, path: &str) -> Result<Route, RouteError> {
        Resource::parse(path)
            .ok_or(RouteError::NotFound)?
            .route(method)
    }

    /// Routes reachable without tenant and user headers.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Health)
    }

    /// Roles demanded from the caller, if any.
    pub fn required_roles(&self) -> Option<RoleRequirement> {
        match self {
            Route::Health
            | Route::ListBanks
            | Route::ListActiveBanks
            | Route::GetBank(_) => None,
            Route::CreateBank
            | Route::UpdateBank(_)
            | Route::DeleteBank(_)
            | Route::ToggleBank(_)
            | Route::ListAuditLogs => Some(ADMIN),
            Route::CreateTransaction | Route::CreateBulk => Some(CREATOR),
            Route::ApproveTransaction(_)
            | Route::RejectTransaction(_)
            | Route::ApproveBatch(_)
            | Route::RejectBatch(_) => Some(APPROVER),
            Route::GetTransaction(_) | Route::GetBatch(_) | Route::TransactionsByStatus(_) => {
                Some(READER)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_segments_win_over_ids() {
        assert_eq!(
            Route::resolve(Method::Get, "/api/v1/banks/active"),
            Ok(Route::ListActiveBanks)
        );
        assert_eq!(
            Route::resolve(Method::Post, "/api/v1/transactions/bulk"),
            Ok(Route::CreateBulk)
        );
        assert_eq!(
            Route::resolve(Method::Get, "/api/v1/transactions/status/approved"),
            Ok(Route::TransactionsByStatus("approved".to_string()))
        );
    }

    #[test]
    fn test_path_params() {
        assert_eq!(
            Route::resolve(Method::Put, "/api/v1/banks/12/toggle-status"),
            Ok(Route::ToggleBank(12))
        );
        assert_eq!(
            Route::resolve(Method::Put, "/api/v1/transactions/batch/abc/approve"),
            Ok(Route::ApproveBatch("abc".to_string()))
        );
        assert_eq!(
            Route::resolve(Method::Get, "/api/v1/transactions/7/?x=1"),
            Ok(Route::GetTransaction(7))
        );
    }

    #[test]
    fn test_unroutable() {
        assert_eq!(
            Route::resolve(Method::Get, "/api/v1/banks/not-a-number"),
            Err(RouteError::NotFound)
        );
        assert_eq!(
            Route::resolve(Method::Get, "/api/v2/banks"),
            Err(RouteError::NotFound)
        );
        assert_eq!(
            Route::resolve(Method::Delete, "/api/v1/transactions/1"),
            Err(RouteError::MethodNotAllowed)
        );
    }

    #[test]
    fn test_role_table() {
        assert!(Route::Health.is_public());
        assert_eq!(Route::ListAuditLogs.required_roles(), Some(ADMIN));
        assert_eq!(Route::GetBank(1).required_roles(), None);
        assert_eq!(Route::ApproveBatch("b".into()).required_roles(), Some(APPROVER));
    }
}
