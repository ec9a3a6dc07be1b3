use crate::error::{PayStreamError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_TRANSACTION_CREATOR: &str = "TRANSACTION_CREATOR";
pub const ROLE_TRANSACTION_APPROVER: &str = "TRANSACTION_APPROVER";
pub const ROLE_TRANSACTION_VIEWER: &str = "TRANSACTION_VIEWER";

/// Identifier of the tenant that owns a record. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(PayStreamError::Unauthenticated(
                "Missing required X-Tenant-ID header".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of the caller for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityContext {
    pub tenant_id: TenantId,
    pub user_id: String,
    pub user_email: Option<String>,
    pub roles: BTreeSet<String>,
}

impl SecurityContext {
    pub fn new(tenant_id: TenantId, user_id: impl Into<String>) -> Self {
        Self {
            tenant_id,
            user_id: user_id.into(),
            user_email: None,
            roles: BTreeSet::new(),
        }
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.user_email = email;
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Roles a route demands from its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRequirement {
    pub roles: &'static [&'static str],
    pub all_of: bool,
}

impl RoleRequirement {
    pub const fn any_of(roles: &'static [&'static str]) -> Self {
        Self {
            roles,
            all_of: false,
        }
    }

    pub const fn all_of(roles: &'static [&'static str]) -> Self {
        Self {
            roles,
            all_of: true,
        }
    }

    pub fn is_satisfied_by(&self, ctx: &SecurityContext) -> bool {
        if self.all_of {
            self.roles.iter().all(|role| ctx.has_role(role))
        } else {
            self.roles.iter().any(|role| ctx.has_role(role))
        }
    }

    pub fn check(&self, ctx: &SecurityContext) -> Result<()> {
        if self.is_satisfied_by(ctx) {
            Ok(())
        } else {
            Err(PayStreamError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(roles: &[&str]) -> SecurityContext {
        SecurityContext::new(TenantId::new("t1").unwrap(), "alice").with_roles(roles.iter().copied())
    }

    #[test]
    fn test_tenant_id_rejects_blank() {
        assert!(TenantId::new("   ").is_err());
        assert_eq!(TenantId::new(" acme ").unwrap().as_str(), "acme");
    }

    #[test]
    fn test_any_of_requirement() {
        let req = RoleRequirement::any_of(&[ROLE_TRANSACTION_CREATOR, ROLE_TRANSACTION_VIEWER]);
        assert!(req.is_satisfied_by(&ctx(&[ROLE_TRANSACTION_VIEWER])));
        assert!(!req.is_satisfied_by(&ctx(&[ROLE_ADMIN])));
        assert!(!req.is_satisfied_by(&ctx(&[])));
    }

    #[test]
    fn test_all_of_requirement() {
        let req = RoleRequirement::all_of(&[ROLE_ADMIN, ROLE_TRANSACTION_APPROVER]);
        assert!(req.is_satisfied_by(&ctx(&[ROLE_ADMIN, ROLE_TRANSACTION_APPROVER])));
        assert!(matches!(
            req.check(&ctx(&[ROLE_ADMIN])),
            Err(PayStreamError::Forbidden)
        ));
    }
}
