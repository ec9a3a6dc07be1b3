//! Request filters run before any resource: who is calling, and may they.

use super::routes::Route;
use super::ApiRequest;
use crate::domain::security::{SecurityContext, TenantId};
use crate::error::{PayStreamError, Result};

pub const TENANT_HEADER: &str = "X-Tenant-ID";
pub const USER_HEADER: &str = "X-User-ID";
pub const EMAIL_HEADER: &str = "X-User-Email";
pub const ROLES_HEADER: &str = "X-User-Roles";

fn required(request: &ApiRequest, name: &str) -> Result<String> {
    request
        .header_value(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            PayStreamError::Unauthenticated(format!("Missing required {} header", name))
        })
}

/// Builds the caller's security context from the identity headers.
pub fn authenticate(request: &ApiRequest) -> Result<SecurityContext> {
    let tenant = TenantId::new(required(request, TENANT_HEADER)?)?;
    let user = required(request, USER_HEADER)?;
    let email = request
        .header_value(EMAIL_HEADER)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);
    let roles = request
        .header_value(ROLES_HEADER)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|role| !role.is_empty());

    Ok(SecurityContext::new(tenant, user)
        .with_email(email)
        .with_roles(roles))
}

/// Checks the caller holds the roles the route demands.
pub fn authorize(route: &Route, ctx: &SecurityContext) -> Result<()> {
    match route.required_roles() {
        Some(requirement) => requirement.check(ctx),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::api::Method;
    use crate::domain::security::{ROLE_ADMIN, ROLE_TRANSACTION_VIEWER};

    fn request() -> ApiRequest {
        ApiRequest::new(Method::Get, "/api/v1/banks")
    }

    #[test]
    fn test_missing_tenant_then_user() {
        let err = authenticate(&request()).unwrap_err();
        assert_eq!(err.to_string(), "Missing required X-Tenant-ID header");
        assert_eq!(err.title(), "Authentication Error");

        let err = authenticate(&request().header(TENANT_HEADER, "t1")).unwrap_err();
        assert_eq!(err.to_string(), "Missing required X-User-ID header");

        let err =
            authenticate(&request().header(TENANT_HEADER, "  ").header(USER_HEADER, "u")).unwrap_err();
        assert_eq!(err.to_string(), "Missing required X-Tenant-ID header");
    }

    #[test]
    fn test_roles_are_split_and_trimmed() {
        let ctx = authenticate(
            &request()
                .header("x-tenant-id", "t1")
                .header("x-user-id", "alice")
                .header("x-user-email", "alice@example.com")
                .header("x-user-roles", " ADMIN , TRANSACTION_VIEWER,,"),
        )
        .unwrap();
        assert_eq!(ctx.tenant_id.as_str(), "t1");
        assert_eq!(ctx.user_email.as_deref(), Some("alice@example.com"));
        assert!(ctx.has_role(ROLE_ADMIN));
        assert!(ctx.has_role(ROLE_TRANSACTION_VIEWER));
        assert_eq!(ctx.roles.len(), 2);
    }

    #[test]
    fn test_authorize() {
        let ctx = SecurityContext::new(TenantId::new("t1").unwrap(), "u")
            .with_roles([ROLE_TRANSACTION_VIEWER]);
        assert!(authorize(&Route::ListBanks, &ctx).is_ok());
        assert!(authorize(&Route::GetTransaction(1), &ctx).is_ok());
        assert!(matches!(
            authorize(&Route::CreateBank, &ctx),
            Err(PayStreamError::Forbidden)
        ));
    }
}
