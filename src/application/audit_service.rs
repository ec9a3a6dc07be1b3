use crate::domain::audit::{AuditAction, AuditLog, EntityType};
use crate::domain::ports::{AuditLogStore, Clock};
use crate::domain::security::TenantId;
use crate::error::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Records who did what to which entity, per tenant.
#[derive(Clone)]
pub struct AuditService {
    store: Arc<dyn AuditLogStore>,
    clock: Arc<dyn Clock>,
}

impl AuditService {
    pub fn new(store: Arc<dyn AuditLogStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Appends an audit event. `details` is stored as its JSON rendering.
    pub async fn log_event<T: Serialize + ?Sized>(
        &self,
        tenant: &TenantId,
        entity_type: EntityType,
        entity_id: Option<u64>,
        action: AuditAction,
        user_id: &str,
        details: Option<&T>,
    ) -> Result<AuditLog> {
        let details = details.map(|payload| {
            serde_json::to_string(payload)
                .unwrap_or_else(|e| format!("Failed to serialize details: {}", e))
        });

        let log = AuditLog {
            id: 0,
            tenant_id: tenant.clone(),
            entity_type,
            entity_id,
            action,
            user_id: Some(user_id.to_string()),
            timestamp: self.clock.now(),
            details,
        };

        let saved = self.store.append(log).await?;
        debug!(
            tenant = %tenant,
            entity = %entity_type,
            entity_id = ?entity_id,
            action = %action,
            "audit event recorded"
        );
        Ok(saved)
    }

    pub async fn all_audit_logs(&self, tenant: &TenantId) -> Result<Vec<AuditLog>> {
        self.store.list(tenant).await
    }
}
