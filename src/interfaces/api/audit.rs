use super::ApiResponse;
use super::dto::AuditLogView;
use super::links::LinkBuilder;
use crate::application::audit_service::AuditService;
use crate::domain::security::SecurityContext;
use crate::error::Result;
use serde_json::{Value, json};

/// `/api/v1/audit`
pub struct AuditResource<'a> {
    service: &'a AuditService,
    links: &'a LinkBuilder,
}

impl<'a> AuditResource<'a> {
    pub fn new(service: &'a AuditService, links: &'a LinkBuilder) -> Self {
        Self { service, links }
    }

    pub async fn list(&self, ctx: &SecurityContext) -> Result<ApiResponse> {
        let logs = self.service.all_audit_logs(&ctx.tenant_id).await?;
        let items: Vec<Value> = logs
            .iter()
            .map(|log| {
                json!({
                    "auditLog": AuditLogView::from(log),
                    "_links": self.links.audit_log_links(log),
                })
            })
            .collect();

        Ok(ApiResponse::ok(json!({
            "auditLogs": items,
            "count": logs.len(),
            "_links": self.links.audit_collection_links(),
        })))
    }
}
