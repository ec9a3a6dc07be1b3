use super::ApiResponse;
use super::dto::BankView;
use super::links::LinkBuilder;
use crate::application::bank_service::BankService;
use crate::domain::bank::{Bank, BankDraft};
use crate::domain::security::SecurityContext;
use crate::error::Result;
use serde_json::{Value, json};
use tracing::debug;

/// `/api/v1/banks`
pub struct BankResource<'a> {
    service: &'a BankService,
    links: &'a LinkBuilder,
}

impl<'a> BankResource<'a> {
    pub fn new(service: &'a BankService, links: &'a LinkBuilder) -> Self {
        Self { service, links }
    }

    fn item(&self, bank: &Bank) -> Value {
        json!({
            "bank": BankView::from(bank),
            "_links": self.links.bank_links(bank),
        })
    }

    fn collection(&self, banks: &[Bank], active_only: bool) -> Value {
        let items: Vec<Value> = banks.iter().map(|bank| self.item(bank)).collect();
        json!({
            "banks": items,
            "count": banks.len(),
            "_links": self.links.bank_collection_links(active_only),
        })
    }

    pub async fn create(&self, ctx: &SecurityContext, draft: &BankDraft) -> Result<ApiResponse> {
        let bank = self.service.create_bank(ctx, draft).await?;
        Ok(ApiResponse::created(self.links.bank(bank.id), self.item(&bank)))
    }

    pub async fn list(&self, ctx: &SecurityContext) -> Result<ApiResponse> {
        let banks = self.service.all_banks(&ctx.tenant_id).await?;
        debug!(tenant = %ctx.tenant_id, count = banks.len(), "banks listed");
        Ok(ApiResponse::ok(self.collection(&banks, false)))
    }

    pub async fn list_active(&self, ctx: &SecurityContext) -> Result<ApiResponse> {
        let banks = self.service.active_banks(&ctx.tenant_id).await?;
        debug!(tenant = %ctx.tenant_id, count = banks.len(), "active banks listed");
        Ok(ApiResponse::ok(self.collection(&banks, true)))
    }

    pub async fn get(&self, ctx: &SecurityContext, id: u64) -> Result<ApiResponse> {
        let bank = self.service.get_bank(&ctx.tenant_id, id).await?;
        Ok(ApiResponse::ok(self.item(&bank)))
    }

    pub async fn update(
        &self,
        ctx: &SecurityContext,
        id: u64,
        draft: &BankDraft,
    ) -> Result<ApiResponse> {
        let bank = self.service.update_bank(ctx, id, draft).await?;
        Ok(ApiResponse::ok(self.item(&bank)))
    }

    pub async fn delete(&self, ctx: &SecurityContext, id: u64) -> Result<ApiResponse> {
        self.service.delete_bank(ctx, id).await?;
        Ok(ApiResponse::no_content())
    }

    pub async fn toggle_status(&self, ctx: &SecurityContext, id: u64) -> Result<ApiResponse> {
        let bank = self.service.toggle_bank_status(ctx, id).await?;
        Ok(ApiResponse::ok(self.item(&bank)))
    }
}
