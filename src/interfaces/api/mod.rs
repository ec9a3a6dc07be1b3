//! Transport-neutral REST surface.
//!
//! A request is a method, a path, headers and an optional JSON body; a
//! response is a status, an optional `Location` and a JSON body. Any HTTP
//! listener (or the script replayer in [`crate::interfaces::script`]) can sit
//! in front of [`PayStreamApi::handle`].

pub mod audit;
pub mod banks;
pub mod dto;
pub mod filters;
pub mod links;
pub mod problem;
pub mod routes;
pub mod transactions;

use crate::application::PayStream;
use crate::domain::security::SecurityContext;
use crate::error::{PayStreamError, Result};
use links::LinkBuilder;
use routes::{Route, RouteError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Options,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Looks a header up by name, ignoring ASCII case.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Deserializes the body, failing when it is absent.
    pub fn body<T: DeserializeOwned>(&self) -> Result<T> {
        let body = self
            .body
            .clone()
            .ok_or_else(|| PayStreamError::BadRequest("Request body is required".to_string()))?;
        Ok(serde_json::from_value(body)?)
    }

    /// Deserializes the body, falling back to `T::default()` when it is absent.
    pub fn body_or_default<T: DeserializeOwned + Default>(&self) -> Result<T> {
        match &self.body {
            None | Some(Value::Null) => Ok(T::default()),
            Some(body) => Ok(serde_json::from_value(body.clone())?),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            location: None,
            body,
        }
    }

    pub fn created(location: String, body: Value) -> Self {
        Self {
            status: 201,
            location: Some(location),
            body,
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: 204,
            location: None,
            body: Value::Null,
        }
    }
}

/// Routes requests through authentication, authorization and the resources.
#[derive(Clone)]
pub struct PayStreamApi {
    app: PayStream,
    links: LinkBuilder,
}

impl PayStreamApi {
    pub fn new(app: PayStream, base_url: &str) -> Self {
        Self {
            app,
            links: LinkBuilder::new(base_url),
        }
    }

    /// Handles one request. Never fails: errors become problem responses.
    pub async fn handle(&self, request: ApiRequest) -> ApiResponse {
        debug!(method = %request.method, path = %request.path, "request received");

        match self.dispatch(&request).await {
            Ok(response) => response,
            Err(e) => {
                let response = problem::from_error(&e);
                if response.status >= 500 {
                    error!(method = %request.method, path = %request.path, error = %e, "request failed");
                } else {
                    warn!(
                        method = %request.method,
                        path = %request.path,
                        status = response.status,
                        detail = %e,
                        "request refused"
                    );
                }
                response
            }
        }
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let route = match Route::resolve(request.method, &request.path) {
            Ok(route) => route,
            // Preflight requests are answered for any known path.
            Err(RouteError::MethodNotAllowed) if request.method == Method::Options => {
                return Ok(ApiResponse::no_content());
            }
            Err(RouteError::MethodNotAllowed) => return Ok(problem::method_not_allowed(request)),
            Err(RouteError::NotFound) => return Ok(problem::not_found(request)),
        };

        if route.is_public() {
            return Ok(ApiResponse::ok(Value::String("OK".to_string())));
        }

        let ctx = filters::authenticate(request)?;
        filters::authorize(&route, &ctx)?;
        self.invoke(route, request, &ctx).await
    }

    async fn invoke(
        &self,
        route: Route,
        request: &ApiRequest,
        ctx: &SecurityContext,
    ) -> Result<ApiResponse> {
        let banks = banks::BankResource::new(self.app.banks(), &self.links);
        let txs = transactions::TransactionResource::new(self.app.transactions(), &self.links);
        let audit = audit::AuditResource::new(self.app.audit(), &self.links);

        match route {
            Route::Health => Ok(ApiResponse::ok(Value::String("OK".to_string()))),
            Route::CreateBank => banks.create(ctx, &request.body()?).await,
            Route::ListBanks => banks.list(ctx).await,
            Route::ListActiveBanks => banks.list_active(ctx).await,
            Route::GetBank(id) => banks.get(ctx, id).await,
            Route::UpdateBank(id) => banks.update(ctx, id, &request.body()?).await,
            Route::DeleteBank(id) => banks.delete(ctx, id).await,
            Route::ToggleBank(id) => banks.toggle_status(ctx, id).await,
            Route::CreateTransaction => txs.create(ctx, &request.body()?).await,
            Route::CreateBulk => txs.create_bulk(ctx, &request.body()?).await,
            Route::GetTransaction(id) => txs.get(ctx, id).await,
            Route::ApproveTransaction(id) => {
                txs.approve(ctx, id, &request.body_or_default()?).await
            }
            Route::RejectTransaction(id) => txs.reject(ctx, id, &request.body()?).await,
            Route::GetBatch(batch) => txs.batch(ctx, &batch).await,
            Route::ApproveBatch(batch) => {
                txs.approve_batch(ctx, &batch, &request.body_or_default()?)
                    .await
            }
            Route::RejectBatch(batch) => txs.reject_batch(ctx, &batch, &request.body()?).await,
            Route::TransactionsByStatus(status) => txs.by_status(ctx, &status).await,
            Route::ListAuditLogs => audit.list(ctx).await,
        }
    }
}
