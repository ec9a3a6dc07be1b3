use pay_stream::interfaces::api::{ApiRequest, ApiResponse, Method, PayStreamApi};
use serde_json::{Value, json};
use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const BASE_URL: &str = "http://pay.test";

pub fn api() -> PayStreamApi {
    PayStreamApi::new(pay_stream::application::PayStream::in_memory(), BASE_URL)
}

/// A request carrying the identity headers of `user` in `tenant`.
pub fn as_user(method: Method, path: &str, tenant: &str, user: &str, roles: &str) -> ApiRequest {
    ApiRequest::new(method, path)
        .header("X-Tenant-ID", tenant)
        .header("X-User-ID", user)
        .header("X-User-Roles", roles)
}

pub async fn create_bank(api: &PayStreamApi, tenant: &str, code: &str) -> ApiResponse {
    let request = as_user(Method::Post, "/api/v1/banks", tenant, "admin", "ADMIN")
        .json(json!({"name": format!("Bank {}", code), "branchCode": code}));
    api.handle(request).await
}

pub fn transaction_body(code: &str, amount: &str) -> Value {
    json!({
        "accountName": "Jane Doe",
        "accountNumber": "12345",
        "bankBranchCode": code,
        "currency": "USD",
        "amount": amount,
    })
}

pub async fn create_transaction(
    api: &PayStreamApi,
    tenant: &str,
    user: &str,
    code: &str,
) -> ApiResponse {
    let request = as_user(
        Method::Post,
        "/api/v1/transactions",
        tenant,
        user,
        "TRANSACTION_CREATOR",
    )
    .json(transaction_body(code, "100.00"));
    api.handle(request).await
}

/// Writes a transactions CSV with `rows` rows routed to `code`.
pub fn generate_csv(path: &Path, rows: usize, code: &str) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record([
        "accountName",
        "accountNumber",
        "bankBranchCode",
        "currency",
        "amount",
        "exchangeRate",
    ])?;

    for i in 1..=rows {
        let name = format!("Account {}", i);
        let number = format!("{:08}", i);
        wtr.write_record([name.as_str(), number.as_str(), code, "USD", "1.0", ""])?;
    }

    wtr.flush()?;
    Ok(())
}
