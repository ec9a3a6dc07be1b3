use super::{ApiRequest, ApiResponse};
use crate::error::PayStreamError;
use serde::Serialize;
use serde_json::{Value, json};

/// Problem body returned for every failed request.
#[derive(Debug, Serialize)]
struct Problem<'a> {
    status: u16,
    title: &'a str,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    violations: Option<Value>,
}

fn respond(problem: Problem<'_>) -> ApiResponse {
    let status = problem.status;
    ApiResponse {
        status,
        location: None,
        body: serde_json::to_value(&problem).unwrap_or_else(|_| json!({ "status": status })),
    }
}

pub fn from_error(error: &PayStreamError) -> ApiResponse {
    let violations = match error {
        PayStreamError::InvalidRequest(violations) => serde_json::to_value(violations).ok(),
        _ => None,
    };
    // Internal failures never leak their cause to the caller.
    let detail = if error.status() >= 500 {
        "An unexpected error occurred".to_string()
    } else {
        error.to_string()
    };
    respond(Problem {
        status: error.status(),
        title: error.title(),
        detail,
        violations,
    })
}

pub fn not_found(request: &ApiRequest) -> ApiResponse {
    respond(Problem {
        status: 404,
        title: "Not Found",
        detail: format!("No resource at {}", request.path),
        violations: None,
    })
}

pub fn method_not_allowed(request: &ApiRequest) -> ApiResponse {
    respond(Problem {
        status: 405,
        title: "Method Not Allowed",
        detail: format!("{} is not supported on {}", request.method, request.path),
        violations: None,
    })
}
