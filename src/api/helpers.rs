//! Response builders for API Gateway proxy responses.

use serde_json::{Value, json};

use crate::errors::PipelineError;

/// Returns a 200 OK response with a plain-text body.
#[must_use]
pub fn ok_text(text: &str) -> Value {
    json!({
        "statusCode": 200,
        "headers": { "Content-Type": "text/plain; charset=utf-8" },
        "body": text
    })
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "headers": { "Content-Type": "application/json" },
        "body": json!({ "error": message }).to_string()
    })
}

/// Returns the error response for a failed summary request.
#[must_use]
pub fn pipeline_error_response(error: &PipelineError) -> Value {
    json!({
        "statusCode": error.status_code(),
        "headers": { "Content-Type": "application/json" },
        "body": json!({ "error": error.to_string(), "kind": error.kind() }).to_string()
    })
}

/// Returns a 405 response advertising the allowed method.
#[must_use]
pub fn method_not_allowed(allowed: &str) -> Value {
    json!({
        "statusCode": 405,
        "headers": { "Content-Type": "application/json", "Allow": allowed },
        "body": json!({ "error": "Method not allowed" }).to_string()
    })
}
