//! API Lambda handler - routes HTTP API events to the summary pipeline.
//!
//! Only `GET /summary` exists. Paths are matched by suffix so a stage
//! prefix such as `/prod/summary` routes the same way.

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use super::{helpers, parsing};
use crate::worker::SummaryService;

/// Lambda handler for the API entrypoint.
///
/// # Errors
///
/// Never fails at the Lambda level; request problems become HTTP error
/// responses.
pub async fn function_handler(
    service: &SummaryService,
    event: LambdaEvent<Value>,
) -> Result<Value, Error> {
    Ok(handle_request(service, &event.payload).await)
}

/// Turn one API Gateway event into a proxy response.
pub async fn handle_request(service: &SummaryService, payload: &Value) -> Value {
    let request_id = Uuid::new_v4().to_string();
    let span = info_span!("request", request_id = %request_id);
    route(service, payload).instrument(span).await
}

async fn route(service: &SummaryService, payload: &Value) -> Value {
    let path = parsing::request_path(payload).unwrap_or("/");
    let method = parsing::request_method(payload);
    info!(path = %path, method = %method, "API Lambda received request");

    if !path.trim_end_matches('/').ends_with("/summary") {
        return helpers::err_response(404, "Not found");
    }
    if !method.eq_ignore_ascii_case("GET") {
        return helpers::method_not_allowed("GET");
    }

    handle_summary(service, payload).await
}

async fn handle_summary(service: &SummaryService, payload: &Value) -> Value {
    let query = parsing::parse_summary_query(payload);
    let video_id = query.video_id();
    info!(video_id = %video_id, language = %query.language, "Summary requested");

    match service.summarize_video(video_id, &query.language).await {
        Ok(summary) => {
            info!(summary_chars = summary.chars().count(), "Summary generated");
            helpers::ok_text(&summary)
        }
        Err(e) => {
            error!(kind = e.kind(), "Failed to generate summary: {}", e);
            helpers::pipeline_error_response(&e)
        }
    }
}
