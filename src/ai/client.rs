//! HTTP inference client module
//!
//! Talks to a Hugging Face style summarization endpoint (by default
//! `facebook/bart-large-cnn`). Loading the "model" means building a
//! configured HTTP client bound to one endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::model::{ModelLoader, SummarizationModel};
use crate::core::config::AppConfig;
use crate::core::models::GenerationParams;
use crate::errors::SummaryError;

/// Prefix the model was fine-tuned to expect in front of the text.
pub const INPUT_PREFIX: &str = "summarize: ";

/// Input window of the model; longer input gets truncated server side.
const MAX_INPUT_TOKENS: usize = 1024;

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

/// Request body for one chunk.
#[must_use]
pub fn build_request_body(text: &str, params: &GenerationParams) -> Value {
    json!({
        "inputs": format!("{INPUT_PREFIX}{text}"),
        "parameters": params,
        "options": { "wait_for_model": true }
    })
}

/// Pull the summary text out of an inference response.
///
/// Accepts `[{"summary_text": ..}]`, `[{"generated_text": ..}]` and the
/// same objects without the surrounding array.
#[must_use]
pub fn extract_summary(response: &Value) -> Option<String> {
    let first = match response {
        Value::Array(items) => items.first()?,
        other => other,
    };

    first
        .get("summary_text")
        .or_else(|| first.get("generated_text"))
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
}

/// Summarization model served over HTTP
pub struct HttpSummarizationModel {
    client: Client,
    endpoint: Url,
    api_token: Option<String>,
}

#[async_trait]
impl SummarizationModel for HttpSummarizationModel {
    async fn summarize(
        &self,
        text: &str,
        params: &GenerationParams,
    ) -> Result<String, SummaryError> {
        let estimated_input_tokens = estimate_tokens(INPUT_PREFIX) + estimate_tokens(text);
        if estimated_input_tokens > MAX_INPUT_TOKENS {
            warn!(
                estimated_input_tokens,
                "Chunk likely exceeds the model input window and will be truncated"
            );
        }

        #[cfg(feature = "debug-logs")]
        debug!("Summarizing chunk: {:.200}", text);

        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&build_request_body(text, params));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SummaryError::Inference(format!("Inference request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(SummaryError::Inference(format!(
                "Inference endpoint returned {status}: {error_text}"
            )));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            SummaryError::Inference(format!("Failed to parse inference response: {e}"))
        })?;

        let summary = extract_summary(&response_json).ok_or_else(|| {
            SummaryError::Inference("Inference response contained no summary text".to_string())
        })?;

        debug!(summary_chars = summary.chars().count(), "Chunk summarized");
        Ok(summary)
    }
}

/// Builds [`HttpSummarizationModel`] instances for one endpoint.
pub struct HttpModelLoader {
    endpoint: String,
    api_token: Option<String>,
    timeout: Duration,
}

impl HttpModelLoader {
    #[must_use]
    pub fn new(endpoint: String, api_token: Option<String>, timeout: Duration) -> Self {
        Self {
            endpoint,
            api_token,
            timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.model_url.clone(),
            config.model_token.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )
    }
}

#[async_trait]
impl ModelLoader for HttpModelLoader {
    async fn load(&self) -> Result<Arc<dyn SummarizationModel>, SummaryError> {
        let endpoint = Url::parse(&self.endpoint).map_err(|e| {
            SummaryError::ModelUnavailable(format!(
                "Invalid model endpoint '{}': {e}",
                self.endpoint
            ))
        })?;

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                SummaryError::ModelUnavailable(format!("Failed to build inference client: {e}"))
            })?;

        info!(endpoint = %endpoint, "Summarization model ready");
        Ok(Arc::new(HttpSummarizationModel {
            client,
            endpoint,
            api_token: self.api_token.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[test]
    fn test_build_request_body_carries_generation_params() {
        let body = build_request_body("some text", &GenerationParams::default());
        assert_eq!(body["inputs"], "summarize: some text");
        assert_eq!(body["parameters"]["max_length"], 150);
        assert_eq!(body["parameters"]["min_length"], 40);
        assert_eq!(body["parameters"]["length_penalty"], 2.0);
        assert_eq!(body["parameters"]["num_beams"], 4);
        assert_eq!(body["parameters"]["early_stopping"], true);
    }

    #[test]
    fn test_extract_summary_shapes() {
        assert_eq!(
            extract_summary(&json!([{ "summary_text": " short " }])).as_deref(),
            Some("short")
        );
        assert_eq!(
            extract_summary(&json!({ "generated_text": "gen" })).as_deref(),
            Some("gen")
        );
        assert_eq!(extract_summary(&json!([])), None);
        assert_eq!(extract_summary(&json!({ "error": "loading" })), None);
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 1);
        assert_eq!(estimate_tokens(&"a".repeat(3000)), 751);
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_endpoint() {
        let loader = HttpModelLoader::new("not a url".to_string(), None, Duration::from_secs(5));
        let err = loader.load().await.err().unwrap();
        assert!(matches!(err, SummaryError::ModelUnavailable(_)));
    }

    #[tokio::test]
    async fn test_summarize_happy_path() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/bart")
            .match_header("authorization", "Bearer secret")
            .match_body(Matcher::PartialJson(json!({
                "inputs": "summarize: hello world",
                "parameters": { "num_beams": 4 }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"summary_text":"a greeting"}]"#)
            .create_async()
            .await;

        let loader = HttpModelLoader::new(
            format!("{}/models/bart", server.url()),
            Some("secret".to_string()),
            Duration::from_secs(5),
        );
        let model = loader.load().await.unwrap();
        let summary = model
            .summarize("hello world", &GenerationParams::default())
            .await
            .unwrap();

        assert_eq!(summary, "a greeting");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_summarize_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/bart")
            .with_status(503)
            .with_body(r#"{"error":"Model is currently loading"}"#)
            .create_async()
            .await;

        let loader = HttpModelLoader::new(
            format!("{}/models/bart", server.url()),
            None,
            Duration::from_secs(5),
        );
        let model = loader.load().await.unwrap();
        let err = model
            .summarize("hello", &GenerationParams::default())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("currently loading"));
    }
}
