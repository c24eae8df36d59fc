use serde_json::Value;

/// Language used when the request does not name one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Query parameters of a summary request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryQuery {
    pub url: String,
    pub language: String,
}

impl SummaryQuery {
    #[must_use]
    pub fn video_id(&self) -> &str {
        extract_video_id(&self.url)
    }
}

/// Everything after the last `=` of `url`, or all of it when there is none.
///
/// No URL structure is assumed, so any string carrying `v=<id>` last works.
#[must_use]
pub fn extract_video_id(url: &str) -> &str {
    url.rsplit('=').next().unwrap_or(url).trim()
}

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

/// Request path of an HTTP API (v2) or REST API (v1) event.
pub fn request_path(payload: &Value) -> Option<&str> {
    v_str(payload, &["rawPath"]).or_else(|| v_str(payload, &["path"]))
}

/// Request method of an HTTP API (v2) or REST API (v1) event; GET when absent.
pub fn request_method(payload: &Value) -> &str {
    v_str(payload, &["requestContext", "http", "method"])
        .or_else(|| v_str(payload, &["httpMethod"]))
        .unwrap_or("GET")
}

/// Look up a query parameter, preferring the raw query string.
pub fn query_param(payload: &Value, name: &str) -> Option<String> {
    if let Some(raw) = v_str(payload, &["rawQueryString"]).filter(|q| !q.is_empty()) {
        return url::form_urlencoded::parse(raw.as_bytes())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned());
    }

    v_str(payload, &["queryStringParameters", name]).map(ToString::to_string)
}

/// Parse `url` and `language` out of an API Gateway event.
#[must_use]
pub fn parse_summary_query(payload: &Value) -> SummaryQuery {
    let url = query_param(payload, "url").unwrap_or_default();
    let language = query_param(payload, "language")
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    SummaryQuery { url, language }
}
