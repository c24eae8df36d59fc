use std::env;
use std::str::FromStr;

use super::models::{LoadStrategy, ResultOrder};

pub const DEFAULT_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-cnn";
pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.youtube.com";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model_url: String,
    pub model_token: Option<String>,
    pub workers: Option<usize>,
    pub batch_size: Option<usize>,
    pub result_order: ResultOrder,
    pub load_strategy: LoadStrategy,
    pub serialize_inference: bool,
    pub youtube_base_url: String,
    pub http_timeout_secs: u64,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_url: DEFAULT_MODEL_URL.to_string(),
            model_token: None,
            workers: None,
            batch_size: None,
            result_order: ResultOrder::default(),
            load_strategy: LoadStrategy::default(),
            serialize_inference: false,
            youtube_base_url: DEFAULT_YOUTUBE_BASE_URL.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            debug: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key/value source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            model_url: get("SUMMARY_MODEL_URL").unwrap_or(defaults.model_url),
            model_token: get("SUMMARY_MODEL_TOKEN"),
            workers: parse_positive(&get, "SUMMARY_WORKERS")?,
            batch_size: parse_positive(&get, "SUMMARY_BATCH_SIZE")?,
            result_order: parse_or(&get, "SUMMARY_RESULT_ORDER", defaults.result_order)?,
            load_strategy: parse_or(&get, "MODEL_LOAD_STRATEGY", defaults.load_strategy)?,
            serialize_inference: parse_bool(&get, "MODEL_SERIALIZE_INFERENCE")?,
            youtube_base_url: get("YOUTUBE_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.youtube_base_url),
            http_timeout_secs: parse_positive(&get, "HTTP_TIMEOUT_SECS")?
                .map_or(defaults.http_timeout_secs, |v| v as u64),
            debug: parse_bool(&get, "DEBUG")?,
        })
    }
}

fn parse_positive<G>(get: &G, key: &str) -> Result<Option<usize>, String>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(None),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(0) => Err(format!("{key}: must be greater than zero")),
            Ok(n) => Ok(Some(n)),
            Err(e) => Err(format!("{key}: {e}")),
        },
    }
}

fn parse_or<G, T>(get: &G, key: &str, default: T) -> Result<T, String>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr<Err = String>,
{
    get(key)
        .map_or(Ok(default), |raw| raw.parse::<T>())
        .map_err(|e| format!("{key}: {e}"))
}

fn parse_bool<G>(get: &G, key: &str) -> Result<bool, String>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => Err(format!("{key}: expected a boolean, got '{v}'")),
    }
}
