use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One timed piece of a transcript as delivered by the transcript service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptFragment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Flatten fragments into one string, single-space separated, in order.
#[must_use]
pub fn join_fragments(fragments: &[TranscriptFragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Beam-search settings passed to the summarization model for every chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_length: u32,
    pub min_length: u32,
    pub length_penalty: f32,
    pub num_beams: u32,
    pub early_stopping: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 150,
            min_length: 40,
            length_penalty: 2.0,
            num_beams: 4,
            early_stopping: true,
        }
    }
}

/// When the summarization model gets loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStrategy {
    /// Fresh model for every summarization call.
    #[default]
    PerRequest,
    /// Loaded once, then shared by every request.
    Startup,
}

impl FromStr for LoadStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per_request" | "per-request" => Ok(Self::PerRequest),
            "startup" | "once" => Ok(Self::Startup),
            other => Err(format!(
                "unknown load strategy '{other}' (expected per_request or startup)"
            )),
        }
    }
}

/// Order in which chunk summaries are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultOrder {
    /// Chunk order, matching the transcript.
    #[default]
    Submission,
    /// Whichever chunk finishes first comes first.
    Completion,
}

impl FromStr for ResultOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "submission" | "ordered" => Ok(Self::Submission),
            "completion" | "unordered" => Ok(Self::Completion),
            other => Err(format!(
                "unknown result order '{other}' (expected submission or completion)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(text: &str) -> TranscriptFragment {
        TranscriptFragment {
            text: text.to_string(),
            start: 0.0,
            duration: 1.0,
        }
    }

    #[test]
    fn test_join_fragments_keeps_order_and_single_spaces() {
        let fragments = vec![fragment("hello"), fragment("big"), fragment("world")];
        assert_eq!(join_fragments(&fragments), "hello big world");
    }

    #[test]
    fn test_join_fragments_empty() {
        assert_eq!(join_fragments(&[]), "");
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("startup".parse::<LoadStrategy>(), Ok(LoadStrategy::Startup));
        assert_eq!(
            "Per_Request".parse::<LoadStrategy>(),
            Ok(LoadStrategy::PerRequest)
        );
        assert!("lazy".parse::<LoadStrategy>().is_err());

        assert_eq!(
            "completion".parse::<ResultOrder>(),
            Ok(ResultOrder::Completion)
        );
        assert!("random".parse::<ResultOrder>().is_err());
    }
}
