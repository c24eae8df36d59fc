use thiserror::Error;

/// Failures while retrieving a transcript.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("Video not found: {0}")]
    NotFound(String),

    #[error("No transcript available in language '{language}'{}", available_suffix(.available))]
    LanguageUnavailable {
        language: String,
        available: Vec<String>,
    },

    #[error("Transcript service unreachable: {0}")]
    TransientNetwork(String),

    #[error("Unexpected transcript service response: {0}")]
    UnexpectedResponse(String),
}

fn available_suffix(available: &[String]) -> String {
    if available.is_empty() {
        " (transcripts are disabled for this video)".to_string()
    } else {
        format!(" (available: {})", available.join(", "))
    }
}

impl From<reqwest::Error> for TranscriptError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            TranscriptError::UnexpectedResponse(error.to_string())
        } else {
            TranscriptError::TransientNetwork(error.to_string())
        }
    }
}

/// Failures of the summarization model.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Summarization model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Summarization failed: {0}")]
    Inference(String),
}

/// Anything that aborts a summary request as a whole.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    #[error(transparent)]
    Summary(#[from] SummaryError),
}

impl PipelineError {
    /// HTTP status the API layer answers with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            PipelineError::Transcript(TranscriptError::NotFound(_)) => 404,
            PipelineError::Transcript(TranscriptError::LanguageUnavailable { .. }) => 422,
            PipelineError::Transcript(TranscriptError::TransientNetwork(_)) => 503,
            PipelineError::Transcript(TranscriptError::UnexpectedResponse(_)) => 502,
            PipelineError::Summary(_) => 503,
        }
    }

    /// Stable machine-readable error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            PipelineError::Transcript(TranscriptError::NotFound(_)) => "not_found",
            PipelineError::Transcript(TranscriptError::LanguageUnavailable { .. }) => {
                "language_unavailable"
            }
            PipelineError::Transcript(TranscriptError::TransientNetwork(_)) => "transient_network",
            PipelineError::Transcript(TranscriptError::UnexpectedResponse(_)) => {
                "unexpected_response"
            }
            PipelineError::Summary(SummaryError::ModelUnavailable(_)) => "model_unavailable",
            PipelineError::Summary(SummaryError::Inference(_)) => "inference_failed",
        }
    }
}
