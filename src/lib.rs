//! TLDW - summarizes the transcript of a video behind a single HTTP endpoint.
//!
//! `GET /summary?url=<video url>&language=<code>` fetches the video's
//! transcript, cuts it into fixed-size chunks, summarizes the chunks
//! concurrently with a sequence-to-sequence model and answers with the
//! joined summaries as plain text.
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda (HTTP API / function URL) for serving requests
//! - the YouTube innertube and timed-text endpoints for transcripts
//! - a Hugging Face style inference endpoint for summarization
//! - Tokio tasks, bounded by a configurable worker count, for parallelism
//!
//! # Example
//!
//! ```no_run
//! use tldw::core::config::AppConfig;
//! use tldw::worker::SummaryService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     tldw::setup_logging(false);
//!
//!     let config = AppConfig::default();
//!     let service = SummaryService::from_config(&config)?;
//!
//!     let summary = service.summarize_video("dQw4w9WgXcQ", "en").await?;
//!     println!("Summary: {}", summary);
//!     Ok(())
//! }
//! ```
pub mod ai;
pub mod api;
pub mod core;
pub mod errors;
pub mod transcript;
pub mod worker;

pub use errors::{PipelineError, SummaryError, TranscriptError};

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Output goes to `CloudWatch` Logs as one JSON object per line. `RUST_LOG`
/// wins when set; otherwise the level is `info`, or `debug` when `debug`
/// is true. Calling it more than once is harmless.
///
/// # Example
///
/// ```
/// tldw::setup_logging(false);
/// ```
pub fn setup_logging(debug: bool) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
