use std::sync::Arc;
use tracing::info;

use super::chunking::{CHUNK_SIZE, chunk_text};
use super::summarize::{ParallelSummarizer, PoolConfig};
use crate::ai::{HttpModelLoader, ModelLoader, ModelProvider};
use crate::core::config::AppConfig;
use crate::core::models::GenerationParams;
use crate::errors::PipelineError;
use crate::transcript::{TranscriptSource, YouTubeTranscripts};

/// Returned instead of a summary when the transcript has no text.
pub const EMPTY_TRANSCRIPT_MESSAGE: &str = "Transcript is empty.";

/// Fetch → chunk → summarize, for one video at a time.
pub struct SummaryService {
    transcripts: Arc<dyn TranscriptSource>,
    models: ModelProvider,
    params: GenerationParams,
    pool: PoolConfig,
    chunk_size: usize,
}

impl SummaryService {
    #[must_use]
    pub fn new(
        transcripts: Arc<dyn TranscriptSource>,
        models: ModelProvider,
        pool: PoolConfig,
    ) -> Self {
        Self {
            transcripts,
            models,
            params: GenerationParams::default(),
            pool,
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Production wiring: YouTube transcripts and the HTTP inference model.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, PipelineError> {
        let transcripts = Arc::new(YouTubeTranscripts::from_config(config)?);
        let loader: Arc<dyn ModelLoader> = Arc::new(HttpModelLoader::from_config(config));
        let models = ModelProvider::new(
            loader,
            config.load_strategy,
            config.serialize_inference,
        );
        Ok(Self::new(transcripts, models, PoolConfig::from_config(config)))
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    #[must_use]
    pub const fn models(&self) -> &ModelProvider {
        &self.models
    }

    /// Summary of the transcript of `video_id` in `language`.
    ///
    /// # Errors
    ///
    /// Transcript failures and model load failures abort the request.
    /// Failures of individual chunks do not; they show up as placeholders.
    #[tracing::instrument(level = "info", skip(self))]
    pub async fn summarize_video(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<String, PipelineError> {
        let transcript = self.transcripts.fetch_text(video_id, language).await?;
        self.summarize_transcript(&transcript).await
    }

    /// Summary of an already fetched transcript.
    ///
    /// # Errors
    ///
    /// Returns an error only if the model cannot be loaded.
    pub async fn summarize_transcript(&self, transcript: &str) -> Result<String, PipelineError> {
        if transcript.is_empty() {
            info!("Transcript is empty, skipping summarization");
            return Ok(EMPTY_TRANSCRIPT_MESSAGE.to_string());
        }

        let chunks = chunk_text(transcript, self.chunk_size);
        info!(
            transcript_chars = transcript.chars().count(),
            chunks = chunks.len(),
            "Transcript chunked"
        );

        let model = self.models.get().await?;
        let summarizer = ParallelSummarizer::new(model, self.params.clone(), self.pool);
        Ok(summarizer.summarize(chunks).await)
    }
}
