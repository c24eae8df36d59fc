//! Transcript retrieval

pub mod captions;
pub mod youtube;

use async_trait::async_trait;

use crate::core::models::{TranscriptFragment, join_fragments};
use crate::errors::TranscriptError;

pub use youtube::YouTubeTranscripts;

/// Anything that can produce the timed transcript of a video.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Ordered transcript fragments of `video_id` in `language`.
    ///
    /// # Errors
    ///
    /// Fails when the video is unknown, has no transcript in `language`,
    /// or the service cannot be reached.
    async fn fetch(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Vec<TranscriptFragment>, TranscriptError>;

    /// The whole transcript as one space-joined string.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`TranscriptSource::fetch`].
    async fn fetch_text(&self, video_id: &str, language: &str) -> Result<String, TranscriptError> {
        let fragments = self.fetch(video_id, language).await?;
        Ok(join_fragments(&fragments))
    }
}
