//! Transcript chunking and summarization

pub mod chunking;
pub mod pipeline;
pub mod summarize;

// Re-export the main entry points for convenience
pub use chunking::{CHUNK_SIZE, chunk_text};
pub use pipeline::{EMPTY_TRANSCRIPT_MESSAGE, SummaryService};
pub use summarize::{CHUNK_ERROR_PLACEHOLDER, ParallelSummarizer, PoolConfig};
