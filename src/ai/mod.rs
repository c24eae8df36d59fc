//! Summarization model access

pub mod client;
pub mod model;

// Re-export main types for convenience
pub use client::{HttpModelLoader, HttpSummarizationModel, estimate_tokens};
pub use model::{ModelLoader, ModelProvider, SerializedModel, SummarizationModel};
