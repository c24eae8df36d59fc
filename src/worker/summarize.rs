//! Concurrent chunk summarization.
//!
//! Every chunk becomes its own tokio task running against one shared model
//! instance. At most `workers` tasks are in flight; when a batch size is
//! configured, chunks are submitted batch by batch and each batch finishes
//! before the next starts. A failing chunk contributes
//! [`CHUNK_ERROR_PLACEHOLDER`] instead of aborting its siblings.

use futures::StreamExt;
use futures::stream;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::ai::SummarizationModel;
use crate::core::config::AppConfig;
use crate::core::models::{GenerationParams, ResultOrder};

pub const CHUNK_ERROR_PLACEHOLDER: &str = "Error occurred in chunk";

/// Upper bound on the default worker count.
const MAX_DEFAULT_WORKERS: usize = 32;

/// Worker count used when none is configured: CPU count plus a few extra
/// slots for I/O bound inference calls, capped.
#[must_use]
pub fn default_workers() -> usize {
    let cpus = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    (cpus + 4).min(MAX_DEFAULT_WORKERS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub workers: usize,
    pub batch_size: Option<usize>,
    pub order: ResultOrder,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            batch_size: None,
            order: ResultOrder::default(),
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            workers: config.workers.unwrap_or_else(default_workers),
            batch_size: config.batch_size,
            order: config.result_order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    Succeeded(String),
    Failed(String),
}

/// Final state of one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkResult {
    pub index: usize,
    pub outcome: ChunkOutcome,
}

impl ChunkResult {
    /// The text this chunk contributes to the joined summary.
    #[must_use]
    pub fn text(&self) -> &str {
        match &self.outcome {
            ChunkOutcome::Succeeded(summary) => summary,
            ChunkOutcome::Failed(_) => CHUNK_ERROR_PLACEHOLDER,
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.outcome, ChunkOutcome::Failed(_))
    }
}

/// Join chunk contributions with single spaces, in the order given.
#[must_use]
pub fn join_results(results: &[ChunkResult]) -> String {
    results
        .iter()
        .map(ChunkResult::text)
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct ParallelSummarizer {
    model: Arc<dyn SummarizationModel>,
    params: GenerationParams,
    pool: PoolConfig,
}

impl ParallelSummarizer {
    #[must_use]
    pub fn new(
        model: Arc<dyn SummarizationModel>,
        params: GenerationParams,
        pool: PoolConfig,
    ) -> Self {
        Self {
            model,
            params,
            pool,
        }
    }

    /// Summarize all chunks and join the results into one string.
    pub async fn summarize<S: Into<String>>(&self, chunks: Vec<S>) -> String {
        join_results(&self.run(chunks).await)
    }

    /// Summarize all chunks, returning one result per chunk.
    ///
    /// Waits for every chunk. Results come back in chunk order for
    /// [`ResultOrder::Submission`], otherwise in completion order.
    pub async fn run<S: Into<String>>(&self, chunks: Vec<S>) -> Vec<ChunkResult> {
        let total = chunks.len();
        let workers = self.pool.workers.max(1);
        let batch_size = self.pool.batch_size.unwrap_or(total).max(1);

        info!(
            chunks = total,
            workers,
            batch_size,
            order = ?self.pool.order,
            "Dispatching chunk summarization"
        );

        let mut queue = chunks
            .into_iter()
            .map(Into::into)
            .enumerate()
            .inspect(|(index, _)| debug!(index, state = "pending", "Chunk queued"))
            .collect::<Vec<(usize, String)>>()
            .into_iter()
            .peekable();

        let mut results = Vec::with_capacity(total);
        while queue.peek().is_some() {
            let batch: Vec<(usize, String)> = queue.by_ref().take(batch_size).collect();
            let mut done: Vec<ChunkResult> = stream::iter(batch)
                .map(|(index, chunk)| self.run_chunk(index, chunk))
                .buffer_unordered(workers)
                .collect()
                .await;
            results.append(&mut done);
        }

        if self.pool.order == ResultOrder::Submission {
            results.sort_by_key(|r| r.index);
        }

        let failed = results.iter().filter(|r| r.is_failed()).count();
        if failed > 0 {
            warn!(failed, total, "Some chunks could not be summarized");
        }

        results
    }

    async fn run_chunk(&self, index: usize, chunk: String) -> ChunkResult {
        debug!(index, chars = chunk.chars().count(), state = "running", "Chunk started");

        let model = Arc::clone(&self.model);
        let params = self.params.clone();
        let handle = tokio::spawn(async move { model.summarize(&chunk, &params).await });

        let outcome = match handle.await {
            Ok(Ok(summary)) => {
                debug!(index, state = "succeeded", "Chunk finished");
                ChunkOutcome::Succeeded(summary)
            }
            Ok(Err(e)) => {
                warn!(index, state = "failed", "Error processing chunk: {}", e);
                ChunkOutcome::Failed(e.to_string())
            }
            Err(e) => {
                warn!(index, state = "failed", "Chunk task aborted: {}", e);
                ChunkOutcome::Failed(format!("chunk task aborted: {e}"))
            }
        };

        ChunkResult { index, outcome }
    }
}
