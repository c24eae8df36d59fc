//! Summarization model seam.
//!
//! The pipeline only sees [`SummarizationModel`]; how and when a model
//! instance comes into existence is decided by a [`ModelLoader`] combined
//! with a [`LoadStrategy`] inside [`ModelProvider`].

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::info;

use crate::core::models::{GenerationParams, LoadStrategy};
use crate::errors::SummaryError;

/// Maps a span of text to a shorter paraphrase.
///
/// Implementations are shared across worker tasks and must tolerate
/// concurrent calls; wrap them in [`SerializedModel`] otherwise.
#[async_trait]
pub trait SummarizationModel: Send + Sync {
    async fn summarize(
        &self,
        text: &str,
        params: &GenerationParams,
    ) -> Result<String, SummaryError>;
}

/// Produces ready-to-use model instances.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn SummarizationModel>, SummaryError>;
}

/// Runs inference calls one at a time.
pub struct SerializedModel {
    inner: Arc<dyn SummarizationModel>,
    lock: Mutex<()>,
}

impl SerializedModel {
    #[must_use]
    pub fn new(inner: Arc<dyn SummarizationModel>) -> Self {
        Self {
            inner,
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl SummarizationModel for SerializedModel {
    async fn summarize(
        &self,
        text: &str,
        params: &GenerationParams,
    ) -> Result<String, SummaryError> {
        let _guard = self.lock.lock().await;
        self.inner.summarize(text, params).await
    }
}

/// Hands out model instances according to the configured [`LoadStrategy`].
pub struct ModelProvider {
    loader: Arc<dyn ModelLoader>,
    strategy: LoadStrategy,
    serialize: bool,
    shared: OnceCell<Arc<dyn SummarizationModel>>,
}

impl ModelProvider {
    #[must_use]
    pub fn new(loader: Arc<dyn ModelLoader>, strategy: LoadStrategy, serialize: bool) -> Self {
        Self {
            loader,
            strategy,
            serialize,
            shared: OnceCell::new(),
        }
    }

    #[must_use]
    pub const fn strategy(&self) -> LoadStrategy {
        self.strategy
    }

    /// Load the model now when the strategy is [`LoadStrategy::Startup`].
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::ModelUnavailable`] if loading fails.
    pub async fn warm_up(&self) -> Result<(), SummaryError> {
        if self.strategy == LoadStrategy::Startup {
            self.get().await?;
        }
        Ok(())
    }

    /// A model instance for one summarization call.
    ///
    /// # Errors
    ///
    /// Returns [`SummaryError::ModelUnavailable`] if loading fails.
    pub async fn get(&self) -> Result<Arc<dyn SummarizationModel>, SummaryError> {
        match self.strategy {
            LoadStrategy::PerRequest => self.load_fresh().await,
            LoadStrategy::Startup => self
                .shared
                .get_or_try_init(|| self.load_fresh())
                .await
                .cloned(),
        }
    }

    async fn load_fresh(&self) -> Result<Arc<dyn SummarizationModel>, SummaryError> {
        info!(strategy = ?self.strategy, "Loading summarization model");
        let model = self.loader.load().await?;
        if self.serialize {
            Ok(Arc::new(SerializedModel::new(model)))
        } else {
            Ok(model)
        }
    }
}
