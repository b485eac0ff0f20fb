//! Input-driven view over a batch cache

use tokio::sync::watch;

use super::lazy_batch::LazyBatchCache;
use crate::domain::cache::{BatchSource, CacheError, Slot};

/// Queries of one input snapshot with their resolved slots, in order
pub struct Snapshot<S: BatchSource> {
    pub queries: Vec<S::Query>,
    pub results: Vec<Result<Slot<S::Data>, CacheError>>,
}

/// Couples a cache with the channel that publishes its current queries.
///
/// When the inputs change, the new query list simply names other keys;
/// slots for the old keys stay cached.
pub struct CacheBinding<S: BatchSource> {
    cache: LazyBatchCache<S>,
    inputs: watch::Receiver<Vec<S::Query>>,
}

impl<S: BatchSource> CacheBinding<S> {
    pub fn new(cache: LazyBatchCache<S>, inputs: watch::Receiver<Vec<S::Query>>) -> Self {
        Self { cache, inputs }
    }

    pub fn cache(&self) -> &LazyBatchCache<S> {
        &self.cache
    }

    /// Resolves the latest published queries
    pub async fn current(&mut self) -> Snapshot<S> {
        let queries = self.inputs.borrow_and_update().clone();
        let results = self.cache.get_all(&queries).await;
        Snapshot { queries, results }
    }

    /// Waits for the next input change and resolves it.
    ///
    /// Returns `None` once the sender is gone.
    pub async fn changed(&mut self) -> Option<Snapshot<S>> {
        if self.inputs.changed().await.is_err() {
            tracing::debug!(cache = %self.cache.name(), "Input channel closed");
            return None;
        }
        Some(self.current().await)
    }
}
