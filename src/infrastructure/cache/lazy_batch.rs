//! Coalescing batch cache
//!
//! [`LazyBatchCache`] maps queries to slots of fetched data. The first request
//! for an absent key starts a fetch; every request for that key made while the
//! fetch is in flight waits on the same result. A single fetch may serve many
//! keys: the returned batch is partitioned with [`BatchSource::data_key`] and
//! each slot receives its slice, or an empty slice when nothing was routed to
//! it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::join_all;
use tokio::sync::oneshot;

use crate::domain::cache::{AugmentedData, BatchSource, CacheError, EntryStatus, Slot};
use crate::infrastructure::observability::{
    record_cache_fetch, record_cache_hits, record_cache_misses,
};

type Outcome<D> = Result<Slot<D>, CacheError>;
type Waiter<D> = oneshot::Sender<Outcome<D>>;
type Batch<S> = Vec<AugmentedData<<S as BatchSource>::Data, <S as BatchSource>::Meta>>;
type Routed<S> = HashMap<<S as BatchSource>::Key, Vec<<S as BatchSource>::Data>>;

enum Entry<D> {
    /// Owned by the fetch with this generation
    Pending { generation: u64 },
    Complete(Slot<D>),
}

struct State<K, D> {
    entries: HashMap<K, Entry<D>>,
    waiters: HashMap<(u64, K), Vec<Waiter<D>>>,
    next_generation: u64,
}

impl<K: std::hash::Hash + Eq, D> State<K, D> {
    fn subscribe(&mut self, generation: u64, key: K) -> oneshot::Receiver<Outcome<D>> {
        let (tx, rx) = oneshot::channel();
        self.waiters.entry((generation, key)).or_default().push(tx);
        rx
    }

    fn is_owned_by(&self, key: &K, generation: u64) -> bool {
        matches!(
            self.entries.get(key),
            Some(Entry::Pending { generation: g }) if *g == generation
        )
    }
}

struct Inner<S: BatchSource> {
    name: String,
    source: S,
    state: Mutex<State<S::Key, S::Data>>,
}

enum Lookup<D> {
    Ready(Slot<D>),
    Waiting(oneshot::Receiver<Outcome<D>>),
}

/// Request-coalescing cache over a [`BatchSource`].
///
/// Cloning is cheap and clones share state. Features:
/// - At most one fetch in flight per key
/// - One fetch per `get_all` call for every absent key it names
/// - Failed fetches leave the key absent so the next request retries
/// - `invalidate` during a fetch frees the key without stranding waiters
pub struct LazyBatchCache<S: BatchSource> {
    inner: Arc<Inner<S>>,
}

impl<S: BatchSource> Clone for LazyBatchCache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: BatchSource> std::fmt::Debug for LazyBatchCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyBatchCache")
            .field("name", &self.inner.name)
            .field("len", &self.len())
            .finish()
    }
}

impl<S: BatchSource> LazyBatchCache<S> {
    /// Creates an empty cache; `name` labels its logs and metrics
    pub fn new(name: impl Into<String>, source: S) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                source,
                state: Mutex::new(State {
                    entries: HashMap::new(),
                    waiters: HashMap::new(),
                    next_generation: 0,
                }),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    fn state(&self) -> MutexGuard<'_, State<S::Key, S::Data>> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolves one query, fetching it if no slot exists
    pub async fn get(&self, query: S::Query) -> Result<Slot<S::Data>, CacheError> {
        self.get_all(std::slice::from_ref(&query))
            .await
            .pop()
            .unwrap_or(Err(CacheError::Abandoned))
    }

    /// Resolves a batch of queries, in order.
    ///
    /// Completed slots are returned as they are, pending ones are awaited, and
    /// every absent key is fetched in one call to the source.
    pub async fn get_all(&self, queries: &[S::Query]) -> Vec<Result<Slot<S::Data>, CacheError>> {
        let mut lookups = Vec::with_capacity(queries.len());
        let mut fetch_keys = Vec::new();
        let mut fetch_queries = Vec::new();
        let mut hits = 0u64;

        let generation = {
            let mut state = self.state();
            let generation = state.next_generation;

            for query in queries {
                let key = self.inner.source.query_key(query);

                let existing = match state.entries.get(&key) {
                    Some(Entry::Complete(slot)) => Some(Ok(Arc::clone(slot))),
                    Some(Entry::Pending { generation: owner }) => Some(Err(*owner)),
                    None => None,
                };

                let lookup = match existing {
                    Some(Ok(slot)) => {
                        hits += 1;
                        Lookup::Ready(slot)
                    }
                    Some(Err(owner)) => Lookup::Waiting(state.subscribe(owner, key)),
                    None => {
                        state
                            .entries
                            .insert(key.clone(), Entry::Pending { generation });
                        fetch_keys.push(key.clone());
                        fetch_queries.push(query.clone());
                        Lookup::Waiting(state.subscribe(generation, key))
                    }
                };
                lookups.push(lookup);
            }

            if !fetch_keys.is_empty() {
                state.next_generation += 1;
            }
            generation
        };

        record_cache_hits(&self.inner.name, hits);
        record_cache_misses(&self.inner.name, queries.len() as u64 - hits);
        tracing::trace!(
            cache = %self.inner.name,
            queries = queries.len(),
            hits,
            "Cache lookup"
        );

        if !fetch_keys.is_empty() {
            self.spawn_fetch(generation, fetch_keys, fetch_queries);
        }

        join_all(lookups.into_iter().map(|lookup| async move {
            match lookup {
                Lookup::Ready(slot) => Ok(slot),
                Lookup::Waiting(rx) => rx.await.unwrap_or(Err(CacheError::Abandoned)),
            }
        }))
        .await
    }

    fn spawn_fetch(&self, generation: u64, keys: Vec<S::Key>, queries: Vec<S::Query>) {
        tracing::debug!(
            cache = %self.inner.name,
            generation,
            keys = keys.len(),
            "Starting batch fetch"
        );

        let in_flight = InFlight {
            cache: self.clone(),
            generation,
            keys,
        };

        tokio::spawn(async move {
            let result = in_flight.cache.inner.source.fetch(&queries).await;
            in_flight.finish(result.map_err(CacheError::fetch));
        });
    }

    /// Partitions a batch by the key each item belongs to
    fn route(&self, batch: Batch<S>) -> Routed<S> {
        let mut routed: Routed<S> = HashMap::new();
        for AugmentedData { data, meta } in batch {
            for datum in data {
                let key = self.inner.source.data_key(&datum, &meta);
                routed.entry(key).or_default().push(datum);
            }
        }
        routed
    }

    fn settle(&self, generation: u64, keys: Vec<S::Key>, result: Result<Routed<S>, CacheError>) {
        let mut state = self.state();

        match result {
            Ok(mut routed) => {
                for key in &keys {
                    let slot: Slot<S::Data> = Arc::new(routed.remove(key).unwrap_or_default());

                    if state.is_owned_by(key, generation) {
                        state
                            .entries
                            .insert(key.clone(), Entry::Complete(Arc::clone(&slot)));
                    }

                    let waiters = state
                        .waiters
                        .remove(&(generation, key.clone()))
                        .unwrap_or_default();
                    for waiter in waiters {
                        let _ = waiter.send(Ok(Arc::clone(&slot)));
                    }
                }

                let unrequested = routed.len();
                for (key, data) in routed {
                    state
                        .entries
                        .entry(key)
                        .or_insert_with(|| Entry::Complete(Arc::new(data)));
                }

                record_cache_fetch(&self.inner.name, true);
                tracing::debug!(
                    cache = %self.inner.name,
                    generation,
                    keys = keys.len(),
                    unrequested,
                    "Batch fetch completed"
                );
            }
            Err(error) => {
                for key in &keys {
                    if state.is_owned_by(key, generation) {
                        state.entries.remove(key);
                    }

                    let waiters = state
                        .waiters
                        .remove(&(generation, key.clone()))
                        .unwrap_or_default();
                    for waiter in waiters {
                        let _ = waiter.send(Err(error.clone()));
                    }
                }

                record_cache_fetch(&self.inner.name, false);
                tracing::warn!(
                    cache = %self.inner.name,
                    generation,
                    keys = keys.len(),
                    error = %error,
                    "Batch fetch failed"
                );
            }
        }
    }

    /// Current status of a query's slot, without fetching
    pub fn peek(&self, query: &S::Query) -> EntryStatus<S::Data> {
        let key = self.inner.source.query_key(query);

        match self.state().entries.get(&key) {
            None => EntryStatus::Absent,
            Some(Entry::Pending { .. }) => EntryStatus::Pending,
            Some(Entry::Complete(slot)) => EntryStatus::Complete(Arc::clone(slot)),
        }
    }

    /// Stores already-fetched data, replacing whatever the touched slots held.
    ///
    /// A slot replaced while pending still resolves its waiters from the
    /// fetch, but the fetch no longer writes to it.
    pub fn add_data(&self, batch: Batch<S>) {
        let routed = self.route(batch);

        let count = routed.len();
        let mut state = self.state();
        for (key, data) in routed {
            state.entries.insert(key, Entry::Complete(Arc::new(data)));
        }

        tracing::debug!(cache = %self.inner.name, keys = count, "Added data");
    }

    /// Forgets a query's slot so the next request fetches again.
    ///
    /// An in-flight fetch for the key still resolves the callers already
    /// waiting on it.
    pub fn invalidate(&self, query: &S::Query) {
        let key = self.inner.source.query_key(query);
        let removed = self.state().entries.remove(&key).is_some();

        tracing::debug!(cache = %self.inner.name, key = ?key, removed, "Invalidated");
    }

    /// Number of pending and completed slots
    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Settles a fetch's keys exactly once.
///
/// If the fetch task is dropped before it finishes (a panic in the fetch or
/// in `data_key`, or runtime shutdown), its waiters receive
/// [`CacheError::Abandoned`] and its keys are released.
struct InFlight<S: BatchSource> {
    cache: LazyBatchCache<S>,
    generation: u64,
    keys: Vec<S::Key>,
}

impl<S: BatchSource> InFlight<S> {
    fn finish(mut self, result: Result<Batch<S>, CacheError>) {
        let result = result.map(|batch| self.cache.route(batch));
        let keys = std::mem::take(&mut self.keys);
        self.cache.settle(self.generation, keys, result);
    }
}

impl<S: BatchSource> Drop for InFlight<S> {
    fn drop(&mut self) {
        if self.keys.is_empty() {
            return;
        }

        let keys = std::mem::take(&mut self.keys);
        self.cache
            .settle(self.generation, keys, Err(CacheError::Abandoned));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::mock::{MockBatchSource, MockRecord};
    use std::time::Duration;

    fn values(slot: &Slot<MockRecord>) -> Vec<&str> {
        slot.iter().map(|r| r.value.as_str()).collect()
    }

    fn record(key: &str, value: &str) -> MockRecord {
        MockRecord {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_fetches_and_caches() {
        let cache = LazyBatchCache::new("test", MockBatchSource::new().with_record("a", "1"));

        let first = cache.get("a".to_string()).await.unwrap();
        let second = cache.get("a".to_string()).await.unwrap();

        assert_eq!(values(&first), vec!["1"]);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.source().fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_gets_coalesce_into_one_fetch() {
        let source = MockBatchSource::new()
            .with_record("a", "1")
            .with_delay(Duration::from_millis(50));
        let cache = LazyBatchCache::new("test", source);

        let calls = (0..10).map(|_| {
            let cache = cache.clone();
            async move { cache.get("a".to_string()).await }
        });
        let results = join_all(calls).await;

        assert_eq!(cache.source().fetch_count(), 1);
        let first = results[0].as_ref().unwrap();
        for result in &results {
            assert!(Arc::ptr_eq(first, result.as_ref().unwrap()));
        }
    }

    #[tokio::test]
    async fn test_get_all_batches_absent_keys_and_dedups() {
        let source = MockBatchSource::new()
            .with_record("a", "1")
            .with_record("b", "2")
            .with_record("b", "3");
        let cache = LazyBatchCache::new("test", source);

        let queries: Vec<String> = ["a", "b", "a", "c"].iter().map(|s| s.to_string()).collect();
        let results = cache.get_all(&queries).await;

        assert_eq!(cache.source().batches(), vec![vec!["a", "b", "c"]]);
        assert_eq!(values(results[0].as_ref().unwrap()), vec!["1"]);
        assert_eq!(values(results[1].as_ref().unwrap()), vec!["2", "3"]);
        assert_eq!(values(results[2].as_ref().unwrap()), vec!["1"]);
        assert!(results[3].as_ref().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_all_only_fetches_missing_keys() {
        let source = MockBatchSource::new()
            .with_record("a", "1")
            .with_record("b", "2");
        let cache = LazyBatchCache::new("test", source);

        cache.get("a".to_string()).await.unwrap();
        let results = cache
            .get_all(&["a".to_string(), "b".to_string()])
            .await;

        assert!(results.iter().all(Result::is_ok));
        assert_eq!(cache.source().batches(), vec![vec!["a"], vec!["b"]]);
    }

    #[tokio::test]
    async fn test_key_without_data_resolves_empty() {
        let cache = LazyBatchCache::new("test", MockBatchSource::new());

        let slot = cache.get("missing".to_string()).await.unwrap();

        assert!(slot.is_empty());
        assert!(cache.peek(&"missing".to_string()).is_complete());
    }

    #[tokio::test]
    async fn test_failure_reaches_every_waiter_and_allows_retry() {
        let source = MockBatchSource::new()
            .with_record("a", "1")
            .with_delay(Duration::from_millis(20))
            .with_failures(1);
        let cache = LazyBatchCache::new("test", source);

        let (first, second) = tokio::join!(cache.get("a".to_string()), cache.get("a".to_string()));
        let first = first.unwrap_err();
        let second = second.unwrap_err();

        assert!(first.domain_error().is_some());
        assert_eq!(first.to_string(), second.to_string());
        assert!(cache.peek(&"a".to_string()).is_absent());
        assert_eq!(cache.source().fetch_count(), 1);

        let retried = cache.get("a".to_string()).await.unwrap();
        assert_eq!(values(&retried), vec!["1"]);
        assert_eq!(cache.source().fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_peek_does_not_fetch() {
        let source = MockBatchSource::new()
            .with_record("a", "1")
            .with_delay(Duration::from_millis(50));
        let cache = LazyBatchCache::new("test", source);
        let query = "a".to_string();

        assert!(cache.peek(&query).is_absent());
        assert_eq!(cache.source().fetch_count(), 0);

        let pending = tokio::spawn({
            let cache = cache.clone();
            let query = query.clone();
            async move { cache.get(query).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(cache.peek(&query).is_pending());

        pending.await.unwrap().unwrap();
        assert_eq!(cache.peek(&query).data().map(|d| d.len()), Some(1));
    }

    #[tokio::test]
    async fn test_invalidate_during_fetch() {
        let source = MockBatchSource::new()
            .with_record("a", "1")
            .with_delay(Duration::from_millis(50));
        let cache = LazyBatchCache::new("test", source);
        let query = "a".to_string();

        let waiting = tokio::spawn({
            let cache = cache.clone();
            let query = query.clone();
            async move { cache.get(query).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        cache.invalidate(&query);
        assert!(cache.peek(&query).is_absent());

        let refetch = tokio::spawn({
            let cache = cache.clone();
            let query = query.clone();
            async move { cache.get(query).await }
        });

        let first = waiting.await.unwrap().unwrap();
        let second = refetch.await.unwrap().unwrap();

        assert_eq!(values(&first), vec!["1"]);
        assert_eq!(values(&second), vec!["1"]);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.source().fetch_count(), 2);

        let status = cache.peek(&query);
        assert!(Arc::ptr_eq(status.data().unwrap(), &second));
    }

    #[tokio::test]
    async fn test_invalidate_completed_slot_refetches() {
        let cache = LazyBatchCache::new("test", MockBatchSource::new().with_record("a", "1"));
        let query = "a".to_string();

        cache.get(query.clone()).await.unwrap();
        cache.invalidate(&query);
        assert!(cache.is_empty());

        cache.get(query).await.unwrap();
        assert_eq!(cache.source().fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_add_data_prepopulates_slots() {
        let cache = LazyBatchCache::new("test", MockBatchSource::new());

        cache.add_data(vec![
            AugmentedData::new(vec![record("a", "1"), record("a", "2")], "a".to_string()),
            AugmentedData::new(vec![record("b", "3")], "b".to_string()),
        ]);

        assert_eq!(cache.len(), 2);
        let slot = cache.get("a".to_string()).await.unwrap();
        assert_eq!(values(&slot), vec!["1", "2"]);
        assert_eq!(cache.source().fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_unrequested_data_fills_absent_slots_only() {
        struct Fanout;

        #[async_trait::async_trait]
        impl BatchSource for Fanout {
            type Query = String;
            type Key = String;
            type Data = MockRecord;
            type Meta = String;

            fn query_key(&self, query: &String) -> String {
                query.clone()
            }

            fn data_key(&self, data: &MockRecord, _meta: &String) -> String {
                data.key.clone()
            }

            async fn fetch(
                &self,
                _queries: &[String],
            ) -> Result<Vec<AugmentedData<MockRecord, String>>, crate::domain::DomainError>
            {
                Ok(vec![AugmentedData::new(
                    vec![record("a", "fetched"), record("b", "fetched")],
                    String::new(),
                )])
            }
        }

        let cache = LazyBatchCache::new("fanout", Fanout);
        cache.add_data(vec![AugmentedData::new(
            vec![record("b", "seeded")],
            String::new(),
        )]);

        cache.get("a".to_string()).await.unwrap();

        let status = cache.peek(&"b".to_string());
        assert_eq!(values(status.data().unwrap()), vec!["seeded"]);
        assert_eq!(cache.len(), 2);
    }

    /// Panics on its first `panics` fetches, then serves one record per query
    struct Unstable {
        fetches: std::sync::atomic::AtomicUsize,
        panics: usize,
        panic_in_data_key: bool,
    }

    impl Unstable {
        fn panicking_fetch(panics: usize) -> Self {
            Self {
                fetches: Default::default(),
                panics,
                panic_in_data_key: false,
            }
        }

        fn panicking_data_key() -> Self {
            Self {
                fetches: Default::default(),
                panics: 0,
                panic_in_data_key: true,
            }
        }
    }

    #[async_trait::async_trait]
    impl BatchSource for Unstable {
        type Query = String;
        type Key = String;
        type Data = MockRecord;
        type Meta = String;

        fn query_key(&self, query: &String) -> String {
            query.clone()
        }

        fn data_key(&self, data: &MockRecord, _meta: &String) -> String {
            if self.panic_in_data_key && data.key == "b" {
                panic!("unroutable record");
            }
            data.key.clone()
        }

        async fn fetch(
            &self,
            queries: &[String],
        ) -> Result<Vec<AugmentedData<MockRecord, String>>, crate::domain::DomainError> {
            let attempt = self
                .fetches
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            if attempt < self.panics {
                panic!("fetch crashed");
            }

            Ok(vec![AugmentedData::new(
                queries.iter().map(|q| record(q, "ok")).collect(),
                String::new(),
            )])
        }
    }

    #[tokio::test]
    async fn test_panicking_fetch_abandons_waiters_and_releases_key() {
        let cache = LazyBatchCache::new("unstable", Unstable::panicking_fetch(1));

        let (a, b) = tokio::join!(cache.get("a".to_string()), cache.get("a".to_string()));

        assert!(matches!(a, Err(CacheError::Abandoned)));
        assert!(matches!(b, Err(CacheError::Abandoned)));
        assert!(cache.peek(&"a".to_string()).is_absent());

        let retried = cache.get("a".to_string()).await.unwrap();
        assert_eq!(values(&retried), vec!["ok"]);
    }

    #[tokio::test]
    async fn test_panicking_data_key_abandons_every_key() {
        let cache = LazyBatchCache::new("unstable", Unstable::panicking_data_key());

        let results = cache.get_all(&["a".to_string(), "b".to_string()]).await;

        assert!(
            results
                .iter()
                .all(|r| matches!(r, Err(CacheError::Abandoned)))
        );
        assert!(cache.peek(&"a".to_string()).is_absent());
        assert!(cache.peek(&"b".to_string()).is_absent());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_aborted_caller_does_not_strand_other_waiters() {
        let source = MockBatchSource::new()
            .with_record("a", "1")
            .with_delay(Duration::from_millis(50));
        let cache = LazyBatchCache::new("test", source);

        let first = tokio::spawn({
            let cache = cache.clone();
            async move { cache.get("a".to_string()).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(cache.peek(&"a".to_string()).is_pending());

        first.abort();
        let slot = cache.get("a".to_string()).await.unwrap();

        assert_eq!(values(&slot), vec!["1"]);
        assert_eq!(cache.source().fetch_count(), 1);
        assert!(first.await.unwrap_err().is_cancelled());
    }
}
