//! Batch source trait definition

use async_trait::async_trait;

use super::key::CacheKey;
use crate::domain::DomainError;

/// A fetched data payload tagged with the metadata used to route it to a slot
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedData<D, M> {
    pub data: Vec<D>,
    pub meta: M,
}

impl<D, M> AugmentedData<D, M> {
    pub fn new(data: Vec<D>, meta: M) -> Self {
        Self { data, meta }
    }
}

/// The fetch side of a coalescing batch cache.
///
/// `query_key` and `data_key` must be pure: equal queries yield equal keys,
/// and a datum always routes to the same key.
#[async_trait]
pub trait BatchSource: Send + Sync + 'static {
    /// Caller-facing request identity
    type Query: Clone + Send + Sync + 'static;
    /// Slot identity derived from a query or a fetched datum
    type Key: CacheKey;
    /// One data item stored in a slot
    type Data: Send + Sync + 'static;
    /// Routing metadata attached to each fetched batch element
    type Meta: Send + 'static;

    /// Derives the slot key for a query
    fn query_key(&self, query: &Self::Query) -> Self::Key;

    /// Derives the slot key a fetched datum belongs to
    fn data_key(&self, data: &Self::Data, meta: &Self::Meta) -> Self::Key;

    /// Fetches data for a batch of queries.
    ///
    /// A rejection fails every query in the batch.
    async fn fetch(
        &self,
        queries: &[Self::Query],
    ) -> Result<Vec<AugmentedData<Self::Data, Self::Meta>>, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// A record served by [`MockBatchSource`]
    #[derive(Debug, Clone, PartialEq)]
    pub struct MockRecord {
        pub key: String,
        pub value: String,
    }

    /// In-memory batch source that counts fetches and can be told to fail
    #[derive(Debug, Default)]
    pub struct MockBatchSource {
        records: HashMap<String, Vec<String>>,
        delay: Duration,
        failures_remaining: AtomicUsize,
        fetch_count: AtomicUsize,
        batches: Mutex<Vec<Vec<String>>>,
    }

    impl MockBatchSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_record(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
            self.records
                .entry(key.into())
                .or_default()
                .push(value.into());
            self
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        /// Fails the next `count` fetches
        pub fn with_failures(self, count: usize) -> Self {
            self.failures_remaining.store(count, Ordering::SeqCst);
            self
        }

        pub fn fetch_count(&self) -> usize {
            self.fetch_count.load(Ordering::SeqCst)
        }

        /// Query batches received, in call order
        pub fn batches(&self) -> Vec<Vec<String>> {
            self.batches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BatchSource for MockBatchSource {
        type Query = String;
        type Key = String;
        type Data = MockRecord;
        type Meta = String;

        fn query_key(&self, query: &String) -> String {
            query.clone()
        }

        fn data_key(&self, _data: &MockRecord, meta: &String) -> String {
            meta.clone()
        }

        async fn fetch(
            &self,
            queries: &[String],
        ) -> Result<Vec<AugmentedData<MockRecord, String>>, DomainError> {
            self.fetch_count.fetch_add(1, Ordering::SeqCst);
            self.batches.lock().unwrap().push(queries.to_vec());

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let failing = self
                .failures_remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failing {
                return Err(DomainError::provider("mock", "fetch failed"));
            }

            Ok(queries
                .iter()
                .filter_map(|query| {
                    self.records.get(query).map(|values| {
                        let data = values
                            .iter()
                            .map(|value| MockRecord {
                                key: query.clone(),
                                value: value.clone(),
                            })
                            .collect();
                        AugmentedData::new(data, query.clone())
                    })
                })
                .collect())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_source_routes_by_meta() {
            let source = MockBatchSource::new()
                .with_record("a", "1")
                .with_record("a", "2")
                .with_record("b", "3");

            let batch = source
                .fetch(&["a".to_string(), "missing".to_string()])
                .await
                .unwrap();

            assert_eq!(batch.len(), 1);
            assert_eq!(batch[0].data.len(), 2);
            assert_eq!(source.data_key(&batch[0].data[0], &batch[0].meta), "a");
            assert_eq!(source.fetch_count(), 1);
        }

        #[tokio::test]
        async fn test_mock_source_failures_are_consumed() {
            let source = MockBatchSource::new().with_record("a", "1").with_failures(1);

            assert!(source.fetch(&["a".to_string()]).await.is_err());
            assert!(source.fetch(&["a".to_string()]).await.is_ok());
            assert_eq!(source.batches().len(), 2);
        }
    }
}
