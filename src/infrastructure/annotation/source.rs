//! Indicator cache keyed by variant id

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::client::AnnotationClient;
use super::query::AnnotationQuery;
use crate::domain::{
    AugmentedData, BatchSource, DomainError, IndicatorRecord, IndicatorTable, Mutation, VariantId,
};
use crate::infrastructure::cache::LazyBatchCache;

/// Batch source that annotates point mutations and structural variants in
/// one fetch and routes each record by the id it echoes back
#[derive(Clone)]
pub struct IndicatorSource {
    client: Arc<dyn AnnotationClient>,
}

impl IndicatorSource {
    pub fn new(client: Arc<dyn AnnotationClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BatchSource for IndicatorSource {
    type Query = AnnotationQuery;
    type Key = VariantId;
    type Data = IndicatorRecord;
    type Meta = VariantId;

    fn query_key(&self, query: &AnnotationQuery) -> VariantId {
        query.id().clone()
    }

    fn data_key(&self, _record: &IndicatorRecord, id: &VariantId) -> VariantId {
        id.clone()
    }

    async fn fetch(
        &self,
        queries: &[AnnotationQuery],
    ) -> Result<Vec<AugmentedData<IndicatorRecord, VariantId>>, DomainError> {
        let mut protein_changes = Vec::new();
        let mut structural_variants = Vec::new();
        for query in queries {
            match query {
                AnnotationQuery::ProteinChange(q) => protein_changes.push(q.clone()),
                AnnotationQuery::StructuralVariant(q) => structural_variants.push(q.clone()),
            }
        }

        let (mut records, structural) = futures::try_join!(
            self.client.annotate_protein_changes(&protein_changes),
            self.client.annotate_structural_variants(&structural_variants),
        )?;
        records.extend(structural);

        let requested: HashMap<&str, &VariantId> = queries
            .iter()
            .map(|q| (q.id().as_str(), q.id()))
            .collect();

        let mut routed = Vec::with_capacity(records.len());
        for record in records {
            match record.query_id().and_then(|id| requested.get(id)) {
                Some(&id) => routed.push(AugmentedData::new(vec![record], id.clone())),
                None => tracing::warn!(
                    query_id = ?record.query_id(),
                    "Dropping indicator for an id that was not requested"
                ),
            }
        }

        Ok(routed)
    }
}

pub type IndicatorCache = LazyBatchCache<IndicatorSource>;

pub fn indicator_cache(client: Arc<dyn AnnotationClient>) -> IndicatorCache {
    LazyBatchCache::new("indicators", IndicatorSource::new(client))
}

/// Annotates `mutations` through the cache and collects the results into an
/// indicator table.
///
/// Variants without a match are absent from the table. If any lookup fails
/// the whole table is marked failed.
pub async fn fetch_indicator_table<T, E>(
    cache: &IndicatorCache,
    mutations: &[Mutation],
    tumor_type: T,
    entrez_gene_id: E,
) -> IndicatorTable
where
    T: Fn(&Mutation) -> String,
    E: Fn(&Mutation) -> i64,
{
    let queries: Vec<AnnotationQuery> = mutations
        .iter()
        .map(|m| AnnotationQuery::for_mutation(m, &tumor_type(m), entrez_gene_id(m)))
        .collect();

    let results = cache.get_all(&queries).await;

    let mut table = IndicatorTable::default();
    for (query, result) in queries.iter().zip(results) {
        match result {
            Ok(slot) => {
                if let Some(record) = slot.first() {
                    table.insert(query.id(), record.clone());
                }
            }
            Err(error) => {
                tracing::warn!(error = %error, "Indicator lookup failed");
                return IndicatorTable::failed();
            }
        }
    }

    table
}
