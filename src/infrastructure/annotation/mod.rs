//! Annotation infrastructure - OncoKB queries, client and indicator cache

mod client;
mod query;
mod source;

pub use client::{AnnotationClient, OncoKbAnnotator};
pub use query::{
    AnnotationQuery, GeneRef, ProteinChangeQuery, StructuralVariantQuery,
    mutation_type_to_consequence,
};
pub use source::{IndicatorCache, IndicatorSource, fetch_indicator_table, indicator_cache};

#[cfg(test)]
pub use client::MockAnnotationClient;
