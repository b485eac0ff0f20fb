//! Domain layer - Core business logic and entities

pub mod cache;
pub mod error;
pub mod indicator;
pub mod profile;
pub mod scoring;
pub mod variant;

pub use cache::{AugmentedData, BatchSource, CacheError, CacheKey, EntryStatus, Slot};
pub use error::DomainError;
pub use indicator::{
    IndicatorQuery, IndicatorRecord, IndicatorTable, default_indicator_filter,
    default_mutation_filter, group_indicators_by_position, indicator_for_mutation,
};
pub use profile::{MolecularProfile, MolecularProfileFilter};
pub use scoring::{CardDataType, IndicatorScores, LEVELS, Oncogenicity};
pub use variant::{Mutation, StructuralVariant, StructuralVariantType, VariantId, variant_id_for};
