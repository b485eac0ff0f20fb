//! Variant domain - Mutations, structural variants and their lookup keys

mod entity;
mod key;
mod tumor_type;

pub use entity::{Mutation, StructuralVariant, mutations_by_position};
pub use key::{StructuralVariantType, VariantId, derive_structural_variant_type, variant_id_for};
pub use tumor_type::{MainType, TumorType, tumor_type_name, tumor_type_name_with_exclusions};
