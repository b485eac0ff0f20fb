//! Variant lookup key generation
//!
//! A [`VariantId`] is the flat identity used to correlate a mutation or
//! structural variant with its annotation record. Ids are built from a kind
//! tag followed by a fixed number of components joined with `_`; any `_` or
//! `\` inside a component is escaped with `\`, so component boundaries are
//! unambiguous and distinct inputs never produce the same id.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::entity::{Mutation, StructuralVariant};

const DELIMITER: char = '_';
const ESCAPE: char = '\\';

const MUTATION_TAG: &str = "mut";
const STRUCTURAL_VARIANT_TAG: &str = "sv";

/// Canonical lookup key for one variant in one tumor type context
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(String);

impl VariantId {
    /// Id for a point mutation. `tumor_type` may be empty when unknown.
    pub fn for_mutation(
        entrez_gene_id: i64,
        tumor_type: &str,
        protein_change: &str,
        mutation_type: &str,
    ) -> Self {
        Self::build(
            MUTATION_TAG,
            &[
                &entrez_gene_id.to_string(),
                tumor_type,
                protein_change,
                mutation_type,
            ],
        )
    }

    /// Id for a structural variant. Gene order is significant: swapping the
    /// two sites yields a different id.
    pub fn for_structural_variant(
        site1_entrez_gene_id: Option<i64>,
        site2_entrez_gene_id: Option<i64>,
        tumor_type: &str,
        variant_type: StructuralVariantType,
    ) -> Self {
        let site1 = site1_entrez_gene_id.map(|id| id.to_string()).unwrap_or_default();
        let site2 = site2_entrez_gene_id.map(|id| id.to_string()).unwrap_or_default();

        Self::build(
            STRUCTURAL_VARIANT_TAG,
            &[&site1, &site2, tumor_type, variant_type.as_str()],
        )
    }

    fn build(tag: &str, components: &[&str]) -> Self {
        let mut id = String::from(tag);

        for component in components {
            id.push(DELIMITER);
            for c in component.chars() {
                if c == DELIMITER || c == ESCAPE {
                    id.push(ESCAPE);
                }
                id.push(c);
            }
        }

        Self(id)
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<VariantId> for String {
    fn from(id: VariantId) -> Self {
        id.0
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for VariantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Closed classification of a structural variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StructuralVariantType {
    Deletion,
    Translocation,
    Duplication,
    Insertion,
    Inversion,
    Fusion,
    Unknown,
}

impl StructuralVariantType {
    pub const ALL: [StructuralVariantType; 7] = [
        Self::Deletion,
        Self::Translocation,
        Self::Duplication,
        Self::Insertion,
        Self::Inversion,
        Self::Fusion,
        Self::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deletion => "DELETION",
            Self::Translocation => "TRANSLOCATION",
            Self::Duplication => "DUPLICATION",
            Self::Insertion => "INSERTION",
            Self::Inversion => "INVERSION",
            Self::Fusion => "FUSION",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parses a caller-reported variant class, case-insensitively
    pub fn from_variant_class(class: &str) -> Option<Self> {
        let class = class.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(class))
    }
}

impl fmt::Display for StructuralVariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifies a structural variant.
///
/// Two distinct partner genes make a fusion. Otherwise (one gene, or the
/// same gene at both sites) the reported variant class is used when it names
/// a known type, and anything else is `Unknown`.
pub fn derive_structural_variant_type(sv: &StructuralVariant) -> StructuralVariantType {
    let site1 = site_gene(sv.site1_hugo_symbol.as_deref(), sv.site1_entrez_gene_id);
    let site2 = site_gene(sv.site2_hugo_symbol.as_deref(), sv.site2_entrez_gene_id);

    if let (Some(a), Some(b)) = (&site1, &site2) {
        if a != b {
            return StructuralVariantType::Fusion;
        }
    }

    sv.variant_class
        .as_deref()
        .and_then(StructuralVariantType::from_variant_class)
        .unwrap_or(StructuralVariantType::Unknown)
}

fn site_gene(symbol: Option<&str>, entrez_gene_id: Option<i64>) -> Option<String> {
    match symbol.map(str::trim).filter(|s| !s.is_empty()) {
        Some(symbol) => Some(symbol.to_uppercase()),
        None => entrez_gene_id.map(|id| id.to_string()),
    }
}

/// Builds the lookup id for a caller-supplied mutation, dispatching on
/// whether it carries a structural variant.
pub fn variant_id_for(mutation: &Mutation, tumor_type: &str, entrez_gene_id: i64) -> VariantId {
    match &mutation.structural_variant {
        Some(sv) => VariantId::for_structural_variant(
            sv.site1_entrez_gene_id,
            sv.site2_entrez_gene_id,
            tumor_type,
            derive_structural_variant_type(sv),
        ),
        None => VariantId::for_mutation(
            entrez_gene_id,
            tumor_type,
            &mutation.protein_change,
            &mutation.mutation_type,
        ),
    }
}
