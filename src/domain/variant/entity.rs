//! Variant domain entities

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A structural variant joining two gene loci
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralVariant {
    #[serde(default)]
    pub site1_entrez_gene_id: Option<i64>,
    #[serde(default)]
    pub site1_hugo_symbol: Option<String>,
    #[serde(default)]
    pub site2_entrez_gene_id: Option<i64>,
    #[serde(default)]
    pub site2_hugo_symbol: Option<String>,
    /// Free-text class reported by the caller (e.g. "DELETION")
    #[serde(default)]
    pub variant_class: Option<String>,
}

/// A mutation as supplied by the caller.
///
/// Structural variants travel as mutations carrying a `structural_variant`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mutation {
    #[serde(default)]
    pub hugo_gene_symbol: Option<String>,
    #[serde(default)]
    pub entrez_gene_id: Option<i64>,
    #[serde(default)]
    pub protein_change: String,
    #[serde(default)]
    pub mutation_type: String,
    #[serde(default)]
    pub protein_pos_start: Option<i64>,
    #[serde(default)]
    pub tumor_type: Option<String>,
    #[serde(default)]
    pub structural_variant: Option<StructuralVariant>,
}

impl Mutation {
    pub fn point(
        entrez_gene_id: i64,
        protein_change: impl Into<String>,
        mutation_type: impl Into<String>,
    ) -> Self {
        Self {
            entrez_gene_id: Some(entrez_gene_id),
            protein_change: protein_change.into(),
            mutation_type: mutation_type.into(),
            ..Self::default()
        }
    }

    pub fn structural(structural_variant: StructuralVariant) -> Self {
        Self {
            structural_variant: Some(structural_variant),
            ..Self::default()
        }
    }

    pub fn with_position(mut self, position: i64) -> Self {
        self.protein_pos_start = Some(position);
        self
    }

    pub fn with_tumor_type(mut self, tumor_type: impl Into<String>) -> Self {
        self.tumor_type = Some(tumor_type.into());
        self
    }

    pub fn with_gene_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.hugo_gene_symbol = Some(symbol.into());
        self
    }

    pub fn is_structural(&self) -> bool {
        self.structural_variant.is_some()
    }
}

/// Groups mutations by protein start position, preserving input order within
/// each position. Mutations without a position land on the `0` sentinel.
pub fn mutations_by_position<I>(mutations: I) -> BTreeMap<i64, Vec<Mutation>>
where
    I: IntoIterator<Item = Mutation>,
{
    let mut grouped: BTreeMap<i64, Vec<Mutation>> = BTreeMap::new();

    for mutation in mutations {
        let position = mutation.protein_pos_start.unwrap_or(0);
        grouped.entry(position).or_default().push(mutation);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_deserializes_camel_case() {
        let json = r#"{
            "entrezGeneId": 673,
            "hugoGeneSymbol": "BRAF",
            "proteinChange": "V600E",
            "mutationType": "Missense_Mutation",
            "proteinPosStart": 600
        }"#;

        let mutation: Mutation = serde_json::from_str(json).unwrap();
        assert_eq!(mutation.entrez_gene_id, Some(673));
        assert_eq!(mutation.protein_change, "V600E");
        assert_eq!(mutation.protein_pos_start, Some(600));
        assert!(!mutation.is_structural());
    }

    #[test]
    fn test_group_by_position_keeps_order() {
        let grouped = mutations_by_position(vec![
            Mutation::point(673, "V600E", "Missense_Mutation").with_position(600),
            Mutation::point(7157, "R175H", "Missense_Mutation").with_position(175),
            Mutation::point(673, "V600K", "Missense_Mutation").with_position(600),
            Mutation::point(673, "X_splice", "Splice_Site"),
        ]);

        let positions: Vec<i64> = grouped.keys().copied().collect();
        assert_eq!(positions, vec![0, 175, 600]);

        let at_600: Vec<&str> = grouped[&600]
            .iter()
            .map(|m| m.protein_change.as_str())
            .collect();
        assert_eq!(at_600, vec!["V600E", "V600K"]);
    }
}
