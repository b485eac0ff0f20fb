//! Annotation request payloads

use serde::Serialize;

use crate::domain::variant::{
    Mutation, StructuralVariantType, VariantId, derive_structural_variant_type, variant_id_for,
};

/// Maps a mutation type to the consequence term the annotation service
/// expects; unrecognized types map to `"any"`.
pub fn mutation_type_to_consequence(mutation_type: &str) -> &'static str {
    match mutation_type.trim().to_lowercase().as_str() {
        "missense_mutation" | "missense" | "missense_variant" => "missense_variant",
        "nonsense_mutation" | "nonsense" | "stop_gained" => "stop_gained",
        "frame_shift_del" | "frame_shift_ins" | "frameshift_variant" => "frameshift_variant",
        "in_frame_del" | "inframe_deletion" => "inframe_deletion",
        "in_frame_ins" | "inframe_insertion" => "inframe_insertion",
        "splice_site" | "splice_region" | "splice_region_variant" => "splice_region_variant",
        "nonstop_mutation" | "stop_lost" => "stop_lost",
        "translation_start_site" | "start_lost" => "start_lost",
        _ => "any",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneRef {
    pub entrez_gene_id: Option<i64>,
}

/// Point mutation annotation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProteinChangeQuery {
    pub id: VariantId,
    pub gene: GeneRef,
    pub alteration: String,
    pub consequence: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tumor_type: Option<String>,
}

/// Structural variant annotation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralVariantQuery {
    pub id: VariantId,
    pub gene_a: GeneRef,
    pub gene_b: GeneRef,
    pub structural_variant_type: StructuralVariantType,
    pub functional_fusion: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tumor_type: Option<String>,
}

/// One variant to annotate, identified by its [`VariantId`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationQuery {
    ProteinChange(ProteinChangeQuery),
    StructuralVariant(StructuralVariantQuery),
}

impl AnnotationQuery {
    /// Builds the request for a caller-supplied mutation. An empty
    /// `tumor_type` is sent as no tumor type.
    pub fn for_mutation(mutation: &Mutation, tumor_type: &str, entrez_gene_id: i64) -> Self {
        let id = variant_id_for(mutation, tumor_type, entrez_gene_id);
        let tumor_type = Some(tumor_type.to_string()).filter(|t| !t.is_empty());

        match &mutation.structural_variant {
            Some(sv) => {
                let variant_type = derive_structural_variant_type(sv);
                Self::StructuralVariant(StructuralVariantQuery {
                    id,
                    gene_a: GeneRef {
                        entrez_gene_id: sv.site1_entrez_gene_id,
                    },
                    gene_b: GeneRef {
                        entrez_gene_id: sv.site2_entrez_gene_id,
                    },
                    structural_variant_type: variant_type,
                    functional_fusion: variant_type == StructuralVariantType::Fusion,
                    tumor_type,
                })
            }
            None => Self::ProteinChange(ProteinChangeQuery {
                id,
                gene: GeneRef {
                    entrez_gene_id: Some(entrez_gene_id),
                },
                alteration: mutation.protein_change.clone(),
                consequence: mutation_type_to_consequence(&mutation.mutation_type),
                protein_start: mutation.protein_pos_start,
                protein_end: mutation.protein_pos_start,
                tumor_type,
            }),
        }
    }

    pub fn id(&self) -> &VariantId {
        match self {
            Self::ProteinChange(q) => &q.id,
            Self::StructuralVariant(q) => &q.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::variant::StructuralVariant;
    use serde_json::json;

    #[test]
    fn test_consequence_mapping() {
        assert_eq!(mutation_type_to_consequence("Missense_Mutation"), "missense_variant");
        assert_eq!(mutation_type_to_consequence("Frame_Shift_Ins"), "frameshift_variant");
        assert_eq!(mutation_type_to_consequence("In_Frame_Del"), "inframe_deletion");
        assert_eq!(mutation_type_to_consequence("Splice_Site"), "splice_region_variant");
        assert_eq!(mutation_type_to_consequence("Fusion"), "any");
    }

    #[test]
    fn test_protein_change_query_payload() {
        let mutation = Mutation::point(673, "V600E", "Missense_Mutation").with_position(600);
        let query = AnnotationQuery::for_mutation(&mutation, "Melanoma", 673);

        let AnnotationQuery::ProteinChange(payload) = &query else {
            panic!("expected a protein change query");
        };
        assert_eq!(
            serde_json::to_value(payload).unwrap(),
            json!({
                "id": r"mut_673_Melanoma_V600E_Missense\_Mutation",
                "gene": {"entrezGeneId": 673},
                "alteration": "V600E",
                "consequence": "missense_variant",
                "proteinStart": 600,
                "proteinEnd": 600,
                "tumorType": "Melanoma"
            })
        );
    }

    #[test]
    fn test_structural_variant_query_payload() {
        let fusion = Mutation::structural(StructuralVariant {
            site1_entrez_gene_id: Some(27436),
            site1_hugo_symbol: Some("EML4".into()),
            site2_entrez_gene_id: Some(238),
            site2_hugo_symbol: Some("ALK".into()),
            variant_class: None,
        });
        let query = AnnotationQuery::for_mutation(&fusion, "", 0);

        let AnnotationQuery::StructuralVariant(payload) = &query else {
            panic!("expected a structural variant query");
        };
        assert_eq!(
            serde_json::to_value(payload).unwrap(),
            json!({
                "id": "sv_27436_238__FUSION",
                "geneA": {"entrezGeneId": 27436},
                "geneB": {"entrezGeneId": 238},
                "structuralVariantType": "FUSION",
                "functionalFusion": true
            })
        );
        assert_eq!(query.id().as_str(), "sv_27436_238__FUSION");
    }
}
