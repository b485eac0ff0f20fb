//! Indicator domain entities

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::variant::VariantId;

/// Echo of the query an indicator answers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorQuery {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub entrez_gene_id: Option<i64>,
    #[serde(default)]
    pub hugo_symbol: Option<String>,
    #[serde(default)]
    pub alteration: Option<String>,
    #[serde(default)]
    pub tumor_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Abstract {
    #[serde(default, rename = "abstract")]
    pub text: String,
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Citations {
    #[serde(default)]
    pub pmids: Vec<String>,
    #[serde(default)]
    pub abstracts: Vec<Abstract>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationEffect {
    #[serde(default)]
    pub known_effect: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub citations: Citations,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drug {
    #[serde(default)]
    pub drug_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub drugs: Vec<Drug>,
}

/// Annotation payload for one variant identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorRecord {
    #[serde(default)]
    pub query: IndicatorQuery,
    #[serde(default)]
    pub oncogenic: String,
    #[serde(default)]
    pub vus: bool,
    #[serde(default)]
    pub gene_exist: bool,
    #[serde(default)]
    pub variant_exist: bool,
    #[serde(default)]
    pub hotspot: bool,
    #[serde(default)]
    pub highest_sensitive_level: Option<String>,
    #[serde(default)]
    pub highest_resistance_level: Option<String>,
    #[serde(default)]
    pub highest_diagnostic_implication_level: Option<String>,
    #[serde(default)]
    pub highest_prognostic_implication_level: Option<String>,
    #[serde(default)]
    pub mutation_effect: Option<MutationEffect>,
    #[serde(default)]
    pub treatments: Vec<Treatment>,
    #[serde(default)]
    pub gene_summary: Option<String>,
    #[serde(default)]
    pub variant_summary: Option<String>,
    #[serde(default)]
    pub tumor_type_summary: Option<String>,
}

impl IndicatorRecord {
    pub fn new(id: &VariantId, oncogenic: impl Into<String>) -> Self {
        Self {
            query: IndicatorQuery {
                id: Some(id.to_string()),
                ..Default::default()
            },
            oncogenic: oncogenic.into(),
            ..Default::default()
        }
    }

    /// The variant id this record was returned for, if the service echoed one
    pub fn query_id(&self) -> Option<&str> {
        self.query.id.as_deref()
    }
}

/// Snapshot of annotation records keyed by variant id.
///
/// A table whose retrieval failed wholesale has no map at all, which is
/// distinct from an empty map (retrieval succeeded, nothing matched).
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorTable {
    indicator_map: Option<HashMap<String, IndicatorRecord>>,
}

impl IndicatorTable {
    pub fn new(indicator_map: HashMap<String, IndicatorRecord>) -> Self {
        Self {
            indicator_map: Some(indicator_map),
        }
    }

    /// Table for an annotation call that failed as a whole
    pub fn failed() -> Self {
        Self { indicator_map: None }
    }

    /// Builds a table keyed by each record's echoed query id. Records without
    /// an id are dropped.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = IndicatorRecord>,
    {
        let map = records
            .into_iter()
            .filter_map(|record| record.query.id.clone().map(|id| (id, record)))
            .collect();

        Self::new(map)
    }

    pub fn is_failed(&self) -> bool {
        self.indicator_map.is_none()
    }

    pub fn get(&self, id: &VariantId) -> Option<&IndicatorRecord> {
        self.indicator_map.as_ref()?.get(id.as_str())
    }

    pub fn insert(&mut self, id: &VariantId, record: IndicatorRecord) {
        self.indicator_map
            .get_or_insert_with(HashMap::new)
            .insert(id.to_string(), record);
    }

    pub fn len(&self) -> usize {
        self.indicator_map.as_ref().map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for IndicatorTable {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}
