//! Display formatting for annotation payloads

use serde::Deserialize;
use serde_json::Value;

use super::level::{CardDataType, normalize_level};
use super::oncogenicity::normalize_oncogenicity;
use crate::domain::indicator::{IndicatorRecord, Treatment};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Pmid {
    Number(u64),
    Text(String),
}

impl Pmid {
    fn value(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CitedArticle {
    #[serde(default)]
    pmid: Option<Pmid>,
}

/// PubMed ids from a citation list, ascending.
///
/// Anything other than an array yields an empty list; elements without a
/// numeric pmid are skipped.
pub fn oncogenic_citations(references: &Value) -> Vec<u64> {
    let Value::Array(items) = references else {
        return Vec::new();
    };

    let mut pmids: Vec<u64> = items
        .iter()
        .filter_map(|item| CitedArticle::deserialize(item).ok())
        .filter_map(|article| article.pmid.as_ref().and_then(Pmid::value))
        .collect();

    pmids.sort_unstable();
    pmids
}

/// `"A + B, C"`: drugs within a treatment and treatments themselves are
/// sorted.
pub fn treatments_to_string(treatments: &[Treatment]) -> String {
    let mut rendered: Vec<String> = treatments
        .iter()
        .map(|treatment| {
            let mut drugs: Vec<&str> = treatment
                .drugs
                .iter()
                .map(|drug| drug.drug_name.as_str())
                .collect();
            drugs.sort_unstable();
            drugs.join(" + ")
        })
        .collect();

    rendered.sort();
    rendered.join(", ")
}

pub fn level_icon_class_names(level: &str) -> String {
    if level.is_empty() {
        return String::new();
    }
    format!("oncokb icon level-{}", level)
}

pub fn oncogenicity_icon_class_names(oncogenicity: &str) -> String {
    format!("oncokb icon {}", normalize_oncogenicity(Some(oncogenicity)))
}

/// Icon classes for a card: oncogenicity for biological cards, otherwise the
/// normalized level.
pub fn annotation_icon_class_names(
    kind: CardDataType,
    highest_level: &str,
    indicator: Option<&IndicatorRecord>,
) -> String {
    match kind {
        CardDataType::Biological => {
            oncogenicity_icon_class_names(indicator.map_or("", |i| i.oncogenic.as_str()))
        }
        _ => level_icon_class_names(&normalize_level(highest_level).unwrap_or_default()),
    }
}
