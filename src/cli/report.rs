//! Per-position rendering of resolved indicators

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::indicator::IndicatorRecord;
use crate::domain::scoring::{
    IconOffset, IndicatorScores, level_comparator, merge_alterations, normalize_level,
    normalize_oncogenicity, oncogenic_citations, treatments_to_string,
};
use crate::domain::variant::Mutation;

#[derive(Debug, Serialize)]
pub struct IndicatorReport {
    pub alteration: Option<String>,
    pub oncogenic: String,
    pub oncogenicity_class: String,
    pub levels: Vec<String>,
    pub scores: IndicatorScores,
    pub offset: IconOffset,
    pub treatments: String,
    pub citations: Vec<u64>,
}

#[derive(Debug, Serialize)]
pub struct PositionReport {
    pub position: i64,
    pub alterations: String,
    pub indicators: Vec<IndicatorReport>,
}

impl IndicatorReport {
    fn from_record(record: &IndicatorRecord) -> Self {
        Self {
            alteration: record.query.alteration.clone(),
            oncogenic: record.oncogenic.clone(),
            oncogenicity_class: normalize_oncogenicity(Some(&record.oncogenic)),
            levels: treatment_levels(record),
            scores: IndicatorScores::for_indicator(record),
            offset: IconOffset::for_indicator(record),
            treatments: treatments_to_string(&record.treatments),
            citations: citations(record),
        }
    }
}

/// Distinct treatment levels, strongest first
fn treatment_levels(record: &IndicatorRecord) -> Vec<String> {
    let distinct: BTreeSet<String> = record
        .treatments
        .iter()
        .filter_map(|t| normalize_level(&t.level))
        .collect();

    let mut levels: Vec<String> = distinct.into_iter().collect();
    levels.sort_by(|a, b| level_comparator(a, b));
    levels
}

fn citations(record: &IndicatorRecord) -> Vec<u64> {
    let Some(effect) = &record.mutation_effect else {
        return Vec::new();
    };

    let articles: Vec<Value> = effect
        .citations
        .pmids
        .iter()
        .map(|pmid| json!({ "pmid": pmid }))
        .collect();

    oncogenic_citations(&Value::Array(articles))
}

/// Builds one report per resolved position, indicators ordered by score
pub fn build_report(
    mutations_by_position: &BTreeMap<i64, Vec<Mutation>>,
    resolved: &BTreeMap<i64, Vec<&IndicatorRecord>>,
) -> Vec<PositionReport> {
    resolved
        .iter()
        .map(|(&position, records)| {
            let alterations: Vec<&str> = mutations_by_position
                .get(&position)
                .map(|ms| ms.iter().map(|m| m.protein_change.as_str()).collect())
                .unwrap_or_default();

            let mut indicators: Vec<IndicatorReport> =
                records.iter().map(|r| IndicatorReport::from_record(r)).collect();
            indicators.sort_by_key(|i| Reverse(i.scores));

            PositionReport {
                position,
                alterations: merge_alterations(&alterations),
                indicators,
            }
        })
        .collect()
}

/// Prints reports to stdout as JSON or as aligned text
pub fn print_report(reports: &[PositionReport], as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(reports)?);
        return Ok(());
    }

    if reports.is_empty() {
        println!("No annotated positions");
        return Ok(());
    }

    for report in reports {
        println!("{:>6}  {}", report.position, report.alterations);
        for indicator in &report.indicators {
            println!(
                "        {:<12} {:<18} score={} levels=[{}] offset=({}, {}) {}",
                indicator.alteration.as_deref().unwrap_or("-"),
                indicator.oncogenic,
                indicator.scores.oncogenic,
                indicator.levels.join(", "),
                indicator.offset.x,
                indicator.offset.y,
                indicator.treatments,
            );
        }
    }

    Ok(())
}
