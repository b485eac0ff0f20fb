//! Resolution of position-grouped mutations to their indicator records

use std::collections::BTreeMap;

use super::entity::{IndicatorRecord, IndicatorTable};
use crate::domain::variant::{Mutation, variant_id_for};

/// Looks up the indicator for a single mutation.
///
/// Returns `None` when the table failed wholesale or holds no record for the
/// mutation's id; a miss is never an error.
pub fn indicator_for_mutation<'a, T, E>(
    mutation: &Mutation,
    table: &'a IndicatorTable,
    tumor_type: T,
    entrez_gene_id: E,
) -> Option<&'a IndicatorRecord>
where
    T: Fn(&Mutation) -> String,
    E: Fn(&Mutation) -> i64,
{
    if table.is_failed() {
        return None;
    }

    let id = variant_id_for(mutation, &tumor_type(mutation), entrez_gene_id(mutation));
    table.get(&id)
}

/// Resolves every position's mutations to indicator records.
///
/// Mutations without a record, and records rejected by `filter`, are dropped.
/// Positions left with no indicator, and positions `<= 0`, are absent from the
/// result. Per-position order follows the input; positions ascend.
pub fn group_indicators_by_position<'a, T, E>(
    mutations_by_position: &BTreeMap<i64, Vec<Mutation>>,
    table: &'a IndicatorTable,
    tumor_type: T,
    entrez_gene_id: E,
    filter: Option<&dyn Fn(&IndicatorRecord) -> bool>,
) -> BTreeMap<i64, Vec<&'a IndicatorRecord>>
where
    T: Fn(&Mutation) -> String,
    E: Fn(&Mutation) -> i64,
{
    let mut resolved = BTreeMap::new();

    if table.is_failed() {
        tracing::debug!("Indicator table unavailable, no positions resolved");
        return resolved;
    }

    for (&position, mutations) in mutations_by_position {
        if position <= 0 {
            continue;
        }

        let indicators: Vec<&IndicatorRecord> = mutations
            .iter()
            .filter_map(|m| indicator_for_mutation(m, table, &tumor_type, &entrez_gene_id))
            .filter(|indicator| filter.is_none_or(|f| f(*indicator)))
            .collect();

        if !indicators.is_empty() {
            resolved.insert(position, indicators);
        }
    }

    tracing::debug!(
        positions_in = mutations_by_position.len(),
        positions_out = resolved.len(),
        "Grouped indicators by position"
    );

    resolved
}

/// Passes records whose oncogenicity mentions "oncogenic", case-insensitively.
///
/// This deliberately also passes "Likely Oncogenic".
pub fn default_indicator_filter(indicator: &IndicatorRecord) -> bool {
    indicator
        .oncogenic
        .trim()
        .to_lowercase()
        .contains("oncogenic")
}

/// Mutation-level variant of [`default_indicator_filter`].
///
/// Without a table or accessors every mutation passes; with them, a mutation
/// passes only if it has an indicator that passes the default filter.
pub fn default_mutation_filter(
    mutation: &Mutation,
    table: Option<&IndicatorTable>,
    tumor_type: Option<&dyn Fn(&Mutation) -> String>,
    entrez_gene_id: Option<&dyn Fn(&Mutation) -> i64>,
) -> bool {
    match (table, tumor_type, entrez_gene_id) {
        (Some(table), Some(tumor_type), Some(entrez_gene_id)) => {
            indicator_for_mutation(mutation, table, tumor_type, entrez_gene_id)
                .is_some_and(default_indicator_filter)
        }
        _ => true,
    }
}
