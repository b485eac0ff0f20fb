//! Resolve command - resolves mutations against a local indicator table

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use super::report::{build_report, print_report};
use crate::domain::indicator::{
    IndicatorRecord, IndicatorTable, default_indicator_filter, group_indicators_by_position,
};
use crate::domain::variant::{Mutation, mutations_by_position};

/// Arguments for the resolve command
#[derive(Args, Clone)]
pub struct ResolveArgs {
    /// JSON file with an array of mutations
    #[arg(long)]
    pub mutations: PathBuf,

    /// JSON file with an array of indicator records
    #[arg(long)]
    pub indicators: PathBuf,

    /// Keep indicators that are not oncogenic
    #[arg(long)]
    pub all: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub(crate) fn mutation_tumor_type(mutation: &Mutation) -> String {
    mutation.tumor_type.clone().unwrap_or_default()
}

pub(crate) fn mutation_entrez_gene_id(mutation: &Mutation) -> i64 {
    mutation.entrez_gene_id.unwrap_or_default()
}

/// Groups, resolves and prints `mutations` against `table`
pub(crate) fn resolve_and_print(
    mutations: Vec<Mutation>,
    table: &IndicatorTable,
    all: bool,
    json: bool,
) -> anyhow::Result<()> {
    let grouped = mutations_by_position(mutations);

    let filter: Option<&dyn Fn(&IndicatorRecord) -> bool> = if all {
        None
    } else {
        Some(&default_indicator_filter)
    };

    let resolved = group_indicators_by_position(
        &grouped,
        table,
        mutation_tumor_type,
        mutation_entrez_gene_id,
        filter,
    );

    print_report(&build_report(&grouped, &resolved), json)
}

/// Run the resolve command
pub async fn run(args: ResolveArgs) -> anyhow::Result<()> {
    let (_config, metrics) = super::init();

    let mutations: Vec<Mutation> = super::read_json(&args.mutations)?;
    let records: Vec<IndicatorRecord> = super::read_json(&args.indicators)?;
    let table = IndicatorTable::from_records(records);

    info!(
        mutations = mutations.len(),
        indicators = table.len(),
        "Resolving against local indicator table"
    );

    resolve_and_print(mutations, &table, args.all, args.json)?;

    super::report_metrics(metrics);
    Ok(())
}
