//! Annotate command - resolves mutations against the annotation service

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::{info, warn};

use super::resolve::{mutation_entrez_gene_id, mutation_tumor_type, resolve_and_print};
use crate::domain::variant::Mutation;
use crate::infrastructure::annotation::{OncoKbAnnotator, fetch_indicator_table, indicator_cache};
use crate::infrastructure::http_client::HttpClient;

/// Arguments for the annotate command
#[derive(Args, Clone)]
pub struct AnnotateArgs {
    /// JSON file with an array of mutations
    #[arg(long)]
    pub mutations: PathBuf,

    /// Tumor type applied to every mutation (overrides per-mutation values)
    #[arg(long)]
    pub tumor_type: Option<String>,

    /// Keep indicators that are not oncogenic
    #[arg(long)]
    pub all: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

fn override_tumor_type(mutations: &mut [Mutation], tumor_type: &str) {
    for mutation in mutations {
        mutation.tumor_type = Some(tumor_type.to_string());
    }
}

/// Run the annotate command
pub async fn run(args: AnnotateArgs) -> anyhow::Result<()> {
    let (config, metrics) = super::init();

    let mut mutations: Vec<Mutation> = super::read_json(&args.mutations)?;
    if let Some(tumor_type) = &args.tumor_type {
        override_tumor_type(&mut mutations, tumor_type);
    }

    let http = HttpClient::with_timeout("oncokb", config.oncokb.timeout())?;
    let annotator =
        OncoKbAnnotator::with_base_url(http, config.oncokb.token.clone(), &config.oncokb.base_url);
    let cache = indicator_cache(Arc::new(annotator));

    info!(
        mutations = mutations.len(),
        base_url = %config.oncokb.base_url,
        "Annotating mutations"
    );

    let table =
        fetch_indicator_table(&cache, &mutations, mutation_tumor_type, mutation_entrez_gene_id)
            .await;
    if table.is_failed() {
        warn!("Annotation failed, no indicators available");
    }

    resolve_and_print(mutations, &table, args.all, args.json)?;

    super::report_metrics(metrics);
    Ok(())
}
