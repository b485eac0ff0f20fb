//! CLI module for the mutation annotator
//!
//! Provides subcommands:
//! - `resolve`: resolve mutations against a local indicator table
//! - `annotate`: resolve mutations against the annotation service
//! - `profiles`: list molecular profiles per study
//! - `merge`: compact alteration names

pub mod annotate;
pub mod merge;
pub mod profiles;
pub mod report;
pub mod resolve;

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

use crate::config::AppConfig;
use crate::infrastructure::logging::{self, LoggingConfig};
use crate::infrastructure::observability::{PrometheusMetrics, init_metrics};

/// Mutation annotator - resolve variants to clinical annotations
#[derive(Parser)]
#[command(name = "mutation-annotator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve mutations against a local indicator table
    Resolve(resolve::ResolveArgs),

    /// Resolve mutations against the annotation service
    Annotate(annotate::AnnotateArgs),

    /// List molecular profiles of studies
    Profiles(profiles::ProfilesArgs),

    /// Merge same-position alteration names
    Merge(merge::MergeArgs),
}

/// Loads `.env` and configuration, then sets up logging and metrics
pub fn init() -> (AppConfig, Option<PrometheusMetrics>) {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();

    logging::init_logging(&LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.clone(),
    });
    let metrics = init_metrics(&config.metrics);

    (config, metrics)
}

/// Writes collected metrics to stderr, if a recorder is installed
pub fn report_metrics(metrics: Option<PrometheusMetrics>) {
    if let Some(metrics) = metrics {
        eprintln!("{}", metrics.render());
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
