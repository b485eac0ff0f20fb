//! Profiles command - lists molecular profiles per study

use std::sync::Arc;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::domain::{CacheError, MolecularProfile, Slot};
use crate::infrastructure::cache::CacheBinding;
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::profile::{PortalProfileClient, molecular_profiles_in_study_cache};

/// Arguments for the profiles command
#[derive(Args, Clone)]
pub struct ProfilesArgs {
    /// Study ids to list
    pub study_ids: Vec<String>,

    /// After the initial studies, read further whitespace-separated study
    /// lists from stdin, one per line
    #[arg(long)]
    pub stdin: bool,
}

fn print_profiles(study_ids: &[String], results: &[Result<Slot<MolecularProfile>, CacheError>]) {
    for (study_id, result) in study_ids.iter().zip(results) {
        match result {
            Ok(profiles) if profiles.is_empty() => println!("{}: no profiles", study_id),
            Ok(profiles) => {
                println!("{}:", study_id);
                for profile in profiles.iter() {
                    println!(
                        "  {:<40} {:<24} {}",
                        profile.molecular_profile_id,
                        profile.molecular_alteration_type.as_deref().unwrap_or("-"),
                        profile.name
                    );
                }
            }
            Err(error) => println!("{}: error: {}", study_id, error),
        }
    }
}

/// Run the profiles command
pub async fn run(args: ProfilesArgs) -> anyhow::Result<()> {
    let (config, metrics) = super::init();

    let http = HttpClient::with_timeout("portal", config.portal.timeout())?;
    let client = PortalProfileClient::new(http, &config.portal.base_url);
    let cache = molecular_profiles_in_study_cache(Arc::new(client));

    info!(studies = args.study_ids.len(), "Listing molecular profiles");

    let (tx, rx) = watch::channel(args.study_ids.clone());
    let mut binding = CacheBinding::new(cache, rx);

    let snapshot = binding.current().await;
    print_profiles(&snapshot.queries, &snapshot.results);

    if args.stdin {
        let feeder = tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let study_ids: Vec<String> = line.split_whitespace().map(String::from).collect();
                if study_ids.is_empty() {
                    continue;
                }
                if tx.send(study_ids).is_err() {
                    break;
                }
            }
        });

        while let Some(snapshot) = binding.changed().await {
            print_profiles(&snapshot.queries, &snapshot.results);
        }

        feeder.await?;
        debug!(cached = binding.cache().len(), "Input closed");
    }

    super::report_metrics(metrics);
    Ok(())
}
