//! Merge command - compacts same-position alteration names

use clap::Args;

use crate::domain::scoring::{merge_alterations, positional_variant};

/// Arguments for the merge command
#[derive(Args, Clone)]
pub struct MergeArgs {
    /// Alteration names, e.g. V600E V600K
    #[arg(required = true)]
    pub alterations: Vec<String>,

    /// Also print the positional variant of each alteration
    #[arg(long)]
    pub positional: bool,
}

/// Run the merge command
pub async fn run(args: MergeArgs) -> anyhow::Result<()> {
    println!("{}", merge_alterations(&args.alterations));

    if args.positional {
        for alteration in &args.alterations {
            println!(
                "{}\t{}",
                alteration,
                positional_variant(alteration).as_deref().unwrap_or("-")
            );
        }
    }

    Ok(())
}
