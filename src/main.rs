use clap::Parser;
use mutation_annotation_cache::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Resolve(args) => cli::resolve::run(args).await,
        Command::Annotate(args) => cli::annotate::run(args).await,
        Command::Profiles(args) => cli::profiles::run(args).await,
        Command::Merge(args) => cli::merge::run(args).await,
    }
}
