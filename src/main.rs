use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod anchor;
mod cli;
mod config;
mod document;
mod error;
mod output;
mod parser;
mod provider;
mod runner;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing - only show logs with --verbose
    let filter = if cli.verbose {
        EnvFilter::new("personarev=debug")
    } else {
        EnvFilter::new("personarev=warn")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => cli::run::execute(args).await,
        Commands::Personas(args) => cli::personas::execute(args),
        Commands::Schema => cli::schema::execute(),
    }
}
