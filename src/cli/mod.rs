pub mod personas;
pub mod run;
pub mod schema;

use crate::config::ProviderKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "personarev")]
#[command(
    author,
    version,
    about = "Review a document through a panel of LLM reviewer personas"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Review a document and write a report
    Run(RunArgs),

    /// List persona sets and their personas
    Personas(PersonasArgs),

    /// Print JSON Schema for config validation
    Schema,
}

#[derive(Parser, Clone)]
pub struct RunArgs {
    /// Plain-text document to review
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Path to config file
    #[arg(short, long, default_value = "personarev.yaml")]
    pub config: PathBuf,

    /// Persona set to use
    #[arg(long)]
    pub set: Option<String>,

    /// Run only these persona ids (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub personas: Option<Vec<String>>,

    /// Override provider (openrouter, ollama)
    #[arg(long)]
    pub provider: Option<ProviderKind>,

    /// Override model id
    #[arg(long)]
    pub model: Option<String>,

    /// Override per-call timeout in seconds
    #[arg(long)]
    pub timeout_sec: Option<u64>,

    /// Extra passes that rerun only failed personas
    #[arg(long, default_value_t = 0)]
    pub retry_failed: u32,

    /// Override output directory
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Show plan without calling the provider
    #[arg(long)]
    pub dry_run: bool,

    /// Print the session as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Clone)]
pub struct PersonasArgs {
    /// Path to config file
    #[arg(short, long, default_value = "personarev.yaml")]
    pub config: PathBuf,
}
