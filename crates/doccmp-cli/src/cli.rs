use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "doccmp",
    about = "Compare extracted documents: metadata, text, and tables",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two document records
    Compare(CompareArgs),
    /// Show a document's effective tables, recovering them from text if needed
    Reconstruct(ReconstructArgs),
}

#[derive(Args)]
pub struct CompareArgs {
    /// First document record (JSON)
    pub doc1: PathBuf,
    /// Second document record (JSON)
    pub doc2: PathBuf,
    /// Comparison settings (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Persist recovered tables into the source records
    #[arg(long)]
    pub write_back: bool,
}

#[derive(Args)]
pub struct ReconstructArgs {
    /// Document record (JSON)
    pub doc: PathBuf,
    /// Persist recovered tables into the source record
    #[arg(long)]
    pub write_back: bool,
}
