use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "cost-estimator")]
#[command(about = "Software project cost estimation service")]
pub struct CliConfig {
    /// Path to an optional TOML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// CSV file of historical projects
    #[arg(long)]
    pub dataset: Option<String>,

    /// JSON file mapping feature names to descriptions
    #[arg(long)]
    pub feature_details: Option<String>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Log elapsed time and memory for each startup phase
    #[arg(long)]
    pub monitor: bool,
}
