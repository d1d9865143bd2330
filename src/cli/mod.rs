pub mod commands;

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "analyze", version, about = "Estimates the monthly AWS cost delta between two CloudFormation templates")]
pub struct Cli {
    /// Base (before) CloudFormation template.
    pub base: PathBuf,

    /// Target (after) CloudFormation template.
    pub target: PathBuf,

    /// AWS region to price against.
    #[arg(long)]
    pub region: Option<String>,

    /// Output format.
    #[arg(long, value_enum)]
    pub format: Option<CliFormat>,

    /// Environment name, used to select per-environment thresholds.
    #[arg(long)]
    pub environment: Option<String>,

    /// Emit verbose diagnostics to stderr.
    #[arg(long)]
    pub verbose: bool,

    /// Path to a configuration file, overriding the discovered default.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    Text,
    Json,
    Markdown,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(value: CliFormat) -> Self {
        match value {
            CliFormat::Text => crate::config::OutputFormat::Text,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Markdown => crate::config::OutputFormat::Markdown,
        }
    }
}
