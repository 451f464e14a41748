//! Command definitions and argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use policy_lens_core::Preference;

/// Default configuration path, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Policy-Lens - duplicate coverage detection and provider scoring for health insurance contracts.
#[derive(Debug, Parser)]
#[command(name = "policy-lens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze extracted contract texts
    Analyze(AnalyzeArgs),

    /// Validate a configuration file
    CheckConfig(CheckConfigArgs),

    /// Ask the assistant a question about coverage
    Ask(AskArgs),
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable digest (default)
    Text,
    /// Full JSON report
    Json,
    /// One row per ranking entry and per finding
    Csv,
}

/// Arguments for the analyze command.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Extracted text files, one per contract, in upload order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Configuration file (TOML, or JSON with a .json extension)
    #[arg(short, long, env = "POLICY_LENS_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Declared goal: reduce-cost, improve-benefits or undecided
    #[arg(short, long, default_value = "undecided")]
    pub preference: Preference,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Ask the LLM for a three-part explanation of each contract
    #[arg(long)]
    pub explain: bool,

    /// Whether the insured works at least 8 hours a week (passed to the explanation)
    #[arg(long)]
    pub works_eight_hours: Option<bool>,
}

/// Arguments for the check-config command.
#[derive(Debug, Args)]
pub struct CheckConfigArgs {
    /// Configuration file to validate
    #[arg(env = "POLICY_LENS_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub path: PathBuf,
}

/// Arguments for the ask command.
#[derive(Debug, Args)]
pub struct AskArgs {
    /// Question about a contract or coverage
    pub question: String,
}
