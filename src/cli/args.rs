//! Command line argument parsing for the ksketch CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::sketch::SketchIndexConfig;

/// ksketch - closest-center queries over k-means|| candidate folds
#[derive(Parser, Debug, Clone)]
#[command(name = "ksketch")]
#[command(about = "Closest-center queries over k-means|| candidate folds")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct KSketchArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl KSketchArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print one report with the closest center of every fold for each input point
    Query(QueryArgs),

    /// Count closest-center assignments and export weighted centers
    Weights(QueryArgs),
}

/// Index and input options shared by all commands.
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// JSON file with `centers` (one list per fold) and `points`
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// JSON index configuration; overrides the projection flags
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Sketch width in bits
    #[arg(long, default_value = "64")]
    pub projection_bits: usize,

    /// Approximate-search shortlist size
    #[arg(long, default_value = "16")]
    pub projection_samples: usize,

    /// Projection seed
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Score every center instead of the sketch shortlist
    #[arg(long)]
    pub exact: bool,
}

impl QueryArgs {
    /// Projection parameters from the flags, for the given input shape.
    pub fn flag_config(&self, num_folds: usize, dimension: usize) -> SketchIndexConfig {
        SketchIndexConfig::new(num_folds, dimension)
            .with_projection_bits(self.projection_bits)
            .with_projection_samples(self.projection_samples)
            .with_seed(self.seed)
    }
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
