//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Engine configuration tool for inputsieve
#[derive(Parser)]
#[command(
    name = "inputsieve",
    version,
    about = "Manage inputsieve engine configuration",
    long_about = "Generate, validate and inspect the configuration that controls key \
                  normalization and reserved names for inputsieve filter registries."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate default configuration file
    Init {
        /// Path where to create the configuration file
        #[arg(long, short = 'p')]
        path: Option<PathBuf>,
    },
    /// Validate configuration file
    Check,
    /// Print the effective reserved prefix and names
    Reserved,
    /// Display version information
    Version,
}
