//! inputsieve: engine configuration tool
//!
//! Generates, validates and inspects the TOML configuration that controls
//! key normalization and reserved names for filter registries.

mod cli;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use inputsieve::config::{self, ConfigService};
use inputsieve::domain;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Init runs before loading so it works without an existing file
    if let Commands::Init { path } = &cli.command {
        let config_path = if let Some(p) = path {
            ConfigService::generate_at(p)?;
            p.clone()
        } else {
            ConfigService::generate_default()?;
            ConfigService::default_path()
        };
        if !cli.quiet {
            eprintln!("Configuration file created at: {}", config_path.display());
        }
        return Ok(());
    }

    let mut config = ConfigService::load(cli.config.as_deref())?;
    config.debug |= cli.debug;

    if config.debug {
        domain::logger::init(&config)?;
    }

    match cli.command {
        Commands::Init { .. } => {}
        Commands::Check => {
            config::validate(&config)?;
            if !cli.quiet {
                eprintln!("Configuration is valid.");
            }
        }
        Commands::Reserved => {
            let policy = config.key_policy();
            println!("prefix: {}", policy.reserved_prefix());
            for name in policy.reserved_names() {
                println!("{}", name);
            }
        }
        Commands::Version => {
            println!("inputsieve {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
