//! Maintenance commands for the Pokédex catalog database.

use clap::{Parser, Subcommand};
use pokedex_catalog::SeedMode;
use pokedex_server::admin::{open_migrated, run_reconcile, seed, AdminError};
use pokedex_server::{config, init_tracing};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pokedex-admin")]
#[command(about = "Maintenance commands for the Pokédex catalog database", long_about = None)]
struct Cli {
    /// Config file. Defaults to POKEDEX_CONFIG_PATH, then config.toml.
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a JSON array of records with ids.
    Seed {
        file: PathBuf,
        /// Overwrite rows whose id already exists instead of skipping them.
        #[arg(long)]
        replace: bool,
    },
    /// Rewrite rows whose JSON columns are not in canonical form.
    Reconcile,
}

fn resolve_config_path(cli_value: Option<String>) -> String {
    cli_value
        .filter(|value| !value.trim().is_empty())
        .or_else(|| {
            std::env::var("POKEDEX_CONFIG_PATH")
                .ok()
                .filter(|value| !value.trim().is_empty())
        })
        .unwrap_or_else(|| "config.toml".to_string())
}

fn run(cli: Cli) -> Result<(), AdminError> {
    let config_path = resolve_config_path(cli.config);
    let config = config::load_config(Some(&config_path))?;
    init_tracing(&config.logging);
    config.warn_rejected_overrides();

    let conn = open_migrated(&config.database)?;

    match cli.command {
        Commands::Seed { file, replace } => {
            let mode = if replace {
                SeedMode::Replace
            } else {
                SeedMode::Ignore
            };
            let report = seed(&conn, &file, mode)?;
            println!(
                "seed finished: {} inserted, {} replaced, {} skipped",
                report.inserted, report.replaced, report.skipped
            );
        }
        Commands::Reconcile => {
            let report = run_reconcile(&conn)?;
            println!("reconciliation finished, rows changed: {}", report.changed);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "maintenance command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
