//! Maintenance operations behind the `pokedex-admin` binary.

use crate::config::{ConfigError, DatabaseConfig};
use pokedex_catalog::{
    import_pokemons, reconcile, CatalogError, ImportReport, ReconcileReport, SeedMode,
};
use pokedex_db::{open_connection, run_migrations, MigrationError, PoolError};
use pokedex_types::SeedPokemon;
use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

/// Errors surfaced by maintenance commands.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to open database: {0}")]
    Open(#[from] PoolError),

    #[error("failed to run migrations: {0}")]
    Migration(#[from] MigrationError),

    #[error("failed to read seed file {path}: {source}")]
    SeedRead {
        path: String,
        source: std::io::Error,
    },

    /// The seed file is not a JSON array of records with ids.
    #[error("failed to parse seed file {path}: {source}")]
    SeedParse {
        path: String,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Opens the configured database and brings its schema up to date.
pub fn open_migrated(database: &DatabaseConfig) -> Result<Connection, AdminError> {
    let conn = open_connection(&database.path, database.runtime_settings())?;
    let applied = run_migrations(&conn)?;
    if applied > 0 {
        tracing::info!(count = applied, "applied database migrations");
    }
    Ok(conn)
}

/// Reads a seed file: a JSON array of records, each with an `id`.
pub fn read_seed_file(path: &Path) -> Result<Vec<SeedPokemon>, AdminError> {
    let display = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|source| AdminError::SeedRead {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| AdminError::SeedParse {
        path: display,
        source,
    })
}

/// Imports a seed file into the database.
pub fn seed(conn: &Connection, path: &Path, mode: SeedMode) -> Result<ImportReport, AdminError> {
    let seeds = read_seed_file(path)?;
    tracing::info!(path = %path.display(), entries = seeds.len(), ?mode, "importing seed file");
    Ok(import_pokemons(conn, seeds, mode)?)
}

/// Runs the reconciliation pass.
pub fn run_reconcile(conn: &Connection) -> Result<ReconcileReport, AdminError> {
    Ok(reconcile(conn)?)
}
