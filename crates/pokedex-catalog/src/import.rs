//! Bulk import of seed records with caller-chosen ids.

use pokedex_types::SeedPokemon;
use rusqlite::{params, Connection};

use crate::error::CatalogError;
use crate::store::NewPokemon;

/// What to do when a seed id already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedMode {
    /// Keep the existing row (`INSERT OR IGNORE`).
    #[default]
    Ignore,
    /// Overwrite the existing row with the seed values.
    Replace,
}

/// Counts produced by [`import_pokemons`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportReport {
    /// Rows that did not exist before.
    pub inserted: usize,
    /// Existing rows overwritten in [`SeedMode::Replace`].
    pub replaced: usize,
    /// Existing rows left alone in [`SeedMode::Ignore`].
    pub skipped: usize,
}

/// Imports seed records in a single transaction.
///
/// Every entry is validated and normalized like an API write. If any entry
/// is invalid or any statement fails, nothing is imported.
///
/// # Errors
///
/// Returns `CatalogError::InvalidPayload` naming the offending id, or
/// `CatalogError::Database` on SQL failure.
pub fn import_pokemons(
    conn: &Connection,
    seeds: impl IntoIterator<Item = SeedPokemon>,
    mode: SeedMode,
) -> Result<ImportReport, CatalogError> {
    let tx = conn.unchecked_transaction()?;
    let mut report = ImportReport::default();

    for seed in seeds {
        let id = seed.id;
        let pokemon = NewPokemon::from_payload(seed.payload).map_err(|e| match e {
            CatalogError::InvalidPayload(reason) => {
                CatalogError::InvalidPayload(format!("seed entry {id}: {reason}"))
            }
            other => other,
        })?;
        let stored = pokemon.stored_columns()?;

        let existed: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM pokemons WHERE id = ?1)",
            [id],
            |row| row.get(0),
        )?;

        let sql = match mode {
            SeedMode::Ignore => {
                "INSERT OR IGNORE INTO pokemons
                    (id, name, types, stats, height, weight, abilities, sprites, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, datetime('now'))"
            }
            SeedMode::Replace => {
                "INSERT INTO pokemons
                    (id, name, types, stats, height, weight, abilities, sprites, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, datetime('now'))
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    types = excluded.types,
                    stats = excluded.stats,
                    height = excluded.height,
                    weight = excluded.weight,
                    abilities = excluded.abilities,
                    sprites = excluded.sprites,
                    updated_at = excluded.updated_at"
            }
        };

        tx.execute(
            sql,
            params![
                id,
                pokemon.name,
                stored.types,
                stored.stats,
                pokemon.height,
                pokemon.weight,
                stored.abilities,
                stored.sprites,
            ],
        )?;

        match (existed, mode) {
            (false, _) => report.inserted += 1,
            (true, SeedMode::Replace) => report.replaced += 1,
            (true, SeedMode::Ignore) => report.skipped += 1,
        }
    }

    tx.commit()?;
    tracing::info!(
        inserted = report.inserted,
        replaced = report.replaced,
        skipped = report.skipped,
        "seed import finished"
    );
    Ok(report)
}
