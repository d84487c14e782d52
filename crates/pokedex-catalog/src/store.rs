//! CRUD operations on the `pokemons` table.

use pokedex_normalize::{normalize_mapping, normalize_sequence, Mapping, RawField, Sequence};
use pokedex_types::{PokemonPayload, PokemonRecord, ReadMode};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::columns::{read_mapping, read_name, read_sequence, StoredColumns};
use crate::error::CatalogError;

const RECORD_COLUMNS: &str = "id, name, types, stats, height, weight, abilities, sprites";

/// A validated, normalized record ready to be written.
///
/// Built from a [`PokemonPayload`]; the four semi-structured fields are
/// already in canonical form.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPokemon {
    pub name: String,
    pub types: Sequence,
    pub stats: Mapping,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub abilities: Sequence,
    pub sprites: Mapping,
}

impl NewPokemon {
    /// Validates a write payload and normalizes its semi-structured fields.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidPayload` if `name` is missing or blank.
    pub fn from_payload(payload: PokemonPayload) -> Result<Self, CatalogError> {
        let name = payload
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| CatalogError::InvalidPayload("name is required".to_string()))?;

        Ok(Self {
            name,
            types: normalize_sequence(RawField::from(payload.types)),
            stats: normalize_mapping(RawField::from(payload.stats)),
            height: payload.height,
            weight: payload.weight,
            abilities: normalize_sequence(RawField::from(payload.abilities)),
            sprites: normalize_mapping(RawField::from(payload.sprites)),
        })
    }

    pub(crate) fn stored_columns(&self) -> Result<StoredColumns, serde_json::Error> {
        StoredColumns::encode(&self.types, &self.stats, &self.abilities, &self.sprites)
    }
}

/// Inserts a new record and returns it as stored.
pub fn create_pokemon(
    conn: &Connection,
    pokemon: &NewPokemon,
    mode: ReadMode,
) -> Result<PokemonRecord, CatalogError> {
    let stored = pokemon.stored_columns()?;
    conn.execute(
        "INSERT INTO pokemons (name, types, stats, height, weight, abilities, sprites, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, datetime('now'))",
        params![
            pokemon.name,
            stored.types,
            stored.stats,
            pokemon.height,
            pokemon.weight,
            stored.abilities,
            stored.sprites,
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!(id, name = %pokemon.name, "created pokemon");
    get_pokemon(conn, id, mode)
}

/// Retrieves a record by id.
pub fn get_pokemon(conn: &Connection, id: i64, mode: ReadMode) -> Result<PokemonRecord, CatalogError> {
    conn.query_row(
        &format!("SELECT {RECORD_COLUMNS} FROM pokemons WHERE id = ?1"),
        [id],
        |row| map_row_to_record(row, mode),
    )
    .optional()?
    .ok_or(CatalogError::NotFound(id))
}

/// Lists every record, ordered by id.
pub fn list_pokemons(conn: &Connection, mode: ReadMode) -> Result<Vec<PokemonRecord>, CatalogError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM pokemons ORDER BY id ASC"
    ))?;

    let rows = stmt.query_map([], |row| map_row_to_record(row, mode))?;
    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}

/// Replaces every field of an existing record. There is no partial merge:
/// fields absent from the payload are reset to their empty defaults.
pub fn update_pokemon(
    conn: &Connection,
    id: i64,
    pokemon: &NewPokemon,
    mode: ReadMode,
) -> Result<PokemonRecord, CatalogError> {
    let stored = pokemon.stored_columns()?;
    let count = conn.execute(
        "UPDATE pokemons
         SET name = ?1, types = ?2, stats = ?3, height = ?4, weight = ?5,
             abilities = ?6, sprites = ?7, updated_at = datetime('now')
         WHERE id = ?8",
        params![
            pokemon.name,
            stored.types,
            stored.stats,
            pokemon.height,
            pokemon.weight,
            stored.abilities,
            stored.sprites,
            id,
        ],
    )?;
    if count == 0 {
        return Err(CatalogError::NotFound(id));
    }
    get_pokemon(conn, id, mode)
}

/// Deletes a record.
pub fn delete_pokemon(conn: &Connection, id: i64) -> Result<(), CatalogError> {
    let count = conn.execute("DELETE FROM pokemons WHERE id = ?1", [id])?;
    if count == 0 {
        return Err(CatalogError::NotFound(id));
    }
    tracing::debug!(id, "deleted pokemon");
    Ok(())
}

fn map_row_to_record(row: &Row<'_>, mode: ReadMode) -> rusqlite::Result<PokemonRecord> {
    Ok(PokemonRecord {
        id: row.get(0)?,
        name: read_name(row, 1, mode)?,
        types: read_sequence(row, 2, mode)?,
        stats: read_mapping(row, 3, mode)?,
        height: row.get(4)?,
        weight: row.get(5)?,
        abilities: read_sequence(row, 6, mode)?,
        sprites: read_mapping(row, 7, mode)?,
    })
}
