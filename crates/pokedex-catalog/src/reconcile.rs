//! One-shot reconciliation of stored rows into canonical form.
//!
//! Rows written before the write path normalized its input may hold CSV
//! strings, JSON-encoded strings, or objects where lists belong. The pass
//! scans every row, normalizes the four semi-structured columns, and
//! rewrites only the rows whose stored value differs from the canonical
//! one. Rows that are already canonical are not touched, so their
//! `updated_at` is preserved.

use pokedex_normalize::{normalize_mapping, normalize_sequence, RawField};
use rusqlite::{params, Connection};
use serde_json::{Map, Value};

use crate::columns::{raw_field, stored_json};
use crate::error::CatalogError;

/// Outcome of a [`reconcile`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Rows examined.
    pub scanned: usize,
    /// Rows rewritten.
    pub changed: usize,
    /// Ids of the rewritten rows, ascending.
    pub changed_ids: Vec<i64>,
}

struct StoredRow {
    id: i64,
    types: RawField,
    stats: RawField,
    abilities: RawField,
    sprites: RawField,
}

/// A column's canonical JSON and whether the stored value differs from it.
struct Canonical {
    value: Value,
    changed: bool,
}

impl Canonical {
    fn sequence(raw: RawField) -> Self {
        let stored = stored_json(&raw, || Value::Array(Vec::new()));
        Self::compare(stored, Value::from(normalize_sequence(raw)))
    }

    fn mapping(raw: RawField) -> Self {
        let stored = stored_json(&raw, || Value::Object(Map::new()));
        Self::compare(stored, Value::Object(normalize_mapping(raw)))
    }

    fn compare(stored: Option<Value>, value: Value) -> Self {
        let changed = stored.as_ref() != Some(&value);
        Self { value, changed }
    }
}

/// Runs the reconciliation pass over the whole table.
///
/// Comparison is structural: stored text is parsed as JSON and compared
/// with the normalized value, so formatting differences alone do not
/// trigger a rewrite. Stored text that is not JSON always does. `NULL`
/// compares equal to the empty value.
///
/// Rows are rewritten one at a time in id order. A failure stops the pass;
/// rows already rewritten stay rewritten.
///
/// # Errors
///
/// Returns `CatalogError::Database` on SQL failure.
pub fn reconcile(conn: &Connection) -> Result<ReconcileReport, CatalogError> {
    let rows = load_rows(conn)?;
    let mut report = ReconcileReport {
        scanned: rows.len(),
        ..ReconcileReport::default()
    };

    for row in rows {
        let types = Canonical::sequence(row.types);
        let abilities = Canonical::sequence(row.abilities);
        let stats = Canonical::mapping(row.stats);
        let sprites = Canonical::mapping(row.sprites);

        if !(types.changed || abilities.changed || stats.changed || sprites.changed) {
            continue;
        }

        conn.execute(
            "UPDATE pokemons
             SET types = ?1, abilities = ?2, stats = ?3, sprites = ?4,
                 updated_at = datetime('now')
             WHERE id = ?5",
            params![
                types.value.to_string(),
                abilities.value.to_string(),
                stats.value.to_string(),
                sprites.value.to_string(),
                row.id,
            ],
        )?;

        tracing::debug!(
            id = row.id,
            types = types.changed,
            abilities = abilities.changed,
            stats = stats.changed,
            sprites = sprites.changed,
            "rewrote non-canonical row"
        );
        report.changed += 1;
        report.changed_ids.push(row.id);
    }

    tracing::info!(
        scanned = report.scanned,
        changed = report.changed,
        "reconciliation pass finished"
    );
    Ok(report)
}

fn load_rows(conn: &Connection) -> Result<Vec<StoredRow>, CatalogError> {
    let mut stmt =
        conn.prepare("SELECT id, types, stats, abilities, sprites FROM pokemons ORDER BY id ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(StoredRow {
            id: row.get(0)?,
            types: raw_field(row.get_ref(1)?),
            stats: raw_field(row.get_ref(2)?),
            abilities: raw_field(row.get_ref(3)?),
            sprites: raw_field(row.get_ref(4)?),
        })
    })?;

    let mut loaded = Vec::new();
    for row in rows {
        loaded.push(row?);
    }
    Ok(loaded)
}
