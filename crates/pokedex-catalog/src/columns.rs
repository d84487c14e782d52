//! Decoding and encoding of the semi-structured JSON columns.

use pokedex_normalize::{normalize_mapping, normalize_sequence, Mapping, RawField, Sequence};
use pokedex_types::ReadMode;
use rusqlite::types::{Type, ValueRef};
use rusqlite::Row;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decodes a SQLite column value into a [`RawField`].
///
/// `NULL` is missing, TEXT and BLOB are text (BLOBs decoded lossily as
/// UTF-8), INTEGER and REAL are scalars. A non-finite REAL has no JSON
/// representation and is treated as missing.
pub(crate) fn raw_field(value: ValueRef<'_>) -> RawField {
    match value {
        ValueRef::Null => RawField::Missing,
        ValueRef::Integer(i) => RawField::Scalar(Value::from(i)),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map_or(RawField::Missing, |n| RawField::Scalar(Value::Number(n))),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            RawField::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Legacy tables declared `name` nullable. Lenient reads render a `NULL`
/// name as empty; strict reads report it.
pub(crate) fn read_name(row: &Row<'_>, idx: usize, mode: ReadMode) -> rusqlite::Result<String> {
    match mode {
        ReadMode::Strict => row.get(idx),
        ReadMode::Lenient => Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default()),
    }
}

pub(crate) fn read_sequence(row: &Row<'_>, idx: usize, mode: ReadMode) -> rusqlite::Result<Sequence> {
    match mode {
        ReadMode::Strict => decode_strict(row, idx),
        ReadMode::Lenient => Ok(normalize_sequence(raw_field(row.get_ref(idx)?))),
    }
}

pub(crate) fn read_mapping(row: &Row<'_>, idx: usize, mode: ReadMode) -> rusqlite::Result<Mapping> {
    match mode {
        ReadMode::Strict => decode_strict(row, idx),
        ReadMode::Lenient => Ok(normalize_mapping(raw_field(row.get_ref(idx)?))),
    }
}

/// Plain JSON decode. `NULL` and blank text decode to the empty value.
fn decode_strict<T: DeserializeOwned + Default>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let text: Option<String> = row.get(idx)?;
    match text.as_deref().map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(text) => serde_json::from_str(text)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
    }
}

/// JSON text for the four semi-structured columns of one row.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StoredColumns {
    pub types: String,
    pub stats: String,
    pub abilities: String,
    pub sprites: String,
}

impl StoredColumns {
    pub(crate) fn encode(
        types: &Sequence,
        stats: &Mapping,
        abilities: &Sequence,
        sprites: &Mapping,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            types: serde_json::to_string(types)?,
            stats: serde_json::to_string(stats)?,
            abilities: serde_json::to_string(abilities)?,
            sprites: serde_json::to_string(sprites)?,
        })
    }
}

/// Parses what is currently stored for comparison against a canonical
/// value. `None` means the stored text is not JSON at all.
pub(crate) fn stored_json(raw: &RawField, empty: fn() -> Value) -> Option<Value> {
    match raw {
        RawField::Missing => Some(empty()),
        RawField::Text(text) => serde_json::from_str(text).ok(),
        RawField::Sequence(items) => Some(Value::Array(items.clone())),
        RawField::Mapping(map) => Some(Value::Object(map.clone())),
        RawField::Scalar(value) => Some(value.clone()),
    }
}
