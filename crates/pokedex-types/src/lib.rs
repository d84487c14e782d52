//! Shared types for the Pokédex catalog.
//!
//! This crate holds the record shape returned by the API, the loosely-typed
//! payload accepted on writes, and small enums shared between the catalog
//! store and the server configuration. It has no knowledge of storage.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A Pokémon as returned by the catalog and the HTTP API.
///
/// `types` and `abilities` are always sequences and `stats` and `sprites`
/// are always mappings, whatever shape the stored columns had.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonRecord {
    /// Primary key.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Elemental types, in order (e.g. `["grass", "poison"]`).
    pub types: Vec<String>,
    /// Base stats keyed by stat name (e.g. `hp`, `attack`).
    pub stats: Map<String, Value>,
    /// Height in meters.
    pub height: Option<f64>,
    /// Weight in kilograms.
    pub weight: Option<f64>,
    /// Ability names, in order.
    pub abilities: Vec<String>,
    /// Sprite URLs keyed by sprite kind.
    pub sprites: Map<String, Value>,
}

/// Write payload for creating or replacing a Pokémon.
///
/// The four semi-structured fields accept any JSON shape; the catalog
/// normalizes them before storage. Absent fields fall back to empty values,
/// and absent `height`/`weight` are stored as `NULL`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PokemonPayload {
    /// Display name. Required; validated by the catalog.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub types: Value,
    #[serde(default)]
    pub stats: Value,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub abilities: Value,
    #[serde(default)]
    pub sprites: Value,
}

/// One entry of a seed file: a payload with a caller-chosen id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedPokemon {
    /// Primary key to insert under.
    pub id: i64,
    /// Remaining record fields.
    #[serde(flatten)]
    pub payload: PokemonPayload,
}

/// How stored semi-structured columns are decoded on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadMode {
    /// Plain JSON decode. Malformed rows are reported as errors.
    #[default]
    Strict,
    /// Re-apply the normalizers so legacy malformed rows still render.
    Lenient,
}

impl ReadMode {
    /// Returns the configuration label for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }
}

impl std::fmt::Display for ReadMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReadMode {
    type Err = ParseReadModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            _ => Err(ParseReadModeError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown read mode string.
#[derive(Debug, Clone)]
pub struct ParseReadModeError(pub String);

impl std::fmt::Display for ParseReadModeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown read mode: {}", self.0)
    }
}

impl std::error::Error for ParseReadModeError {}
