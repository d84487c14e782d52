//! Field normalization for the Pokédex catalog.
//!
//! Four columns of a Pokémon record hold semi-structured data: `types` and
//! `abilities` are ordered sequences of string tokens, `stats` and `sprites`
//! are string-keyed mappings. Historically these columns were written by
//! inconsistent tools, so a stored value may be a JSON array, a JSON object,
//! a JSON-encoded string, a bare comma-separated list, or nothing at all.
//!
//! This crate turns any of those shapes into one canonical form:
//!
//! - [`normalize_sequence`] always yields a `Vec<String>`.
//! - [`normalize_mapping`] always yields a JSON object map.
//!
//! Both functions are pure and total. Malformed input degrades to an empty
//! value or a best-effort comma split; nothing is ever reported as an error,
//! so callers cannot tell "was empty" apart from "was malformed".
//!
//! Normalizing an already-normalized value is a no-op.
//!
//! # Usage
//!
//! ```rust
//! use pokedex_normalize::{normalize_mapping, normalize_sequence, RawField};
//!
//! let types = normalize_sequence(RawField::from("fire, flying"));
//! assert_eq!(types, vec!["fire".to_string(), "flying".to_string()]);
//!
//! let stats = normalize_mapping(RawField::from(r#"{"hp":45}"#));
//! assert_eq!(stats["hp"], 45);
//! ```

mod normalize;
mod raw;

pub use normalize::{normalize_mapping, normalize_sequence, Mapping, Sequence};
pub use raw::RawField;

#[cfg(test)]
mod tests;
