//! Sequence and mapping normalizers.
//!
//! Text input is resolved by an ordered list of parse strategies. Each
//! strategy either produces a value or passes to the next one; the last
//! strategy in each list always succeeds or the caller falls back to an
//! empty value.

use serde_json::{Map, Value};

use crate::raw::RawField;

/// Canonical form of `types` and `abilities`.
pub type Sequence = Vec<String>;

/// Canonical form of `stats` and `sprites`.
pub type Mapping = Map<String, Value>;

type TextStrategy<T> = fn(&str) -> Option<T>;

const SEQUENCE_STRATEGIES: &[TextStrategy<Sequence>] =
    &[sequence_from_structured, sequence_from_comma_list];

const MAPPING_STRATEGIES: &[TextStrategy<Mapping>] = &[mapping_from_structured];

/// Normalizes a raw value into an ordered sequence of string tokens.
///
/// - `Missing` yields an empty sequence.
/// - `Sequence` is kept as-is.
/// - `Mapping` yields its values in key order.
/// - `Text` is parsed as JSON: an array is kept, a string is comma-split and
///   an object yields its values. Text that is not JSON, or that decodes to
///   a bare number, boolean or `null`, is comma-split.
/// - `Scalar` is wrapped in a one-element sequence.
///
/// Array elements that are not strings are rendered as their JSON text and
/// `null` elements are dropped, so the result is always a list of strings.
pub fn normalize_sequence(raw: RawField) -> Sequence {
    match raw {
        RawField::Missing => Vec::new(),
        RawField::Sequence(items) => tokens_from_values(items),
        RawField::Mapping(map) => tokens_from_values(map.into_iter().map(|(_, v)| v)),
        RawField::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Vec::new();
            }
            first_match(text, SEQUENCE_STRATEGIES).unwrap_or_default()
        }
        RawField::Scalar(value) => {
            let rendered = render_token(value);
            let token = rendered.trim();
            if token.is_empty() {
                Vec::new()
            } else {
                vec![token.to_string()]
            }
        }
    }
}

/// Normalizes a raw value into a string-keyed mapping.
///
/// Only an object, or text holding a JSON object, survives. Everything else
/// becomes an empty mapping: free text has no key-value convention, so it is
/// dropped rather than guessed at.
pub fn normalize_mapping(raw: RawField) -> Mapping {
    match raw {
        RawField::Mapping(map) => map,
        RawField::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Map::new();
            }
            first_match(text, MAPPING_STRATEGIES).unwrap_or_default()
        }
        RawField::Missing | RawField::Sequence(_) | RawField::Scalar(_) => Map::new(),
    }
}

fn first_match<T>(text: &str, strategies: &[TextStrategy<T>]) -> Option<T> {
    strategies.iter().find_map(|strategy| strategy(text))
}

fn sequence_from_structured(text: &str) -> Option<Sequence> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Array(items) => Some(tokens_from_values(items)),
        Value::String(inner) => Some(split_comma_list(&inner)),
        // Lossy: keys are discarded. Kept for compatibility with rows written
        // with an object where a list belonged.
        Value::Object(map) => Some(tokens_from_values(map.into_iter().map(|(_, v)| v))),
        Value::Null | Value::Bool(_) | Value::Number(_) => None,
    }
}

fn sequence_from_comma_list(text: &str) -> Option<Sequence> {
    Some(split_comma_list(text))
}

fn mapping_from_structured(text: &str) -> Option<Mapping> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn split_comma_list(text: &str) -> Sequence {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn tokens_from_values(values: impl IntoIterator<Item = Value>) -> Sequence {
    values
        .into_iter()
        .filter(|value| !value.is_null())
        .map(render_token)
        .collect()
}

fn render_token(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
