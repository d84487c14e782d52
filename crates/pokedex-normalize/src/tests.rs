//! Unit tests for the field normalizers.

use serde_json::{json, Map, Value};

use crate::{normalize_mapping, normalize_sequence, RawField};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

// ── normalize_sequence ───────────────────────────────────────────────

#[test]
fn sequence_missing_is_empty() {
    assert!(normalize_sequence(RawField::Missing).is_empty());
    assert!(normalize_sequence(RawField::from(Value::Null)).is_empty());
}

#[test]
fn sequence_kept_as_is() {
    let raw = RawField::from(json!(["grass", "poison"]));
    assert_eq!(normalize_sequence(raw), strings(&["grass", "poison"]));
}

#[test]
fn sequence_elements_are_not_trimmed() {
    let raw = RawField::from(json!([" grass ", "poison"]));
    assert_eq!(normalize_sequence(raw), strings(&[" grass ", "poison"]));
}

#[test]
fn sequence_non_string_elements_are_rendered_and_nulls_dropped() {
    let raw = RawField::from(json!(["fire", 3, true, null, ["x"]]));
    assert_eq!(
        normalize_sequence(raw),
        strings(&["fire", "3", "true", r#"["x"]"#])
    );
}

#[test]
fn sequence_from_comma_list_text() {
    let raw = RawField::from("fire, flying");
    assert_eq!(normalize_sequence(raw), strings(&["fire", "flying"]));
}

#[test]
fn sequence_comma_list_drops_empty_parts() {
    let raw = RawField::from(" fire,, ,flying , ");
    assert_eq!(normalize_sequence(raw), strings(&["fire", "flying"]));
}

#[test]
fn sequence_from_json_array_text() {
    let raw = RawField::from(r#"["fire","flying"]"#);
    assert_eq!(normalize_sequence(raw), strings(&["fire", "flying"]));
}

#[test]
fn sequence_from_json_string_text_is_comma_split() {
    let raw = RawField::from(r#""overgrow, chlorophyll""#);
    assert_eq!(normalize_sequence(raw), strings(&["overgrow", "chlorophyll"]));
}

#[test]
fn sequence_from_json_object_text_takes_values_in_order() {
    let raw = RawField::from(r#"{"b":"water","a":"ice"}"#);
    assert_eq!(normalize_sequence(raw), strings(&["water", "ice"]));
}

#[test]
fn sequence_from_mapping_takes_values() {
    let raw = RawField::from(json!({"first": "static", "hidden": "lightning-rod"}));
    assert_eq!(normalize_sequence(raw), strings(&["static", "lightning-rod"]));
}

#[test]
fn sequence_blank_text_is_empty() {
    assert!(normalize_sequence(RawField::from("")).is_empty());
    assert!(normalize_sequence(RawField::from("   \t\n")).is_empty());
}

#[test]
fn sequence_json_scalar_text_falls_through_to_split() {
    assert_eq!(normalize_sequence(RawField::from("42")), strings(&["42"]));
    assert_eq!(normalize_sequence(RawField::from(" null ")), strings(&["null"]));
    assert_eq!(normalize_sequence(RawField::from("true")), strings(&["true"]));
}

#[test]
fn sequence_malformed_json_is_comma_split() {
    let raw = RawField::from(r#"["fire", "flying""#);
    assert_eq!(normalize_sequence(raw), strings(&[r#"["fire""#, r#""flying""#]));
}

#[test]
fn sequence_scalar_is_wrapped() {
    assert_eq!(normalize_sequence(RawField::from(json!(7))), strings(&["7"]));
    assert_eq!(
        normalize_sequence(RawField::from(json!(false))),
        strings(&["false"])
    );
}

#[test]
fn sequence_from_empty_json_containers() {
    assert!(normalize_sequence(RawField::from("[]")).is_empty());
    assert!(normalize_sequence(RawField::from("{}")).is_empty());
    assert!(normalize_sequence(RawField::from(r#""""#)).is_empty());
}

// ── normalize_mapping ────────────────────────────────────────────────

#[test]
fn mapping_missing_is_empty() {
    assert!(normalize_mapping(RawField::Missing).is_empty());
}

#[test]
fn mapping_kept_as_is() {
    let stats = object(json!({"hp": 45, "attack": 49}));
    assert_eq!(normalize_mapping(RawField::from(stats.clone())), stats);
}

#[test]
fn mapping_from_json_object_text() {
    let mapped = normalize_mapping(RawField::from(r#"{"hp":45}"#));
    assert_eq!(mapped, object(json!({"hp": 45})));
}

#[test]
fn mapping_from_text_keeps_key_order() {
    let mapped = normalize_mapping(RawField::from(r#"{"speed":45,"hp":39,"attack":52}"#));
    let keys: Vec<&str> = mapped.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["speed", "hp", "attack"]);
}

#[test]
fn mapping_from_free_text_is_dropped() {
    assert!(normalize_mapping(RawField::from("not json")).is_empty());
    assert!(normalize_mapping(RawField::from("hp=45, attack=49")).is_empty());
}

#[test]
fn mapping_from_non_object_json_is_empty() {
    assert!(normalize_mapping(RawField::from("[1,2]")).is_empty());
    assert!(normalize_mapping(RawField::from(r#""{\"hp\":1}""#)).is_empty());
    assert!(normalize_mapping(RawField::from("12")).is_empty());
}

#[test]
fn mapping_from_other_shapes_is_empty() {
    assert!(normalize_mapping(RawField::from(json!(["a", "b"]))).is_empty());
    assert!(normalize_mapping(RawField::from(json!(3.5))).is_empty());
    assert!(normalize_mapping(RawField::from("  ")).is_empty());
}

// ── RawField decoding ────────────────────────────────────────────────

#[test]
fn raw_field_from_json_value_picks_variant() {
    assert_eq!(RawField::from(Value::Null), RawField::Missing);
    assert_eq!(RawField::from(None::<Value>), RawField::Missing);
    assert!(matches!(RawField::from(json!([])), RawField::Sequence(_)));
    assert!(matches!(RawField::from(json!({})), RawField::Mapping(_)));
    assert!(matches!(RawField::from(json!("x")), RawField::Text(_)));
    assert!(matches!(RawField::from(json!(1.5)), RawField::Scalar(_)));
    assert!(matches!(RawField::from(json!(true)), RawField::Scalar(_)));
}
