//! Example payload synthesis.
//!
//! Produces a representative value for a schema, not a validated instance.
//! Recursion into object properties and array items is bounded by
//! [`MAX_EXAMPLE_DEPTH`]; reference cycles are already broken by
//! [`resolve_schema`] before any value is built.

use serde_json::{json, Map, Value as JsonValue};

use super::{resolve_schema, SchemaType};

/// Deepest nesting level that still produces a value.
pub const MAX_EXAMPLE_DEPTH: usize = 5;

pub const DATE_EXAMPLE: &str = "2024-05-01";
pub const DATE_TIME_EXAMPLE: &str = "2024-05-01T12:00:00Z";
pub const UUID_EXAMPLE: &str = "00000000-0000-0000-0000-000000000000";

/// Synthesize an example value for `schema`.
pub fn generate_example(document: &JsonValue, schema: &JsonValue) -> Option<JsonValue> {
    generate_example_at(document, schema, 0)
}

/// Synthesize an example value for `schema` found `depth` levels below the root.
///
/// Returns `None` past [`MAX_EXAMPLE_DEPTH`], for absent or dangling schemas,
/// and for schemas without a known `type`.
pub fn generate_example_at(
    document: &JsonValue,
    schema: &JsonValue,
    depth: usize,
) -> Option<JsonValue> {
    if depth > MAX_EXAMPLE_DEPTH {
        return None;
    }
    let resolved = resolve_schema(document, schema)?;
    synthesize(&resolved, depth)
}

/// Walk an already-resolved schema.
fn synthesize(schema: &JsonValue, depth: usize) -> Option<JsonValue> {
    if depth > MAX_EXAMPLE_DEPTH {
        return None;
    }
    // Presence check rather than truthiness: `example: 0` or `example: ""`
    // is returned as declared.
    if let Some(example) = schema.get("example").filter(|e| !e.is_null()) {
        return Some(example.clone());
    }

    match SchemaType::of(schema)? {
        SchemaType::String => Some(string_example(schema)),
        SchemaType::Number | SchemaType::Integer => Some(json!(0)),
        SchemaType::Boolean => Some(JsonValue::Bool(true)),
        SchemaType::Array => {
            let element = schema
                .get("items")
                .and_then(|items| synthesize(items, depth + 1));
            Some(JsonValue::Array(element.into_iter().collect()))
        }
        SchemaType::Object => {
            let Some(JsonValue::Object(properties)) = schema.get("properties") else {
                return Some(JsonValue::Object(Map::new()));
            };
            let example: Map<String, JsonValue> = properties
                .iter()
                .filter_map(|(name, property)| {
                    synthesize(property, depth + 1).map(|value| (name.clone(), value))
                })
                .collect();
            Some(JsonValue::Object(example))
        }
    }
}

fn string_example(schema: &JsonValue) -> JsonValue {
    if let Some(first) = schema
        .get("enum")
        .and_then(JsonValue::as_array)
        .and_then(|values| values.first())
    {
        return first.clone();
    }
    let literal = match schema.get("format").and_then(JsonValue::as_str) {
        Some("date") => DATE_EXAMPLE,
        Some("date-time") => DATE_TIME_EXAMPLE,
        Some("uuid") => UUID_EXAMPLE,
        _ => "string",
    };
    JsonValue::String(literal.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example(schema: JsonValue) -> Option<JsonValue> {
        generate_example(&json!({}), &schema)
    }

    /// Objects nested `levels` deep, each holding the next under `child`.
    fn nested(levels: usize) -> JsonValue {
        (0..levels).fold(json!({ "type": "string" }), |inner, _| {
            json!({ "type": "object", "properties": { "child": inner } })
        })
    }

    #[test]
    fn test_date_time_string() {
        assert_eq!(
            example(json!({"type": "string", "format": "date-time"})),
            Some(json!("2024-05-01T12:00:00Z"))
        );
    }

    #[test]
    fn test_string_formats() {
        assert_eq!(
            example(json!({"type": "string", "format": "date"})),
            Some(json!("2024-05-01"))
        );
        assert_eq!(
            example(json!({"type": "string", "format": "uuid"})),
            Some(json!(UUID_EXAMPLE))
        );
        assert_eq!(
            example(json!({"type": "string", "format": "email"})),
            Some(json!("string"))
        );
    }

    #[test]
    fn test_enum_string_uses_first_value() {
        assert_eq!(
            example(json!({"type": "string", "enum": ["a", "b"]})),
            Some(json!("a"))
        );
    }

    #[test]
    fn test_integer_array() {
        assert_eq!(
            example(json!({"type": "array", "items": {"type": "integer"}})),
            Some(json!([0]))
        );
    }

    #[test]
    fn test_array_of_unknown_items_is_empty() {
        assert_eq!(
            example(json!({"type": "array", "items": {"description": "untyped"}})),
            Some(json!([]))
        );
        assert_eq!(example(json!({"type": "array"})), Some(json!([])));
    }

    #[test]
    fn test_object_with_string_property() {
        assert_eq!(
            example(json!({"type": "object", "properties": {"n": {"type": "string"}}})),
            Some(json!({"n": "string"}))
        );
    }

    #[test]
    fn test_object_without_properties_is_empty() {
        assert_eq!(example(json!({"type": "object"})), Some(json!({})));
    }

    #[test]
    fn test_null_property_examples_are_omitted() {
        assert_eq!(
            example(json!({
                "type": "object",
                "properties": {
                    "kept": {"type": "boolean"},
                    "untyped": {"description": "no type"},
                    "dangling": {"$ref": "#/components/schemas/Missing"}
                }
            })),
            Some(json!({"kept": true}))
        );
    }

    #[test]
    fn test_explicit_example_wins() {
        assert_eq!(
            example(json!({"type": "string", "format": "date", "example": "1999-12-31"})),
            Some(json!("1999-12-31"))
        );
        assert_eq!(
            example(json!({"type": "object", "example": {"fixed": 1}})),
            Some(json!({"fixed": 1}))
        );
    }

    #[test]
    fn test_numeric_examples() {
        assert_eq!(example(json!({"type": "number"})), Some(json!(0)));
        assert_eq!(example(json!({"type": "integer", "example": 0})), Some(json!(0)));
        assert_eq!(example(json!({"type": "integer", "example": 42})), Some(json!(42)));
        assert_eq!(example(json!({"type": "number", "example": 1.5})), Some(json!(1.5)));
    }

    #[test]
    fn test_falsy_examples_are_kept() {
        assert_eq!(example(json!({"type": "string", "example": ""})), Some(json!("")));
        assert_eq!(example(json!({"type": "boolean", "example": false})), Some(json!(false)));
    }

    #[test]
    fn test_unknown_or_missing_type_is_none() {
        assert_eq!(example(json!({"type": "null"})), None);
        assert_eq!(example(json!({"description": "free form"})), None);
        assert_eq!(example(JsonValue::Null), None);
    }

    #[test]
    fn test_depth_bound() {
        let schema = nested(10);
        let value = example(schema.clone()).expect("root example");

        let mut node = &value;
        for level in 1..=5 {
            node = node
                .get("child")
                .unwrap_or_else(|| panic!("missing child at depth {level}"));
        }
        assert_eq!(node, &json!({}));
        assert_eq!(generate_example_at(&json!({}), &schema, 6), None);
    }

    #[test]
    fn test_examples_through_references() {
        let document = json!({
            "components": {
                "schemas": {
                    "Tree": {
                        "type": "object",
                        "properties": {
                            "label": {"type": "string"},
                            "parent": {"$ref": "#/components/schemas/Tree"}
                        }
                    },
                    "Base": {
                        "type": "object",
                        "properties": {"id": {"type": "string", "format": "uuid"}}
                    },
                    "Extended": {
                        "allOf": [
                            {"$ref": "#/components/schemas/Base"},
                            {"type": "object", "properties": {"active": {"type": "boolean"}}}
                        ]
                    }
                }
            }
        });

        let tree = generate_example(&document, &json!({"$ref": "#/components/schemas/Tree"}));
        assert_eq!(tree, Some(json!({"label": "string", "parent": {}})));

        let extended =
            generate_example(&document, &json!({"$ref": "#/components/schemas/Extended"}));
        assert_eq!(extended, Some(json!({"id": UUID_EXAMPLE, "active": true})));
    }
}
