//! Compact schema view for the rendered page.
//!
//! Unlike [`resolve_schema`], the outline expands `oneOf`/`anyOf` members so a
//! reader sees every alternative. Output is a small JSON tree: property names
//! (suffixed with `*` when required) mapped to type names.

use serde_json::{json, Map, Value as JsonValue};

use super::{resolve_schema, SchemaType, MAX_EXAMPLE_DEPTH};
use crate::reference::{is_circular_marker, CIRCULAR_DESCRIPTION};

const TRUNCATED: &str = "...";
const ANY: &str = "any";

/// Build the compact outline of `schema`. `None` if the schema is absent or dangling.
pub fn outline(document: &JsonValue, schema: &JsonValue) -> Option<JsonValue> {
    let resolved = resolve_schema(document, schema)?;
    Some(compact(document, &resolved, 0))
}

fn compact(document: &JsonValue, schema: &JsonValue, depth: usize) -> JsonValue {
    if depth > MAX_EXAMPLE_DEPTH {
        return json!(TRUNCATED);
    }
    if is_circular_marker(schema) {
        return json!(CIRCULAR_DESCRIPTION);
    }

    for keyword in ["oneOf", "anyOf"] {
        if let Some(members) = schema.get(keyword).and_then(JsonValue::as_array) {
            let alternatives: Vec<JsonValue> = members
                .iter()
                .map(|member| match resolve_schema(document, member) {
                    Some(resolved) => compact(document, &resolved, depth + 1),
                    None => json!(ANY),
                })
                .collect();
            let mut composition = Map::new();
            composition.insert(keyword.to_string(), JsonValue::Array(alternatives));
            return JsonValue::Object(composition);
        }
    }

    let Some(schema_type) = SchemaType::of(schema) else {
        return json!(ANY);
    };
    match schema_type {
        SchemaType::Object => match schema.get("properties").and_then(JsonValue::as_object) {
            Some(properties) => {
                let required: Vec<&str> = schema
                    .get("required")
                    .and_then(JsonValue::as_array)
                    .map(|names| names.iter().filter_map(JsonValue::as_str).collect())
                    .unwrap_or_default();
                let fields: Map<String, JsonValue> = properties
                    .iter()
                    .map(|(name, property)| {
                        let key = if required.contains(&name.as_str()) {
                            format!("{name}*")
                        } else {
                            name.clone()
                        };
                        (key, compact(document, property, depth + 1))
                    })
                    .collect();
                JsonValue::Object(fields)
            }
            None => json!(schema_type.as_str()),
        },
        SchemaType::Array => match schema.get("items") {
            Some(items) => json!([compact(document, items, depth + 1)]),
            None => json!(schema_type.as_str()),
        },
        primitive => json!(primitive_label(schema, primitive)),
    }
}

fn primitive_label(schema: &JsonValue, schema_type: SchemaType) -> String {
    if let Some(values) = schema.get("enum").and_then(JsonValue::as_array) {
        return values
            .iter()
            .map(|value| match value {
                JsonValue::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" | ");
    }
    match schema.get("format").and_then(JsonValue::as_str) {
        Some(format) => format!("{}<{}>", schema_type.as_str(), format),
        None => schema_type.as_str().to_string(),
    }
}
