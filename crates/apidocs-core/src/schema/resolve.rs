//! Schema dereferencing.

use serde_json::{json, Map, Value as JsonValue};

use super::SchemaShape;
use crate::reference::{self, Resolution, Visited};

/// Fully dereference `schema` against `document`, starting a new chain.
///
/// Returns `None` for an absent schema or a reference that resolves to
/// nothing. Cycles are replaced by [`reference::circular_marker`].
pub fn resolve_schema(document: &JsonValue, schema: &JsonValue) -> Option<JsonValue> {
    resolve_schema_with(document, schema, &Visited::new())
}

/// Dereference `schema`, treating the references in `visited` as already
/// entered on the current chain.
///
/// `visited` is never mutated: every `$ref` gets its own copy, which is then
/// carried down into the target so that chains still detect re-entry while
/// sibling properties stay independent.
pub fn resolve_schema_with(
    document: &JsonValue,
    schema: &JsonValue,
    visited: &Visited,
) -> Option<JsonValue> {
    match SchemaShape::classify(schema)? {
        SchemaShape::Reference(raw) => {
            let mut branch = visited.clone();
            match reference::resolve(document, raw, &mut branch)? {
                Resolution::Node(target) => resolve_schema_with(document, target, &branch),
                Resolution::Circular => Some(reference::circular_marker()),
            }
        }
        SchemaShape::Array { node, items } => {
            let mut copy = node.clone();
            let items = resolve_schema_with(document, items, visited).unwrap_or(JsonValue::Null);
            copy.insert("items".to_string(), items);
            Some(JsonValue::Object(copy))
        }
        SchemaShape::Object { node, properties } => {
            let mut copy = node.clone();
            let properties: Map<String, JsonValue> = properties
                .iter()
                .map(|(name, property)| {
                    let resolved = resolve_schema_with(document, property, visited)
                        .unwrap_or(JsonValue::Null);
                    (name.clone(), resolved)
                })
                .collect();
            copy.insert("properties".to_string(), JsonValue::Object(properties));
            Some(JsonValue::Object(copy))
        }
        SchemaShape::AllOf(members) => Some(merge_all_of(document, members, visited)),
        SchemaShape::Leaf(node) => Some(node.clone()),
    }
}

/// Merge `allOf` members into one object schema.
///
/// Only `properties` are carried over, later members overwriting earlier
/// ones key by key. `required` lists are not merged.
fn merge_all_of(document: &JsonValue, members: &[JsonValue], visited: &Visited) -> JsonValue {
    let mut properties = Map::new();
    for member in members {
        let Some(resolved) = resolve_schema_with(document, member, visited) else {
            continue;
        };
        if let Some(JsonValue::Object(member_properties)) = resolved.get("properties") {
            for (name, property) in member_properties {
                properties.insert(name.clone(), property.clone());
            }
        }
    }
    json!({
        "type": "object",
        "properties": properties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{is_circular_marker, CIRCULAR_DESCRIPTION};

    fn count_markers(value: &JsonValue) -> usize {
        let here = usize::from(is_circular_marker(value));
        here + match value {
            JsonValue::Object(map) => map.values().map(count_markers).sum(),
            JsonValue::Array(items) => items.iter().map(count_markers).sum(),
            _ => 0,
        }
    }

    fn document() -> JsonValue {
        json!({
            "components": {
                "schemas": {
                    "User": {
                        "type": "object",
                        "required": ["id"],
                        "properties": {
                            "id": { "type": "string", "format": "uuid" },
                            "name": { "type": "string" }
                        }
                    },
                    "Pair": {
                        "type": "object",
                        "properties": {
                            "a": { "$ref": "#/components/schemas/User" },
                            "b": { "$ref": "#/components/schemas/User" }
                        }
                    },
                    "A": {
                        "type": "object",
                        "properties": { "b": { "$ref": "#/components/schemas/B" } }
                    },
                    "B": {
                        "type": "object",
                        "properties": { "a": { "$ref": "#/components/schemas/A" } }
                    },
                    "Node": {
                        "type": "object",
                        "properties": {
                            "value": { "type": "integer" },
                            "children": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Node" }
                            }
                        }
                    },
                    "Named": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "kind": { "type": "string", "enum": ["first"] }
                        }
                    },
                    "Merged": {
                        "description": "dropped by merge",
                        "allOf": [
                            { "$ref": "#/components/schemas/Named" },
                            {
                                "type": "object",
                                "required": ["size"],
                                "properties": {
                                    "size": { "type": "integer" },
                                    "kind": { "type": "string", "enum": ["second"] }
                                }
                            }
                        ]
                    },
                    "Choice": {
                        "oneOf": [
                            { "$ref": "#/components/schemas/User" },
                            { "type": "string" }
                        ]
                    }
                }
            }
        })
    }

    fn resolve_ref(document: &JsonValue, name: &str) -> Option<JsonValue> {
        let schema = json!({ "$ref": format!("#/components/schemas/{name}") });
        resolve_schema(document, &schema)
    }

    #[test]
    fn test_absent_schema_resolves_to_none() {
        let doc = document();
        assert_eq!(resolve_schema(&doc, &JsonValue::Null), None);
    }

    #[test]
    fn test_dangling_reference_resolves_to_none() {
        let doc = document();
        assert_eq!(resolve_ref(&doc, "Missing"), None);
    }

    #[test]
    fn test_dangling_property_becomes_null() {
        let doc = document();
        let schema = json!({
            "type": "object",
            "properties": { "gone": { "$ref": "#/nowhere" }, "kept": { "type": "boolean" } }
        });
        let resolved = resolve_schema(&doc, &schema).unwrap();
        assert_eq!(resolved["properties"]["gone"], JsonValue::Null);
        assert_eq!(resolved["properties"]["kept"], json!({ "type": "boolean" }));
    }

    #[test]
    fn test_primitive_is_unchanged() {
        let doc = document();
        let schema = json!({ "type": "string", "format": "date" });
        assert_eq!(resolve_schema(&doc, &schema), Some(schema));
    }

    #[test]
    fn test_siblings_do_not_interfere() {
        let doc = document();
        let resolved = resolve_ref(&doc, "Pair").unwrap();
        let user = &doc["components"]["schemas"]["User"];
        assert_eq!(&resolved["properties"]["a"], user);
        assert_eq!(&resolved["properties"]["b"], user);
        assert_eq!(count_markers(&resolved), 0);
    }

    #[test]
    fn test_mutual_cycle_yields_one_marker() {
        let doc = document();
        let resolved = resolve_ref(&doc, "A").unwrap();
        assert_eq!(count_markers(&resolved), 1);
        assert_eq!(
            resolved["properties"]["b"]["properties"]["a"]["description"],
            json!(CIRCULAR_DESCRIPTION)
        );
    }

    #[test]
    fn test_recursive_array_terminates() {
        let doc = document();
        let resolved = resolve_ref(&doc, "Node").unwrap();
        assert_eq!(resolved["properties"]["value"], json!({ "type": "integer" }));
        assert!(is_circular_marker(
            &resolved["properties"]["children"]["items"]
        ));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let doc = document();
        for name in ["User", "Pair", "A", "B", "Node", "Merged", "Choice"] {
            let once = resolve_ref(&doc, name).unwrap();
            let twice = resolve_schema(&doc, &once).unwrap();
            assert_eq!(once, twice, "resolving {name} twice changed it");
        }
    }

    #[test]
    fn test_all_of_merges_properties_last_write_wins() {
        let doc = document();
        let resolved = resolve_ref(&doc, "Merged").unwrap();
        assert_eq!(resolved["type"], json!("object"));
        let properties = resolved["properties"].as_object().unwrap();
        let names: Vec<&str> = properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["name", "kind", "size"]);
        assert_eq!(properties["kind"]["enum"], json!(["second"]));
    }

    #[test]
    fn test_all_of_does_not_merge_required() {
        let doc = document();
        let resolved = resolve_ref(&doc, "Merged").unwrap();
        assert!(resolved.get("required").is_none());
        assert!(resolved.get("description").is_none());
    }

    #[test]
    fn test_one_of_is_left_intact() {
        let doc = document();
        let resolved = resolve_ref(&doc, "Choice").unwrap();
        assert_eq!(resolved, doc["components"]["schemas"]["Choice"]);
    }

    #[test]
    fn test_property_order_is_preserved() {
        let doc = document();
        let schema = json!({
            "type": "object",
            "properties": { "zeta": {}, "alpha": {}, "mid": {} }
        });
        let resolved = resolve_schema(&doc, &schema).unwrap();
        let names: Vec<&str> = resolved["properties"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }
}
