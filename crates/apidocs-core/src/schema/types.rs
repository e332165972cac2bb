//! Common OpenAPI schema types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// OpenAPI schema type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// String type
    String,
    /// Number type (float/double)
    Number,
    /// Integer type
    Integer,
    /// Boolean type
    Boolean,
    /// Array type
    Array,
    /// Object type
    Object,
}

impl SchemaType {
    /// Read the declared `type` of a schema node, if it is one of the known names.
    pub fn of(schema: &JsonValue) -> Option<Self> {
        match schema.get("type")?.as_str()? {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

/// Shape of a schema node, checked in resolution precedence order.
///
/// Borrowed from the document; nothing is copied until a resolver builds
/// output from it.
#[derive(Debug, Clone, Copy)]
pub enum SchemaShape<'a> {
    /// Node carries `$ref`. Wins over every other keyword.
    Reference(&'a JsonValue),
    /// `type: array` with `items`.
    Array {
        node: &'a Map<String, JsonValue>,
        items: &'a JsonValue,
    },
    /// `type: object` with a `properties` mapping.
    Object {
        node: &'a Map<String, JsonValue>,
        properties: &'a Map<String, JsonValue>,
    },
    /// `allOf` composition.
    AllOf(&'a [JsonValue]),
    /// Anything else: primitives, already-resolved leaves, `oneOf`/`anyOf`.
    Leaf(&'a JsonValue),
}

impl<'a> SchemaShape<'a> {
    /// Classify `schema`. `null` counts as an absent schema.
    pub fn classify(schema: &'a JsonValue) -> Option<Self> {
        let node = match schema {
            JsonValue::Null => return None,
            JsonValue::Object(node) => node,
            other => return Some(Self::Leaf(other)),
        };

        if let Some(reference) = node.get("$ref") {
            return Some(Self::Reference(reference));
        }

        match (SchemaType::of(schema), node.get("items"), node.get("properties")) {
            (Some(SchemaType::Array), Some(items), _) => {
                return Some(Self::Array { node, items });
            }
            (Some(SchemaType::Object), _, Some(JsonValue::Object(properties))) => {
                return Some(Self::Object { node, properties });
            }
            _ => {}
        }

        match node.get("allOf") {
            Some(JsonValue::Array(members)) => Some(Self::AllOf(members)),
            _ => Some(Self::Leaf(schema)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_type_serde() {
        let json = serde_json::to_string(&SchemaType::String).unwrap();
        assert_eq!(json, r#""string""#);

        let schema_type: SchemaType = serde_json::from_str(r#""integer""#).unwrap();
        assert_eq!(schema_type, SchemaType::Integer);
    }

    #[test]
    fn test_schema_type_of() {
        assert_eq!(SchemaType::of(&json!({"type": "boolean"})), Some(SchemaType::Boolean));
        assert_eq!(SchemaType::of(&json!({"type": "null"})), None);
        assert_eq!(SchemaType::of(&json!({})), None);
    }

    #[test]
    fn test_reference_wins_over_other_keywords() {
        let schema = json!({"$ref": "#/x", "type": "object", "properties": {}});
        assert!(matches!(
            SchemaShape::classify(&schema),
            Some(SchemaShape::Reference(_))
        ));
    }

    #[test]
    fn test_classify_precedence() {
        assert!(SchemaShape::classify(&JsonValue::Null).is_none());
        assert!(matches!(
            SchemaShape::classify(&json!({"type": "array", "items": {"type": "string"}})),
            Some(SchemaShape::Array { .. })
        ));
        assert!(matches!(
            SchemaShape::classify(&json!({"type": "object", "properties": {}, "allOf": []})),
            Some(SchemaShape::Object { .. })
        ));
        assert!(matches!(
            SchemaShape::classify(&json!({"allOf": [{"type": "object"}]})),
            Some(SchemaShape::AllOf(members)) if members.len() == 1
        ));
        assert!(matches!(
            SchemaShape::classify(&json!({"type": "array"})),
            Some(SchemaShape::Leaf(_))
        ));
        assert!(matches!(
            SchemaShape::classify(&json!({"oneOf": [{"type": "string"}]})),
            Some(SchemaShape::Leaf(_))
        ));
        assert!(matches!(
            SchemaShape::classify(&json!(true)),
            Some(SchemaShape::Leaf(_))
        ));
    }
}
