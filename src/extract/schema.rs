//! Static schema descriptors for structured extraction.
//!
//! A [`Schema`] names the fields a stage expects the model to produce, with a
//! kind and a required flag per field. Schemas serve two purposes: they are
//! forwarded to providers that support schema-guided decoding, and they gate
//! validation so that no partially-populated record ever escapes extraction.

use serde_json::{json, Map, Value};

/// The kind of value a schema field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A JSON string.
    String,
    /// A JSON number (integer or float).
    Number,
    /// An array of strings.
    StringArray,
    /// An array of numbers.
    NumberArray,
}

impl FieldKind {
    /// Returns true if `value` conforms to this kind.
    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::StringArray => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            FieldKind::NumberArray => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_number)),
        }
    }

    /// JSON Schema fragment describing this kind.
    fn json_schema(&self) -> Value {
        match self {
            FieldKind::String => json!({"type": "string"}),
            FieldKind::Number => json!({"type": "number"}),
            FieldKind::StringArray => json!({"type": "array", "items": {"type": "string"}}),
            FieldKind::NumberArray => json!({"type": "array", "items": {"type": "number"}}),
        }
    }
}

/// One field of a schema.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// Field name as it appears in the extracted object.
    pub name: &'static str,
    /// Kind of value the field accepts.
    pub kind: FieldKind,
    /// Whether extraction fails when the field is absent.
    pub required: bool,
}

impl Field {
    /// A required field.
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Field {
            name,
            kind,
            required: true,
        }
    }

    /// An optional field.
    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Field {
            name,
            kind,
            required: false,
        }
    }
}

/// A named collection of fields describing one extraction target.
///
/// Schemas are static configuration, declared once per pipeline stage.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    /// Name of the record type, used in logs and schema-guided requests.
    pub name: &'static str,
    /// The fields of the record.
    pub fields: &'static [Field],
}

impl Schema {
    /// Checks whether `value` is a record conforming to this schema.
    ///
    /// Every required field must be present with a matching kind. Optional
    /// fields may be absent or null, but when present must also match their
    /// declared kind: a malformed optional field rejects the whole record.
    pub fn conforms(&self, value: &Value) -> bool {
        let Some(object) = value.as_object() else {
            return false;
        };

        self.fields.iter().all(|field| match object.get(field.name) {
            Some(v) if v.is_null() => !field.required,
            Some(v) => field.kind.matches(v),
            None => !field.required,
        })
    }

    /// Renders this schema as a JSON Schema object for schema-guided decoding.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in self.fields {
            properties.insert(field.name.to_string(), field.kind.json_schema());
            if field.required {
                required.push(Value::String(field.name.to_string()));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MOOD_TEST_SCHEMA: Schema = Schema {
        name: "mood",
        fields: &[
            Field::required("primary_mood", FieldKind::String),
            Field::required("mood_score", FieldKind::Number),
            Field::optional("mood_indicators", FieldKind::StringArray),
        ],
    };

    #[test]
    fn test_conforming_record() {
        let value = json!({
            "primary_mood": "excited",
            "mood_score": 6.0,
            "mood_indicators": ["joined", "first day"],
        });
        assert!(MOOD_TEST_SCHEMA.conforms(&value));
    }

    #[test]
    fn test_missing_required_field_rejects() {
        let value = json!({"primary_mood": "excited"});
        assert!(!MOOD_TEST_SCHEMA.conforms(&value));
    }

    #[test]
    fn test_missing_optional_field_accepted() {
        let value = json!({"primary_mood": "calm", "mood_score": 2});
        assert!(MOOD_TEST_SCHEMA.conforms(&value));
    }

    #[test]
    fn test_null_optional_field_accepted() {
        let value = json!({
            "primary_mood": "calm",
            "mood_score": 2,
            "mood_indicators": null,
        });
        assert!(MOOD_TEST_SCHEMA.conforms(&value));
    }

    #[test]
    fn test_wrong_kind_rejects() {
        let value = json!({"primary_mood": "excited", "mood_score": "six"});
        assert!(!MOOD_TEST_SCHEMA.conforms(&value));
    }

    #[test]
    fn test_malformed_optional_rejects() {
        let value = json!({
            "primary_mood": "excited",
            "mood_score": 6.0,
            "mood_indicators": [1, 2],
        });
        assert!(!MOOD_TEST_SCHEMA.conforms(&value));
    }

    #[test]
    fn test_non_object_rejects() {
        assert!(!MOOD_TEST_SCHEMA.conforms(&json!(["excited"])));
        assert!(!MOOD_TEST_SCHEMA.conforms(&json!("excited")));
    }

    #[test]
    fn test_integer_accepted_for_number() {
        let value = json!({"primary_mood": "calm", "mood_score": 7});
        assert!(MOOD_TEST_SCHEMA.conforms(&value));
    }

    #[test]
    fn test_json_schema_lists_required_fields() {
        let schema = MOOD_TEST_SCHEMA.to_json_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 2);
        assert!(required.contains(&json!("primary_mood")));
        assert!(required.contains(&json!("mood_score")));
        assert_eq!(schema["properties"]["mood_score"]["type"], "number");
        assert_eq!(
            schema["properties"]["mood_indicators"]["items"]["type"],
            "string"
        );
    }
}
