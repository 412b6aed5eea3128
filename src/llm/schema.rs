// file: src/llm/schema.rs
// description: JSON schema descriptor for the structured output requested from models
// reference: https://docs.rs/schemars

use schemars::{JsonSchema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Describes the shape the models must answer in. Validation against it is
/// the generator's job; the engine only forwards it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSchema {
    pub name: String,
    pub schema: Value,
    #[serde(default = "default_strict")]
    pub strict: bool,
}

fn default_strict() -> bool {
    true
}

impl OutputSchema {
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
            strict: true,
        }
    }

    /// Derives the schema from a result type. Field doc comments become the
    /// descriptions that steer the model.
    pub fn for_type<T: JsonSchema>() -> Self {
        let root = SchemaGenerator::default().into_root_schema_for::<T>();
        let mut schema = root.to_value();

        if let Value::Object(map) = &mut schema {
            map.remove("$schema");
            if map.get("type").and_then(Value::as_str) == Some("object") {
                map.entry("additionalProperties")
                    .or_insert(Value::Bool(false));
            }
        }

        Self::new(sanitize_name(&T::schema_name()), schema)
    }

    pub fn non_strict(mut self) -> Self {
        self.strict = false;
        self
    }
}

// Endpoints only accept [a-zA-Z0-9_-] in schema names.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
