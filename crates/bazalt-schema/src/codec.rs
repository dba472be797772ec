//! # Schema Codec
//!
//! Textual form of a schema, used to persist it and to rebuild an
//! equivalent one elsewhere:
//!
//! ```json
//! {
//!   "schema": {
//!     "id":  { "type": "GUID_TYPE", "id": true, "generate": true },
//!     "age": { "type": "NUMBER_TYPE", "required": true, "min": 0, "max": 90 },
//!     "tags": { "type": "ARRAY_TYPE", "required": true, "of": { "type": "STRING_TYPE" } },
//!     "address": {
//!       "type": "OBJECT_TYPE", "required": true,
//!       "of": { "schema": { ... }, "options": { "id": true } }
//!     }
//!   },
//!   "options": { "id": true }
//! }
//! ```
//!
//! Every definition is written in explicit form: `type` first, then the
//! options it was configured from, then `of` (as `[of, message]` when the
//! nested check has a custom message). Nested schemas are written as
//! documents of the same shape, element definitions as definition objects.
//! Decoding goes through the regular shape normalization, so a decoded
//! schema validates exactly like the encoded one except for closure
//! validators and closure defaults, which have no textual form.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use bazalt_core::SchemaError;

use crate::schema::{Definition, Nested, Schema, SchemaOptions};
use crate::shape::Shape;

impl Schema {
    /// Encode as a `{schema, options}` document.
    pub fn to_value(&self) -> Value {
        let fields: Map<String, Value> = self
            .definitions()
            .map(|(name, definition)| (name.to_string(), definition_value(name, definition)))
            .collect();
        let mut document = Map::new();
        document.insert("schema".into(), Value::Object(fields));
        document.insert("options".into(), options_value(self.options()));
        Value::Object(document)
    }

    /// Encode as compact JSON text.
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    /// Rebuild a schema from a `{schema, options}` document.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Decode`] when the document is not shaped like one,
    /// otherwise the first error raised while rebuilding a field.
    pub fn from_value(document: &Value) -> Result<Schema, SchemaError> {
        let fields = document
            .get("schema")
            .and_then(Value::as_object)
            .ok_or_else(|| SchemaError::Decode("missing `schema` object".to_string()))?;
        let options = match document.get("options") {
            Some(options) => SchemaOptions::deserialize_value(options)?,
            None => SchemaOptions::default(),
        };
        let shapes = fields
            .iter()
            .map(|(name, raw)| Ok((name.clone(), Shape::from_value(name, raw)?)))
            .collect::<Result<Vec<_>, SchemaError>>()?;
        Schema::new(shapes, options)
    }

    /// Parse JSON text and rebuild the schema, reporting why it failed.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Decode`] for malformed text, otherwise as
    /// [`from_value`](Self::from_value).
    pub fn try_from_json(text: &str) -> Result<Schema, SchemaError> {
        let document: Value = serde_json::from_str(text)?;
        Schema::from_value(&document)
    }

    /// Parse JSON text and rebuild the schema. Any failure yields `None`.
    pub fn from_json(text: &str) -> Option<Schema> {
        match Schema::try_from_json(text) {
            Ok(schema) => Some(schema),
            Err(error) => {
                tracing::debug!(%error, "serialized schema rejected");
                None
            }
        }
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl SchemaOptions {
    fn deserialize_value(value: &Value) -> Result<SchemaOptions, SchemaError> {
        if value.is_null() {
            return Ok(SchemaOptions::default());
        }
        SchemaOptions::deserialize(value).map_err(SchemaError::from)
    }
}

fn options_value(options: &SchemaOptions) -> Value {
    let mut map = Map::new();
    map.insert("id".into(), Value::Bool(options.id));
    Value::Object(map)
}

fn definition_value(name: &str, definition: &Definition) -> Value {
    let mut map = Map::new();
    map.insert(
        "type".into(),
        Value::String(definition.tag().identifier().to_string()),
    );
    map.extend(definition.options().to_map(name));
    if let Some(nested) = definition.nested() {
        let of = match nested {
            Nested::Schema(schema) => schema.to_value(),
            Nested::Element(element) => {
                definition_value(element.field_type().field(), element)
            }
        };
        let of = match definition.of_message() {
            Some(message) => Value::Array(vec![of, Value::String(message.to_string())]),
            None => of,
        };
        map.insert("of".into(), of);
    }
    Value::Object(map)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::types::TypeTag;
    use proptest::prelude::*;
    use serde_json::json;

    proptest! {
        /// A decoded schema agrees with its source on every record.
        #[test]
        fn decoded_schema_agrees_with_source(
            min in -100i32..0,
            span in 0i32..200,
            min_length in 0u8..5,
            age in -300i64..300,
            name in "[a-z]{0,8}",
        ) {
            let schema = Schema::new(
                [
                    ("age", Shape::from(Shape::explicit(TypeTag::Number)
                        .required(true)
                        .min(f64::from(min))
                        .max(f64::from(min + span)))),
                    ("name", Shape::explicit(TypeTag::String).min_length(f64::from(min_length)).into()),
                ],
                SchemaOptions::default(),
            ).unwrap();
            let decoded = Schema::from_json(&schema.to_json()).unwrap();
            let record = json!({"age": age, "name": name});
            prop_assert_eq!(schema.validate(&record), decoded.validate(&record));
        }
    }
}
