//! # Field Shapes
//!
//! The raw, not yet normalized form of a field definition. A shape is what a
//! caller hands to [`Schema::add`](crate::Schema::add):
//!
//! | Shape | JSON form | Normalized to |
//! |---|---|---|
//! | [`Shape::Type`] | `"STRING_TYPE"` | that type, required |
//! | [`Shape::List`] | `[element]` or `[]` | array of element, required |
//! | [`Shape::Object`] | `{ "name": ..., ... }` | object of nested schema, required |
//! | [`Shape::Schema`] | `{ "schema": {...}, "options": {...} }` under `of` | object of that schema, required |
//! | [`Shape::Explicit`] | `{ "type": "NUMBER_TYPE", "min": 0, ... }` | used as given |
//!
//! Inside an explicit definition, `of` follows the `[value, message]` rule
//! of the other options: `"of": ["NUMBER_TYPE", "bad tags"]` nests
//! `NUMBER_TYPE` and reports `bad tags` when the nested check fails. To nest
//! array shorthand, wrap it once more: `"of": [["NUMBER_TYPE"]]`.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use bazalt_core::SchemaError;

use crate::options::{spread, Setting, TypeOptions, ValidatorSpec};
use crate::schema::Schema;
use crate::types::{DefaultValue, TypeTag};

/// Raw definition of a field.
#[derive(Debug, Clone)]
pub enum Shape {
    /// A bare type.
    Type(TypeTag),
    /// Array shorthand. `None` elements are mixed.
    List(Option<Box<Shape>>),
    /// Nested-object shorthand.
    Object(IndexMap<String, Shape>),
    /// An already built schema, used as a nested object.
    Schema(Schema),
    /// A type with explicit options.
    Explicit(Explicit),
}

impl Shape {
    /// Start an explicit definition of the given type. No option is set.
    pub fn explicit(tag: TypeTag) -> Explicit {
        Explicit {
            tag,
            options: TypeOptions::default(),
            of: None,
            of_message: None,
        }
    }

    /// Array shorthand with the given element shape.
    pub fn list(element: impl Into<Shape>) -> Shape {
        Shape::List(Some(Box::new(element.into())))
    }

    /// Nested-object shorthand.
    pub fn object<K, S>(fields: impl IntoIterator<Item = (K, S)>) -> Shape
    where
        K: Into<String>,
        S: Into<Shape>,
    {
        Shape::Object(
            fields
                .into_iter()
                .map(|(name, shape)| (name.into(), shape.into()))
                .collect(),
        )
    }

    /// Decode the JSON form of a shape.
    ///
    /// # Errors
    ///
    /// [`SchemaError::InvalidDefinition`] for unknown type identifiers and
    /// values that are not strings, arrays or objects. Malformed options fail
    /// with the error of the option.
    pub fn from_value(field: &str, value: &Value) -> Result<Shape, SchemaError> {
        match value {
            Value::String(identifier) => TypeTag::from_identifier(identifier)
                .map(Shape::Type)
                .ok_or_else(|| invalid(field)),
            Value::Array(items) => match items.first() {
                Some(element) => Ok(Shape::list(Shape::from_value(field, element)?)),
                None => Ok(Shape::List(None)),
            },
            Value::Object(map) if map.contains_key("type") => {
                Explicit::from_map(field, map).map(Shape::Explicit)
            }
            Value::Object(map) => map
                .iter()
                .map(|(name, shape)| Ok((name.clone(), Shape::from_value(name, shape)?)))
                .collect::<Result<IndexMap<_, _>, SchemaError>>()
                .map(Shape::Object),
            _ => Err(invalid(field)),
        }
    }
}

fn invalid(field: &str) -> SchemaError {
    SchemaError::InvalidDefinition {
        field: field.to_string(),
    }
}

/// A serialized nested schema: an object holding `schema` and nothing but
/// `options` besides.
fn is_schema_document(map: &Map<String, Value>) -> bool {
    map.get("schema").is_some_and(Value::is_object)
        && map.keys().all(|key| key == "schema" || key == "options")
}

/// Decode the target of `of`: a serialized schema or any shape.
fn nested_shape(field: &str, value: &Value) -> Result<Shape, SchemaError> {
    match value {
        Value::Object(map) if is_schema_document(map) => {
            Schema::from_value(value).map(Shape::Schema)
        }
        other => Shape::from_value(field, other),
    }
}

impl From<TypeTag> for Shape {
    fn from(tag: TypeTag) -> Self {
        Shape::Type(tag)
    }
}

impl From<Explicit> for Shape {
    fn from(explicit: Explicit) -> Self {
        Shape::Explicit(explicit)
    }
}

impl From<Schema> for Shape {
    fn from(schema: Schema) -> Self {
        Shape::Schema(schema)
    }
}

impl From<IndexMap<String, Shape>> for Shape {
    fn from(fields: IndexMap<String, Shape>) -> Self {
        Shape::Object(fields)
    }
}

/// Explicit `{type, ...options, of?}` definition, built fluently:
///
/// ```
/// use bazalt_schema::{Shape, TypeTag};
///
/// let age = Shape::explicit(TypeTag::Number).required(true).min(0.0).max(90.0);
/// assert_eq!(age.tag, TypeTag::Number);
/// ```
#[derive(Debug, Clone)]
pub struct Explicit {
    pub tag: TypeTag,
    pub options: TypeOptions,
    pub of: Option<Box<Shape>>,
    /// Message reported when the `of` check fails.
    pub of_message: Option<String>,
}

impl Explicit {
    fn from_map(field: &str, map: &Map<String, Value>) -> Result<Explicit, SchemaError> {
        let tag = map
            .get("type")
            .and_then(Value::as_str)
            .and_then(TypeTag::from_identifier)
            .ok_or_else(|| invalid(field))?;
        let (of, of_message) = match map.get("of") {
            None => (None, None),
            Some(raw) => {
                let (nested, message) = spread(raw);
                (Some(Box::new(nested_shape(field, nested)?)), message)
            }
        };
        Ok(Explicit {
            tag,
            options: TypeOptions::from_map(map)?,
            of,
            of_message,
        })
    }

    pub fn required(mut self, required: impl Into<Setting<bool>>) -> Self {
        self.options.required = Some(required.into());
        self
    }

    pub fn id(mut self, identifier: bool) -> Self {
        self.options.id = Some(identifier);
        self
    }

    pub fn default_value(mut self, default: impl Into<DefaultValue>) -> Self {
        self.options.default = Some(default.into());
        self
    }

    pub fn min(mut self, min: impl Into<Setting<f64>>) -> Self {
        self.options.min = Some(min.into());
        self
    }

    pub fn max(mut self, max: impl Into<Setting<f64>>) -> Self {
        self.options.max = Some(max.into());
        self
    }

    pub fn min_length(mut self, min: impl Into<Setting<f64>>) -> Self {
        self.options.min_length = Some(min.into());
        self
    }

    pub fn max_length(mut self, max: impl Into<Setting<f64>>) -> Self {
        self.options.max_length = Some(max.into());
        self
    }

    pub fn regex(mut self, source: impl Into<String>) -> Self {
        self.options.regex = Some(Setting::Plain(source.into()));
        self
    }

    pub fn regex_with_message(
        mut self,
        source: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.options.regex = Some(Setting::with_message(source.into(), message));
        self
    }

    pub fn generate(mut self, generate: bool) -> Self {
        self.options.generate = Some(generate);
        self
    }

    pub fn validator(mut self, validator: ValidatorSpec) -> Self {
        self.options.validators.push(validator);
        self
    }

    /// Nested schema (object) or element shape (array).
    pub fn of(mut self, nested: impl Into<Shape>) -> Self {
        self.of = Some(Box::new(nested.into()));
        self
    }

    /// Like [`of`](Self::of), reporting `message` when the nested check
    /// fails.
    pub fn of_with_message(
        mut self,
        nested: impl Into<Shape>,
        message: impl Into<String>,
    ) -> Self {
        self.of = Some(Box::new(nested.into()));
        self.of_message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_bare_types() {
        assert!(matches!(
            Shape::from_value("name", &json!("STRING_TYPE")),
            Ok(Shape::Type(TypeTag::String))
        ));
        assert_eq!(
            Shape::from_value("name", &json!("TEXT_TYPE")).unwrap_err(),
            SchemaError::InvalidDefinition {
                field: "name".to_string()
            }
        );
    }

    #[test]
    fn decodes_lists() {
        assert!(matches!(Shape::from_value("f", &json!([])), Ok(Shape::List(None))));
        let Ok(Shape::List(Some(element))) = Shape::from_value("f", &json!(["NUMBER_TYPE"])) else {
            panic!("expected a list shape");
        };
        assert!(matches!(*element, Shape::Type(TypeTag::Number)));
    }

    #[test]
    fn decodes_explicit_definitions() {
        let shape = Shape::from_value(
            "age",
            &json!({"type": "NUMBER_TYPE", "required": true, "min": 0, "max": 90}),
        )
        .unwrap();
        let Shape::Explicit(explicit) = shape else {
            panic!("expected an explicit shape");
        };
        assert_eq!(explicit.tag, TypeTag::Number);
        assert_eq!(explicit.options.min, Some(Setting::Plain(0.0)));
        assert!(explicit.of.is_none());
    }

    #[test]
    fn decodes_nested_objects_in_order() {
        let shape = Shape::from_value(
            "information",
            &json!({"location": "STRING_TYPE", "lobbies": ["STRING_TYPE"]}),
        )
        .unwrap();
        let Shape::Object(fields) = shape else {
            panic!("expected an object shape");
        };
        assert_eq!(fields.keys().collect::<Vec<_>>(), ["location", "lobbies"]);
    }

    #[test]
    fn decodes_serialized_nested_schemas() {
        let shape = Shape::from_value(
            "address",
            &json!({
                "type": "OBJECT_TYPE",
                "of": {"schema": {"zip": "NUMBER_TYPE"}, "options": {"id": false}}
            }),
        )
        .unwrap();
        let Shape::Explicit(Explicit { of: Some(of), .. }) = shape else {
            panic!("expected an explicit shape with `of`");
        };
        let Shape::Schema(schema) = *of else {
            panic!("expected a nested schema");
        };
        assert_eq!(schema.fields(), ["zip"]);
    }

    #[test]
    fn of_spreads_shape_and_message() {
        let shape = Shape::from_value(
            "tags",
            &json!({"type": "ARRAY_TYPE", "of": ["NUMBER_TYPE", "bad tags"]}),
        )
        .unwrap();
        let Shape::Explicit(explicit) = shape else {
            panic!("expected an explicit shape");
        };
        assert!(matches!(explicit.of.as_deref(), Some(Shape::Type(TypeTag::Number))));
        assert_eq!(explicit.of_message.as_deref(), Some("bad tags"));

        let Ok(Shape::Explicit(explicit)) =
            Shape::from_value("matrix", &json!({"type": "ARRAY_TYPE", "of": [["NUMBER_TYPE"]]}))
        else {
            panic!("expected an explicit shape");
        };
        assert!(matches!(explicit.of.as_deref(), Some(Shape::List(Some(_)))));
        assert!(explicit.of_message.is_none());

        assert!(Shape::from_value("f", &json!({"type": "ARRAY_TYPE", "of": []})).is_err());
    }

    #[test]
    fn rejects_scalars_and_unknown_explicit_types() {
        assert!(Shape::from_value("f", &json!(3)).is_err());
        assert!(Shape::from_value("f", &json!(null)).is_err());
        assert!(Shape::from_value("f", &json!({"type": 3})).is_err());
        assert!(Shape::from_value("f", &json!({"type": "DATE_TYPE"})).is_err());
    }
}
