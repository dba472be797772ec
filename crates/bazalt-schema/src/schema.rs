//! # Schema
//!
//! An ordered registry of named fields. Each field is a normalized
//! [`Definition`]: the type tag, the options it was configured from, the
//! nested schema or element definition (`of`), and the frozen
//! [`FieldType`] built from them.
//!
//! ## Normalization
//!
//! | Shape | Tag | `of` | Required |
//! |---|---|---|---|
//! | bare type | that type | none | yes |
//! | `[]` | array | mixed element | yes |
//! | `[type]` | array | element of that type | yes (element: unset) |
//! | `[explicit]` / `[[...]]` | array | element built from it | yes |
//! | `[{...}]` / `[schema]` | array | nested schema | yes |
//! | `{...}` / schema | object | nested schema | yes |
//! | explicit | as given | as given | as given |
//!
//! Element definitions are named after their array field with a `[]`
//! suffix. Nested schemas built from shorthand use default options, so they
//! carry their own generated `id` field.
//!
//! ## Phases
//!
//! `add` and `remove` take `&mut self`; `validate` and `path` take `&self`.
//! A built schema is `Send + Sync` and can be shared across threads for
//! concurrent validation.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use bazalt_core::{SchemaError, ValidationError};

use crate::options::TypeOptions;
use crate::shape::{Explicit, Shape};
use crate::types::{FieldType, Of, TypeTag};

/// Value read for fields missing from a record.
static NULL: Value = Value::Null;

/// Schema-level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaOptions {
    /// Register the generated `id` identifier field before any other field.
    pub id: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self { id: true }
    }
}

/// What an object or array field delegates to.
#[derive(Debug, Clone)]
pub enum Nested {
    /// A nested schema; the value must produce no field errors.
    Schema(Schema),
    /// A single element definition; the value must satisfy its type.
    Element(Definition),
}

impl Nested {
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Nested::Schema(schema) => schema.validate(value).is_none(),
            Nested::Element(definition) => {
                definition.field_type().validate(value, false).is_none()
            }
        }
    }

    pub fn as_schema(&self) -> Option<&Schema> {
        match self {
            Nested::Schema(schema) => Some(schema),
            Nested::Element(_) => None,
        }
    }
}

impl From<Schema> for Nested {
    fn from(schema: Schema) -> Self {
        Nested::Schema(schema)
    }
}

impl From<Definition> for Nested {
    fn from(definition: Definition) -> Self {
        Nested::Element(definition)
    }
}

impl From<Schema> for Arc<Nested> {
    fn from(schema: Schema) -> Self {
        Arc::new(Nested::Schema(schema))
    }
}

/// A normalized field definition.
#[derive(Debug, Clone)]
pub struct Definition {
    tag: TypeTag,
    options: TypeOptions,
    of: Option<Arc<Nested>>,
    of_message: Option<String>,
    ty: FieldType,
}

impl Definition {
    /// Normalize a shape and build its type.
    ///
    /// # Errors
    ///
    /// [`SchemaError::InvalidDefinition`] when an object is asked to nest
    /// something other than a schema, and any configuration error raised
    /// while building the type or a nested schema.
    pub fn build(name: &str, shape: impl Into<Shape>) -> Result<Definition, SchemaError> {
        let Explicit {
            tag,
            options,
            of,
            of_message,
        } = normalize(shape.into());
        let of = match of {
            Some(nested) => nested_for(name, tag, *nested)?,
            None => None,
        };
        let target = of.as_ref().map(|nested| Of {
            nested,
            message: of_message.as_deref(),
        });
        let ty = FieldType::build(name, tag, &options, target)?;
        Ok(Definition {
            tag,
            options,
            of,
            of_message,
            ty,
        })
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    /// Options the type was configured from.
    pub fn options(&self) -> &TypeOptions {
        &self.options
    }

    pub fn nested(&self) -> Option<&Nested> {
        self.of.as_deref()
    }

    /// Custom message of the nested check, if one was given.
    pub fn of_message(&self) -> Option<&str> {
        self.of_message.as_deref()
    }

    pub fn field_type(&self) -> &FieldType {
        &self.ty
    }
}

/// Rewrite shorthand into an explicit definition.
fn normalize(shape: Shape) -> Explicit {
    let required = |explicit: Explicit| explicit.required(true);
    match shape {
        Shape::Type(tag) => required(Shape::explicit(tag)),
        Shape::List(element) => {
            let element = element.map_or_else(|| Shape::Type(TypeTag::Mixed), |e| *e);
            required(Shape::explicit(TypeTag::Array).of(element))
        }
        Shape::Object(fields) => {
            required(Shape::explicit(TypeTag::Object).of(Shape::Object(fields)))
        }
        Shape::Schema(schema) => required(Shape::explicit(TypeTag::Object).of(schema)),
        Shape::Explicit(explicit) => explicit,
    }
}

/// Build the `of` target of a field. Variants other than object and array
/// ignore it.
fn nested_for(name: &str, tag: TypeTag, of: Shape) -> Result<Option<Arc<Nested>>, SchemaError> {
    let nested = match (tag, of) {
        (TypeTag::Object | TypeTag::Array, Shape::Schema(schema)) => Nested::Schema(schema),
        (TypeTag::Object | TypeTag::Array, Shape::Object(fields)) => {
            Nested::Schema(Schema::new(fields, SchemaOptions::default())?)
        }
        (TypeTag::Object, _) => {
            return Err(SchemaError::InvalidDefinition {
                field: name.to_string(),
            })
        }
        (TypeTag::Array, Shape::Type(tag)) => {
            Nested::Element(Definition::build(&element_name(name), Shape::explicit(tag))?)
        }
        (TypeTag::Array, element) => {
            Nested::Element(Definition::build(&element_name(name), element)?)
        }
        (_, _) => {
            tracing::debug!(field = name, %tag, "`of` ignored by this type");
            return Ok(None);
        }
    };
    Ok(Some(Arc::new(nested)))
}

fn element_name(name: &str) -> String {
    format!("{name}[]")
}

/// Resolved path target.
#[derive(Debug, Clone, Copy)]
pub struct PathAccessor<'a> {
    ty: &'a FieldType,
}

impl<'a> PathAccessor<'a> {
    /// Default value of the resolved field, generated afresh when a
    /// generator is installed.
    pub fn default(&self) -> Option<Value> {
        self.ty.get_default()
    }

    pub fn validate(&self, value: &Value) -> Option<ValidationError> {
        self.ty.validate(value, false)
    }

    pub fn field_type(&self) -> &'a FieldType {
        self.ty
    }
}

/// Errors of a record, keyed by field in registration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(IndexMap<String, ValidationError>);

impl FieldErrors {
    /// The error reported for `field`, if it failed.
    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names of the failing fields.
    pub fn fields(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValidationError)> {
        self.0.iter().map(|(field, error)| (field.as_str(), error))
    }

    pub fn into_inner(self) -> IndexMap<String, ValidationError> {
        self.0
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, error)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{field}: {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// An ordered set of field definitions.
///
/// ```
/// use bazalt_schema::{Schema, SchemaOptions, Shape, TypeTag};
/// use serde_json::json;
///
/// let schema = Schema::new(
///     [
///         ("name", Shape::from(Shape::explicit(TypeTag::String).required(false))),
///         ("username", Shape::from(TypeTag::String)),
///     ],
///     SchemaOptions::default(),
/// )?;
/// assert_eq!(schema.fields(), ["id", "name", "username"]);
/// assert!(schema.validate(&json!({"username": "b"})).is_none());
///
/// let errors = schema.validate(&json!({"name": "a"})).unwrap();
/// assert_eq!(errors.fields(), ["username"]);
/// # Ok::<(), bazalt_schema::SchemaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Schema {
    options: SchemaOptions,
    definitions: IndexMap<String, Definition>,
    identifiers: Vec<String>,
}

impl Schema {
    /// Build a schema from named shapes.
    ///
    /// Unless `options.id` is `false`, an `id` field of GUID type, marked as
    /// identifier and generating its default, is registered first. A
    /// user-supplied `id` replaces its definition but keeps its position.
    ///
    /// # Errors
    ///
    /// The first error raised while adding a field.
    pub fn new<K, S>(
        shapes: impl IntoIterator<Item = (K, S)>,
        options: SchemaOptions,
    ) -> Result<Schema, SchemaError>
    where
        K: Into<String>,
        S: Into<Shape>,
    {
        let mut schema = Schema {
            options,
            definitions: IndexMap::new(),
            identifiers: Vec::new(),
        };
        if options.id {
            schema.add(
                "id",
                Shape::explicit(TypeTag::Guid).id(true).generate(true),
            )?;
        }
        for (name, shape) in shapes {
            schema.add(name, shape)?;
        }
        Ok(schema)
    }

    /// Register or replace a field.
    ///
    /// A replaced field keeps its position. The identifier list follows the
    /// new definition.
    ///
    /// # Errors
    ///
    /// [`SchemaError::InvalidFieldName`] for an empty name, otherwise any
    /// error raised while normalizing the shape or building the type.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        shape: impl Into<Shape>,
    ) -> Result<&mut Self, SchemaError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::InvalidFieldName { name });
        }
        let definition = Definition::build(&name, shape)?;
        let identifier = definition.field_type().is_identifier();
        tracing::debug!(field = %name, tag = %definition.tag(), identifier, "field registered");

        if identifier {
            if !self.identifiers.contains(&name) {
                self.identifiers.push(name.clone());
            }
        } else {
            self.identifiers.retain(|existing| *existing != name);
        }
        self.definitions.insert(name, definition);
        Ok(self)
    }

    /// Remove a field. Unknown names are ignored.
    pub fn remove(&mut self, name: &str) -> &mut Self {
        if self.definitions.shift_remove(name).is_some() {
            self.identifiers.retain(|existing| existing != name);
            tracing::debug!(field = name, "field removed");
        }
        self
    }

    /// Resolve a dotted path such as `information.location`.
    ///
    /// The first segment names a field of this schema. When a suffix
    /// remains and that field nests a schema, resolution continues there;
    /// otherwise the field itself is the target.
    ///
    /// # Errors
    ///
    /// [`SchemaError::PathNotFound`] when a segment names no field.
    pub fn path(&self, path: &str) -> Result<PathAccessor<'_>, SchemaError> {
        self.resolve(path).ok_or_else(|| SchemaError::PathNotFound {
            path: path.to_string(),
        })
    }

    fn resolve(&self, path: &str) -> Option<PathAccessor<'_>> {
        let path = path.strip_prefix('.').unwrap_or(path);
        let (first, rest) = path.split_once('.').unwrap_or((path, ""));
        let definition = self.definitions.get(first)?;
        match definition.nested().and_then(Nested::as_schema) {
            Some(nested) if !rest.is_empty() => nested.resolve(rest),
            _ => Some(PathAccessor {
                ty: definition.field_type(),
            }),
        }
    }

    /// Validate a record. Missing keys are validated as `null`.
    ///
    /// Returns `None` when every field is valid.
    pub fn validate(&self, record: &Value) -> Option<FieldErrors> {
        let errors: IndexMap<String, ValidationError> = self
            .definitions
            .iter()
            .filter_map(|(name, definition)| {
                let value = record.get(name.as_str()).unwrap_or(&NULL);
                definition
                    .field_type()
                    .validate(value, false)
                    .map(|error| (name.clone(), error))
            })
            .collect();
        (!errors.is_empty()).then_some(FieldErrors(errors))
    }

    /// Field names in registration order.
    pub fn fields(&self) -> Vec<&str> {
        self.definitions.keys().map(String::as_str).collect()
    }

    /// Identifier field names in registration order.
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    pub fn definitions(&self) -> impl Iterator<Item = (&str, &Definition)> {
        self.definitions
            .iter()
            .map(|(name, definition)| (name.as_str(), definition))
    }

    pub fn options(&self) -> &SchemaOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::kind;
    use bazalt_core::messages;
    use serde_json::json;

    fn no_id() -> SchemaOptions {
        SchemaOptions { id: false }
    }

    fn multiple_paths() -> Schema {
        Schema::new(
            [
                ("extra", Shape::from(TypeTag::Mixed)),
                ("name", TypeTag::String.into()),
                ("age", TypeTag::Number.into()),
                (
                    "information",
                    Shape::object([
                        ("location", Shape::from(TypeTag::String)),
                        ("lobbies", Shape::list(TypeTag::String)),
                        ("profiles", Shape::list(Shape::object([("name", TypeTag::String)]))),
                    ]),
                ),
                ("friends", Shape::List(None)),
            ],
            SchemaOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn auto_identifier_field_comes_first() {
        let schema = Schema::new(
            [
                ("firstname", Shape::from(TypeTag::String)),
                ("lastname", Shape::explicit(TypeTag::String).into()),
                ("age", Shape::explicit(TypeTag::Number).into()),
            ],
            SchemaOptions::default(),
        )
        .unwrap();
        assert_eq!(schema.fields(), ["id", "firstname", "lastname", "age"]);
        assert_eq!(schema.identifiers(), ["id"]);
        assert!(schema.path("firstname").unwrap().validate(&json!("String value")).is_none());
        assert!(schema.path("lastname").unwrap().validate(&json!("String value")).is_none());
        assert!(schema.path("age").unwrap().validate(&json!(18)).is_none());
    }

    #[test]
    fn identifier_field_can_be_disabled() {
        let schema = Schema::new([("name", TypeTag::String)], no_id()).unwrap();
        assert_eq!(schema.fields(), ["name"]);
        assert!(schema.identifiers().is_empty());
    }

    #[test]
    fn generated_identifier_is_optional_and_defaults_to_a_guid() {
        let schema = Schema::new(Vec::<(String, Shape)>::new(), SchemaOptions::default()).unwrap();
        assert!(schema.validate(&json!({})).is_none());
        let id = schema.path("id").unwrap().default().unwrap();
        assert!(crate::types::GUID_PATTERN.is_match(id.as_str().unwrap()));
    }

    #[test]
    fn bare_types_are_required() {
        let schema = Schema::new([("username", TypeTag::String)], no_id()).unwrap();
        let errors = schema.validate(&json!({})).unwrap();
        let error = errors.get("username").unwrap();
        assert_eq!(error.kind, kind::REQUIRED);
        assert_eq!(error.value, Value::Null);
    }

    #[test]
    fn bare_type_presence_rules() {
        let schema = multiple_paths();
        let check = |path: &str, value: Value| schema.path(path).unwrap().validate(&value).is_none();

        for value in [json!(1), json!(2.1), json!(-1), json!([]), json!(""), json!("A string"), json!({})] {
            assert!(check("extra", value));
        }
        for value in [json!(1), json!(1e3), json!(""), json!([])] {
            assert!(check("age", value.clone()), "{value} should be a number");
        }
        for value in [json!("A string"), json!({})] {
            assert!(!check("age", value));
        }
        for value in [json!("A string"), json!(1), json!(-1), json!({})] {
            assert!(check("name", value));
        }
        for value in [json!(""), json!([])] {
            assert!(!check("name", value));
        }
        assert!(check("friends", json!([])));
        for value in [json!(1), json!(""), json!({})] {
            assert!(!check("friends", value));
        }
    }

    #[test]
    fn dotted_paths_reach_nested_fields() {
        let schema = multiple_paths();
        let valid = [
            ("extra", json!({})),
            ("name", json!("A String")),
            ("age", json!(18)),
            ("information.location", json!("A String")),
            ("information.lobbies", json!(["A String"])),
            ("information.profiles", json!([{"name": "A String"}])),
            ("friends", json!([])),
        ];
        for (path, value) in valid {
            assert!(schema.path(path).unwrap().validate(&value).is_none(), "{path}");
        }
        let error = schema
            .path("information.profiles")
            .unwrap()
            .validate(&json!([{"name": ""}]))
            .unwrap();
        assert_eq!(error.kind, kind::SCHEMA_VALIDATOR);
        assert_eq!(error.field, "profiles");
    }

    #[test]
    fn path_edge_cases() {
        let schema = multiple_paths();
        assert_eq!(
            schema.path("missing").unwrap_err(),
            SchemaError::PathNotFound {
                path: "missing".to_string()
            }
        );
        assert!(matches!(
            schema.path("information.missing"),
            Err(SchemaError::PathNotFound { path }) if path == "information.missing"
        ));
        // A suffix under a non-schema field resolves to the field itself.
        assert_eq!(schema.path("name.first").unwrap().field_type().field(), "name");
        // A leading dot is dropped.
        assert_eq!(schema.path(".age").unwrap().field_type().field(), "age");
    }

    #[test]
    fn nested_failures_surface_on_the_parent_field() {
        let schema = multiple_paths();
        let record = json!({
            "extra": 1,
            "name": "n",
            "age": 3,
            "information": {"location": "", "lobbies": [], "profiles": []},
            "friends": []
        });
        let errors = schema.validate(&record).unwrap();
        assert_eq!(errors.fields(), ["information"]);
        let error = errors.get("information").unwrap();
        assert_eq!(error.kind, kind::SCHEMA_VALIDATOR);
        assert_eq!(error.message, messages::SCHEMA);
    }

    #[test]
    fn object_of_requires_a_schema() {
        let err = Schema::new(
            [("o", Shape::explicit(TypeTag::Object).of(TypeTag::String))],
            no_id(),
        )
        .unwrap_err();
        assert_eq!(err, SchemaError::InvalidDefinition { field: "o".to_string() });
    }

    #[test]
    fn add_replaces_in_place_and_tracks_identifiers() {
        let mut schema = Schema::new([("a", TypeTag::String), ("b", TypeTag::Number)], no_id()).unwrap();
        schema
            .add("a", Shape::explicit(TypeTag::Guid).id(true))
            .unwrap()
            .add("c", TypeTag::Mixed)
            .unwrap();
        assert_eq!(schema.fields(), ["a", "b", "c"]);
        assert_eq!(schema.identifiers(), ["a"]);
        assert_eq!(schema.definition("a").unwrap().tag(), TypeTag::Guid);

        schema.add("a", Shape::explicit(TypeTag::Guid).id(true)).unwrap();
        assert_eq!(schema.identifiers(), ["a"]);

        schema.add("a", TypeTag::String).unwrap();
        assert!(schema.identifiers().is_empty());
    }

    #[test]
    fn remove_drops_field_and_identifier() {
        let mut schema = Schema::new([("name", TypeTag::String)], SchemaOptions::default()).unwrap();
        schema.remove("id").remove("unknown");
        assert_eq!(schema.fields(), ["name"]);
        assert!(schema.identifiers().is_empty());
        assert_eq!(schema.len(), 1);
        assert!(schema.validate(&json!({"name": "x"})).is_none());
    }

    #[test]
    fn empty_field_names_are_rejected() {
        let mut schema = Schema::new([("name", TypeTag::String)], no_id()).unwrap();
        assert_eq!(
            schema.add("", TypeTag::String).unwrap_err(),
            SchemaError::InvalidFieldName { name: String::new() }
        );
    }

    #[test]
    fn configuration_errors_propagate_from_add() {
        let mut schema = Schema::new(Vec::<(&str, Shape)>::new(), no_id()).unwrap();
        assert_eq!(
            schema
                .add("age", Shape::explicit(TypeTag::Number).min(f64::NAN))
                .unwrap_err(),
            SchemaError::MinInvalidParameter
        );
        assert_eq!(
            schema
                .add("n", Shape::explicit(TypeTag::String).default_value(json!("")))
                .unwrap_err(),
            SchemaError::DefaultValueInvalid
        );
        assert!(schema.is_empty());
    }

    #[test]
    fn non_object_records_validate_every_field_as_missing() {
        let schema = Schema::new([("name", TypeTag::String)], no_id()).unwrap();
        for record in [json!(null), json!("name"), json!([1, 2])] {
            assert_eq!(schema.validate(&record).unwrap().fields(), ["name"]);
        }
    }

    #[test]
    fn field_errors_display_one_line_per_field() {
        let schema = Schema::new([("a", TypeTag::String), ("b", TypeTag::Number)], no_id()).unwrap();
        let errors = schema.validate(&json!({})).unwrap();
        assert_eq!(
            errors.to_string(),
            "a: The field `a` is required.\nb: The field `b` is required."
        );
        let encoded = serde_json::to_value(&errors).unwrap();
        assert_eq!(encoded["b"]["kind"], json!("required"));
    }
}
