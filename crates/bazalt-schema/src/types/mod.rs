//! # Type Engine
//!
//! Every field of a schema is validated by a type: a presence rule, a cast,
//! and an ordered validator chain. The six variants form a closed set
//! selected by [`TypeTag`]:
//!
//! | Variant | Cast | Present when |
//! |---|---|---|
//! | [`MixedType`] | identity | not `null` |
//! | [`NumberType`] | loose numeric conversion | converts to a finite number |
//! | [`StringType`] | display string | non-empty string |
//! | [`ObjectType`] | identity | object or array |
//! | [`ArrayType`] | identity | array |
//! | [`GuidType`] | identity | string matching the GUID pattern |
//!
//! ## Build then freeze
//!
//! Variant structs are consuming builders implementing [`SchemaType`].
//! Once configured they are converted into a [`FieldType`], which only
//! exposes read and validate operations. A schema holds `FieldType`s, so
//! nothing can reconfigure a type after the schema is built.
//!
//! ## Validation algorithm
//!
//! 1. Cast the value unless the caller says it is already cast.
//! 2. If the type was explicitly made optional (`required(false)`) and the
//!    value fails the presence check, the value is accepted without running
//!    the chain. A type whose required state was never set runs its chain on
//!    every value; bounds then read `null` as `0` and as the empty string.
//! 3. Run the chain in registration order; the first failing entry produces
//!    the [`ValidationError`] and the remaining entries are skipped.

pub mod array;
pub mod check;
pub mod guid;
pub mod mixed;
pub mod number;
pub mod object;
pub mod string;

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use bazalt_core::{messages, SchemaError, ValidationError};
use serde_json::Value;

use crate::options::TypeOptions;
use crate::schema::Nested;

pub use array::ArrayType;
pub use check::{kind, Check, Predicate, ValidatorEntry};
pub use guid::{generate_guid, GuidType, GUID_PATTERN};
pub use mixed::MixedType;
pub use number::NumberType;
pub use object::ObjectType;
pub use string::{IntoPattern, StringType};

/// Tag selecting a type variant. Its identifier is the serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Mixed,
    Number,
    String,
    Object,
    Array,
    Guid,
}

impl TypeTag {
    /// The registry of known variants.
    pub const ALL: [TypeTag; 6] = [
        TypeTag::Mixed,
        TypeTag::Array,
        TypeTag::Number,
        TypeTag::Object,
        TypeTag::String,
        TypeTag::Guid,
    ];

    /// Fixed identifier used when serializing a definition.
    pub fn identifier(self) -> &'static str {
        match self {
            TypeTag::Mixed => "MIXED_TYPE",
            TypeTag::Number => "NUMBER_TYPE",
            TypeTag::String => "STRING_TYPE",
            TypeTag::Object => "OBJECT_TYPE",
            TypeTag::Array => "ARRAY_TYPE",
            TypeTag::Guid => "GUID_TYPE",
        }
    }

    /// Resolve a serialized identifier back to its tag.
    pub fn from_identifier(identifier: &str) -> Option<TypeTag> {
        TypeTag::ALL
            .into_iter()
            .find(|tag| tag.identifier() == identifier)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Zero-argument producer of default values.
#[derive(Clone)]
pub struct Generator(Arc<dyn Fn() -> Value + Send + Sync>);

impl Generator {
    /// Wrap a closure producing default values.
    pub fn new(generate: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(generate))
    }

    /// Produce one value.
    pub fn call(&self) -> Value {
        (self.0)()
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Generator(..)")
    }
}

/// Default value of a field.
#[derive(Debug, Clone)]
pub enum DefaultValue {
    /// A fixed value, checked against the presence rule when assigned.
    Literal(Value),
    /// A user generator, invoked on every lookup.
    Generator(Generator),
    /// The built-in version-4 GUID generator installed by `generate(true)`.
    Guid,
}

impl DefaultValue {
    /// A default produced by `generate` on every lookup.
    pub fn generator(generate: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        DefaultValue::Generator(Generator::new(generate))
    }

    /// Produce the value. Generators run on every call.
    pub fn resolve(&self) -> Value {
        match self {
            DefaultValue::Literal(value) => value.clone(),
            DefaultValue::Generator(generator) => generator.call(),
            DefaultValue::Guid => Value::String(generate_guid()),
        }
    }
}

impl From<Value> for DefaultValue {
    fn from(value: Value) -> Self {
        DefaultValue::Literal(value)
    }
}

/// State shared by every variant.
#[derive(Debug, Clone)]
pub struct TypeBase {
    pub(crate) field: String,
    pub(crate) required: Option<bool>,
    pub(crate) identifier: bool,
    pub(crate) default: Option<DefaultValue>,
    pub(crate) validators: Vec<ValidatorEntry>,
}

impl TypeBase {
    /// Unconfigured state for `field`: required unset, no validators.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            required: None,
            identifier: false,
            default: None,
            validators: Vec::new(),
        }
    }
}

/// Contract shared by the six type variants.
///
/// Configuration methods consume and return the builder so that calls chain:
///
/// ```
/// use bazalt_schema::types::{NumberType, SchemaType};
/// use serde_json::json;
///
/// let age = NumberType::new("age")
///     .required(true, None)
///     .min(0.0, None)?
///     .max(90.0, None)?;
/// assert!(age.validate(&json!(42), false).is_none());
/// assert!(age.validate(&json!(91), false).is_some());
/// # Ok::<(), bazalt_schema::SchemaError>(())
/// ```
pub trait SchemaType: Sized {
    fn base(&self) -> &TypeBase;

    fn base_mut(&mut self) -> &mut TypeBase;

    /// Coerce a compatible input. Identity unless the variant overrides it.
    fn cast<'a>(&self, value: &'a Value) -> Cow<'a, Value> {
        Cow::Borrowed(value)
    }

    /// Whether the value is present and well-typed enough to count as set.
    fn is_present(&self, value: &Value) -> bool {
        !value.is_null()
    }

    /// Apply the options this variant understands, in the fixed order
    /// `required`, `id`, variant bounds, `of`, `validators`, `generate`,
    /// `default`.
    fn configure(self, options: &TypeOptions, of: Option<Of<'_>>) -> Result<Self, SchemaError>;

    fn field(&self) -> &str {
        &self.base().field
    }

    /// Tri-state required flag: `None` when never configured.
    fn required_state(&self) -> Option<bool> {
        self.base().required
    }

    fn is_identifier(&self) -> bool {
        self.base().identifier
    }

    fn validators(&self) -> &[ValidatorEntry] {
        &self.base().validators
    }

    /// Toggle the required state.
    ///
    /// Any previous presence validator is removed first, so the chain never
    /// holds more than one. `true` appends a fresh one with the given or
    /// catalog message.
    fn required(mut self, required: bool, message: Option<&str>) -> Self {
        let base = self.base_mut();
        base.validators
            .retain(|entry| !matches!(entry.check, Check::Presence));
        base.required = Some(required);
        if required {
            base.validators.push(ValidatorEntry::new(
                Check::Presence,
                message.unwrap_or(messages::REQUIRED),
                kind::REQUIRED,
            ));
        }
        self
    }

    /// Mark the field as (part of) the schema's identity.
    fn id(mut self, identifier: bool) -> Self {
        self.base_mut().identifier = identifier;
        self
    }

    /// Record a default value.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DefaultValueInvalid`] when a non-null literal
    /// fails the presence check. Generators are not checked.
    fn default_value(mut self, default: impl Into<DefaultValue>) -> Result<Self, SchemaError> {
        let default = default.into();
        if let DefaultValue::Literal(literal) = &default {
            if !literal.is_null() && !self.is_present(literal) {
                return Err(SchemaError::DefaultValueInvalid);
            }
        }
        self.base_mut().default = Some(default);
        Ok(self)
    }

    fn has_default(&self) -> bool {
        self.base().default.is_some()
    }

    /// The default value, generated afresh if a generator is installed.
    fn get_default(&self) -> Option<Value> {
        self.base().default.as_ref().map(DefaultValue::resolve)
    }

    /// Append a validator to the chain.
    fn validator(
        mut self,
        check: impl Into<Check>,
        message: Option<&str>,
        kind: Option<&str>,
    ) -> Self {
        self.base_mut().validators.push(ValidatorEntry::new(
            check.into(),
            message.unwrap_or(messages::DEFAULT),
            kind.unwrap_or(kind::USER_DEFINED),
        ));
        self
    }

    /// Remove every chain entry denoting the same check.
    fn remove_validator(mut self, check: &Check) -> Self {
        self.base_mut()
            .validators
            .retain(|entry| !entry.check.same_as(check));
        self
    }

    /// Validate a value. Returns the error of the first failing validator.
    fn validate(&self, value: &Value, already_cast: bool) -> Option<ValidationError> {
        let value = if already_cast {
            Cow::Borrowed(value)
        } else {
            self.cast(value)
        };
        run_chain(self.base(), &value, &|v| self.is_present(v))
    }
}

fn run_chain(
    base: &TypeBase,
    value: &Value,
    present: &dyn Fn(&Value) -> bool,
) -> Option<ValidationError> {
    if base.required == Some(false) && !present(value) {
        return None;
    }
    base.validators
        .iter()
        .find(|entry| !entry.check.test(value, present))
        .map(|entry| ValidationError::new(&entry.kind, &base.field, value.clone(), &entry.message))
}

/// The `of` target handed to [`SchemaType::configure`], with the message
/// reported when the nested check fails.
#[derive(Debug, Clone, Copy)]
pub struct Of<'a> {
    pub nested: &'a Arc<Nested>,
    pub message: Option<&'a str>,
}

/// Apply `required` and `id` from options.
pub(crate) fn apply_leading<T: SchemaType>(ty: T, options: &TypeOptions) -> T {
    let ty = match &options.required {
        Some(setting) => ty.required(*setting.value(), setting.message()),
        None => ty,
    };
    match options.id {
        Some(identifier) => ty.id(identifier),
        None => ty,
    }
}

/// Apply user validators from options.
pub(crate) fn apply_validators<T: SchemaType>(ty: T, options: &TypeOptions) -> T {
    options.validators.iter().fold(ty, |ty, spec| {
        ty.validator(
            spec.check.clone(),
            spec.message.as_deref(),
            spec.kind.as_deref(),
        )
    })
}

/// Apply the default from options.
pub(crate) fn apply_default<T: SchemaType>(
    ty: T,
    options: &TypeOptions,
) -> Result<T, SchemaError> {
    match &options.default {
        Some(default) => ty.default_value(default.clone()),
        None => Ok(ty),
    }
}

/// A configured, immutable type. This is what a schema stores per field.
#[derive(Debug, Clone)]
pub enum FieldType {
    Mixed(MixedType),
    Number(NumberType),
    String(StringType),
    Object(ObjectType),
    Array(ArrayType),
    Guid(GuidType),
}

macro_rules! each_variant {
    ($value:expr, $ty:ident => $body:expr) => {
        match $value {
            FieldType::Mixed($ty) => $body,
            FieldType::Number($ty) => $body,
            FieldType::String($ty) => $body,
            FieldType::Object($ty) => $body,
            FieldType::Array($ty) => $body,
            FieldType::Guid($ty) => $body,
        }
    };
}

impl FieldType {
    /// Instantiate the variant for `tag` and configure it from options.
    pub fn build(
        field: &str,
        tag: TypeTag,
        options: &TypeOptions,
        of: Option<Of<'_>>,
    ) -> Result<Self, SchemaError> {
        Ok(match tag {
            TypeTag::Mixed => MixedType::new(field).configure(options, of)?.into(),
            TypeTag::Number => NumberType::new(field).configure(options, of)?.into(),
            TypeTag::String => StringType::new(field).configure(options, of)?.into(),
            TypeTag::Object => ObjectType::new(field).configure(options, of)?.into(),
            TypeTag::Array => ArrayType::new(field).configure(options, of)?.into(),
            TypeTag::Guid => GuidType::new(field).configure(options, of)?.into(),
        })
    }

    pub fn tag(&self) -> TypeTag {
        match self {
            FieldType::Mixed(_) => TypeTag::Mixed,
            FieldType::Number(_) => TypeTag::Number,
            FieldType::String(_) => TypeTag::String,
            FieldType::Object(_) => TypeTag::Object,
            FieldType::Array(_) => TypeTag::Array,
            FieldType::Guid(_) => TypeTag::Guid,
        }
    }

    pub fn field(&self) -> &str {
        each_variant!(self, ty => ty.field())
    }

    pub fn cast<'a>(&self, value: &'a Value) -> Cow<'a, Value> {
        each_variant!(self, ty => ty.cast(value))
    }

    pub fn is_present(&self, value: &Value) -> bool {
        each_variant!(self, ty => ty.is_present(value))
    }

    pub fn required_state(&self) -> Option<bool> {
        each_variant!(self, ty => ty.required_state())
    }

    pub fn is_identifier(&self) -> bool {
        each_variant!(self, ty => ty.is_identifier())
    }

    pub fn validators(&self) -> &[ValidatorEntry] {
        each_variant!(self, ty => ty.validators())
    }

    pub fn has_default(&self) -> bool {
        each_variant!(self, ty => ty.has_default())
    }

    pub fn get_default(&self) -> Option<Value> {
        each_variant!(self, ty => ty.get_default())
    }

    pub fn validate(&self, value: &Value, already_cast: bool) -> Option<ValidationError> {
        each_variant!(self, ty => ty.validate(value, already_cast))
    }
}

macro_rules! field_type_from {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldType {
                fn from(ty: $ty) -> Self {
                    FieldType::$variant(ty)
                }
            }
        )*
    };
}

field_type_from! {
    Mixed => MixedType,
    Number => NumberType,
    String => StringType,
    Object => ObjectType,
    Array => ArrayType,
    Guid => GuidType,
}
