//! # Type Options
//!
//! The explicit configuration record applied to a type when a schema builds
//! a field. Each recognized key maps to exactly one configuration operation
//! on the variant; keys a variant does not understand are ignored by it.
//!
//! ## Wire form
//!
//! Options live next to `type` (and `of`) in a definition object:
//!
//! ```json
//! { "type": "NUMBER_TYPE", "required": true, "min": 0, "max": [90, "too old"] }
//! ```
//!
//! Keys that take a custom message accept either the bare value or a
//! `[value, message]` pair. See [`Setting`].
//!
//! Behavior that has no textual form (closure validators and closure
//! defaults) is dropped when options are encoded, with a warning.

use bazalt_core::coerce::{is_numeric, number_value, to_number};
use bazalt_core::SchemaError;
use serde_json::{Map, Value};

use crate::types::{Check, DefaultValue};

/// An option value with an optional custom message.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting<T> {
    Plain(T),
    WithMessage(T, String),
}

impl<T> Setting<T> {
    /// A value paired with the message reported when its validator fails.
    pub fn with_message(value: T, message: impl Into<String>) -> Self {
        Setting::WithMessage(value, message.into())
    }

    pub fn value(&self) -> &T {
        match self {
            Setting::Plain(value) | Setting::WithMessage(value, _) => value,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Setting::Plain(_) => None,
            Setting::WithMessage(_, message) => Some(message),
        }
    }

    fn encode(&self, encode: impl Fn(&T) -> Value) -> Value {
        match self {
            Setting::Plain(value) => encode(value),
            Setting::WithMessage(value, message) => {
                Value::Array(vec![encode(value), Value::String(message.clone())])
            }
        }
    }
}

impl<T> From<T> for Setting<T> {
    fn from(value: T) -> Self {
        Setting::Plain(value)
    }
}

/// A user validator declared inside a definition.
#[derive(Debug, Clone)]
pub struct ValidatorSpec {
    pub check: Check,
    pub message: Option<String>,
    pub kind: Option<String>,
}

impl ValidatorSpec {
    /// A validator with the catalog message and the `user defined` kind.
    pub fn new(check: impl Into<Check>) -> Self {
        Self {
            check: check.into(),
            message: None,
            kind: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// Recognized configuration of a field type.
#[derive(Debug, Clone, Default)]
pub struct TypeOptions {
    pub required: Option<Setting<bool>>,
    pub id: Option<bool>,
    pub default: Option<DefaultValue>,
    pub min: Option<Setting<f64>>,
    pub max: Option<Setting<f64>>,
    pub min_length: Option<Setting<f64>>,
    pub max_length: Option<Setting<f64>>,
    pub regex: Option<Setting<String>>,
    pub generate: Option<bool>,
    pub validators: Vec<ValidatorSpec>,
}

impl TypeOptions {
    /// Read options from a definition object. `type` and `of` are handled
    /// by the caller and unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// The configuration error of the operation the malformed key maps to:
    /// [`SchemaError::MinInvalidParameter`] for `min`/`minLength`,
    /// [`SchemaError::MaxInvalidParameter`] for `max`/`maxLength`,
    /// [`SchemaError::RegexInvalidParameter`] for `regex`,
    /// [`SchemaError::GeneratedInvalidParameter`] for `generate` and
    /// [`SchemaError::InvalidValidator`] for `validators`.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, SchemaError> {
        let mut options = TypeOptions::default();

        if let Some(raw) = map.get("required") {
            let (flag, message) = spread(raw);
            let required = !matches!(flag, Value::Bool(false));
            options.required = Some(setting(required, message));
        }
        if let Some(raw) = map.get("id") {
            options.id = Some(matches!(raw, Value::Bool(true)));
        }
        if let Some(raw) = map.get("default") {
            options.default = Some(DefaultValue::Literal(raw.clone()));
        }
        options.min = numeric(map, "min", SchemaError::MinInvalidParameter)?;
        options.max = numeric(map, "max", SchemaError::MaxInvalidParameter)?;
        options.min_length = numeric(map, "minLength", SchemaError::MinInvalidParameter)?;
        options.max_length = numeric(map, "maxLength", SchemaError::MaxInvalidParameter)?;
        if let Some(raw) = map.get("regex") {
            let (source, message) = spread(raw);
            let source = source
                .as_str()
                .ok_or_else(|| SchemaError::RegexInvalidParameter {
                    reason: "the pattern must be a string".to_string(),
                })?;
            options.regex = Some(setting(source.to_string(), message));
        }
        if let Some(raw) = map.get("generate") {
            options.generate = Some(
                raw.as_bool()
                    .ok_or(SchemaError::GeneratedInvalidParameter)?,
            );
        }
        if let Some(raw) = map.get("validators") {
            options.validators = validators(raw)?;
        }
        Ok(options)
    }

    /// Encode the options in key order. `field` only labels warnings.
    pub fn to_map(&self, field: &str) -> Map<String, Value> {
        let mut map = Map::new();
        if let Some(required) = &self.required {
            map.insert("required".into(), required.encode(|b| Value::Bool(*b)));
        }
        if let Some(id) = self.id {
            map.insert("id".into(), Value::Bool(id));
        }
        match &self.default {
            Some(DefaultValue::Literal(value)) => {
                map.insert("default".into(), value.clone());
            }
            Some(DefaultValue::Guid) if self.generate.is_none() => {
                map.insert("generate".into(), Value::Bool(true));
            }
            Some(DefaultValue::Generator(_)) => {
                tracing::warn!(field, "default generator cannot be serialized; dropped");
            }
            _ => {}
        }
        for (key, setting) in [
            ("min", &self.min),
            ("max", &self.max),
            ("minLength", &self.min_length),
            ("maxLength", &self.max_length),
        ] {
            if let Some(setting) = setting {
                map.insert(key.into(), setting.encode(|n| number_value(*n).unwrap_or(Value::Null)));
            }
        }
        if let Some(regex) = &self.regex {
            map.insert("regex".into(), regex.encode(|s| Value::String(s.clone())));
        }
        if let Some(generate) = self.generate {
            map.insert("generate".into(), Value::Bool(generate));
        }
        let validators: Vec<Value> = self
            .validators
            .iter()
            .filter_map(|spec| encode_validator(field, spec))
            .collect();
        if !validators.is_empty() {
            map.insert("validators".into(), Value::Array(validators));
        }
        map
    }
}

fn setting<T>(value: T, message: Option<String>) -> Setting<T> {
    match message {
        Some(message) => Setting::WithMessage(value, message),
        None => Setting::Plain(value),
    }
}

/// Split `[value, message]` into its parts; any other value has no message.
pub(crate) fn spread(raw: &Value) -> (&Value, Option<String>) {
    match raw.as_array().map(Vec::as_slice) {
        Some([value, rest @ ..]) => (
            value,
            rest.first().and_then(Value::as_str).map(str::to_string),
        ),
        Some([]) => (&Value::Null, None),
        None => (raw, None),
    }
}

fn numeric(
    map: &Map<String, Value>,
    key: &str,
    invalid: SchemaError,
) -> Result<Option<Setting<f64>>, SchemaError> {
    let Some(raw) = map.get(key) else {
        return Ok(None);
    };
    let (value, message) = spread(raw);
    if !is_numeric(value) {
        return Err(invalid);
    }
    Ok(Some(setting(to_number(value), message)))
}

fn validators(raw: &Value) -> Result<Vec<ValidatorSpec>, SchemaError> {
    let entries = raw.as_array().ok_or(SchemaError::InvalidValidator)?;
    entries
        .iter()
        .map(|entry| {
            let pattern = entry
                .get("pattern")
                .and_then(Value::as_str)
                .ok_or(SchemaError::InvalidValidator)?;
            Ok(ValidatorSpec {
                check: Check::pattern(pattern)?,
                message: entry.get("message").and_then(Value::as_str).map(str::to_string),
                kind: entry.get("kind").and_then(Value::as_str).map(str::to_string),
            })
        })
        .collect()
}

fn encode_validator(field: &str, spec: &ValidatorSpec) -> Option<Value> {
    let Check::Pattern(pattern) = &spec.check else {
        tracing::warn!(field, "only pattern validators can be serialized; dropped");
        return None;
    };
    let mut map = Map::new();
    map.insert("pattern".into(), Value::String(pattern.as_str().to_string()));
    if let Some(message) = &spec.message {
        map.insert("message".into(), Value::String(message.clone()));
    }
    if let Some(kind) = &spec.kind {
        map.insert("kind".into(), Value::String(kind.clone()));
    }
    Some(Value::Object(map))
}
