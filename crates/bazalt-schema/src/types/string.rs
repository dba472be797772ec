//! String type with length bounds and a pattern.

use std::borrow::Cow;

use bazalt_core::coerce::{format_number, to_display_string};
use bazalt_core::{format_message, messages, SchemaError};
use regex::Regex;
use serde_json::Value;

use super::{
    apply_default, apply_leading, apply_validators, kind, Check, Of, SchemaType, TypeBase,
    ValidatorEntry,
};
use crate::options::TypeOptions;

/// Anything usable as the pattern of [`StringType::regex`].
pub trait IntoPattern {
    /// # Errors
    ///
    /// [`SchemaError::RegexInvalidParameter`] when the source does not compile.
    fn into_pattern(self) -> Result<Regex, SchemaError>;
}

impl IntoPattern for Regex {
    fn into_pattern(self) -> Result<Regex, SchemaError> {
        Ok(self)
    }
}

impl IntoPattern for &str {
    fn into_pattern(self) -> Result<Regex, SchemaError> {
        Regex::new(self).map_err(|e| SchemaError::RegexInvalidParameter {
            reason: e.to_string(),
        })
    }
}

impl IntoPattern for String {
    fn into_pattern(self) -> Result<Regex, SchemaError> {
        self.as_str().into_pattern()
    }
}

impl IntoPattern for &String {
    fn into_pattern(self) -> Result<Regex, SchemaError> {
        self.as_str().into_pattern()
    }
}

/// Text field. Present when it is a non-empty string.
#[derive(Debug, Clone)]
pub struct StringType {
    base: TypeBase,
    min_length: Option<f64>,
    max_length: Option<f64>,
    pattern: Option<Regex>,
}

impl StringType {
    /// Unconstrained string field, required state unset.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            base: TypeBase::new(field),
            min_length: None,
            max_length: None,
            pattern: None,
        }
    }

    /// Require at least `min` UTF-16 code units.
    ///
    /// # Errors
    ///
    /// [`SchemaError::MinInvalidParameter`] when `min` is not finite.
    pub fn min_length(mut self, min: f64, message: Option<&str>) -> Result<Self, SchemaError> {
        if !min.is_finite() {
            return Err(SchemaError::MinInvalidParameter);
        }
        let template = message.unwrap_or(messages::MIN_LENGTH);
        self.push(
            Check::MinLength(min),
            format_message(template, &[("min", format_number(min))]),
            kind::MINIMAL_LENGTH,
        );
        self.min_length = Some(min);
        Ok(self)
    }

    /// Allow at most `max` UTF-16 code units.
    ///
    /// # Errors
    ///
    /// [`SchemaError::MaxInvalidParameter`] when `max` is not finite.
    pub fn max_length(mut self, max: f64, message: Option<&str>) -> Result<Self, SchemaError> {
        if !max.is_finite() {
            return Err(SchemaError::MaxInvalidParameter);
        }
        let template = message.unwrap_or(messages::MAX_LENGTH);
        self.push(
            Check::MaxLength(max),
            format_message(template, &[("max", format_number(max))]),
            kind::MAXIMAL_LENGTH,
        );
        self.max_length = Some(max);
        Ok(self)
    }

    /// Require the value to match a pattern.
    ///
    /// # Errors
    ///
    /// [`SchemaError::RegexInvalidParameter`] when a textual pattern does not
    /// compile.
    pub fn regex(
        mut self,
        pattern: impl IntoPattern,
        message: Option<&str>,
    ) -> Result<Self, SchemaError> {
        let pattern = pattern.into_pattern()?;
        self.push(
            Check::Pattern(pattern.clone()),
            message.unwrap_or(messages::REGEX).to_string(),
            kind::REGULAR_EXPRESSION,
        );
        self.pattern = Some(pattern);
        Ok(self)
    }

    pub fn min_length_value(&self) -> Option<f64> {
        self.min_length
    }

    pub fn max_length_value(&self) -> Option<f64> {
        self.max_length
    }

    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    fn push(&mut self, check: Check, message: String, kind: &str) {
        self.base
            .validators
            .push(ValidatorEntry::new(check, message, kind));
    }
}

impl SchemaType for StringType {
    fn base(&self) -> &TypeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TypeBase {
        &mut self.base
    }

    fn cast<'a>(&self, value: &'a Value) -> Cow<'a, Value> {
        match value {
            Value::Null | Value::String(_) => Cow::Borrowed(value),
            other => Cow::Owned(Value::String(to_display_string(other))),
        }
    }

    fn is_present(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|s| !s.is_empty())
    }

    fn configure(self, options: &TypeOptions, _of: Option<Of<'_>>) -> Result<Self, SchemaError> {
        let mut ty = apply_leading(self, options);
        if let Some(min) = &options.min_length {
            ty = ty.min_length(*min.value(), min.message())?;
        }
        if let Some(max) = &options.max_length {
            ty = ty.max_length(*max.value(), max.message())?;
        }
        if let Some(regex) = &options.regex {
            ty = ty.regex(regex.value(), regex.message())?;
        }
        apply_default(apply_validators(ty, options), options)
    }
}
