//! # Validator Checks
//!
//! A type's validator chain is a list of [`ValidatorEntry`] values, each
//! pairing a [`Check`] with a message template and a kind label. Checks are
//! a closed set: built-in bounds and patterns, nested schema delegation, the
//! variant's own presence check, and arbitrary user predicates.

use std::fmt;
use std::sync::Arc;

use bazalt_core::coerce::{string_length, to_display_string, to_number};
use bazalt_core::SchemaError;
use regex::Regex;
use serde_json::Value;

use crate::schema::Nested;

/// Kind labels carried into [`ValidationError`](bazalt_core::ValidationError)s.
pub mod kind {
    pub const REQUIRED: &str = "required";
    pub const MINIMAL_VALUE: &str = "minimal value";
    pub const MAXIMAL_VALUE: &str = "maximal value";
    pub const MINIMAL_LENGTH: &str = "minimal length";
    pub const MAXIMAL_LENGTH: &str = "maximal length";
    pub const REGULAR_EXPRESSION: &str = "regular expression";
    pub const SCHEMA_VALIDATOR: &str = "schema validator";
    pub const USER_DEFINED: &str = "user defined";
}

/// A user-supplied check over a (cast) value.
///
/// Identity is the allocation: two predicates are the same only if one was
/// cloned from the other.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>);

impl Predicate {
    /// Wrap a closure. Each call creates a distinct predicate.
    pub fn new(check: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(check))
    }

    pub fn test(&self, value: &Value) -> bool {
        (self.0)(value)
    }

    pub fn ptr_eq(&self, other: &Predicate) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// One check of a validator chain.
#[derive(Debug, Clone)]
pub enum Check {
    /// The owning variant's presence check.
    Presence,
    /// Inclusive lower bound on the numeric value. `null` reads as `0`.
    Minimum(f64),
    /// Inclusive upper bound on the numeric value. `null` reads as `0`.
    Maximum(f64),
    /// Inclusive lower bound on the string length. `null` has length `0`.
    MinLength(f64),
    /// Inclusive upper bound on the string length. `null` has length `0`.
    MaxLength(f64),
    /// Pattern matched against the value's string form.
    Pattern(Regex),
    /// The value must satisfy a nested schema. `null` has nothing to check.
    Record(Arc<Nested>),
    /// Every element of the sequence must satisfy a nested schema. `null`
    /// has no elements.
    Elements(Arc<Nested>),
    /// Arbitrary user predicate.
    Predicate(Predicate),
}

impl Check {
    /// Wrap a closure as a check.
    pub fn predicate(check: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Check::Predicate(Predicate::new(check))
    }

    /// Compile a pattern source into a check.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidValidator`] if the source does not compile.
    pub fn pattern(source: &str) -> Result<Self, SchemaError> {
        Regex::new(source)
            .map(Check::Pattern)
            .map_err(|_| SchemaError::InvalidValidator)
    }

    /// Run the check. `present` is the owning variant's presence check.
    pub fn test(&self, value: &Value, present: &dyn Fn(&Value) -> bool) -> bool {
        match self {
            Check::Presence => present(value),
            Check::Minimum(min) => to_number(value) >= *min,
            Check::Maximum(max) => to_number(value) <= *max,
            Check::MinLength(min) => length(value) >= *min,
            Check::MaxLength(max) => length(value) <= *max,
            Check::Pattern(pattern) => match value {
                Value::String(s) => pattern.is_match(s),
                other => pattern.is_match(&to_display_string(other)),
            },
            Check::Record(_) | Check::Elements(_) if value.is_null() => true,
            Check::Record(nested) => nested.accepts(value),
            Check::Elements(nested) => value
                .as_array()
                .is_some_and(|items| items.iter().all(|item| nested.accepts(item))),
            Check::Predicate(predicate) => predicate.test(value),
        }
    }

    /// Whether two checks denote the same validator.
    ///
    /// Built-in checks compare by configuration, nested and user checks by
    /// identity.
    pub fn same_as(&self, other: &Check) -> bool {
        match (self, other) {
            (Check::Presence, Check::Presence) => true,
            (Check::Minimum(a), Check::Minimum(b))
            | (Check::Maximum(a), Check::Maximum(b))
            | (Check::MinLength(a), Check::MinLength(b))
            | (Check::MaxLength(a), Check::MaxLength(b)) => a == b,
            (Check::Pattern(a), Check::Pattern(b)) => a.as_str() == b.as_str(),
            (Check::Record(a), Check::Record(b)) | (Check::Elements(a), Check::Elements(b)) => {
                Arc::ptr_eq(a, b)
            }
            (Check::Predicate(a), Check::Predicate(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// Length of the value's string form, `0` for `null`.
fn length(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::String(s) => string_length(s) as f64,
        other => string_length(&to_display_string(other)) as f64,
    }
}

impl From<Regex> for Check {
    fn from(pattern: Regex) -> Self {
        Check::Pattern(pattern)
    }
}

impl From<Predicate> for Check {
    fn from(predicate: Predicate) -> Self {
        Check::Predicate(predicate)
    }
}

/// A registered validator: check, message template, kind label.
#[derive(Debug, Clone)]
pub struct ValidatorEntry {
    pub(crate) check: Check,
    pub(crate) message: String,
    pub(crate) kind: String,
}

impl ValidatorEntry {
    pub(crate) fn new(check: Check, message: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            check,
            message: message.into(),
            kind: kind.into(),
        }
    }

    pub fn check(&self) -> &Check {
        &self.check
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}
