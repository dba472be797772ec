//! # Error Types
//!
//! Two tiers of failure exist in bazalt:
//!
//! - **Configuration errors** ([`SchemaError`]) are raised while a schema or
//!   type is being built. They abort the operation that triggered them and
//!   are never retried.
//! - **Validation errors** ([`ValidationError`](crate::ValidationError)) are
//!   plain data returned by `validate`. Bad input never produces a
//!   `SchemaError`.
//!
//! Variants backed by a catalog entry render exactly that entry's template.

use thiserror::Error;

use crate::messages;

/// Configuration error raised while building a schema or configuring a type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Field names must be non-empty.
    #[error("The name of the field must be a non-empty String (got {name:?}).")]
    InvalidFieldName {
        /// The rejected name.
        name: String,
    },

    /// The definition of a field is neither a type, a list, a nested shape
    /// nor an explicit `{type, ...}` record with a known type.
    #[error("The definition of \"{field}\" is invalid.")]
    InvalidDefinition {
        /// Name of the field whose definition was rejected.
        field: String,
    },

    /// A validator registration could not be turned into a check.
    #[error("{}", messages::INVALID_VALIDATOR)]
    InvalidValidator,

    /// A literal default failed the type's presence check.
    #[error("{}", messages::DEFAULT_VALUE_INVALID)]
    DefaultValueInvalid,

    /// The minimal bound is not a finite number.
    #[error("{}", messages::MIN_INVALID_PARAMETER)]
    MinInvalidParameter,

    /// The maximal bound is not a finite number.
    #[error("{}", messages::MAX_INVALID_PARAMETER)]
    MaxInvalidParameter,

    /// The pattern source is not a string or does not compile.
    #[error("{} ({reason})", messages::REGEX_INVALID_PARAMETER)]
    RegexInvalidParameter {
        /// Why the pattern was rejected.
        reason: String,
    },

    /// The generation toggle is not a boolean.
    #[error("{}", messages::GENERATED_INVALID_PARAMETER)]
    GeneratedInvalidParameter,

    /// A dotted path does not resolve to a field.
    #[error("The given path does not exist in the schema: {path}")]
    PathNotFound {
        /// The path that failed to resolve.
        path: String,
    },

    /// A serialized schema could not be decoded.
    #[error("schema decode error: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_backed_variants_render_templates() {
        assert_eq!(
            SchemaError::InvalidValidator.to_string(),
            messages::INVALID_VALIDATOR
        );
        assert_eq!(
            SchemaError::DefaultValueInvalid.to_string(),
            messages::DEFAULT_VALUE_INVALID
        );
        assert_eq!(
            SchemaError::MinInvalidParameter.to_string(),
            messages::MIN_INVALID_PARAMETER
        );
        assert_eq!(
            SchemaError::MaxInvalidParameter.to_string(),
            messages::MAX_INVALID_PARAMETER
        );
        assert_eq!(
            SchemaError::GeneratedInvalidParameter.to_string(),
            messages::GENERATED_INVALID_PARAMETER
        );
    }

    #[test]
    fn definition_error_names_the_field() {
        let err = SchemaError::InvalidDefinition {
            field: "age".to_string(),
        };
        assert_eq!(err.to_string(), "The definition of \"age\" is invalid.");
    }

    #[test]
    fn json_errors_become_decode_errors() {
        let err: SchemaError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, SchemaError::Decode(_)));
    }
}
