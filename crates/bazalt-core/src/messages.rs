//! # Message Catalog
//!
//! Static mapping from message key to template string. Templates carry
//! `{name}`-style placeholders that are substituted when a
//! [`ValidationError`](crate::ValidationError) is built, or at validator
//! registration time for bound placeholders (`{min}`, `{max}`).
//!
//! The catalog is immutable. Callers that want different wording pass their
//! own message when configuring a type; the catalog only supplies defaults.

/// A registered validator could not be interpreted.
pub const INVALID_VALIDATOR: &str = "The given validator is invalid.";
/// Fallback message for a failed validator without its own message.
pub const DEFAULT: &str = "The field `{field}` could not be validate value `{value}`.";
/// Required field is missing or malformed.
pub const REQUIRED: &str = "The field `{field}` is required.";
/// Literal default does not satisfy the type's presence check.
pub const DEFAULT_VALUE_INVALID: &str = "The default value is invalid.";
/// Minimal bound is not a finite number.
pub const MIN_INVALID_PARAMETER: &str = "The value for minimal validator is invalid.";
/// Value below the minimal bound.
pub const MIN: &str = "The minimal value ({min}) of `{field}` has been exceed.";
/// String shorter than the minimal length.
pub const MIN_LENGTH: &str = "The minimal length ({min}) of `{field}` has been exceed.";
/// Maximal bound is not a finite number.
pub const MAX_INVALID_PARAMETER: &str = "The value for maximal validator is invalid.";
/// Value above the maximal bound.
pub const MAX: &str = "The maximal value ({max}) of `{field}` has been exceed.";
/// String longer than the maximal length.
pub const MAX_LENGTH: &str = "The maximal length ({max}) of `{field}` has been exceed.";
/// Pattern source is neither a string nor a compiled pattern.
pub const REGEX_INVALID_PARAMETER: &str = "The value for regex validator is invalid.";
/// Value does not match the configured pattern.
pub const REGEX: &str = "The value does not match with the pattern.";
/// Nested schema rejected the value.
pub const SCHEMA: &str = "The value could not be validated with the given schema.";
/// Generation toggle is not a boolean.
pub const GENERATED_INVALID_PARAMETER: &str = "The value to generate is invalid.";

/// Identifier of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// `invalid_validator`
    InvalidValidator,
    /// `default`
    Default,
    /// `required`
    Required,
    /// `default_value_invalid`
    DefaultValueInvalid,
    /// `min_invalid_parameter`
    MinInvalidParameter,
    /// `min`
    Min,
    /// `min_length`
    MinLength,
    /// `max_invalid_parameter`
    MaxInvalidParameter,
    /// `max`
    Max,
    /// `max_length`
    MaxLength,
    /// `regex_invalid_parameter`
    RegexInvalidParameter,
    /// `regex`
    Regex,
    /// `schema`
    Schema,
    /// `generated_invalid_parameter`
    GeneratedInvalidParameter,
}

impl MessageKey {
    /// Every catalog key, in catalog order.
    pub const ALL: [MessageKey; 14] = [
        MessageKey::InvalidValidator,
        MessageKey::Default,
        MessageKey::Required,
        MessageKey::DefaultValueInvalid,
        MessageKey::MinInvalidParameter,
        MessageKey::Min,
        MessageKey::MinLength,
        MessageKey::MaxInvalidParameter,
        MessageKey::Max,
        MessageKey::MaxLength,
        MessageKey::RegexInvalidParameter,
        MessageKey::Regex,
        MessageKey::Schema,
        MessageKey::GeneratedInvalidParameter,
    ];

    /// The snake_case key name used by the catalog.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKey::InvalidValidator => "invalid_validator",
            MessageKey::Default => "default",
            MessageKey::Required => "required",
            MessageKey::DefaultValueInvalid => "default_value_invalid",
            MessageKey::MinInvalidParameter => "min_invalid_parameter",
            MessageKey::Min => "min",
            MessageKey::MinLength => "min_length",
            MessageKey::MaxInvalidParameter => "max_invalid_parameter",
            MessageKey::Max => "max",
            MessageKey::MaxLength => "max_length",
            MessageKey::RegexInvalidParameter => "regex_invalid_parameter",
            MessageKey::Regex => "regex",
            MessageKey::Schema => "schema",
            MessageKey::GeneratedInvalidParameter => "generated_invalid_parameter",
        }
    }

    /// The template registered for this key.
    pub fn template(self) -> &'static str {
        match self {
            MessageKey::InvalidValidator => INVALID_VALIDATOR,
            MessageKey::Default => DEFAULT,
            MessageKey::Required => REQUIRED,
            MessageKey::DefaultValueInvalid => DEFAULT_VALUE_INVALID,
            MessageKey::MinInvalidParameter => MIN_INVALID_PARAMETER,
            MessageKey::Min => MIN,
            MessageKey::MinLength => MIN_LENGTH,
            MessageKey::MaxInvalidParameter => MAX_INVALID_PARAMETER,
            MessageKey::Max => MAX,
            MessageKey::MaxLength => MAX_LENGTH,
            MessageKey::RegexInvalidParameter => REGEX_INVALID_PARAMETER,
            MessageKey::Regex => REGEX,
            MessageKey::Schema => SCHEMA,
            MessageKey::GeneratedInvalidParameter => GENERATED_INVALID_PARAMETER,
        }
    }
}

impl std::fmt::Display for MessageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look up a template by its snake_case key name.
pub fn lookup(key: &str) -> Option<&'static str> {
    MessageKey::ALL
        .iter()
        .find(|k| k.as_str() == key)
        .map(|k| k.template())
}
