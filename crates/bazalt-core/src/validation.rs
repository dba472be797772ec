//! # Validation Errors
//!
//! A [`ValidationError`] describes one failed validator: the validator kind,
//! the field it ran for, the (cast) value it rejected, and the message with
//! its placeholders substituted.
//!
//! ## Placeholder substitution
//!
//! [`format_message`] replaces every `{name}` token whose name matches one
//! of the error's properties (`kind`, `field`, `value`), compared
//! case-insensitively. Unknown placeholders are left verbatim so that a
//! template can be partially filled at registration time and completed when
//! the error is produced.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::coerce::to_display_string;
use crate::messages;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern compiles"));

/// Substitute `{name}` placeholders from a list of named properties.
///
/// Names are matched case-insensitively; placeholders without a matching
/// property are kept as they are.
pub fn format_message(template: &str, properties: &[(&str, String)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let name = &caps[1];
            properties
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// A single failed validator.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{message}")]
pub struct ValidationError {
    /// Short label of the validator that failed (`"required"`, `"minimal value"`, ...).
    pub kind: String,
    /// Field the validator ran for.
    pub field: String,
    /// The value as seen by the validator (after casting).
    pub value: Value,
    /// Fully substituted message.
    pub message: String,
}

impl ValidationError {
    /// Build an error, substituting `{kind}`, `{field}` and `{value}` in the
    /// template. An empty template falls back to the catalog default.
    pub fn new(
        kind: impl Into<String>,
        field: impl Into<String>,
        value: Value,
        template: &str,
    ) -> Self {
        let kind = kind.into();
        let field = field.into();
        let template = if template.is_empty() {
            messages::DEFAULT
        } else {
            template
        };
        let message = format_message(
            template,
            &[
                ("kind", kind.clone()),
                ("field", field.clone()),
                ("value", to_display_string(&value)),
            ],
        );
        Self {
            kind,
            field,
            value,
            message,
        }
    }
}
