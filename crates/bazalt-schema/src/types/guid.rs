//! GUID type: version 1-5 UUID strings, optionally self-generating.

use std::sync::LazyLock;

use bazalt_core::SchemaError;
use regex::Regex;
use serde_json::Value;
use uuid::Uuid;

use super::{
    apply_default, apply_leading, apply_validators, DefaultValue, Of, SchemaType, TypeBase,
};
use crate::options::TypeOptions;

/// Canonical textual GUID, versions 1 to 5, any letter case.
pub static GUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$",
    )
    .expect("GUID pattern compiles")
});

/// A fresh random (version 4) GUID in canonical lowercase form.
pub fn generate_guid() -> String {
    Uuid::new_v4().to_string()
}

/// GUID field. Present when the value is a string matching [`GUID_PATTERN`].
#[derive(Debug, Clone)]
pub struct GuidType {
    base: TypeBase,
}

impl GuidType {
    /// GUID field without a generator, required state unset.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            base: TypeBase::new(field),
        }
    }

    /// Install (`true`) or uninstall (`false`) the GUID generator as the
    /// default. Uninstalling leaves any other default in place.
    pub fn generate(mut self, generate: bool) -> Self {
        if generate {
            self.base.default = Some(DefaultValue::Guid);
        } else if matches!(self.base.default, Some(DefaultValue::Guid)) {
            self.base.default = None;
        }
        self
    }

    /// Whether the GUID generator is the current default.
    pub fn is_generated(&self) -> bool {
        matches!(self.base.default, Some(DefaultValue::Guid))
    }
}

impl SchemaType for GuidType {
    fn base(&self) -> &TypeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TypeBase {
        &mut self.base
    }

    fn is_present(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|s| GUID_PATTERN.is_match(s))
    }

    fn configure(self, options: &TypeOptions, _of: Option<Of<'_>>) -> Result<Self, SchemaError> {
        let mut ty = apply_validators(apply_leading(self, options), options);
        if let Some(generate) = options.generate {
            ty = ty.generate(generate);
        }
        apply_default(ty, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::kind;
    use serde_json::json;

    const SAMPLE: &str = "110ec58a-a0f2-4ac4-8393-c866d813b8d1";

    #[test]
    fn required_guid() {
        let ty = GuidType::new("test").required(true, None);
        assert!(ty.validate(&json!(SAMPLE), false).is_none());
        assert!(ty.validate(&json!(SAMPLE.to_uppercase()), false).is_none());
        assert_eq!(ty.validate(&json!("foo"), false).unwrap().kind, kind::REQUIRED);
        assert_eq!(ty.validate(&json!(null), false).unwrap().kind, kind::REQUIRED);
        assert!(ty
            .validate(&json!("110ec58a-a0f2-6ac4-8393-c866d813b8d1"), false)
            .is_some());
    }

    #[test]
    fn unrequired_malformed_guid_is_accepted() {
        assert!(GuidType::new("test").validate(&json!("foo"), false).is_none());
    }

    #[test]
    fn generate_toggles_the_default() {
        let ty = GuidType::new("id").generate(true);
        assert!(ty.is_generated());
        let first = ty.get_default().unwrap();
        let second = ty.get_default().unwrap();
        assert!(ty.is_present(&first));
        assert_ne!(first, second);

        let ty = ty.generate(false);
        assert!(!ty.has_default());
    }

    #[test]
    fn disabling_generation_keeps_a_literal_default() {
        let ty = GuidType::new("id")
            .default_value(json!(SAMPLE))
            .unwrap()
            .generate(false);
        assert_eq!(ty.get_default(), Some(json!(SAMPLE)));
    }

    #[test]
    fn literal_default_must_be_a_guid() {
        assert_eq!(
            GuidType::new("id").default_value(json!("foo")).unwrap_err(),
            SchemaError::DefaultValueInvalid
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        /// Every generated GUID matches the GUID pattern.
        #[test]
        fn generated_guids_match_the_pattern(_seed in any::<u64>()) {
            prop_assert!(GUID_PATTERN.is_match(&generate_guid()));
        }
    }

    proptest! {
        /// Hex strings with the wrong version digit are rejected.
        #[test]
        fn version_digit_is_checked(version in "[06-9a-f]") {
            let candidate = format!("110ec58a-a0f2-{version}ac4-8393-c866d813b8d1");
            prop_assert!(!GUID_PATTERN.is_match(&candidate));
        }
    }
}
