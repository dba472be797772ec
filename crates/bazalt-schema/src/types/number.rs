//! Number type with inclusive bounds.

use std::borrow::Cow;

use bazalt_core::coerce::{format_number, is_numeric, number_value, to_number};
use bazalt_core::{format_message, messages, SchemaError};
use serde_json::Value;

use super::{
    apply_default, apply_leading, apply_validators, kind, Check, Of, SchemaType, TypeBase,
    ValidatorEntry,
};
use crate::options::TypeOptions;

/// Numeric field. Strings holding numbers are cast to numbers.
#[derive(Debug, Clone)]
pub struct NumberType {
    base: TypeBase,
    min: Option<f64>,
    max: Option<f64>,
}

impl NumberType {
    /// Unbounded number field, required state unset.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            base: TypeBase::new(field),
            min: None,
            max: None,
        }
    }

    /// Add an inclusive lower bound.
    ///
    /// # Errors
    ///
    /// [`SchemaError::MinInvalidParameter`] when `min` is not finite.
    pub fn min(self, min: f64, message: Option<&str>) -> Result<Self, SchemaError> {
        if !min.is_finite() {
            return Err(SchemaError::MinInvalidParameter);
        }
        let template = message.unwrap_or(messages::MIN);
        let mut ty = self.bound(Check::Minimum(min), "min", min, template, kind::MINIMAL_VALUE);
        ty.min = Some(min);
        Ok(ty)
    }

    /// Add an inclusive upper bound.
    ///
    /// # Errors
    ///
    /// [`SchemaError::MaxInvalidParameter`] when `max` is not finite.
    pub fn max(self, max: f64, message: Option<&str>) -> Result<Self, SchemaError> {
        if !max.is_finite() {
            return Err(SchemaError::MaxInvalidParameter);
        }
        let template = message.unwrap_or(messages::MAX);
        let mut ty = self.bound(Check::Maximum(max), "max", max, template, kind::MAXIMAL_VALUE);
        ty.max = Some(max);
        Ok(ty)
    }

    pub fn min_value(&self) -> Option<f64> {
        self.min
    }

    pub fn max_value(&self) -> Option<f64> {
        self.max
    }

    fn bound(mut self, check: Check, name: &str, bound: f64, template: &str, kind: &str) -> Self {
        let message = format_message(template, &[(name, format_number(bound))]);
        self.base
            .validators
            .push(ValidatorEntry::new(check, message, kind));
        self
    }
}

impl SchemaType for NumberType {
    fn base(&self) -> &TypeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TypeBase {
        &mut self.base
    }

    /// `null` and numbers pass through. Anything converting to a finite
    /// number becomes that number; the rest is left alone and fails the
    /// presence check.
    fn cast<'a>(&self, value: &'a Value) -> Cow<'a, Value> {
        match value {
            Value::Null | Value::Number(_) => Cow::Borrowed(value),
            other => match number_value(to_number(other)) {
                Some(number) => Cow::Owned(number),
                None => Cow::Borrowed(value),
            },
        }
    }

    fn is_present(&self, value: &Value) -> bool {
        is_numeric(value)
    }

    fn configure(self, options: &TypeOptions, _of: Option<Of<'_>>) -> Result<Self, SchemaError> {
        let mut ty = apply_leading(self, options);
        if let Some(min) = &options.min {
            ty = ty.min(*min.value(), min.message())?;
        }
        if let Some(max) = &options.max {
            ty = ty.max(*max.value(), max.message())?;
        }
        apply_default(apply_validators(ty, options), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn casts_numeric_strings() {
        let ty = NumberType::new("n");
        assert_eq!(ty.cast(&json!("42")).into_owned(), json!(42));
        assert_eq!(ty.cast(&json!("2.5")).into_owned(), json!(2.5));
        assert_eq!(ty.cast(&json!(7)).into_owned(), json!(7));
        assert_eq!(ty.cast(&json!(null)).into_owned(), json!(null));
        assert_eq!(ty.cast(&json!("abc")).into_owned(), json!("abc"));
    }

    #[test]
    fn required_number() {
        let ty = NumberType::new("test").required(true, None);
        assert!(ty.validate(&json!(0), false).is_none());
        assert!(ty.validate(&json!("12"), false).is_none());
        assert_eq!(ty.validate(&json!("A string"), false).unwrap().kind, kind::REQUIRED);
        assert_eq!(ty.validate(&json!(null), false).unwrap().kind, kind::REQUIRED);
    }

    #[test]
    fn optional_non_numbers_are_accepted() {
        let ty = NumberType::new("test")
            .required(false, None)
            .min(10.0, None)
            .unwrap();
        assert!(ty.validate(&json!("A string"), false).is_none());
        assert!(ty.validate(&json!(null), false).is_none());
        assert!(ty.validate(&json!(5), false).is_some());
    }

    #[test]
    fn bounds_apply_when_required_is_unset() {
        let ty = NumberType::new("age").min(5.0, None).unwrap();
        assert_eq!(ty.validate(&json!("abc"), false).unwrap().kind, kind::MINIMAL_VALUE);
        assert_eq!(ty.validate(&json!(null), false).unwrap().kind, kind::MINIMAL_VALUE);
        assert!(ty.validate(&json!("7"), false).is_none());

        let ty = NumberType::new("age").min(0.0, None).unwrap();
        assert!(ty.validate(&json!(null), false).is_none());
    }

    #[test]
    fn min_substitutes_the_bound() {
        let ty = NumberType::new("age").min(0.0, None).unwrap();
        let err = ty.validate(&json!(-1), false).unwrap();
        assert_eq!(err.kind, kind::MINIMAL_VALUE);
        assert_eq!(err.message, "The minimal value (0) of `age` has been exceed.");
        assert_eq!(ty.min_value(), Some(0.0));
    }

    #[test]
    fn max_substitutes_the_bound() {
        let ty = NumberType::new("age").max(90.0, Some("{field} <= {max}")).unwrap();
        let err = ty.validate(&json!(1000), false).unwrap();
        assert_eq!(err.kind, kind::MAXIMAL_VALUE);
        assert_eq!(err.message, "age <= 90");
        assert!(ty.validate(&json!(90), false).is_none());
    }

    #[test]
    fn non_finite_bounds_are_rejected() {
        assert_eq!(
            NumberType::new("n").min(f64::NAN, None).unwrap_err(),
            SchemaError::MinInvalidParameter
        );
        assert_eq!(
            NumberType::new("n").max(f64::INFINITY, None).unwrap_err(),
            SchemaError::MaxInvalidParameter
        );
    }

    #[test]
    fn default_must_be_numeric() {
        assert!(NumberType::new("n").default_value(json!(3)).is_ok());
        assert!(NumberType::new("n").default_value(json!(null)).is_ok());
        assert_eq!(
            NumberType::new("n").default_value(json!("abc")).unwrap_err(),
            SchemaError::DefaultValueInvalid
        );
    }

    #[test]
    fn already_cast_values_skip_the_cast() {
        let ty = NumberType::new("n").required(true, None);
        assert!(ty.validate(&json!("12"), true).is_none());
        assert!(ty.validate(&json!("x"), true).is_some());
    }
}
