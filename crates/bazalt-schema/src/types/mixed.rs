//! Mixed type: accepts any non-null value.

use bazalt_core::SchemaError;

use super::{apply_default, apply_leading, apply_validators, Of, SchemaType, TypeBase};
use crate::options::TypeOptions;

/// Untyped field. Casting is the identity.
#[derive(Debug, Clone)]
pub struct MixedType {
    base: TypeBase,
}

impl MixedType {
    /// Untyped field, required state unset.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            base: TypeBase::new(field),
        }
    }
}

impl SchemaType for MixedType {
    fn base(&self) -> &TypeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TypeBase {
        &mut self.base
    }

    fn configure(self, options: &TypeOptions, _of: Option<Of<'_>>) -> Result<Self, SchemaError> {
        let ty = apply_validators(apply_leading(self, options), options);
        apply_default(ty, options)
    }
}
