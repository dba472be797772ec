//! Object type, optionally constrained by a nested schema.

use std::sync::Arc;

use bazalt_core::{messages, SchemaError};
use serde_json::Value;

use super::{
    apply_default, apply_leading, apply_validators, kind, Check, Of, SchemaType, TypeBase,
    ValidatorEntry,
};
use crate::options::TypeOptions;
use crate::schema::Nested;

/// Record field. Present when the value is an object or an array.
#[derive(Debug, Clone)]
pub struct ObjectType {
    base: TypeBase,
    of: Option<Arc<Nested>>,
}

impl ObjectType {
    /// Record field without a nested schema, required state unset.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            base: TypeBase::new(field),
            of: None,
        }
    }

    /// Require the value to satisfy a nested schema. The nested schema's
    /// error map is not surfaced; a single "schema validator" error is.
    pub fn of(mut self, nested: impl Into<Arc<Nested>>, message: Option<&str>) -> Self {
        let nested = nested.into();
        self.base.validators.push(ValidatorEntry::new(
            Check::Record(Arc::clone(&nested)),
            message.unwrap_or(messages::SCHEMA),
            kind::SCHEMA_VALIDATOR,
        ));
        self.of = Some(nested);
        self
    }

    /// The nested schema installed by [`of`](Self::of).
    pub fn nested(&self) -> Option<&Arc<Nested>> {
        self.of.as_ref()
    }
}

impl SchemaType for ObjectType {
    fn base(&self) -> &TypeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut TypeBase {
        &mut self.base
    }

    fn is_present(&self, value: &Value) -> bool {
        value.is_object() || value.is_array()
    }

    fn configure(self, options: &TypeOptions, of: Option<Of<'_>>) -> Result<Self, SchemaError> {
        let mut ty = apply_leading(self, options);
        if let Some(of) = of {
            ty = ty.of(Arc::clone(of.nested), of.message);
        }
        apply_default(apply_validators(ty, options), options)
    }
}
