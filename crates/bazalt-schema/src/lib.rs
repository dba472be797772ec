//! # bazalt-schema: Declarative Record Schemas
//!
//! Describes the expected shape of JSON records as an ordered set of typed
//! fields and validates records against it, reporting at most one error per
//! field.
//!
//! ## Type Engine (`types`)
//!
//! Six type variants ([`MixedType`], [`NumberType`], [`StringType`],
//! [`ObjectType`], [`ArrayType`], [`GuidType`]) share the [`SchemaType`]
//! contract: cast, presence check, an ordered validator chain and an
//! optional default. A configured type is frozen into a [`FieldType`].
//!
//! ## Schemas (`schema`, `shape`, `options`)
//!
//! A [`Schema`] normalizes each field's [`Shape`] (bare type, array
//! shorthand, nested object shorthand, nested schema, explicit definition
//! with [`TypeOptions`]) into a [`Definition`] and validates records field
//! by field. Dotted paths such as `information.location` resolve into
//! nested schemas through [`Schema::path`].
//!
//! ## Serialization (`codec`)
//!
//! [`Schema::to_json`] and [`Schema::from_json`] encode a schema as a
//! `{schema, options}` document that rebuilds equivalent validation.
//!
//! ## Crate Policy
//!
//! - Depends only on `bazalt-core` internally.
//! - Configuration happens while building; a built schema is read-only and
//!   `Send + Sync`.
//! - Misconfiguration is a [`SchemaError`], never a panic. Record
//!   validation never fails; it reports.

pub mod codec;
pub mod options;
pub mod schema;
pub mod shape;
pub mod types;

pub use bazalt_core::{SchemaError, ValidationError};
pub use options::{Setting, TypeOptions, ValidatorSpec};
pub use schema::{Definition, FieldErrors, Nested, PathAccessor, Schema, SchemaOptions};
pub use shape::{Explicit, Shape};
pub use types::{
    ArrayType, Check, DefaultValue, FieldType, GuidType, MixedType, NumberType, ObjectType, Of,
    Predicate, SchemaType, StringType, TypeTag,
};
