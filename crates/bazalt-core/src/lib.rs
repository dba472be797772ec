#![deny(missing_docs)]
//! # bazalt-core: Foundational Types for bazalt Schemas
//!
//! Leaf crate of the workspace. It holds everything the type engine needs
//! that does not depend on schemas themselves:
//!
//! - [`messages`]: the immutable message catalog.
//! - [`validation`]: [`ValidationError`] and placeholder substitution.
//! - [`error`]: [`SchemaError`], raised when a schema is misconfigured.
//! - [`coerce`]: scalar conversion rules shared by casting and bound checks.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `bazalt-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` on caller-supplied data outside tests.

pub mod coerce;
pub mod error;
pub mod messages;
pub mod validation;

pub use error::SchemaError;
pub use messages::MessageKey;
pub use validation::{format_message, ValidationError};
