//! # bazalt-cli: Command-Line Interface for bazalt Schemas
//!
//! ## Subcommands
//!
//! - `check`: Validate JSON/YAML records against a serialized schema
//! - `normalize`: Expand a shorthand definition map into a serialized schema
//! - `default`: Print a field's default value through a dotted path
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to `bazalt-schema`; no validation logic here.
//! - Handlers write to a caller-supplied writer so they can be tested
//!   without a process boundary.

pub mod check;
pub mod default;
pub mod input;
pub mod normalize;
