//! # Default Subcommand
//!
//! Prints the default value of a field, resolved through a dotted path.
//! Usage: `bazalt default --schema <schema.json> <path>`

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::input::load_schema;

/// Arguments for the default subcommand.
#[derive(Args, Debug)]
pub struct DefaultArgs {
    /// Serialized schema (`{schema, options}` document, JSON or YAML).
    #[arg(long)]
    pub schema: PathBuf,

    /// Dotted field path, e.g. `information.location`.
    pub path: String,
}

/// Write the default of the field as JSON, or `null` when it has none.
/// Generated defaults (GUID identifiers) are fresh on every call.
pub fn run(args: &DefaultArgs, out: &mut impl Write) -> Result<()> {
    let schema = load_schema(&args.schema)?;
    let accessor = schema
        .path(&args.path)
        .with_context(|| format!("cannot resolve `{}`", args.path))?;
    let value = accessor.default().unwrap_or_default();
    writeln!(out, "{value}")?;
    Ok(())
}
