//! # Normalize Subcommand
//!
//! Turns a shorthand definition map into its canonical serialized schema.
//! Usage: `bazalt normalize <definition.yaml> [--no-id] [--pretty]`

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use bazalt_schema::{Schema, SchemaOptions, Shape};
use clap::Args;
use serde_json::Value;

use crate::input::read_document;

/// Arguments for the normalize subcommand.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Definition map, `{field: shape}` (JSON or YAML).
    pub file: PathBuf,

    /// Do not add the generated `id` identifier field.
    #[arg(long)]
    pub no_id: bool,

    /// Pretty-print the output.
    #[arg(long)]
    pub pretty: bool,
}

/// Build the schema described by the definition map and write its
/// serialized form.
pub fn run(args: &NormalizeArgs, out: &mut impl Write) -> Result<()> {
    let Value::Object(fields) = read_document(&args.file)? else {
        bail!("{} must contain a map of field definitions", args.file.display());
    };
    let shapes = fields
        .iter()
        .map(|(name, raw)| Ok((name.clone(), Shape::from_value(name, raw)?)))
        .collect::<Result<Vec<_>, bazalt_schema::SchemaError>>()
        .with_context(|| format!("invalid definition in {}", args.file.display()))?;
    let schema = Schema::new(shapes, SchemaOptions { id: !args.no_id })?;

    if args.pretty {
        serde_json::to_writer_pretty(&mut *out, &schema)?;
    } else {
        serde_json::to_writer(&mut *out, &schema)?;
    }
    writeln!(out)?;
    Ok(())
}
