//! # Check Subcommand
//!
//! Validates records against a serialized schema.
//! Usage: `bazalt check --schema <schema.json> <record>...`

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::input::{load_schema, read_document};

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Serialized schema (`{schema, options}` document, JSON or YAML).
    #[arg(long)]
    pub schema: PathBuf,

    /// Records to validate (JSON or YAML).
    #[arg(required = true)]
    pub records: Vec<PathBuf>,
}

/// Validate every record, writing one line per record. Returns whether all
/// records were valid.
pub fn run(args: &CheckArgs, out: &mut impl Write) -> Result<bool> {
    let schema = load_schema(&args.schema)?;
    let mut all_valid = true;
    for path in &args.records {
        let record = read_document(path)?;
        match schema.validate(&record) {
            None => writeln!(out, "{}: ok", path.display())?,
            Some(errors) => {
                all_valid = false;
                tracing::info!(record = %path.display(), failed = errors.len(), "record rejected");
                writeln!(out, "{}: {}", path.display(), serde_json::to_string(&errors)?)?;
            }
        }
    }
    Ok(all_valid)
}
