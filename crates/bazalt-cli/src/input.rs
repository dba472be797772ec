//! Reading schema and record documents from disk.

use std::path::Path;

use anyhow::{Context, Result};
use bazalt_schema::Schema;
use serde_json::Value;

/// Read a JSON or YAML document. Files ending in `.yaml`/`.yml` are parsed
/// as YAML, everything else as JSON.
pub fn read_document(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if is_yaml {
        serde_yaml::from_str(&text).with_context(|| format!("invalid YAML in {}", path.display()))
    } else {
        serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
    }
}

/// Load a serialized `{schema, options}` document.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let document = read_document(path)?;
    let schema = Schema::from_value(&document)
        .with_context(|| format!("{} is not a serialized schema", path.display()))?;
    tracing::debug!(path = %path.display(), fields = schema.len(), "schema loaded");
    Ok(schema)
}
