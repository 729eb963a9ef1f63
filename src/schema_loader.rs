//! JSON Schema loading for catalog documents.
//!
//! Schemas ship inside the binary; callers compile one, optionally check the
//! `schema_version` const against the document, and collect every validation
//! error into a single report instead of stopping at the first.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;

/// Compiled schema plus the version string its `schema_version` const pins.
pub(crate) struct SchemaLoadResult {
    pub schema_version: String,
    pub compiled: JSONSchema,
}

const SCHEMA_VERSION_POINTER: &str = "/properties/schema_version/const";

pub(crate) fn load_json_schema(raw: &str, label: &str) -> Result<SchemaLoadResult> {
    let schema: Value =
        serde_json::from_str(raw).with_context(|| format!("parsing schema {label}"))?;
    let schema_version = extract_schema_version(&schema)
        .ok_or_else(|| anyhow!("schema {label} missing schema_version const"))?;
    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| anyhow!("compiling schema {label}: {err}"))?;
    Ok(SchemaLoadResult {
        schema_version,
        compiled,
    })
}

/// Validate `document` and fold all schema errors into one message.
pub(crate) fn validate_document(
    schema: &SchemaLoadResult,
    document: &Value,
    label: &str,
) -> Result<()> {
    let declared = document
        .get("schema_version")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if declared != schema.schema_version {
        bail!(
            "{label} declares schema_version '{declared}', expected '{}'",
            schema.schema_version
        );
    }

    if let Err(errors) = schema.compiled.validate(document) {
        let details = errors
            .map(|err| format!("  {}: {err}", err.instance_path))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("{label} failed schema validation:\n{details}");
    }
    Ok(())
}

fn extract_schema_version(schema: &Value) -> Option<String> {
    let version = schema.pointer(SCHEMA_VERSION_POINTER).and_then(Value::as_str)?;
    version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .then(|| version.to_string())
}
