//! # valr-cli: Command-Line Playground for valr
//!
//! Provides the `valr` binary for trying schemas without writing a host
//! application.
//!
//! ## Subcommands
//!
//! - `valr check`: Validate inputs against a schema document.
//! - `valr rules`: Print the compiled rule metadata as JSON.
//! - `valr messages`: Print the effective message table.
//!
//! ```bash
//! valr check --schema name.yaml --input '"ab"' --input '"abc"'
//! valr rules --schema name.yaml --trigger blur
//! valr --messages en.yaml messages --flat
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: every input passed.
//! - `1`: at least one input failed validation.
//! - `2`: usage or configuration error (bad schema, unreadable file).

pub mod check;
pub mod messages;
pub mod rules;

use std::path::Path;

use anyhow::{Context, Result};
use valr_schema::{SchemaDocument, Valr};

/// Exit code for a run where every input passed.
pub const EXIT_OK: u8 = 0;
/// Exit code for a run where some input failed validation.
pub const EXIT_INVALID: u8 = 1;
/// Exit code for usage and configuration errors.
pub const EXIT_USAGE: u8 = 2;

/// Build the factory, merging the message file if one is given.
pub fn build_valr(messages: Option<&Path>) -> Result<Valr> {
    let valr = Valr::new();
    if let Some(path) = messages {
        valr.messages()
            .merge_file(path)
            .with_context(|| format!("failed to load messages from {}", path.display()))?;
        tracing::info!(path = %path.display(), "merged message overrides");
    }
    Ok(valr)
}

/// Read a schema document. `.json` files parse as JSON, anything else as
/// YAML.
pub fn load_document(path: &Path) -> Result<SchemaDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema document: {}", path.display()))?;
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let document = if is_json {
        SchemaDocument::from_json_str(&text)
    } else {
        SchemaDocument::from_yaml_str(&text)
    };
    document.with_context(|| format!("invalid schema document: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_yaml_and_json_documents() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("name.yaml");
        std::fs::write(&yaml, "type: string\nrules:\n  - kind: min\n    value: 2\n").unwrap();
        let json = dir.path().join("age.json");
        std::fs::write(&json, r#"{"type": "number", "rules": [{"kind": "integer"}]}"#).unwrap();

        assert_eq!(load_document(&yaml).unwrap().rules.len(), 1);
        assert_eq!(
            load_document(&json).unwrap().schema_type,
            valr_core::SchemaType::Number
        );
    }

    #[test]
    fn missing_document_names_the_path() {
        let err = load_document(Path::new("/nonexistent/schema.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/schema.yaml"));
    }

    #[test]
    fn message_file_is_merged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("en.yaml");
        std::fs::write(&path, "required: Required\nstring:\n  min: At least {0} characters\n")
            .unwrap();
        let valr = build_valr(Some(&path)).unwrap();
        assert_eq!(valr.messages().required(), "Required");
        assert_eq!(
            valr.messages().get("string.max").as_deref(),
            Some("字符串长度最大值为 {0}")
        );
    }

    #[test]
    fn bad_message_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(build_valr(Some(&path)).is_err());
    }
}
