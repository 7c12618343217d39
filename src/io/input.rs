use anyhow::{Context, Result};
use serde_json::Value;

use super::DocumentFormat;
use crate::domain::FormConfig;

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// Parse a form configuration document. Structural invariants are not checked here.
pub fn parse_config_str(contents: &str, format: DocumentFormat) -> Result<FormConfig> {
    let value = parse_document_str(contents, format)?;
    serde_json::from_value(value).context("document does not match the form configuration schema")
}
