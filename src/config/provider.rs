use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tracing::{debug, error};

use crate::domain::FormConfig;
use crate::error::{FormError, FormResult};
use crate::io::{DocumentFormat, parse_config_str};

/// Source of already-parsed form configurations, keyed by form kind.
pub trait ConfigProvider {
    fn load(&self, kind: &str) -> FormResult<FormConfig>;
}

/// Looks up `<root>/<kind>.<ext>` for every compiled-in document format.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
}

impl DirectoryProvider {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locate(&self, kind: &str) -> Option<(PathBuf, DocumentFormat)> {
        DocumentFormat::available().iter().find_map(|format| {
            format.extensions().iter().find_map(|ext| {
                let path = self.root.join(format!("{kind}.{ext}"));
                path.is_file().then_some((path, *format))
            })
        })
    }

    fn read(&self, kind: &str) -> anyhow::Result<FormConfig> {
        if kind.is_empty() || kind.contains(['/', '\\']) || kind.contains("..") {
            return Err(anyhow!("invalid form kind"));
        }
        let (path, format) = self
            .locate(kind)
            .ok_or_else(|| anyhow!("no configuration document in {}", self.root.display()))?;
        debug!(path = %path.display(), %format, "reading form configuration");
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        parse_config_str(&contents, format)
    }
}

impl ConfigProvider for DirectoryProvider {
    fn load(&self, kind: &str) -> FormResult<FormConfig> {
        let config = self.read(kind).map_err(|source| {
            error!(kind, error = %source, "form configuration fetch failed");
            FormError::ConfigFetch {
                kind: kind.to_string(),
                source,
            }
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// In-memory provider for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    forms: HashMap<String, FormConfig>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(mut self, kind: impl Into<String>, config: FormConfig) -> Self {
        self.forms.insert(kind.into(), config);
        self
    }
}

impl ConfigProvider for StaticProvider {
    fn load(&self, kind: &str) -> FormResult<FormConfig> {
        let config = self
            .forms
            .get(kind)
            .cloned()
            .ok_or_else(|| FormError::ConfigFetch {
                kind: kind.to_string(),
                source: anyhow!("unknown form kind"),
            })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "formui-provider-{}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_json_document_by_kind() {
        let dir = scratch_dir();
        fs::write(
            dir.join("audit.json"),
            r#"{"title":"Audit","sections":[{"label":"Scope","fields":[{"id":"area"}]}]}"#,
        )
        .unwrap();
        let provider = DirectoryProvider::new(&dir);
        let config = provider.load("audit").expect("audit form");
        assert_eq!(config.title, "Audit");
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_document_is_a_fetch_error() {
        let dir = scratch_dir();
        let provider = DirectoryProvider::new(&dir);
        let err = provider.load("incident").unwrap_err();
        assert!(matches!(err, FormError::ConfigFetch { ref kind, .. } if kind == "incident"));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn rejects_path_like_kinds() {
        let provider = DirectoryProvider::new(std::env::temp_dir());
        assert!(matches!(
            provider.load("../etc/passwd"),
            Err(FormError::ConfigFetch { .. })
        ));
    }

    #[test]
    fn static_provider_validates_invariants() {
        let mut config = FormConfig::default();
        config.sections.push(crate::domain::Section {
            label: "S".into(),
            fields: vec![
                crate::domain::FieldSpec::new("a", "A", Default::default()),
                crate::domain::FieldSpec::new("a", "A again", Default::default()),
            ],
            ..Default::default()
        });
        let provider = StaticProvider::new().with_form("incident", config);
        assert!(matches!(
            provider.load("incident"),
            Err(FormError::Config(ConfigError::DuplicateFieldId { .. }))
        ));
    }
}
