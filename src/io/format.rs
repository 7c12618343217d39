use std::fmt;
use std::path::Path;

/// Supported data formats for configuration documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Json,
    #[cfg(feature = "yaml")]
    Yaml,
    #[cfg(feature = "toml")]
    Toml,
}

impl DocumentFormat {
    /// Formats compiled into this build, in lookup priority order.
    pub fn available() -> &'static [DocumentFormat] {
        &[
            DocumentFormat::Json,
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml,
            #[cfg(feature = "toml")]
            DocumentFormat::Toml,
        ]
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            DocumentFormat::Json => &["json"],
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml => &["yaml", "yml"],
            #[cfg(feature = "toml")]
            DocumentFormat::Toml => &["toml"],
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::available()
            .iter()
            .copied()
            .find(|format| format.extensions().contains(&ext.as_str()))
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Json => write!(f, "json"),
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml => write!(f, "yaml"),
            #[cfg(feature = "toml")]
            DocumentFormat::Toml => write!(f, "toml"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_json_by_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("forms/incident.JSON")),
            Some(DocumentFormat::Json)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("forms/incident")), None);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn detects_yaml_aliases() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("audit.yml")),
            Some(DocumentFormat::Yaml)
        );
    }
}
