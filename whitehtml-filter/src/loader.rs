// Policy file loaders

use crate::error::{FilterError, Result};
use crate::policy::Policy;
use std::fs;
use std::path::Path;

/// Supported policy file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }
}

/// Reads a [`Policy`] from JSON or TOML.
///
/// ```toml
/// global_attributes = ["class", "style", "data-*"]
/// styles = ["color"]
/// classes = ["contain", "sider"]
///
/// [tags]
/// div = []
/// a = ["href", "target"]
/// ```
pub struct PolicyLoader {
    format: FileFormat,
}

impl PolicyLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Auto-detect format from file extension
    pub fn auto(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| FilterError::PolicyLoad("No file extension found".to_string()))?;

        let format = FileFormat::from_extension(ext)
            .ok_or_else(|| FilterError::PolicyLoad(format!("Unsupported format: {}", ext)))?;

        Ok(Self::new(format))
    }

    /// Load a policy from file
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Policy> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            FilterError::PolicyLoad(format!("Failed to read {}: {}", path.display(), e))
        })?;

        tracing::debug!("Loading whitelist policy from {}", path.display());
        self.parse(&content)
    }

    /// Parse a policy from string
    pub fn parse(&self, content: &str) -> Result<Policy> {
        match self.format {
            FileFormat::Json => serde_json::from_str(content)
                .map_err(|e| FilterError::PolicyParse(format!("JSON parse error: {}", e))),
            FileFormat::Toml => toml::from_str(content)
                .map_err(|e| FilterError::PolicyParse(format!("TOML parse error: {}", e))),
        }
    }
}

impl Policy {
    /// Load a policy file, picking the format from its extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        PolicyLoader::auto(path)?.load_file(path)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        PolicyLoader::new(FileFormat::Json).parse(content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        PolicyLoader::new(FileFormat::Toml).parse(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json() {
        let loader = PolicyLoader::new(FileFormat::Json);
        let json = r#"{"tags": {"p": [], "a": ["href"]}, "global_attributes": ["class"]}"#;

        let policy = loader.parse(json).unwrap();
        assert!(policy.is_tag_allowed("p"));
        assert!(policy.attributes_allowed("a").contains("class"));
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
styles = ["color", "font-size"]
classes = ["contain"]

[tags]
span = []
img = ["src", "alt"]
"#;

        let policy = Policy::from_toml_str(toml).unwrap();
        assert!(policy.is_tag_allowed("img"));
        assert!(policy.attributes_allowed("img").contains("alt"));
        assert!(policy.is_style_allowed("font-size"));
        assert!(policy.is_class_allowed("contain"));
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = Policy::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, FilterError::PolicyParse(_)));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(FileFormat::from_extension("JSON"), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_extension("toml"), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_extension("yaml"), None);
    }

    #[test]
    fn test_auto_rejects_unknown_extension() {
        assert!(matches!(
            PolicyLoader::auto("policy.yaml"),
            Err(FilterError::PolicyLoad(_))
        ));
        assert!(PolicyLoader::auto("policy").is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let err = Policy::from_file("/nonexistent/whitehtml/policy.json").unwrap_err();
        assert!(matches!(err, FilterError::PolicyLoad(_)));
    }

    #[test]
    fn test_from_file_roundtrip_through_disk() {
        let path = std::env::temp_dir().join(format!("whitehtml-policy-{}.json", std::process::id()));
        fs::write(&path, r#"{"tags": {"b": []}}"#).unwrap();

        let policy = Policy::from_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert!(policy.is_tag_allowed("b"));
        assert!(!policy.is_tag_allowed("i"));
    }
}
