//! Writer configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes.
//!
//! Example `pytojs.toml`:
//! ```toml
//! indent = "\t"
//! max_depth = 64
//! keyword_arguments = "options-object"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default nesting limit before translation fails with `DepthExceeded`.
///
/// Sized so that translation fails cleanly, rather than overflowing, on a
/// 2 MiB thread stack in unoptimized builds.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// How named arguments at a call site are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeywordArguments {
    /// Appended after the positional arguments as `name=value`.
    ///
    /// This does not bind by name on the JavaScript side; callees see an
    /// ordinary positional argument.
    #[default]
    Inline,
    /// Collected into one trailing `{name: value}` record.
    OptionsObject,
    /// Rejected with `UnsupportedConstruct`.
    Reject,
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    /// Text of one indentation level.
    pub indent: String,
    /// Maximum node nesting depth; `None` disables the guard. A nested
    /// block counts as several nodes.
    pub max_depth: Option<usize>,
    pub keyword_arguments: KeywordArguments,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            max_depth: Some(DEFAULT_MAX_DEPTH),
            keyword_arguments: KeywordArguments::default(),
        }
    }
}

/// Error that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl CodegenConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Indentation text for `depth` levels.
    pub fn indentation(&self, depth: usize) -> String {
        self.indent.repeat(depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = CodegenConfig::default();
        assert_eq!(config.indent, "  ");
        assert_eq!(config.max_depth, Some(DEFAULT_MAX_DEPTH));
        assert_eq!(config.keyword_arguments, KeywordArguments::Inline);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = CodegenConfig::from_toml_str(r#"keyword_arguments = "reject""#).unwrap();
        assert_eq!(config.keyword_arguments, KeywordArguments::Reject);
        assert_eq!(config.indent, "  ");
    }

    #[test]
    fn test_load_config_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("pytojs.toml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
indent = "\t"
max_depth = 16
keyword_arguments = "options-object"
"#
        )
        .unwrap();

        let config = CodegenConfig::load(&config_path).unwrap();
        assert_eq!(config.indent, "\t");
        assert_eq!(config.max_depth, Some(16));
        assert_eq!(config.keyword_arguments, KeywordArguments::OptionsObject);
        assert_eq!(config.indentation(2), "\t\t");
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = CodegenConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_invalid_value() {
        let err = CodegenConfig::from_toml_str(r#"keyword_arguments = "sometimes""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
