use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Open block depth allowed when the config file does not say otherwise.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 256;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Settings for the `markdown-strata` command.
///
/// ```toml
/// [parser]
/// max_input_bytes = 1048576
/// enabled_blocks = ["heading", "list", "fenced_code"]
/// extensions = ["tables", "strikethrough"]
///
/// [html]
/// softbreak = "<br />\n"
/// sanitize_urls = true
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parser: ParserConfig,
    pub html: HtmlConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_input_bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_nesting_depth: Option<usize>,
    /// Core block types allowed to open; all of them when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_blocks: Option<Vec<String>>,
    pub extensions: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: None,
            max_nesting_depth: Some(DEFAULT_MAX_NESTING_DEPTH),
            enabled_blocks: None,
            extensions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    pub softbreak: String,
    pub escape_html: bool,
    pub sanitize_urls: bool,
    pub percent_encode_urls: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            softbreak: "\n".to_string(),
            escape_html: false,
            sanitize_urls: false,
            percent_encode_urls: true,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/markdown-strata");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Expands `~` and environment variables in a user-supplied config path.
    /// Paths that fail to expand are returned unchanged.
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(_) => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/markdown-strata/config.toml"));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.parser.max_nesting_depth, Some(DEFAULT_MAX_NESTING_DEPTH));
        assert!(config.html.percent_encode_urls);
        assert_eq!(config.html.softbreak, "\n");
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config_content = r#"
[parser]
extensions = ["tables", "autolink"]
max_input_bytes = 4096

[html]
sanitize_urls = true
"#;

        let config: Config = toml::from_str(config_content).unwrap();

        assert_eq!(config.parser.extensions, vec!["tables", "autolink"]);
        assert_eq!(config.parser.max_input_bytes, Some(4096));
        assert_eq!(config.parser.max_nesting_depth, Some(DEFAULT_MAX_NESTING_DEPTH));
        assert_eq!(config.parser.enabled_blocks, None);
        assert!(config.html.sanitize_urls);
        assert!(!config.html.escape_html);
    }

    #[test]
    fn test_unknown_types_are_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[parser]\nmax_input_bytes = \"lots\"\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path(Path::new("~/test/config.toml"));

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/config.toml"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("STRATA_TEST_CONFIG_DIR", "/test/env/path");
        }

        let expanded = Config::expand_path(Path::new("$STRATA_TEST_CONFIG_DIR/config.toml"));
        assert_eq!(expanded, PathBuf::from("/test/env/path/config.toml"));

        unsafe {
            env::remove_var("STRATA_TEST_CONFIG_DIR");
        }
    }

    #[test]
    fn test_expand_path_with_missing_env_var_is_unchanged() {
        let path = Path::new("$STRATA_TEST_SURELY_UNSET_VAR/config.toml");
        assert_eq!(Config::expand_path(path), path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            parser: ParserConfig {
                max_input_bytes: Some(1 << 20),
                max_nesting_depth: Some(32),
                enabled_blocks: Some(vec!["heading".to_string(), "list".to_string()]),
                extensions: vec!["strikethrough".to_string()],
            },
            html: HtmlConfig {
                softbreak: "<br />\n".to_string(),
                escape_html: true,
                ..HtmlConfig::default()
            },
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }
}
