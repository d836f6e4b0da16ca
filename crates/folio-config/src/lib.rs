//! Configuration management for Folio.
//!
//! Parses `folio.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [docs]
//! source_dir = "content"
//! output_dir = "dist"
//!
//! [render]
//! highlight = true
//! standalone = false
//! stylesheet = "style.css"
//! title = "Projects"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "folio.toml";

const DEFAULT_SOURCE_DIR: &str = "content";
const DEFAULT_OUTPUT_DIR: &str = "dist";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override markdown source directory.
    pub source_dir: Option<PathBuf>,
    /// Override HTML output directory.
    pub output_dir: Option<PathBuf>,
    /// Override the highlight flag.
    pub highlight: Option<bool>,
    /// Override the standalone page flag.
    pub standalone: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation paths (relative strings from TOML).
    docs: DocsConfigRaw,
    /// Rendering options.
    pub render: RenderConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
}

/// Resolved documentation paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Directory scanned for markdown files.
    pub source_dir: PathBuf,
    /// Directory receiving rendered HTML.
    pub output_dir: PathBuf,
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Run the code highlighter over converted HTML.
    pub highlight: bool,
    /// Wrap fragments in a complete HTML document.
    pub standalone: bool,
    /// Stylesheet linked from standalone pages.
    pub stylesheet: Option<String>,
    /// Default document title for standalone pages.
    pub title: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            highlight: true,
            standalone: false,
            stylesheet: None,
            title: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require an optional string field to be non-empty when set.
fn require_non_empty(value: Option<&str>, field: &str) -> Result<(), ConfigError> {
    if value.is_some_and(str::is_empty) {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `folio.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The result is
    /// validated after the overrides are in place.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docs_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(highlight) = settings.highlight {
            self.render.highlight = highlight;
        }
        if let Some(standalone) = settings.standalone {
            self.render.standalone = standalone;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        Self::discover_config_from(&cwd)
    }

    /// Search for config file in `start` and its parents.
    fn discover_config_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfigRaw::default(),
            render: RenderConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join(DEFAULT_SOURCE_DIR),
                output_dir: base.join(DEFAULT_OUTPUT_DIR),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.docs_resolved.output_dir == self.docs_resolved.source_dir {
            return Err(ConfigError::Validation(format!(
                "docs.output_dir must differ from docs.source_dir ({})",
                self.docs_resolved.source_dir.display()
            )));
        }
        require_non_empty(self.render.stylesheet.as_deref(), "render.stylesheet")?;
        require_non_empty(self.render.title.as_deref(), "render.title")?;
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), DEFAULT_SOURCE_DIR),
            output_dir: resolve(self.docs.output_dir.as_deref(), DEFAULT_OUTPUT_DIR),
        };
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/test/content")
        );
        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/test/dist"));
        assert!(config.render.highlight);
        assert!(!config.render.standalone);
        assert!(config.render.stylesheet.is_none());
        assert!(config.config_path.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.render.highlight);
        assert!(config.render.title.is_none());
    }

    #[test]
    fn test_parse_render_config() {
        let toml = r#"
[render]
highlight = false
standalone = true
stylesheet = "style.css"
title = "Projects"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.render.highlight);
        assert!(config.render.standalone);
        assert_eq!(config.render.stylesheet.as_deref(), Some("style.css"));
        assert_eq!(config.render.title.as_deref(), Some("Projects"));
    }

    #[test]
    fn test_parse_unknown_type_fails() {
        let result: Result<Config, _> = toml::from_str("[render]\nhighlight = \"yes\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[docs]
source_dir = "pages"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/pages")
        );
        assert_eq!(
            config.docs_resolved.output_dir,
            PathBuf::from("/project/dist")
        );
    }

    #[test]
    fn test_validate_rejects_same_dirs() {
        let toml = r#"
[docs]
source_dir = "site"
output_dir = "site"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("output_dir"));
    }

    #[test]
    fn test_validate_rejects_empty_strings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.render.stylesheet = Some(String::new());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("render.stylesheet"));

        config.render.stylesheet = None;
        config.render.title = Some(String::new());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("render.title"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            output_dir: Some(PathBuf::from("/out")),
            highlight: Some(false),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/out"));
        assert!(!config.render.highlight);
        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/test/content")
        ); // Unchanged
        assert!(!config.render.standalone); // Unchanged
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            "[docs]\nsource_dir = \"md\"\n\n[render]\nstandalone = true\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.docs_resolved.source_dir, temp_dir.path().join("md"));
        assert_eq!(
            config.docs_resolved.output_dir,
            temp_dir.path().join("dist")
        );
        assert!(config.render.standalone);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_cli_settings_take_precedence() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[render]\nhighlight = true\nstandalone = true\n").unwrap();

        let settings = CliSettings {
            source_dir: Some(PathBuf::from("/elsewhere")),
            highlight: Some(false),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/elsewhere"));
        assert!(!config.render.highlight);
        assert!(config.render.standalone);
    }

    #[test]
    fn test_load_validates_after_overrides() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "").unwrap();

        let settings = CliSettings {
            output_dir: Some(temp_dir.path().join("content")),
            ..Default::default()
        };
        let result = Config::load(Some(&path), Some(&settings));

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.toml");

        let result = Config::load(Some(&path), None);

        assert!(matches!(result, Err(ConfigError::NotFound(p)) if p == path));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[render\n").unwrap();

        let result = Config::load(Some(&path), None);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "").unwrap();

        assert_eq!(Config::discover_config_from(&nested), Some(path));
    }

    #[test]
    fn test_discover_config_ignores_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join(CONFIG_FILENAME)).unwrap();
        let found = Config::discover_config_from(temp_dir.path());

        assert_ne!(found, Some(temp_dir.path().join(CONFIG_FILENAME)));
    }
}
