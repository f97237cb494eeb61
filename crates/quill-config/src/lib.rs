//! Configuration management for quill.
//!
//! Parses `quill.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. The `[render]`
//! section maps directly onto [`quill_renderer::Options`].
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `render.header_prefix`
//! - `render.lang_prefix`

mod expand;

use std::path::{Path, PathBuf};

use quill_renderer::Options;
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override self-closing void elements.
    pub xhtml: Option<bool>,
    /// Override counter-based heading ids.
    pub header_id_sequential: Option<bool>,
    /// Override heading id prefix.
    pub header_prefix: Option<String>,
    /// Override code block language class prefix.
    pub lang_prefix: Option<String>,
    /// Override `target="_blank"` on external links.
    pub link_target_blank: Option<bool>,
    /// Override rendering soft breaks as `<br>`.
    pub breaks: Option<bool>,
    /// Override math parsing.
    pub math: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quill.toml";

/// Characters that would break out of the attribute a prefix is written into.
const FORBIDDEN_PREFIX_CHARS: &[char] = &['"', '<', '>'];

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering options.
    pub render: Options,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
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
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`render.header_prefix`").
        field: String,
        /// Error message (e.g., "${`DOCS_PREFIX`} not set").
        message: String,
    },
}

/// Require a prefix to be safe inside a double-quoted attribute value.
fn require_attribute_safe(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.contains(FORBIDDEN_PREFIX_CHARS) {
        return Err(ConfigError::Validation(format!(
            "{field} cannot contain '\"', '<' or '>'"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `quill.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            tracing::debug!(path = %discovered.display(), "Discovered config file");
            Self::load_from_file(&discovered)?
        } else {
            tracing::debug!("No config file found, using defaults");
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        let render = &mut self.render;
        if let Some(xhtml) = settings.xhtml {
            render.xhtml = xhtml;
        }
        if let Some(sequential) = settings.header_id_sequential {
            render.header_id_sequential = sequential;
        }
        if let Some(prefix) = &settings.header_prefix {
            render.header_prefix.clone_from(prefix);
        }
        if let Some(prefix) = &settings.lang_prefix {
            render.lang_prefix.clone_from(prefix);
        }
        if let Some(target_blank) = settings.link_target_blank {
            render.link_target_blank = target_blank;
        }
        if let Some(breaks) = settings.breaks {
            render.breaks = breaks;
        }
        if let Some(math) = settings.math {
            render.math = math;
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after applying CLI
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_attribute_safe(&self.render.header_prefix, "render.header_prefix")?;
        require_attribute_safe(&self.render.lang_prefix, "render.lang_prefix")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_field(&mut self.render.header_prefix, "render.header_prefix")?;
        expand::expand_field(&mut self.render.lang_prefix, "render.lang_prefix")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.render, Options::default());
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.render, Options::default());
    }

    #[test]
    fn test_parse_render_config() {
        let toml = r#"
[render]
xhtml = true
sanitize = true
header_id_sequential = true
header_prefix = "doc-"
lang_prefix = "language-"
link_target_blank = true
gfm = false
breaks = true
math = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.render,
            Options::default()
                .with_xhtml(true)
                .with_sanitize(true)
                .with_header_id_sequential(true)
                .with_header_prefix("doc-")
                .with_lang_prefix("language-")
                .with_link_target_blank(true)
                .with_gfm(false)
                .with_breaks(true)
                .with_math(true)
        );
    }

    #[test]
    fn test_parse_partial_render_config_keeps_defaults() {
        let toml = r"
[render]
xhtml = true
";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.render.xhtml);
        assert_eq!(config.render.lang_prefix, "lang-");
        assert!(config.render.gfm);
    }

    #[test]
    fn test_parse_invalid_type() {
        let toml = r#"
[render]
xhtml = "yes"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_cli_settings_header_prefix() {
        let mut config = Config::default();
        let overrides = CliSettings {
            header_prefix: Some("sec-".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.render.header_prefix, "sec-");
        assert_eq!(config.render.lang_prefix, "lang-"); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_multiple() {
        let mut config = Config::default();
        let overrides = CliSettings {
            xhtml: Some(true),
            header_id_sequential: Some(true),
            lang_prefix: Some("language-".to_owned()),
            link_target_blank: Some(true),
            breaks: Some(true),
            math: Some(true),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert!(config.render.xhtml);
        assert!(config.render.header_id_sequential);
        assert_eq!(config.render.lang_prefix, "language-");
        assert!(config.render.link_target_blank);
        assert!(config.render.breaks);
        assert!(config.render.math);
        assert_eq!(config.render.header_prefix, ""); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.render, Options::default());
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_header_prefix_with_quote() {
        let mut config = Config::default();
        config.render.header_prefix = r#"x" onclick="#.to_owned();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("render.header_prefix"));
    }

    #[test]
    fn test_validate_lang_prefix_with_angle_bracket() {
        let mut config = Config::default();
        config.render.lang_prefix = "<lang".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("render.lang_prefix"));
    }

    #[test]
    fn test_expand_env_vars_header_prefix() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("QUILL_CONFIG_TEST_PREFIX", "guide-");
        }
        let toml = r#"
[render]
header_prefix = "${QUILL_CONFIG_TEST_PREFIX}"
lang_prefix = "${QUILL_CONFIG_TEST_LANG_UNSET:-code-}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        assert_eq!(config.render.header_prefix, "guide-");
        assert_eq!(config.render.lang_prefix, "code-");
        unsafe {
            std::env::remove_var("QUILL_CONFIG_TEST_PREFIX");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("QUILL_CONFIG_TEST_MISSING");
        }
        let toml = r#"
[render]
lang_prefix = "${QUILL_CONFIG_TEST_MISSING}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "render.lang_prefix"));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[render]\nxhtml = true\nheader_prefix = \"p-\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert!(config.render.xhtml);
        assert_eq!(config.render.header_prefix, "p-");
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_explicit_path_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_cli_settings_take_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[render]\nheader_prefix = \"file-\"\n").unwrap();

        let settings = CliSettings {
            header_prefix: Some("cli-".to_owned()),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.render.header_prefix, "cli-");
    }

    #[test]
    fn test_load_rejects_invalid_cli_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            lang_prefix: Some("\"".to_owned()),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[render\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs/guide");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            Config::discover_config(&nested),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_discover_config_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        std::fs::write(nested.join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            Config::discover_config(&nested),
            Some(nested.join(CONFIG_FILENAME))
        );
    }
}
