//! Configuration management for HSB.
//!
//! Parses `hsb.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
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
//! - `build.template_dir`
//! - `build.output_dir`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override template directory.
    pub template_dir: Option<PathBuf>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "hsb.toml";

/// Source file extensions accepted when no `build.extensions` is configured.
///
/// The empty string stands for files without an extension.
pub const DEFAULT_EXTENSIONS: &[&str] = &["hsb", "txt", "htm", "html", "utf8", "u8", ""];

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build configuration (paths are relative strings from TOML).
    build: BuildConfigRaw,

    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw build configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    template_dir: Option<String>,
    output_dir: Option<String>,
    extensions: Option<Vec<String>>,
}

/// Resolved build configuration with absolute paths.
#[derive(Debug, Default)]
pub struct BuildConfig {
    /// Directory holding template snippets.
    pub template_dir: PathBuf,
    /// Whether `template_dir` was set explicitly (config file or CLI).
    ///
    /// An explicit template directory must exist; the default one may be absent.
    pub template_dir_explicit: bool,
    /// Root directory for generated HTML.
    pub output_dir: PathBuf,
    /// Accepted source extensions, without the leading dot.
    pub extensions: Vec<String>,
}

impl BuildConfig {
    /// Check whether a source file has an accepted extension.
    #[must_use]
    pub fn accepts(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        self.extensions.iter().any(|allowed| allowed == ext)
    }

    /// Human-readable list of accepted extensions for error messages.
    #[must_use]
    pub fn describe_extensions(&self) -> String {
        let mut names: Vec<String> = self
            .extensions
            .iter()
            .map(|e| {
                if e.is_empty() {
                    "(no extension)".to_owned()
                } else {
                    format!(".{e}")
                }
            })
            .collect();
        names.sort();
        names.join(", ")
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
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`build.output_dir`").
        field: String,
        /// Error message (e.g., "${`SITE_OUT`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `hsb.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
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

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(template_dir) = &settings.template_dir {
            self.build_resolved.template_dir.clone_from(template_dir);
            self.build_resolved.template_dir_explicit = true;
        }
        if let Some(output_dir) = &settings.output_dir {
            self.build_resolved.output_dir.clone_from(output_dir);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
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

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            build: BuildConfigRaw::default(),
            build_resolved: BuildConfig {
                template_dir: base.join("templates"),
                template_dir_explicit: false,
                output_dir: base.join("output"),
                extensions: default_extensions(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if an extension contains a dot or a
    /// path separator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for ext in &self.build_resolved.extensions {
            if ext.contains(['.', '/', '\\']) {
                return Err(ConfigError::Validation(format!(
                    "build.extensions entry {ext:?} must be a bare extension without dots or separators"
                )));
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.build.template_dir {
            self.build.template_dir = Some(expand::expand_env(dir, "build.template_dir")?);
        }
        if let Some(ref dir) = self.build.output_dir {
            self.build.output_dir = Some(expand::expand_env(dir, "build.output_dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.build_resolved = BuildConfig {
            template_dir: resolve(self.build.template_dir.as_deref(), "templates"),
            template_dir_explicit: self.build.template_dir.is_some(),
            output_dir: resolve(self.build.output_dir.as_deref(), "output"),
            extensions: self
                .build
                .extensions
                .clone()
                .unwrap_or_else(default_extensions),
        };
    }
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|&e| e.to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(
            config.build_resolved.template_dir,
            PathBuf::from("/test/templates")
        );
        assert_eq!(config.build_resolved.output_dir, PathBuf::from("/test/output"));
        assert!(!config.build_resolved.template_dir_explicit);
        assert_eq!(config.build_resolved.extensions.len(), DEFAULT_EXTENSIONS.len());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.build.template_dir.is_none());
        assert!(config.build.output_dir.is_none());
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[build]
template_dir = "snippets"
output_dir = "public"
extensions = ["hsb"]
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.build_resolved.template_dir,
            PathBuf::from("/project/snippets")
        );
        assert!(config.build_resolved.template_dir_explicit);
        assert_eq!(
            config.build_resolved.output_dir,
            PathBuf::from("/project/public")
        );
        assert_eq!(config.build_resolved.extensions, vec!["hsb".to_owned()]);
    }

    #[test]
    fn test_resolve_paths_defaults() {
        let mut config: Config = toml::from_str("[build]\n").unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.build_resolved.template_dir,
            PathBuf::from("/project/templates")
        );
        assert!(!config.build_resolved.template_dir_explicit);
        assert_eq!(
            config.build_resolved.output_dir,
            PathBuf::from("/project/output")
        );
    }

    #[test]
    fn test_validate_rejects_dotted_extension() {
        let mut config: Config = toml::from_str("[build]\nextensions = [\".hsb\"]\n").unwrap();
        config.resolve_paths(Path::new("/project"));

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains(".hsb"));
    }

    #[test]
    fn test_apply_cli_settings_template_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            template_dir: Some(PathBuf::from("/custom/templates")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.build_resolved.template_dir,
            PathBuf::from("/custom/templates")
        );
        assert!(config.build_resolved.template_dir_explicit);
        assert_eq!(config.build_resolved.output_dir, PathBuf::from("/test/output")); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_output_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            output_dir: Some(PathBuf::from("/srv/site")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.build_resolved.output_dir, PathBuf::from("/srv/site"));
        assert!(!config.build_resolved.template_dir_explicit); // Unchanged
    }

    #[test]
    fn test_accepts_extensions() {
        let config = Config::default_with_base(Path::new("/test"));
        let build = &config.build_resolved;

        assert!(build.accepts(Path::new("page.hsb")));
        assert!(build.accepts(Path::new("notes/README")));
        assert!(!build.accepts(Path::new("style.css")));
    }

    #[test]
    fn test_describe_extensions() {
        let build = BuildConfig {
            extensions: vec!["hsb".to_owned(), String::new()],
            ..Default::default()
        };
        assert_eq!(build.describe_extensions(), "(no extension), .hsb");
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/hsb.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hsb.toml");
        std::fs::write(&path, "[build]\noutput_dir = \"dist\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.build_resolved.output_dir, dir.path().join("dist"));
        assert_eq!(config.build_resolved.template_dir, dir.path().join("templates"));
        assert_eq!(config.config_path, Some(path));
    }
}
