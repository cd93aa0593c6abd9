//! Configuration management for xref.
//!
//! Parses `xref.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `app.url`
//! - `repo.format`
//! - `repo.path`

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "xref.toml";

/// Issue naming styles accepted in `repo.style`.
const ISSUE_STYLES: &[&str] = &["numeric", "alphanumeric"];

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config. Any repository override
/// creates the `[repo]` section if the file had none.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override application base URL.
    pub app_url: Option<String>,
    /// Override repository owner.
    pub user: Option<String>,
    /// Override repository name.
    pub repo: Option<String>,
    /// Override issue naming style.
    pub style: Option<String>,
    /// Override external issue tracker template.
    pub format: Option<String>,
    /// Override repository directory.
    pub repo_path: Option<PathBuf>,
}

impl CliSettings {
    fn overrides_repo(&self) -> bool {
        self.user.is_some()
            || self.repo.is_some()
            || self.style.is_some()
            || self.format.is_some()
            || self.repo_path.is_some()
    }
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application settings.
    pub app: AppConfig,
    /// Default repository metadata (optional section).
    pub repo: Option<RepoConfig>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Application settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL links are generated against.
    pub url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000/".to_owned(),
        }
    }
}

/// Repository metadata used when rendering.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RepoConfig {
    /// Repository owner.
    pub user: Option<String>,
    /// Repository name.
    pub repo: Option<String>,
    /// Issue naming style: `numeric` or `alphanumeric`.
    pub style: Option<String>,
    /// External issue tracker URL template, e.g. `https://tracker.example/{index}`.
    pub format: Option<String>,
    /// Repository directory used to confirm commit hashes.
    ///
    /// Relative paths are resolved against the config file directory.
    pub path: Option<PathBuf>,
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
        /// Config field path (e.g., "`repo.path`").
        field: String,
        /// Error message (e.g., "${`GIT_ROOT`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `xref.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, and the result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing or
    /// expansion fails, or the final configuration is invalid.
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
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(url) = &settings.app_url {
            self.app.url.clone_from(url);
        }
        if !settings.overrides_repo() {
            return;
        }

        let repo = self.repo.get_or_insert_with(RepoConfig::default);
        if let Some(user) = &settings.user {
            repo.user = Some(user.clone());
        }
        if let Some(name) = &settings.repo {
            repo.repo = Some(name.clone());
        }
        if let Some(style) = &settings.style {
            repo.style = Some(style.clone());
        }
        if let Some(format) = &settings.format {
            repo.format = Some(format.clone());
        }
        if let Some(path) = &settings.repo_path {
            repo.path = Some(path.clone());
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

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

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
        require_non_empty(&self.app.url, "app.url")?;
        require_http_url(&self.app.url, "app.url")?;

        if let Some(style) = self.repo.as_ref().and_then(|repo| repo.style.as_deref())
            && !ISSUE_STYLES.contains(&style)
        {
            return Err(ConfigError::Validation(format!(
                "repo.style must be one of {}, got {style:?}",
                ISSUE_STYLES.join(", ")
            )));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.app.url = expand_field(&self.app.url, "app.url")?;

        if let Some(ref mut repo) = self.repo {
            if let Some(ref format) = repo.format {
                repo.format = Some(expand_field(format, "repo.format")?);
            }
            if let Some(ref path) = repo.path {
                let expanded = expand_field(&path.to_string_lossy(), "repo.path")?;
                repo.path = Some(PathBuf::from(expanded));
            }
        }

        Ok(())
    }

    /// Resolve a relative repository path against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        if let Some(path) = self.repo.as_mut().and_then(|repo| repo.path.as_mut())
            && path.is_relative()
        {
            *path = config_dir.join(&*path);
        }
    }
}

/// Substitute `${VAR}` and `${VAR:-default}` in one config value.
///
/// Only braced references are recognized; a bare `$` is kept, so issue
/// tracker templates and paths containing `$` are not mangled.
fn expand_field(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }
    let expanded = shellexpand::env_with_context(value, |name| std::env::var(name).map(Some))
        .map_err(|e| {
            let reason = match e.cause {
                std::env::VarError::NotPresent => "not set",
                std::env::VarError::NotUnicode(_) => "is not valid Unicode",
            };
            ConfigError::EnvVar {
                field: field.to_owned(),
                message: format!("${{{}}} {reason}", e.var_name),
            }
        })?;
    Ok(expanded.into_owned())
}
