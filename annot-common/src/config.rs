//! Bootstrap configuration loading
//!
//! Config file resolution order:
//! 1. Command-line argument (highest priority)
//! 2. `ANNOT_CONFIG` environment variable
//! 3. `<user config dir>/annotator/config.toml`
//! 4. Compiled defaults (fallback)
//!
//! A missing config file is not an error: a warning is logged and the
//! compiled defaults are used. A file that exists but does not parse is.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "ANNOT_CONFIG";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TomlConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the per-language fixture files
    #[serde(default = "default_fixtures_dir")]
    pub fixtures_dir: PathBuf,

    /// Languages offered on the picker, in display order
    #[serde(default = "default_languages")]
    pub languages: Vec<LanguageFixture>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// One language and the fixture file holding its tasks
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LanguageFixture {
    pub name: String,
    /// Relative paths resolve against `fixtures_dir`
    pub file: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            fixtures_dir: default_fixtures_dir(),
            languages: default_languages(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5790
}

fn default_fixtures_dir() -> PathBuf {
    PathBuf::from("fixtures")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_languages() -> Vec<LanguageFixture> {
    [
        ("French", "task_fr.json"),
        ("Arabic", "task_ar.json"),
        ("Hindi", "task_hi.json"),
        ("Bengali", "task_bn.json"),
    ]
    .into_iter()
    .map(|(name, file)| LanguageFixture {
        name: name.to_string(),
        file: PathBuf::from(file),
    })
    .collect()
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Resolve and load configuration following the priority order above
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = cli_path {
            if !path.exists() {
                return Err(Error::NotFound(format!(
                    "config file {}",
                    path.display()
                )));
            }
            info!("Loading config from command line path: {}", path.display());
            return Self::from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            if path.exists() {
                info!("Loading config from {}: {}", CONFIG_ENV_VAR, path.display());
                return Self::from_file(&path);
            }
            warn!(
                "{} points to missing file {}, ignoring",
                CONFIG_ENV_VAR,
                path.display()
            );
        }

        if let Some(path) = user_config_path() {
            if path.exists() {
                info!("Loading config from {}", path.display());
                return Self::from_file(&path);
            }
        }

        warn!("No config file found, using compiled defaults");
        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(Error::Config("port must be non-zero".to_string()));
        }
        let mut seen = std::collections::HashSet::new();
        for language in &self.languages {
            if language.name.trim().is_empty() {
                return Err(Error::Config("language name must not be empty".to_string()));
            }
            if !seen.insert(language.name.as_str()) {
                return Err(Error::Config(format!(
                    "language '{}' listed more than once",
                    language.name
                )));
            }
        }
        Ok(())
    }

    /// Fixture file path for `language`, resolved against `fixtures_dir`
    pub fn fixture_path(&self, language: &LanguageFixture) -> PathBuf {
        if language.file.is_absolute() {
            language.file.clone()
        } else {
            self.fixtures_dir.join(&language.file)
        }
    }
}

/// `<user config dir>/annotator/config.toml`, when the platform has one
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("annotator").join("config.toml"))
}
