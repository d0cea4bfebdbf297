use crate::config::{validate_storage, DEFAULT_BOOKS_FILE, DEFAULT_DATA_DIR, DEFAULT_MEMBERS_FILE};
use crate::core::session::DEFAULT_TITLE;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{LibraryError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    pub books_file: String,
    pub members_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            books_file: DEFAULT_BOOKS_FILE.to_string(),
            members_file: DEFAULT_MEMBERS_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Heading printed above the menu
    pub title: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LibraryError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LibraryError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// Command line flags win over values from the file.
    #[cfg(feature = "cli")]
    pub fn apply_cli_overrides(&mut self, cli: &crate::config::CliConfig) {
        if let Some(data_dir) = &cli.data_dir {
            self.storage.data_dir = data_dir.clone();
        }
        if let Some(books_file) = &cli.books_file {
            self.storage.books_file = books_file.clone();
        }
        if let Some(members_file) = &cli.members_file {
            self.storage.members_file = members_file.clone();
        }
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.level.as_deref()
    }
}

impl ConfigProvider for TomlConfig {
    fn books_path(&self) -> PathBuf {
        Path::new(&self.storage.data_dir).join(&self.storage.books_file)
    }

    fn members_path(&self) -> PathBuf {
        Path::new(&self.storage.data_dir).join(&self.storage.members_file)
    }

    fn session_title(&self) -> &str {
        &self.session.title
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_storage(
            &self.storage.data_dir,
            &self.storage.books_file,
            &self.storage.members_file,
        )?;
        validate_non_empty_string("session.title", &self.session.title)?;

        if let Some(level) = self.log_level() {
            if !LOG_LEVELS.contains(&level) {
                return Err(LibraryError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", LOG_LEVELS.join(", ")),
                });
            }
        }

        Ok(())
    }
}
