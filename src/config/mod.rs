pub mod toml_config;

use crate::core::session::DEFAULT_TITLE;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_distinct, validate_file_name, validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = ".";
pub const DEFAULT_BOOKS_FILE: &str = "books.txt";
pub const DEFAULT_MEMBERS_FILE: &str = "members.txt";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "city-library")]
#[command(about = "Console catalog of a library's books, members and loans")]
pub struct CliConfig {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding the data files [default: .]
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Books file name inside the data directory [default: books.txt]
    #[arg(long)]
    pub books_file: Option<String>,

    /// Members file name inside the data directory [default: members.txt]
    #[arg(long)]
    pub members_file: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn data_dir(&self) -> &str {
        self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR)
    }

    pub fn books_file(&self) -> &str {
        self.books_file.as_deref().unwrap_or(DEFAULT_BOOKS_FILE)
    }

    pub fn members_file(&self) -> &str {
        self.members_file.as_deref().unwrap_or(DEFAULT_MEMBERS_FILE)
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn books_path(&self) -> PathBuf {
        Path::new(self.data_dir()).join(self.books_file())
    }

    fn members_path(&self) -> PathBuf {
        Path::new(self.data_dir()).join(self.members_file())
    }

    fn session_title(&self) -> &str {
        DEFAULT_TITLE
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config {
            validate_path("config", path)?;
        }
        validate_storage(self.data_dir(), self.books_file(), self.members_file())
    }
}

pub(crate) fn validate_storage(data_dir: &str, books_file: &str, members_file: &str) -> Result<()> {
    validate_path("storage.data_dir", data_dir)?;
    validate_file_name("storage.books_file", books_file)?;
    validate_file_name("storage.members_file", members_file)?;
    validate_distinct("storage.members_file", books_file, members_file)
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_resolve_to_working_directory() {
        let config = CliConfig::parse_from(["city-library"]);
        assert_eq!(config.books_path(), Path::new(".").join("books.txt"));
        assert_eq!(config.members_path(), Path::new(".").join("members.txt"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_flags_override_defaults() {
        let config = CliConfig::parse_from([
            "city-library",
            "--data-dir",
            "/var/lib/library",
            "--books-file",
            "catalog.txt",
            "-v",
        ]);
        assert!(config.verbose);
        assert_eq!(config.books_path(), Path::new("/var/lib/library").join("catalog.txt"));
    }

    #[test]
    fn test_same_file_for_both_is_rejected() {
        let config = CliConfig::parse_from([
            "city-library",
            "--books-file",
            "data.txt",
            "--members-file",
            "data.txt",
        ]);
        assert!(config.validate().is_err());
    }
}
