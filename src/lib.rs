pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::FlatFileRepository;
pub use config::toml_config::TomlConfig;
pub use core::{catalog::Catalog, library::Library, membership::Membership, session::Session};
pub use utils::error::{LibraryError, Result};
