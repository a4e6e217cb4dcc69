// Configuration management module
// Handles TOML configuration for storage paths, chunking, and search limits

pub mod settings;

pub use settings::{Config, ConfigError, SearchConfig};

/// Get the default base directory for the application
#[inline]
pub fn get_base_dir() -> Result<std::path::PathBuf, ConfigError> {
    Config::default_base_dir()
}
