//! Configuration for Grove scene generation.
//!
//! Generation knobs persist to disk as a RON file next to the user's other
//! configuration. Command-line flags override whatever was loaded, and unknown
//! or missing fields fall back to defaults so old files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE_NAME, Config, DebugConfig, TerrainConfig};
pub use error::ConfigError;
