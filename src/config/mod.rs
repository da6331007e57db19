//! Configuration management
//!
//! Node settings (data directory, log level) from environment variables and
//! an optional TOML file.

pub mod settings;

pub use settings::{Config, FileConfig, GLOBAL_CONFIG};
