//! Configuration module for the sketch editor
//!
//! Provides types and parsing for `sketch.toml` configuration.

pub mod loader;
pub mod schema;

pub use loader::{find_config, load_config, ConfigError, CONFIG_FILENAME};
pub use schema::*;
