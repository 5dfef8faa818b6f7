//! Configuration management for the check-in tool
//!
//! This module handles loading and managing configuration settings
//! from defaults, a TOML file and environment variables.

pub mod loader;
pub mod settings;

pub use loader::{ConfigLoader, LoadedConfig, default_config_path};
pub use settings::{DEFAULT_ACCOUNTS_ENV, Settings};
