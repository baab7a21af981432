//! Layered configuration for the `embed` command.
//!
//! Values are resolved in increasing priority: built-in defaults, the TOML file given with
//! `--config`, `--set KEY=VALUE` overrides, and finally explicit command-line flags.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;

pub use builder::build_config;
pub use models::AppConfig;
