//! Configuration for voxpost worlds.
//!
//! World preset, seed, chunk dimensions and streaming settings persist to
//! disk as RON. Supports CLI overrides via clap, hot-reload detection, and
//! forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, StreamingConfig, WorldConfig, default_config_dir};
pub use error::ConfigError;
