//! Configuration for the geodesic mesh driver.
//!
//! Settings persist to disk as RON, can be overridden from the command line
//! via clap, and are checked with [`Config::validate`] before use.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE, CameraConfig, Config, CullConfig, DebugConfig, MeshConfig, ScreenConfig,
    ShaderConfig, default_config_dir,
};
pub use error::ConfigError;
