//! Configuration for the triaconta globe.
//!
//! Settings persist to disk as a RON file and can be overridden from the
//! command line via clap. Every section defaults field by field, so older or
//! partial files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    BandConfig, CONFIG_FILE_NAME, Config, DebugConfig, GlobeConfig, LodConfig, PathConfig,
    RenderConfig,
};
pub use error::ConfigError;
