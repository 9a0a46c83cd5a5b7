//! Configuration for the orbit viewer.
//!
//! Settings persist to disk as a RON file and can be overridden from the
//! command line. They describe how a session starts; a running session is
//! never written back.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{BodyConfig, Config, DebugConfig, OrbitConfig, PlaybackConfig};
pub use error::ConfigError;
