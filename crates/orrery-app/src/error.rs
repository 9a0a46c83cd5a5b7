//! Errors surfaced by the host binary.

use orrery_config::ConfigError;
use orrery_orbit::ValidationError;
use orrery_surface::BodyError;

use crate::platform::PlatformError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// The configured or requested orbit is invalid.
    #[error("invalid orbit: {0}")]
    Orbit(#[from] ValidationError),

    #[error("invalid central body: {0}")]
    Body(#[from] BodyError),

    #[error("failed to encode report: {0}")]
    Report(#[from] serde_json::Error),
}
