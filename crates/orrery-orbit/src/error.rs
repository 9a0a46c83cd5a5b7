//! Error types for element validation and surface queries.

/// A rejected edit. The state the edit targeted is left unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Semi-major axis must be finite and strictly positive.
    #[error("semi-major axis must be finite and > 0, got {0}")]
    SemiMajorAxis(f64),

    /// Eccentricity must lie in `[0, 1)` to keep the orbit a closed ellipse.
    #[error("eccentricity must be in [0, 1), got {0}")]
    Eccentricity(f64),

    /// The ellipse needs at least three samples to avoid a degenerate polygon.
    #[error("ellipse resolution must be in [3, 65536], got {0}")]
    Resolution(f64),

    /// Angles and phases must be finite numbers.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Field that received the value.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Playback speed must be finite and non-negative.
    #[error("playback speed must be finite and >= 0, got {0}")]
    Speed(f64),

    /// The control surface named a field this core does not know.
    #[error("unknown element field `{0}`")]
    UnknownField(String),
}

/// Failure of the external surface-intersection service.
///
/// The sight-line probe treats both variants as "no intersection this frame".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// No surface is attached to the session.
    #[error("surface intersection service unavailable")]
    Unavailable,

    /// The service was reached but could not answer the query.
    #[error("surface query failed: {0}")]
    Query(String),
}
