//! Keplerian orbit core: element validation, ellipse sampling, Kepler's equation,
//! phase playback, and sight-line probing against a central body.
//!
//! Everything here runs synchronously once per frame on the caller's thread.
//! [`OrbitSession`] owns all mutable state; the other modules are free functions
//! and small state machines it composes.

mod elements;
mod error;
mod kepler;
mod position;
mod probe;
mod sampler;
mod session;
mod time;

pub use elements::{ElementField, OrbitalElements};
pub use error::{SurfaceError, ValidationError};
pub use kepler::{
    DERIVATIVE_STEP, KeplerSolution, MAX_ITERATIONS, TOLERANCE, residual, solve, solve_bounded,
};
pub use position::{OrbitPosition, position_at};
pub use probe::{PatchId, SightLineProbe, SightRay, SightRecord, SurfaceQuery};
pub use sampler::{OrbitSample, sample};
pub use session::{FrameReport, OrbitSession};
pub use time::{PlaybackMode, TimeController};
