//! Headless host for the orbit core: configuration, platform directories, a
//! fixed-timestep frame loop, and the simulation that ties a session to a
//! central body.

pub mod error;
pub mod frame_loop;
pub mod platform;
pub mod simulation;

pub use error::AppError;
pub use simulation::{RunSummary, Simulation};
