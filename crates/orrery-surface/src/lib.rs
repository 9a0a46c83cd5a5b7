//! Discretized surface of the central body: a cube-sphere patch grid that
//! answers sight-line queries for the orbit core.

mod body;
mod face;
mod patch;

pub use body::{BodyError, MAX_SUBDIVISIONS, SphericalBody, ray_sphere_intersect};
pub use face::CubeFace;
pub use patch::SurfacePatch;
