//! A spinning, tilted sphere whose surface is divided into cube-sphere patches.

use std::f64::consts::TAU;

use glam::{DQuat, DVec3};
use orrery_orbit::{PatchId, SightRay, SurfaceError, SurfaceQuery};

use crate::SurfacePatch;

/// Upper bound on cells per face edge; keeps `6 · n²` ids within `u32`.
pub const MAX_SUBDIVISIONS: u32 = 4096;

/// Invalid body construction parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BodyError {
    #[error("body radius must be finite and > 0, got {0}")]
    Radius(f64),

    #[error("subdivisions must be in [1, 4096], got {0}")]
    Subdivisions(u32),

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },
}

/// Central body: a sphere at `center` whose patch grid turns with the body.
///
/// The orientation is a fixed axial tilt about the reference `z` axis applied
/// after the accumulated spin about the body's own `y` (polar) axis.
#[derive(Clone, Debug, PartialEq)]
pub struct SphericalBody {
    center: DVec3,
    radius: f64,
    subdivisions: u32,
    axial_tilt: f64,
    spin_rate: f64,
    spin_angle: f64,
}

impl SphericalBody {
    pub fn new(center: DVec3, radius: f64, subdivisions: u32) -> Result<Self, BodyError> {
        if !center.is_finite() {
            return Err(BodyError::NonFinite {
                field: "center",
                value: center.max_element(),
            });
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(BodyError::Radius(radius));
        }
        if subdivisions == 0 || subdivisions > MAX_SUBDIVISIONS {
            return Err(BodyError::Subdivisions(subdivisions));
        }
        Ok(Self {
            center,
            radius,
            subdivisions,
            axial_tilt: 0.0,
            spin_rate: 0.0,
            spin_angle: 0.0,
        })
    }

    /// Tilt of the polar axis in degrees, applied about the reference `z` axis.
    pub fn with_axial_tilt(mut self, degrees: f64) -> Result<Self, BodyError> {
        if !degrees.is_finite() {
            return Err(BodyError::NonFinite {
                field: "axial_tilt",
                value: degrees,
            });
        }
        self.axial_tilt = degrees.to_radians();
        Ok(self)
    }

    /// Spin about the polar axis in radians per second.
    pub fn with_spin_rate(mut self, radians_per_second: f64) -> Result<Self, BodyError> {
        if !radians_per_second.is_finite() {
            return Err(BodyError::NonFinite {
                field: "spin_rate",
                value: radians_per_second,
            });
        }
        self.spin_rate = radians_per_second;
        Ok(self)
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn subdivisions(&self) -> u32 {
        self.subdivisions
    }

    pub fn patch_count(&self) -> u32 {
        6 * self.subdivisions * self.subdivisions
    }

    pub fn spin_angle(&self) -> f64 {
        self.spin_angle
    }

    /// Advance the spin by `dt` seconds.
    pub fn spin(&mut self, dt: f64) {
        self.spin_angle = (self.spin_angle + self.spin_rate * dt).rem_euclid(TAU);
    }

    /// Rotation from the body frame into the reference frame.
    pub fn orientation(&self) -> DQuat {
        DQuat::from_rotation_z(-self.axial_tilt) * DQuat::from_rotation_y(self.spin_angle)
    }

    /// The patch under a reference-frame point, projected radially from the center.
    pub fn patch_at(&self, point: DVec3) -> SurfacePatch {
        let local = self.orientation().inverse() * (point - self.center);
        SurfacePatch::from_direction(local, self.subdivisions)
    }
}

impl SurfaceQuery for SphericalBody {
    fn first_hit(&self, ray: &SightRay) -> Result<Option<PatchId>, SurfaceError> {
        if !ray.origin.is_finite() || !ray.direction.is_finite() {
            return Err(SurfaceError::Query(format!("non-finite ray {ray:?}")));
        }
        let Some((near, far)) =
            ray_sphere_intersect(ray.origin, ray.direction, self.center, self.radius)
        else {
            return Ok(None);
        };

        // From inside the body the first surface crossing is the exit point.
        let distance = if near >= 0.0 { near } else { far };
        if distance < 0.0 {
            return Ok(None);
        }

        let patch = self.patch_at(ray.at(distance));
        log::trace!("sight line hit {patch:?} at distance {distance}");
        Ok(Some(patch.id(self.subdivisions)))
    }
}

/// Ray-sphere intersection for a unit-length `dir`.
///
/// Returns the entry and exit distances along the ray (either may be negative,
/// i.e. behind the origin), or `None` if the line misses the sphere.
#[must_use]
pub fn ray_sphere_intersect(
    origin: DVec3,
    dir: DVec3,
    center: DVec3,
    radius: f64,
) -> Option<(f64, f64)> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    Some((-b - sqrt_disc, -b + sqrt_disc))
}
