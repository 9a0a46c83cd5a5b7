//! Closed polyline approximation of the orbit ellipse.

use std::f64::consts::TAU;

use glam::DVec2;

use crate::OrbitalElements;

/// Evenly spaced points around the ellipse, plane-local, focus at the origin.
///
/// The last point repeats the first so the path can be drawn as an open strip.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitSample {
    points: Vec<DVec2>,
}

impl OrbitSample {
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of distinct vertices (the closing duplicate excluded).
    pub fn resolution(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn is_closed(&self) -> bool {
        self.points.len() > 1 && self.points.first() == self.points.last()
    }
}

/// Sample the ellipse by the parametric angle, not by time.
///
/// Produces `resolution + 1` points. This is a shape approximation: use
/// [`position_at`](crate::position_at) to locate the satellite.
#[must_use]
pub fn sample(elements: &OrbitalElements) -> OrbitSample {
    let n = elements.ellipse_resolution() as usize;
    let a = elements.semi_major_axis();
    let b = elements.semi_minor_axis();
    let offset = elements.center_offset();

    let mut points = Vec::with_capacity(n + 1);
    for i in 0..n {
        let (sin_t, cos_t) = (i as f64 / n as f64 * TAU).sin_cos();
        points.push(DVec2::new(cos_t * a + offset.x, sin_t * b + offset.y));
    }
    if let Some(&first) = points.first() {
        points.push(first);
    }

    log::trace!("sampled orbit ellipse with {n} vertices (a={a}, b={b})");
    OrbitSample { points }
}
