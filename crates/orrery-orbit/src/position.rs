//! Time-to-position mapping through the mean and eccentric anomalies.

use std::f64::consts::TAU;

use glam::DVec2;

use crate::OrbitalElements;
use crate::kepler;

/// Where the satellite is at one phase value, in the orbit's own plane.
///
/// The focus sits at the origin and periapsis lies on `+x`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct OrbitPosition {
    pub point: DVec2,
    pub mean_anomaly: f64,
    pub eccentric_anomaly: f64,
    /// Angle from periapsis as seen from the focus, in `(-π, π]`.
    pub true_anomaly: f64,
    /// Distance from the focus.
    pub radius: f64,
    pub iterations: u32,
    /// Mirrors [`KeplerSolution::converged`](crate::KeplerSolution::converged).
    pub converged: bool,
}

/// Evaluate the satellite position at phase `t` (fraction of one period).
///
/// Uniform in mean anomaly, so equal phase steps sweep equal areas about the
/// focus. This is not the parameterization used by [`sample`](crate::sample).
#[must_use]
pub fn position_at(t: f64, elements: &OrbitalElements) -> OrbitPosition {
    let mean_anomaly = t * TAU;
    let e = elements.eccentricity();
    let solution = kepler::solve(mean_anomaly, e);
    let ecc_anom = solution.eccentric_anomaly;

    let (sin_e, cos_e) = ecc_anom.sin_cos();
    let offset = elements.center_offset();
    let point = DVec2::new(
        cos_e * elements.semi_major_axis() + offset.x,
        sin_e * elements.semi_minor_axis() + offset.y,
    );

    let true_anomaly = 2.0
        * ((1.0 + e).sqrt() * (ecc_anom / 2.0).sin())
            .atan2((1.0 - e).sqrt() * (ecc_anom / 2.0).cos());
    let true_anomaly = wrap_pi(true_anomaly);

    OrbitPosition {
        point,
        mean_anomaly,
        eccentric_anomaly: ecc_anom,
        true_anomaly,
        radius: point.length(),
        iterations: solution.iterations,
        converged: solution.converged,
    }
}

fn wrap_pi(angle: f64) -> f64 {
    let wrapped = (angle + TAU / 2.0).rem_euclid(TAU) - TAU / 2.0;
    if wrapped <= -TAU / 2.0 {
        wrapped + TAU
    } else {
        wrapped
    }
}
