//! Kepler's equation `M = E − e·sin(E)` solved for the eccentric anomaly.
//!
//! Newton-Raphson on `f(E) = M − E + e·sin(E)` starting from `E₀ = M`, with the
//! slope taken as a central finite difference. Because `f` is strictly
//! decreasing for `e < 1` and its root lies within `M ± e`, each iterate is
//! kept inside a shrinking bracket: a Newton step that would leave it is
//! replaced by bisection. For small eccentricities the bracket never engages
//! and the iterates are those of plain Newton.

/// Convergence threshold on `|f(E)|`.
pub const TOLERANCE: f64 = 1e-8;

/// Iteration budget before the solver gives up and returns its best estimate.
pub const MAX_ITERATIONS: u32 = 100;

/// Step of the central difference used for `f'(E)`.
pub const DERIVATIVE_STEP: f64 = 1e-4;

/// Result of one solve. Never an error: a solve that exhausts its budget
/// still returns the last iterate, with `converged == false`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct KeplerSolution {
    /// Eccentric anomaly in radians.
    pub eccentric_anomaly: f64,
    /// Number of residual evaluations checked against [`TOLERANCE`].
    pub iterations: u32,
    /// `f(E)` at the returned estimate.
    pub residual: f64,
    pub converged: bool,
}

/// Solve for the eccentric anomaly using the default iteration budget.
#[must_use]
pub fn solve(mean_anomaly: f64, eccentricity: f64) -> KeplerSolution {
    solve_bounded(mean_anomaly, eccentricity, MAX_ITERATIONS)
}

/// Solve with an explicit iteration budget.
#[must_use]
pub fn solve_bounded(mean_anomaly: f64, eccentricity: f64, max_iterations: u32) -> KeplerSolution {
    let f = |ecc_anom: f64| residual(mean_anomaly, eccentricity, ecc_anom);

    // f(lo) >= 0 and f(hi) <= 0.
    let mut lo = mean_anomaly - eccentricity;
    let mut hi = mean_anomaly + eccentricity;

    let mut guess = mean_anomaly;
    let mut value = f(guess);

    for iteration in 1..=max_iterations {
        if value.abs() < TOLERANCE {
            return KeplerSolution {
                eccentric_anomaly: guess,
                iterations: iteration,
                residual: value,
                converged: true,
            };
        }

        if value > 0.0 {
            lo = guess;
        } else {
            hi = guess;
        }

        let slope = (f(guess + DERIVATIVE_STEP) - f(guess - DERIVATIVE_STEP))
            / (2.0 * DERIVATIVE_STEP);
        let newton = guess - value / slope;

        guess = if newton.is_finite() && newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };
        value = f(guess);
    }

    let converged = value.abs() < TOLERANCE;
    if !converged {
        log::warn!(
            "Kepler solve did not converge after {max_iterations} iterations \
             (M={mean_anomaly}, e={eccentricity}, residual={value:e})"
        );
    }
    KeplerSolution {
        eccentric_anomaly: guess,
        iterations: max_iterations,
        residual: value,
        converged,
    }
}

/// `M − E + e·sin(E)`.
#[inline]
#[must_use]
pub fn residual(mean_anomaly: f64, eccentricity: f64, eccentric_anomaly: f64) -> f64 {
    mean_anomaly - eccentric_anomaly + eccentricity * eccentric_anomaly.sin()
}
