//! Orbital phase playback with manual override.

use crate::error::ValidationError;

/// Who is currently driving the phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub enum PlaybackMode {
    /// Phase advances by `speed · dt` on every tick.
    #[default]
    Auto,
    /// Phase follows direct user input; ticks are ignored.
    Manual,
}

/// Owns the phase `t ∈ [0, 1)` and the AUTO/MANUAL state machine.
///
/// ```text
/// AUTO   --tick(dt)-------> AUTO    t = (t + speed·dt) mod 1
/// AUTO   --manual_set(x)--> MANUAL  t = x mod 1
/// MANUAL --manual_set(x)--> MANUAL  t = x mod 1
/// MANUAL --commit()-------> AUTO    t kept as is
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TimeController {
    phase: f64,
    speed: f64,
    mode: PlaybackMode,
}

impl Default for TimeController {
    fn default() -> Self {
        Self {
            phase: 0.0,
            speed: 0.05,
            mode: PlaybackMode::Auto,
        }
    }
}

impl TimeController {
    /// Start in AUTO at `phase` (wrapped into `[0, 1)`).
    pub fn new(phase: f64, speed: f64) -> Result<Self, ValidationError> {
        let mut controller = Self::default();
        controller.set_speed(speed)?;
        controller.phase = wrap_phase("phase", phase)?;
        Ok(controller)
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn is_manual(&self) -> bool {
        self.mode == PlaybackMode::Manual
    }

    /// Playback speed in phase per second. Independent of the mode.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), ValidationError> {
        if !speed.is_finite() || speed < 0.0 {
            return Err(ValidationError::Speed(speed));
        }
        self.speed = speed;
        Ok(())
    }

    /// Advance the phase. Returns `false` without touching the phase while in
    /// MANUAL mode.
    pub fn tick(&mut self, dt: f64) -> bool {
        if self.mode == PlaybackMode::Manual {
            log::trace!("tick ignored while phase is manually driven");
            return false;
        }
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("ignoring tick with invalid dt={dt}");
            return false;
        }
        let advance = self.speed * dt;
        if !advance.is_finite() {
            log::warn!(
                "ignoring tick: speed {} over dt={dt} overflows the phase",
                self.speed
            );
            return false;
        }
        self.phase = wrap_unit(self.phase + wrap_unit(advance));
        true
    }

    /// Drive the phase directly. Any finite value is accepted and wrapped.
    pub fn manual_set(&mut self, fraction: f64) -> Result<(), ValidationError> {
        self.phase = wrap_phase("phase", fraction)?;
        if self.mode != PlaybackMode::Manual {
            log::debug!("phase entering manual override at t={}", self.phase);
            self.mode = PlaybackMode::Manual;
        }
        Ok(())
    }

    /// Drive the phase from an angle input: a full turn is one period.
    pub fn manual_set_degrees(&mut self, degrees: f64) -> Result<(), ValidationError> {
        if !degrees.is_finite() {
            return Err(ValidationError::NonFinite {
                field: "phase",
                value: degrees,
            });
        }
        self.manual_set(degrees / 360.0)
    }

    /// Release manual input. Playback resumes from the last manual phase.
    pub fn commit(&mut self) {
        if self.mode == PlaybackMode::Manual {
            log::debug!("phase released at t={}, resuming playback", self.phase);
            self.mode = PlaybackMode::Auto;
        }
    }
}

fn wrap_phase(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(wrap_unit(value))
    } else {
        Err(ValidationError::NonFinite { field, value })
    }
}

/// `x mod 1` into `[0, 1)`. `rem_euclid` can round up to exactly `1.0` for
/// tiny negative inputs.
fn wrap_unit(x: f64) -> f64 {
    let wrapped = x.rem_euclid(1.0);
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_in_auto_at_zero() {
        let controller = TimeController::default();
        assert_eq!(controller.mode(), PlaybackMode::Auto);
        assert_eq!(controller.phase(), 0.0);
    }

    #[test]
    fn test_tick_wraps_into_unit_interval() {
        let mut controller = TimeController::new(0.0, 0.1).unwrap();
        for _ in 0..100 {
            assert!(controller.tick(5.0));
            let t = controller.phase();
            assert!((0.0..1.0).contains(&t), "t={t}");
        }
    }

    #[test]
    fn test_tick_advances_by_speed() {
        let mut controller = TimeController::new(0.2, 0.1).unwrap();
        controller.tick(3.0);
        assert!((controller.phase() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_manual_set_then_commit_matches_native_playback() {
        let mut manual = TimeController::new(0.0, 0.1).unwrap();
        manual.manual_set(0.5).unwrap();
        assert!(manual.is_manual());
        manual.commit();
        assert_eq!(manual.mode(), PlaybackMode::Auto);

        let mut native = TimeController::new(0.0, 0.1).unwrap();
        native.tick(5.0);
        assert!((native.phase() - 0.5).abs() < 1e-12);

        for _ in 0..10 {
            manual.tick(1.0);
            native.tick(1.0);
            assert!((manual.phase() - native.phase()).abs() < 1e-9);
        }
        assert!((manual.phase() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_commit_does_not_snap_back() {
        let mut controller = TimeController::new(0.1, 0.1).unwrap();
        controller.manual_set(0.3).unwrap();
        controller.manual_set(0.7).unwrap();
        controller.commit();
        assert_eq!(controller.phase(), 0.7);
    }

    #[test]
    fn test_tick_ignored_while_manual() {
        let mut controller = TimeController::new(0.0, 0.1).unwrap();
        controller.manual_set(0.25).unwrap();
        assert!(!controller.tick(1.0));
        assert_eq!(controller.phase(), 0.25);
        assert!(controller.is_manual());
    }

    #[test]
    fn test_manual_set_wraps() {
        let mut controller = TimeController::default();
        controller.manual_set(1.0).unwrap();
        assert_eq!(controller.phase(), 0.0);
        controller.manual_set(-0.25).unwrap();
        assert!((controller.phase() - 0.75).abs() < 1e-12);
        controller.manual_set(-1e-18).unwrap();
        assert!(controller.phase() < 1.0);
    }

    #[test]
    fn test_manual_set_degrees() {
        let mut controller = TimeController::default();
        controller.manual_set_degrees(90.0).unwrap();
        assert!((controller.phase() - 0.25).abs() < 1e-12);
        controller.manual_set_degrees(-90.0).unwrap();
        assert!((controller.phase() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_inputs_rejected_without_state_change() {
        let mut controller = TimeController::new(0.4, 0.1).unwrap();
        assert!(controller.manual_set(f64::NAN).is_err());
        assert!(controller.set_speed(-1.0).is_err());
        assert!(controller.set_speed(f64::INFINITY).is_err());
        assert_eq!(controller.phase(), 0.4);
        assert_eq!(controller.speed(), 0.1);
        assert_eq!(controller.mode(), PlaybackMode::Auto);
    }

    #[test]
    fn test_overflowing_advance_keeps_phase() {
        let mut controller = TimeController::new(0.3, 1e300).unwrap();
        assert!(!controller.tick(1e10));
        assert_eq!(controller.phase(), 0.3);

        // Large but finite advances still land in [0, 1).
        assert!(controller.tick(1.0));
        let t = controller.phase();
        assert!((0.0..1.0).contains(&t), "t={t}");
    }

    #[test]
    fn test_zero_speed_freezes_playback() {
        let mut controller = TimeController::new(0.6, 0.0).unwrap();
        controller.tick(100.0);
        assert_eq!(controller.phase(), 0.6);
    }
}
