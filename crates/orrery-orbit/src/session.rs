//! The simulation session: one owner for elements, phase, path, and sight record.

use glam::DVec3;

use crate::elements::{ElementField, OrbitalElements};
use crate::error::ValidationError;
use crate::position::{OrbitPosition, position_at};
use crate::probe::{PatchId, SightLineProbe, SightRecord, SurfaceQuery};
use crate::sampler::{OrbitSample, sample};
use crate::time::{PlaybackMode, TimeController};

/// Read-back of one frame, suitable for a display or a log line.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FrameReport {
    pub phase: f64,
    pub mode: PlaybackMode,
    pub position: OrbitPosition,
    /// `position.point` lifted through the orbital plane rotation.
    pub world_position: DVec3,
    pub newly_visited: Option<PatchId>,
    pub visited_count: usize,
}

/// Owns all mutable orbit state and applies control-surface edits.
///
/// Edits take effect immediately: a shape edit resamples the path and every
/// edit re-evaluates the satellite position, so the path and the satellite
/// never come from different element snapshots.
#[derive(Clone, Debug)]
pub struct OrbitSession {
    elements: OrbitalElements,
    sample: OrbitSample,
    time: TimeController,
    probe: SightLineProbe,
    position: OrbitPosition,
}

impl Default for OrbitSession {
    fn default() -> Self {
        Self::new(OrbitalElements::default(), TimeController::default())
    }
}

impl OrbitSession {
    pub fn new(elements: OrbitalElements, time: TimeController) -> Self {
        let sample = sample(&elements);
        let position = position_at(time.phase(), &elements);
        Self {
            elements,
            sample,
            time,
            probe: SightLineProbe::default(),
            position,
        }
    }

    pub fn elements(&self) -> &OrbitalElements {
        &self.elements
    }

    /// The current path polyline.
    pub fn sample(&self) -> &OrbitSample {
        &self.sample
    }

    pub fn time(&self) -> &TimeController {
        &self.time
    }

    /// Plane-local satellite position as of the last frame or edit.
    pub fn position(&self) -> &OrbitPosition {
        &self.position
    }

    pub fn sight_record(&self) -> &SightRecord {
        self.probe.record()
    }

    /// Apply one control-surface edit.
    pub fn set_element(&mut self, field: ElementField, value: f64) -> Result<(), ValidationError> {
        let result = match field {
            ElementField::SemiMajorAxis => self.elements.set_semi_major_axis(value),
            ElementField::Eccentricity => self.elements.set_eccentricity(value),
            ElementField::Inclination => self.elements.set_inclination(value),
            ElementField::LongitudeOfAscendingNode => {
                self.elements.set_longitude_ascending_node(value)
            }
            ElementField::ArgumentOfPeriapsis => self.elements.set_argument_periapsis(value),
            ElementField::EllipseResolution => self.elements.set_ellipse_resolution(value),
            ElementField::Phase => self.time.manual_set(value),
            ElementField::Speed => self.time.set_speed(value),
        };

        if let Err(err) = &result {
            log::warn!("rejected edit {field}={value}: {err}");
            return result;
        }

        log::debug!("applied edit {field}={value}");
        if field.reshapes_orbit() {
            self.sample = sample(&self.elements);
        }
        self.position = position_at(self.time.phase(), &self.elements);
        Ok(())
    }

    /// Apply an edit addressed by its control-surface name.
    pub fn set_named(&mut self, name: &str, value: f64) -> Result<(), ValidationError> {
        let field = name.parse::<ElementField>().inspect_err(|err| {
            log::warn!("rejected edit {name}={value}: {err}");
        })?;
        self.set_element(field, value)
    }

    /// Drive the phase from an angle input, in degrees.
    pub fn set_phase_degrees(&mut self, degrees: f64) -> Result<(), ValidationError> {
        self.time.manual_set_degrees(degrees)?;
        self.position = position_at(self.time.phase(), &self.elements);
        Ok(())
    }

    /// The user let go of the phase input; playback resumes from there.
    pub fn release_phase(&mut self) {
        self.time.commit();
    }

    pub fn reset_sight_record(&mut self) {
        self.probe.reset();
    }

    /// Run one frame: advance the phase (AUTO only), place the satellite, and
    /// cast the sight line.
    pub fn frame(&mut self, dt: f64, surface: Option<&dyn SurfaceQuery>) -> FrameReport {
        if self.time.mode() == PlaybackMode::Auto {
            self.time.tick(dt);
        }
        self.position = position_at(self.time.phase(), &self.elements);

        let world_position = self.elements.to_world(self.position.point);
        let newly_visited = self.probe.update(surface, world_position);

        FrameReport {
            phase: self.time.phase(),
            mode: self.time.mode(),
            position: self.position,
            world_position,
            newly_visited,
            visited_count: self.probe.record().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SurfaceError;
    use crate::probe::SightRay;
    use glam::DVec2;

    /// Patch id is the octant of the ray direction.
    struct Octants;

    impl SurfaceQuery for Octants {
        fn first_hit(&self, ray: &SightRay) -> Result<Option<PatchId>, SurfaceError> {
            let d = ray.direction;
            let id = u32::from(d.x < 0.0) | u32::from(d.y < 0.0) << 1 | u32::from(d.z < 0.0) << 2;
            Ok(Some(PatchId(id)))
        }
    }

    fn on_ellipse(session: &OrbitSession, p: DVec2) -> bool {
        let e = session.elements();
        let q = p - e.center_offset();
        let implicit = (q.x / e.semi_major_axis()).powi(2) + (q.y / e.semi_minor_axis()).powi(2);
        (implicit - 1.0).abs() < 1e-9
    }

    #[test]
    fn test_initial_state_is_consistent() {
        let session = OrbitSession::default();
        assert!(session.sample().is_closed());
        assert_eq!(session.time().mode(), PlaybackMode::Auto);
        assert!(on_ellipse(&session, session.position().point));
        assert!(session.sight_record().is_empty());
    }

    #[test]
    fn test_shape_edit_resamples_and_repositions() {
        let mut session = OrbitSession::default();
        session.set_element(ElementField::SemiMajorAxis, 5.0).unwrap();
        session.set_element(ElementField::Eccentricity, 0.2).unwrap();
        for p in session.sample().points() {
            assert!(on_ellipse(&session, *p));
        }
        assert!(on_ellipse(&session, session.position().point));
    }

    #[test]
    fn test_resolution_edit_changes_point_count() {
        let mut session = OrbitSession::default();
        session.set_named("ellipseResolution", 4.0).unwrap();
        assert_eq!(session.sample().len(), 5);
    }

    #[test]
    fn test_rejected_edit_keeps_previous_snapshot() {
        let mut session = OrbitSession::default();
        let sample = session.sample().clone();
        let elements = session.elements().clone();
        assert_eq!(
            session.set_element(ElementField::Eccentricity, 1.0),
            Err(ValidationError::Eccentricity(1.0))
        );
        assert!(session.set_element(ElementField::EllipseResolution, 2.0).is_err());
        assert_eq!(session.sample(), &sample);
        assert_eq!(session.elements(), &elements);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut session = OrbitSession::default();
        assert_eq!(
            session.set_named("mass", 1.0),
            Err(ValidationError::UnknownField("mass".to_string()))
        );
    }

    #[test]
    fn test_phase_edit_enters_manual_and_freezes_playback() {
        let mut session = OrbitSession::default();
        session.set_named("phase", 0.5).unwrap();
        let report = session.frame(1.0, None);
        assert_eq!(report.mode, PlaybackMode::Manual);
        assert_eq!(report.phase, 0.5);

        session.release_phase();
        session.set_element(ElementField::Speed, 0.1).unwrap();
        let report = session.frame(1.0, None);
        assert_eq!(report.mode, PlaybackMode::Auto);
        assert!((report.phase - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_reference_fixture_at_periapsis() {
        let elements = OrbitalElements::new(2.0, 0.5, 64).unwrap();
        let time = TimeController::new(0.0, 0.0).unwrap();
        let mut session = OrbitSession::new(elements, time);
        let report = session.frame(0.016, None);
        assert_eq!(report.position.point, DVec2::new(1.0, 0.0));
        assert_eq!(report.world_position, DVec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_frames_accumulate_sight_record() {
        let elements = OrbitalElements::new(2.0, 0.0, 64).unwrap();
        let time = TimeController::new(0.0, 0.25).unwrap();
        let mut session = OrbitSession::new(elements, time);

        let mut reported = Vec::new();
        for _ in 0..8 {
            if let Some(patch) = session.frame(0.5, Some(&Octants)).newly_visited {
                reported.push(patch);
            }
        }
        // A circle in the xy plane crosses the four z >= 0 octants.
        assert_eq!(session.sight_record().len(), 4);
        assert_eq!(reported.len(), 4);

        session.reset_sight_record();
        assert!(session.sight_record().is_empty());
    }

    #[test]
    fn test_orientation_edits_move_world_position_only() {
        let mut session = OrbitSession::default();
        let plane_before = session.position().point;
        session.set_element(ElementField::Inclination, 90.0).unwrap();
        session.set_phase_degrees(90.0).unwrap();
        let report = session.frame(0.0, None);
        assert!(on_ellipse(&session, report.position.point));
        assert_ne!(report.position.point, plane_before);
        assert!(report.world_position.z > 0.0);
        assert!(report.world_position.y.abs() < 1e-9);
    }

    #[test]
    fn test_frame_report_serializes() {
        let mut session = OrbitSession::default();
        let report = session.frame(0.1, Some(&Octants));
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"mode\":\"Auto\""));
        assert!(json.contains("\"visited_count\":1"));
    }
}
