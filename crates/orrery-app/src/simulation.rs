//! A session bound to a spinning central body and a frame loop.

use glam::DVec3;
use orrery_config::Config;
use orrery_orbit::{FrameReport, OrbitSession, OrbitalElements, TimeController, ValidationError};
use orrery_surface::{SphericalBody, SurfacePatch};
use serde::Serialize;
use tracing::{debug, info};

use crate::AppError;
use crate::frame_loop::FrameLoop;

/// What a headless run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub updates: u64,
    pub sim_time: f64,
    /// Fraction of a step still pending in the frame loop.
    pub alpha: f64,
    pub path_vertices: usize,
    /// Steps whose Kepler solve exhausted its iteration budget.
    pub non_converged: u64,
    /// Visited patch ids, ascending.
    pub visited: Vec<u32>,
    pub last: Option<FrameReport>,
}

pub struct Simulation {
    session: OrbitSession,
    body: SphericalBody,
    frames: FrameLoop,
    non_converged: u64,
    last: Option<FrameReport>,
}

impl Simulation {
    /// Build the initial session and body. Out-of-range settings are rejected
    /// with the same validation the control surface gets.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let orbit = &config.orbit;
        let mut elements = OrbitalElements::new(
            orbit.semi_major_axis,
            orbit.eccentricity,
            orbit.ellipse_resolution,
        )?;
        elements.set_inclination(orbit.inclination_deg)?;
        elements.set_longitude_ascending_node(orbit.longitude_ascending_node_deg)?;
        elements.set_argument_periapsis(orbit.argument_periapsis_deg)?;

        let playback = &config.playback;
        let time = TimeController::new(playback.initial_phase, playback.speed)?;

        let body_cfg = &config.body;
        let body = SphericalBody::new(DVec3::ZERO, body_cfg.radius, body_cfg.subdivisions)?
            .with_axial_tilt(body_cfg.axial_tilt_deg)?
            .with_spin_rate(body_cfg.spin_rate)?;

        info!(
            "Orbit: a={} e={} i={}° Ω={}° ω={}° ({} path vertices)",
            elements.semi_major_axis(),
            elements.eccentricity(),
            elements.inclination(),
            elements.longitude_ascending_node(),
            elements.argument_periapsis(),
            elements.ellipse_resolution(),
        );
        info!(
            "Body: radius={} patches={} tilt={}° spin={} rad/s",
            body.radius(),
            body.patch_count(),
            body_cfg.axial_tilt_deg,
            body_cfg.spin_rate,
        );

        Ok(Self {
            session: OrbitSession::new(elements, time),
            body,
            frames: FrameLoop::new(playback.fixed_dt),
            non_converged: 0,
            last: None,
        })
    }

    pub fn session(&self) -> &OrbitSession {
        &self.session
    }

    pub fn body(&self) -> &SphericalBody {
        &self.body
    }

    /// Forward a control-surface edit to the session.
    pub fn apply_edit(&mut self, name: &str, value: f64) -> Result<(), ValidationError> {
        self.session.set_named(name, value)
    }

    pub fn release_phase(&mut self) {
        self.session.release_phase();
    }

    /// Run `frame_count` frames, each one simulation step long.
    pub fn run(&mut self, frame_count: u32) -> RunSummary {
        let frame_time = self.frames.fixed_dt();
        for _ in 0..frame_count {
            let Self {
                session,
                body,
                frames,
                non_converged,
                last,
            } = self;
            frames.advance(frame_time, |dt| {
                let report = step(session, body, dt);
                if !report.position.converged {
                    *non_converged += 1;
                }
                *last = Some(report);
            });
        }
        self.summary()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            frames: self.frames.frame_count(),
            updates: self.frames.update_count(),
            sim_time: self.frames.total_sim_time(),
            alpha: self.frames.alpha(),
            path_vertices: self.session.sample().resolution(),
            non_converged: self.non_converged,
            visited: self
                .session
                .sight_record()
                .sorted()
                .into_iter()
                .map(|p| p.0)
                .collect(),
            last: self.last,
        }
    }
}

/// One simulation step: turn the body, then let the session tick, place the
/// satellite, and cast its sight line.
fn step(session: &mut OrbitSession, body: &mut SphericalBody, dt: f64) -> FrameReport {
    body.spin(dt);
    let report = session.frame(dt, Some(&*body));

    if let Some(patch) = report.newly_visited {
        let cell = SurfacePatch::from_id(patch, body.subdivisions());
        info!(
            patch = patch.0,
            cell = ?cell,
            phase = report.phase,
            "sight line reached new patch"
        );
    } else {
        debug!(phase = report.phase, "no new patch");
    }
    report
}
