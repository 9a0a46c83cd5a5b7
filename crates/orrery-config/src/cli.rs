//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orbit viewer command-line arguments.
///
/// Values given here override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orrery", about = "Keplerian orbit and sight-line simulator")]
pub struct CliArgs {
    /// Semi-major axis.
    #[arg(long)]
    pub semi_major_axis: Option<f64>,

    /// Eccentricity in [0, 1).
    #[arg(long)]
    pub eccentricity: Option<f64>,

    /// Inclination in degrees.
    #[arg(long)]
    pub inclination: Option<f64>,

    /// Longitude of the ascending node in degrees.
    #[arg(long)]
    pub longitude_ascending_node: Option<f64>,

    /// Argument of periapsis in degrees.
    #[arg(long)]
    pub argument_periapsis: Option<f64>,

    /// Vertices in the sampled orbit path.
    #[arg(long)]
    pub ellipse_resolution: Option<u32>,

    /// Playback speed in periods per second.
    #[arg(long)]
    pub speed: Option<f64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config. Values are not validated here;
    /// the session rejects out-of-range elements when it is built.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        let orbit = &mut self.orbit;
        if let Some(a) = args.semi_major_axis {
            orbit.semi_major_axis = a;
        }
        if let Some(e) = args.eccentricity {
            orbit.eccentricity = e;
        }
        if let Some(i) = args.inclination {
            orbit.inclination_deg = i;
        }
        if let Some(node) = args.longitude_ascending_node {
            orbit.longitude_ascending_node_deg = node;
        }
        if let Some(peri) = args.argument_periapsis {
            orbit.argument_periapsis_deg = peri;
        }
        if let Some(res) = args.ellipse_resolution {
            orbit.ellipse_resolution = res;
        }
        if let Some(speed) = args.speed {
            self.playback.speed = speed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
