//! Headless orbit viewer: runs a configured session for a number of frames and
//! reports where the sight line has been.
//!
//! Run with: `cargo run -p orrery-app -- --frames 600 --set eccentricity=0.7`

use std::process::ExitCode;

use clap::Parser;
use orrery_app::platform::PlatformDirs;
use orrery_app::{AppError, Simulation};
use orrery_config::{CliArgs, Config};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "orrery", about = "Keplerian orbit and sight-line simulator")]
struct AppArgs {
    #[command(flatten)]
    config: CliArgs,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Control-surface edit applied before the run, as `field=value`.
    /// May be repeated; edits apply in order.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_edit)]
    edits: Vec<(String, f64)>,

    /// Resume playback after a `phase` edit instead of holding it.
    #[arg(long)]
    release_phase: bool,

    /// Print the run summary as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn parse_edit(raw: &str) -> Result<(String, f64), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{raw}`"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for {field}: {e}"))?;
    Ok((field.trim().to_string(), value))
}

fn main() -> ExitCode {
    let args = AppArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("orrery: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: AppArgs) -> Result<(), AppError> {
    let dirs = match &args.config.config {
        Some(dir) => PlatformDirs::from_config_dir(dir.clone()),
        None => PlatformDirs::resolve()?,
    };
    dirs.create_dirs()?;

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(&args.config);

    orrery_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    info!("Config: {}", dirs.config_dir.display());

    let mut sim = Simulation::from_config(&config)?;
    for (field, value) in &args.edits {
        if let Err(e) = sim.apply_edit(field, *value) {
            warn!("skipping edit {field}={value}: {e}");
        }
    }
    if args.release_phase {
        sim.release_phase();
    }

    let summary = sim.run(args.frames);
    info!(
        "Ran {} frames ({:.2}s simulated): {} patches visited, {} non-converged solves",
        summary.frames,
        summary.sim_time,
        summary.visited.len(),
        summary.non_converged,
    );
    if let Some(last) = &summary.last {
        info!(
            "Final phase {:.4} ({:?}) at ({:.4}, {:.4})",
            last.phase, last.mode, last.position.point.x, last.position.point.y
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edit() {
        assert_eq!(
            parse_edit("eccentricity=0.25"),
            Ok(("eccentricity".to_string(), 0.25))
        );
        assert_eq!(parse_edit(" phase = 0.5 "), Ok(("phase".to_string(), 0.5)));
        assert!(parse_edit("eccentricity").is_err());
        assert!(parse_edit("eccentricity=high").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = AppArgs::try_parse_from([
            "orrery",
            "--frames",
            "10",
            "--set",
            "phase=0.25",
            "--set",
            "speed=0.1",
            "--eccentricity",
            "0.3",
            "--json",
        ])
        .unwrap();
        assert_eq!(args.frames, 10);
        assert_eq!(args.edits.len(), 2);
        assert_eq!(args.config.eccentricity, Some(0.3));
        assert!(args.json);
        assert!(!args.release_phase);
    }
}
