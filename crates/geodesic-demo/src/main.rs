//! Headless driver for the geodesic mesh engine.
//!
//! Loads `config.ron`, applies CLI overrides, then runs the configured number
//! of frames with a camera orbiting the unit sphere, culling each screen tile
//! separately and logging what every frame emits.

mod driver;

use std::process::ExitCode;

use clap::Parser;
use geodesic_config::{CliArgs, Config, default_config_dir};
use tracing::{error, info};

use crate::driver::{Driver, export_frame};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = match args.config.clone().map_or_else(default_config_dir, Ok) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Load or create config; CLI overrides stay on top of it across reloads
    let file = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    let mut logging = file.clone();
    logging.apply_cli_overrides(&args);

    // Initialize logging with config and debug settings
    let log_dir = config_dir.join("logs");
    geodesic_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&logging));

    let export = args.export.clone();
    let mut driver = Driver::with_overrides(file, args);
    let config = driver.config();
    info!(
        "Running {} frames: {} + {} subdivisions, {}x{} tiles, cull {}",
        config.debug.frames,
        config.mesh.variant,
        config.mesh.subdivision_steps,
        config.screen.tiles_wide,
        config.screen.tiles_tall,
        if config.cull.enabled { "on" } else { "off" },
    );

    let (summary, last) = match driver.run(Some(&config_dir)) {
        Ok(result) => result,
        Err(e) => {
            error!("Frame loop failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        "Finished {} frames over {} tiles: {} triangles emitted, {} culled",
        summary.frames, summary.tiles, summary.triangles_emitted, summary.triangles_culled
    );

    if let Some(path) = &export {
        let Some(frame) = last else {
            error!("No frame to export; debug.frames is 0");
            return ExitCode::FAILURE;
        };
        if let Err(e) = export_frame(driver.config(), &frame, path) {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
