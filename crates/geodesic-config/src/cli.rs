//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use geodesic_mesh::BaseVariant;

use crate::Config;

/// Geodesic mesh driver command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "geodesic", about = "Geodesic sphere subdivision and culling")]
pub struct CliArgs {
    /// Base polyhedron (icosahedron or cube).
    #[arg(long)]
    pub variant: Option<BaseVariant>,

    /// Midpoint subdivisions per frame.
    #[arg(long)]
    pub steps: Option<usize>,

    /// Enable or disable the cull pass.
    #[arg(long)]
    pub cull: Option<bool>,

    /// Cull cushion, as a fraction of the viewport.
    #[arg(long)]
    pub cushion: Option<f32>,

    /// Screen tiles per row.
    #[arg(long)]
    pub tiles_wide: Option<u32>,

    /// Screen tiles per column.
    #[arg(long)]
    pub tiles_tall: Option<u32>,

    /// Frames to run.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the last frame of the first tile as JSON to this path.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(variant) = args.variant {
            self.mesh.variant = variant;
        }
        if let Some(steps) = args.steps {
            self.mesh.subdivision_steps = steps;
        }
        if let Some(enabled) = args.cull {
            self.cull.enabled = enabled;
        }
        if let Some(cushion) = args.cushion {
            self.cull.cushion = cushion;
        }
        if let Some(wide) = args.tiles_wide {
            self.screen.tiles_wide = wide;
        }
        if let Some(tall) = args.tiles_tall {
            self.screen.tiles_tall = tall;
        }
        if let Some(frames) = args.frames {
            self.debug.frames = frames;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
