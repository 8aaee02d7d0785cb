//! Headless frame loop: one engine per screen tile, an orbiting camera, and
//! optional JSON export of the final frame.

use std::path::Path;

use geodesic_config::{CliArgs, Config};
use geodesic_mesh::{
    Camera, CullStats, CullView, Frame, GeodesicEngine, MeshSnapshot, TopologyError, ViewportRect,
};
use glam::Vec3;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Frames between checks of `config.ron` for changes.
pub(crate) const RELOAD_INTERVAL: u32 = 30;

/// Errors that end the frame loop.
#[derive(Debug, thiserror::Error)]
pub(crate) enum DriverError {
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error("failed to write export {path}: {source}")]
    Export {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode export: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Camera on a circle of `orbit_radius` at `height`, looking at the origin.
pub(crate) fn orbit_camera(config: &Config, frame: u32) -> Camera {
    let cam = &config.camera;
    let angle = frame as f32 * cam.orbit_speed;
    let eye = Vec3::new(cam.orbit_radius * angle.cos(), cam.height, cam.orbit_radius * angle.sin());
    Camera {
        near: cam.near,
        far: cam.far,
        ..Camera::look_at(eye, Vec3::ZERO, Vec3::Y, cam.projection())
    }
}

struct Tile {
    rect: ViewportRect,
    engine: GeodesicEngine,
}

/// Totals over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RunSummary {
    /// Frames stepped.
    pub frames: u32,
    /// Tiles in effect at the end of the run.
    pub tiles: usize,
    /// Triangles emitted, summed over every tile and frame.
    pub triangles_emitted: usize,
    /// Triangles removed by culling, summed over every tile and frame.
    pub triangles_culled: usize,
}

fn build_tiles(config: &Config) -> Vec<Tile> {
    let settings = config.mesh.settings();
    let params = config.shader.params();
    config
        .screen
        .tiling()
        .rects()
        .map(|rect| {
            let mut engine = GeodesicEngine::new(settings);
            engine.set_params(params);
            Tile { rect, engine }
        })
        .collect()
}

/// `file` with the command-line overrides applied, then validated.
fn effective_config(file: &Config, overrides: &CliArgs) -> Config {
    let mut config = file.clone();
    config.apply_cli_overrides(overrides);
    let adjusted = config.validate();
    if adjusted > 0 {
        info!("Adjusted {adjusted} out-of-range config values");
    }
    config
}

/// Drives one engine per tile through `config.debug.frames` frames.
pub(crate) struct Driver {
    /// Config as last read from `config.ron`, before overrides.
    file: Config,
    overrides: CliArgs,
    /// `file` with `overrides` applied; what the frames run with.
    config: Config,
    tiles: Vec<Tile>,
}

impl Driver {
    #[cfg(test)]
    pub(crate) fn new(config: Config) -> Self {
        Self::with_overrides(config, CliArgs::default())
    }

    /// Driver for the config read from disk, with `overrides` kept on top of
    /// it across reloads.
    pub(crate) fn with_overrides(file: Config, overrides: CliArgs) -> Self {
        let config = effective_config(&file, &overrides);
        let tiles = build_tiles(&config);
        Self {
            file,
            overrides,
            config,
            tiles,
        }
    }

    /// The config currently in effect.
    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    /// Swap in a config read from disk and re-apply the overrides. Engines
    /// start a new generation only if the mesh settings changed; a new tiling
    /// rebuilds every tile.
    pub(crate) fn apply_config(&mut self, file: Config) {
        let config = effective_config(&file, &self.overrides);
        self.file = file;
        if config.screen != self.config.screen {
            self.tiles = build_tiles(&config);
        } else {
            for tile in &mut self.tiles {
                tile.engine.ensure(config.mesh.settings());
                tile.engine.set_params(config.shader.params());
            }
        }
        self.config = config;
    }

    /// Run one frame for every tile. Returns one [`Frame`] per tile.
    pub(crate) fn step(&mut self, frame_index: u32) -> Result<Vec<Frame>, DriverError> {
        let camera = orbit_camera(&self.config, frame_index);
        let cull = &self.config.cull;

        let mut frames = Vec::with_capacity(self.tiles.len());
        for (index, tile) in self.tiles.iter_mut().enumerate() {
            let view = CullView::new(&camera, cull.cushion).with_rect(tile.rect);
            let frame = tile.engine.frame(cull.enabled.then_some(&view))?;
            debug!(
                frame = frame_index,
                tile = index,
                triangles = frame.mesh.triangle_count(),
                vertices = frame.mesh.vertex_count(),
                vertex_bytes = frame.mesh.vertex_buffer_bytes(),
                index_bytes = frame.mesh.index_buffer_bytes(),
                "tile frame"
            );
            frames.push(frame);
        }
        Ok(frames)
    }

    /// Re-read `config.ron` from `config_dir` and apply it if it changed
    /// since the last read.
    fn poll_reload(&mut self, config_dir: &Path) {
        match self.file.reload(config_dir) {
            Ok(Some(file)) => {
                info!("Applying reloaded config");
                self.apply_config(file);
            }
            Ok(None) => {}
            Err(e) => warn!("Config reload failed: {e}"),
        }
    }

    /// Run every configured frame, returning the totals and the last frame
    /// of tile 0. With a `config_dir`, the config file is polled for changes
    /// every [`RELOAD_INTERVAL`] frames.
    pub(crate) fn run(
        &mut self,
        config_dir: Option<&Path>,
    ) -> Result<(RunSummary, Option<Frame>), DriverError> {
        let mut summary = RunSummary {
            tiles: self.tiles.len(),
            ..RunSummary::default()
        };
        let mut last = None;

        let mut frame_index = 0;
        while frame_index < self.config.debug.frames {
            if frame_index > 0
                && frame_index % RELOAD_INTERVAL == 0
                && let Some(dir) = config_dir
            {
                self.poll_reload(dir);
                summary.tiles = self.tiles.len();
            }
            let frames = self.step(frame_index)?;
            let emitted: usize = frames.iter().map(|f| f.mesh.triangle_count()).sum();
            let culled: usize = frames
                .iter()
                .filter_map(|f| f.cull)
                .map(|c| c.culled_triangles)
                .sum();
            info!(
                "Frame {frame_index}: {emitted} triangles emitted, {culled} culled across {} tiles",
                frames.len()
            );
            summary.frames += 1;
            summary.triangles_emitted += emitted;
            summary.triangles_culled += culled;
            last = frames.into_iter().next();
            frame_index += 1;
        }

        Ok((summary, last))
    }
}

#[derive(Serialize)]
struct ExportedStats {
    culled_triangles: usize,
    removed_vertices: usize,
}

impl From<CullStats> for ExportedStats {
    fn from(stats: CullStats) -> Self {
        Self {
            culled_triangles: stats.culled_triangles,
            removed_vertices: stats.removed_vertices,
        }
    }
}

#[derive(Serialize)]
struct ExportedFrame<'a> {
    generation: u64,
    variant: String,
    subdivision_steps: usize,
    isolevel: f32,
    settings: u32,
    cull: Option<ExportedStats>,
    mesh: &'a MeshSnapshot,
}

/// Write `frame` as pretty JSON.
pub(crate) fn export_frame(config: &Config, frame: &Frame, path: &Path) -> Result<(), DriverError> {
    let exported = ExportedFrame {
        generation: frame.generation,
        variant: config.mesh.variant.to_string(),
        subdivision_steps: config.mesh.subdivision_steps,
        isolevel: frame.params.isolevel,
        settings: frame.params.flags.bits(),
        cull: frame.cull.map(ExportedStats::from),
        mesh: &frame.mesh,
    };
    let json = serde_json::to_string_pretty(&exported)?;
    std::fs::write(path, json).map_err(|source| DriverError::Export {
        path: path.display().to_string(),
        source,
    })?;
    info!("Exported frame to {}", path.display());
    Ok(())
}
