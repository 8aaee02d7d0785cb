//! Configuration structs with defaults, validation and RON persistence.

use std::path::{Path, PathBuf};

use geodesic_mesh::{
    BaseVariant, CASE_MASK, MAX_STEP_ANGLE, MAX_SUBDIVISION_STEPS, MeshSettings, Projection,
    ScreenTiling, SettingsFlags, ShaderParams,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted config inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Platform config directory for this application (`<config>/geodesic`).
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("geodesic"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base polyhedron and subdivision depth.
    pub mesh: MeshConfig,
    /// Cull pass settings.
    pub cull: CullConfig,
    /// Orbiting camera.
    pub camera: CameraConfig,
    /// Screen tiling.
    pub screen: ScreenConfig,
    /// Isosurface pass parameters carried with every frame.
    pub shader: ShaderConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Mesh generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshConfig {
    /// Starting polyhedron.
    pub variant: BaseVariant,
    /// Midpoint subdivisions per frame.
    pub subdivision_steps: usize,
}

/// Cull pass settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CullConfig {
    /// Run the cull pass at all.
    pub enabled: bool,
    /// Screen-space margin, as a fraction of the viewport, in `[0, 1]`.
    pub cushion: f32,
}

/// Camera orbiting the unit sphere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Horizontal distance from the sphere centre.
    pub orbit_radius: f32,
    /// Height above the equator plane.
    pub height: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Viewport width / height.
    pub aspect_ratio: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// Orbit speed in radians per frame.
    pub orbit_speed: f32,
}

/// How the screen is split into independently culled tiles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScreenConfig {
    /// Tiles per row.
    pub tiles_wide: u32,
    /// Tiles per column.
    pub tiles_tall: u32,
}

/// Isosurface shader parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShaderConfig {
    /// Field value treated as the surface.
    pub isolevel: f32,
    /// Smoothing factor applied between frames.
    pub lerp_speed: f32,
    /// Sample shells per ray.
    pub depth: u32,
    /// Angle between neighbouring sample rays, in radians, in `[0, π/4]`.
    pub step_angle: f32,
    /// Forced inside/outside pattern for the six sample corners.
    pub case: u32,
    /// Interpolate surface crossings between samples.
    pub interpolate: bool,
    /// Stop each ray at its first crossing.
    pub truncate: bool,
    /// Give every vertex a random colour.
    pub random_vertex_coloring: bool,
    /// Apply the volume rules.
    pub volume_rules: bool,
    /// Apply the facing rules.
    pub facing_rules: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Frames the demo driver runs before exiting.
    pub frames: u32,
}

// --- Default implementations ---

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            variant: BaseVariant::Icosahedron,
            subdivision_steps: 200,
        }
    }
}

impl Default for CullConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cushion: 0.1,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            orbit_radius: 2.5,
            height: 0.5,
            fov_degrees: 60.0,
            aspect_ratio: 16.0 / 9.0,
            near: 0.01,
            far: 100.0,
            orbit_speed: 0.05,
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            tiles_wide: 1,
            tiles_tall: 1,
        }
    }
}

impl Default for ShaderConfig {
    fn default() -> Self {
        let params = ShaderParams::default();
        Self {
            isolevel: params.isolevel,
            lerp_speed: params.lerp_speed,
            depth: params.depth,
            step_angle: params.step_angle,
            case: params.case,
            interpolate: false,
            truncate: false,
            random_vertex_coloring: false,
            volume_rules: false,
            facing_rules: false,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            frames: 60,
        }
    }
}

// --- Conversions into mesh types ---

impl MeshConfig {
    /// Settings for a [`geodesic_mesh::GeodesicEngine`] generation.
    pub fn settings(&self) -> MeshSettings {
        MeshSettings {
            variant: self.variant,
            subdivision_steps: self.subdivision_steps,
        }
    }
}

impl CameraConfig {
    /// Perspective projection described by this config.
    pub fn projection(&self) -> Projection {
        Projection::Perspective {
            fov_y: self.fov_degrees.to_radians(),
            aspect_ratio: self.aspect_ratio,
        }
    }
}

impl ScreenConfig {
    /// Tile grid for the cull pass.
    pub fn tiling(&self) -> ScreenTiling {
        ScreenTiling::new(self.tiles_wide, self.tiles_tall)
    }
}

impl ShaderConfig {
    /// Packed flags as the shader expects them.
    pub fn flags(&self) -> SettingsFlags {
        let mut flags = SettingsFlags::empty();
        flags.set(SettingsFlags::INTERPOLATE, self.interpolate);
        flags.set(SettingsFlags::TRUNCATE, self.truncate);
        flags.set(SettingsFlags::RANDOM_VERTEX_COLORING, self.random_vertex_coloring);
        flags.set(SettingsFlags::VOLUME_RULES, self.volume_rules);
        flags.set(SettingsFlags::FACING_RULES, self.facing_rules);
        flags
    }

    /// Parameters attached to every emitted frame.
    pub fn params(&self) -> ShaderParams {
        ShaderParams {
            isolevel: self.isolevel,
            lerp_speed: self.lerp_speed,
            depth: self.depth,
            step_angle: self.step_angle,
            case: self.case,
            flags: self.flags(),
        }
    }
}

// --- Validation ---

impl Config {
    /// Pull out-of-range values back into range, warning for each one.
    ///
    /// Returns the number of fields that were adjusted.
    pub fn validate(&mut self) -> usize {
        let mut adjusted = 0;

        if self.mesh.subdivision_steps > MAX_SUBDIVISION_STEPS {
            log::warn!(
                "mesh.subdivision_steps {} above {MAX_SUBDIVISION_STEPS}, using {MAX_SUBDIVISION_STEPS}",
                self.mesh.subdivision_steps
            );
            self.mesh.subdivision_steps = MAX_SUBDIVISION_STEPS;
            adjusted += 1;
        }
        if !(0.0..=1.0).contains(&self.cull.cushion) {
            let clamped = if self.cull.cushion.is_nan() {
                CullConfig::default().cushion
            } else {
                self.cull.cushion.clamp(0.0, 1.0)
            };
            log::warn!("cull.cushion {} out of [0, 1], using {clamped}", self.cull.cushion);
            self.cull.cushion = clamped;
            adjusted += 1;
        }
        if self.screen.tiles_wide == 0 {
            log::warn!("screen.tiles_wide is 0, using 1");
            self.screen.tiles_wide = 1;
            adjusted += 1;
        }
        if self.screen.tiles_tall == 0 {
            log::warn!("screen.tiles_tall is 0, using 1");
            self.screen.tiles_tall = 1;
            adjusted += 1;
        }

        let defaults = CameraConfig::default();
        if !(self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0) {
            log::warn!(
                "camera.fov_degrees {} out of (0, 180), using {}",
                self.camera.fov_degrees,
                defaults.fov_degrees
            );
            self.camera.fov_degrees = defaults.fov_degrees;
            adjusted += 1;
        }
        if !(self.camera.aspect_ratio > 0.0 && self.camera.aspect_ratio.is_finite()) {
            log::warn!(
                "camera.aspect_ratio {} is not positive, using {}",
                self.camera.aspect_ratio,
                defaults.aspect_ratio
            );
            self.camera.aspect_ratio = defaults.aspect_ratio;
            adjusted += 1;
        }
        if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
            log::warn!(
                "camera clip range {}..{} is invalid, using {}..{}",
                self.camera.near,
                self.camera.far,
                defaults.near,
                defaults.far
            );
            self.camera.near = defaults.near;
            self.camera.far = defaults.far;
            adjusted += 1;
        }

        if !(0.0..=MAX_STEP_ANGLE).contains(&self.shader.step_angle) {
            let clamped = if self.shader.step_angle.is_nan() {
                0.0
            } else {
                self.shader.step_angle.clamp(0.0, MAX_STEP_ANGLE)
            };
            log::warn!(
                "shader.step_angle {} out of [0, {MAX_STEP_ANGLE}], using {clamped}",
                self.shader.step_angle
            );
            self.shader.step_angle = clamped;
            adjusted += 1;
        }
        if self.shader.case & !CASE_MASK != 0 {
            log::warn!(
                "shader.case {} has bits past the six sample corners, using {}",
                self.shader.case,
                self.shader.case & CASE_MASK
            );
            self.shader.case &= CASE_MASK;
            adjusted += 1;
        }

        adjusted
    }
}

// --- Load / Save / Reload ---

fn read(config_path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: config_path.to_path_buf(),
        source,
    })
}

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path,
            source,
        })?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let ron_str =
            ron::ser::to_string_pretty(&Config::default(), ron::ser::PrettyConfig::new()).unwrap();
        assert!(ron_str.contains("variant: icosahedron"));
        assert!(ron_str.contains("subdivision_steps: 200"));
        assert!(ron_str.contains("tiles_wide: 1"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.mesh.variant = BaseVariant::Cube;
        config.shader.truncate = true;
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let config: Config = ron::from_str("(mesh: (subdivision_steps: 7))").unwrap();
        assert_eq!(config.mesh.subdivision_steps, 7);
        assert_eq!(config.mesh.variant, BaseVariant::Icosahedron);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_clamps_cushion_and_tiles() {
        let mut config = Config::default();
        config.cull.cushion = 3.0;
        config.screen.tiles_wide = 0;
        assert_eq!(config.validate(), 2);
        assert_eq!(config.cull.cushion, 1.0);
        assert_eq!(config.screen.tiles_wide, 1);

        config.cull.cushion = -0.5;
        assert_eq!(config.validate(), 1);
        assert_eq!(config.cull.cushion, 0.0);
    }

    #[test]
    fn test_validate_repairs_camera() {
        let mut config = Config::default();
        config.camera.fov_degrees = 0.0;
        config.camera.near = 5.0;
        config.camera.far = 1.0;
        assert_eq!(config.validate(), 2);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_validate_caps_subdivision_steps() {
        let mut config = Config::default();
        config.mesh.subdivision_steps = usize::MAX;
        assert_eq!(config.validate(), 1);
        assert_eq!(config.mesh.subdivision_steps, MAX_SUBDIVISION_STEPS);
    }

    #[test]
    fn test_validate_repairs_shader() {
        let mut config = Config::default();
        config.shader.step_angle = 2.0;
        config.shader.case = 0b1100_0001;
        assert_eq!(config.validate(), 2);
        assert_eq!(config.shader.step_angle, MAX_STEP_ANGLE);
        assert_eq!(config.shader.case, 1);
    }

    #[test]
    fn test_validate_accepts_defaults() {
        let mut config = Config::default();
        assert_eq!(config.validate(), 0);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_shader_flags_pack() {
        let shader = ShaderConfig {
            interpolate: true,
            facing_rules: true,
            case: 9,
            step_angle: 0.3,
            ..ShaderConfig::default()
        };
        assert_eq!(shader.flags().bits(), 1 | 16);
        let params = shader.params();
        assert_eq!(params.depth, ShaderParams::default().depth);
        assert_eq!(params.case, 9);
        assert_eq!(params.step_angle, 0.3);
    }

    #[test]
    fn test_conversions() {
        let config = Config::default();
        assert_eq!(config.mesh.settings().subdivision_steps, 200);
        assert_eq!(config.screen.tiling(), ScreenTiling::SINGLE);
        match config.camera.projection() {
            Projection::Perspective { fov_y, .. } => {
                assert!((fov_y - 60f32.to_radians()).abs() < 1e-6)
            }
            other => panic!("unexpected projection {other:?}"),
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.mesh.subdivision_steps = 12;
        config.screen.tiles_tall = 3;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("geodesic");
        let config = Config::load_or_create(&nested).unwrap();
        assert_eq!(config, Config::default());
        assert!(nested.join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.cull.enabled = false;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert!(!result.unwrap().cull.enabled);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));
    }
}
