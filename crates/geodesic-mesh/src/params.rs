//! Isosurface shader parameters carried alongside each frame.
//!
//! The topology engine never reads these; they travel with the emitted mesh
//! so the compute pass receives the values that were current for the frame.

bitflags::bitflags! {
    /// Feature toggles packed into the shader's `Settings` integer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SettingsFlags: u32 {
        /// Interpolate surface crossings between samples.
        const INTERPOLATE = 1;
        /// Truncate rays at the first crossing.
        const TRUNCATE = 1 << 1;
        /// Colour each vertex randomly.
        const RANDOM_VERTEX_COLORING = 1 << 2;
        /// Apply volume rules.
        const VOLUME_RULES = 1 << 3;
        /// Apply facing rules.
        const FACING_RULES = 1 << 4;
    }
}

/// Opaque pass-through parameters for the isosurface pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderParams {
    /// Field value treated as the surface.
    pub isolevel: f32,
    /// Smoothing factor applied between frames.
    pub lerp_speed: f32,
    /// Number of sample shells along each ray.
    pub depth: u32,
    /// Angle between neighbouring sample rays, in radians, in `[0, π/4]`.
    pub step_angle: f32,
    /// Forced inside/outside pattern for the six sample corners, one bit each.
    pub case: u32,
    /// Feature toggles.
    pub flags: SettingsFlags,
}

/// Largest angle between neighbouring sample rays.
pub const MAX_STEP_ANGLE: f32 = std::f32::consts::FRAC_PI_4;

/// Bits used by [`ShaderParams::case`].
pub const CASE_MASK: u32 = 0b11_1111;

impl Default for ShaderParams {
    fn default() -> Self {
        Self {
            isolevel: 0.0,
            lerp_speed: 0.1,
            depth: 10,
            step_angle: 0.0,
            case: 0,
            flags: SettingsFlags::empty(),
        }
    }
}

impl ShaderParams {
    /// Pack into a uniform block for upload, with the elapsed time.
    pub fn to_uniform(&self, time: f32) -> ShaderUniform {
        ShaderUniform {
            time,
            isolevel: self.isolevel,
            lerp_speed: self.lerp_speed,
            depth: self.depth,
            settings: self.flags.bits(),
            case: self.case,
            step_angle: self.step_angle,
            _pad: 0,
        }
    }
}

/// GPU layout of [`ShaderParams`], padded to 32 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShaderUniform {
    /// Seconds since the mesh was created.
    pub time: f32,
    /// See [`ShaderParams::isolevel`].
    pub isolevel: f32,
    /// See [`ShaderParams::lerp_speed`].
    pub lerp_speed: f32,
    /// See [`ShaderParams::depth`].
    pub depth: u32,
    /// [`SettingsFlags`] bits.
    pub settings: u32,
    /// See [`ShaderParams::case`].
    pub case: u32,
    /// See [`ShaderParams::step_angle`].
    pub step_angle: f32,
    /// Reserved.
    pub _pad: u32,
}

static_assertions::assert_eq_size!(ShaderUniform, [u8; 32]);
