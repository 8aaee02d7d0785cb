//! Vertex layout expected by the structured GPU buffer consumer.
//!
//! Only the position is produced by the topology engine. The other
//! attributes are placeholders the compute pass overwrites.
//!
//! | Offset | Size | Field    |
//! |--------|------|----------|
//! | 0      | 12   | position |
//! | 12     | 12   | normal   |
//! | 24     | 16   | color    |
//! | 40     | 8    | uv       |

use glam::Vec3;

/// Normal written before the compute pass fills in real normals.
pub const PLACEHOLDER_NORMAL: [f32; 3] = [0.0, 0.0, -1.0];

/// Neutral mid-grey vertex colour.
pub const PLACEHOLDER_COLOR: [f32; 4] = [0.5; 4];

/// One vertex of the emitted mesh, 48 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuVertex {
    /// Position on the unit sphere.
    pub position: [f32; 3],
    /// Surface normal.
    pub normal: [f32; 3],
    /// RGBA colour.
    pub color: [f32; 4],
    /// Texture coordinates.
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(GpuVertex, [u8; 48]);

impl GpuVertex {
    /// Vertex at `position` with placeholder attributes.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: PLACEHOLDER_NORMAL,
            color: PLACEHOLDER_COLOR,
            uv: [0.0, 0.0],
        }
    }

    /// The position as a vector.
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem;

    #[test]
    fn test_vertex_is_48_bytes() {
        assert_eq!(mem::size_of::<GpuVertex>(), 48);
    }

    #[test]
    fn test_field_offsets() {
        assert_eq!(mem::offset_of!(GpuVertex, position), 0);
        assert_eq!(mem::offset_of!(GpuVertex, normal), 12);
        assert_eq!(mem::offset_of!(GpuVertex, color), 24);
        assert_eq!(mem::offset_of!(GpuVertex, uv), 40);
    }

    #[test]
    fn test_placeholders() {
        let v = GpuVertex::from_position(Vec3::X);
        assert_eq!(v.position(), Vec3::X);
        assert_eq!(v.normal, PLACEHOLDER_NORMAL);
        assert_eq!(v.color, [0.5, 0.5, 0.5, 0.5]);
        assert_eq!(v.uv, [0.0, 0.0]);
    }

    #[test]
    fn test_vertex_is_pod() {
        let v = GpuVertex::from_position(Vec3::new(1.0, 2.0, 3.0));
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 48);
        assert_eq!(&bytes[0..4], &1.0f32.to_ne_bytes());
    }
}
