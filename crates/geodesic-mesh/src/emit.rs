//! Immutable mesh snapshots handed to the rendering layer.

use glam::Vec3;
use serde::Serialize;

use crate::topology::Topology;
use crate::vertex::GpuVertex;

/// A read-only copy of the live mesh.
///
/// Vertices are on the unit sphere; indices come in triples and are all
/// below the vertex count.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MeshSnapshot {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
}

impl MeshSnapshot {
    /// Vertex positions.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Flat triangle index list.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns `true` if the snapshot holds no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Vertices in the consumer's buffer layout.
    pub fn gpu_vertices(&self) -> Vec<GpuVertex> {
        self.vertices.iter().copied().map(GpuVertex::from_position).collect()
    }

    /// Flat `xyz` positions for direct upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as a byte slice for upload (zero-copy).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Size of the vertex buffer in the consumer's layout, in bytes.
    pub fn vertex_buffer_bytes(&self) -> usize {
        self.vertices.len() * std::mem::size_of::<GpuVertex>()
    }

    /// Size of the index buffer in bytes.
    pub fn index_buffer_bytes(&self) -> usize {
        self.indices.len() * std::mem::size_of::<u32>()
    }
}

impl Topology {
    /// Copy the live mesh out, re-normalizing every vertex.
    pub fn emit(&self) -> MeshSnapshot {
        MeshSnapshot {
            vertices: self
                .positions()
                .iter()
                .map(|p| p.normalize_or_zero())
                .collect(),
            indices: self.indices().to_vec(),
        }
    }
}
