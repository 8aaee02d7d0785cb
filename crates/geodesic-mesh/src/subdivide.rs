//! Spherical midpoint subdivision.
//!
//! Each step splits one triangle into four by inserting its three edge
//! midpoints. Midpoints are projected onto the unit sphere as they are
//! created, so this only makes sense for meshes that represent the unit
//! sphere. It is not a general Loop or butterfly scheme.

use glam::Vec3;

use crate::error::TopologyError;
use crate::topology::{INDICES_PER_SUBDIVISION, SubdivisionCursor, Topology, VERTICES_PER_SUBDIVISION};

/// Midpoint of the edge `a`-`b`, pushed out onto the unit sphere.
#[inline]
pub fn spherical_midpoint(a: Vec3, b: Vec3) -> Vec3 {
    ((a + b) * 0.5).normalize_or_zero()
}

impl Topology {
    /// Split live triangle `tri` into four.
    ///
    /// The midpoints of edges `ab`, `bc` and `ca` are appended at the next
    /// three vertex slots. `tri` itself becomes the centre triangle
    /// `(ab, bc, ca)` and the three corner triangles `(a, ab, ca)`,
    /// `(ab, b, bc)` and `(ca, bc, c)` are appended after the live triangles.
    /// Winding is preserved.
    ///
    /// Returns the new midpoint indices `[ab, bc, ca]`.
    pub fn subdivide(&mut self, tri: usize) -> Result<[u32; 3], TopologyError> {
        if tri >= self.triangle_count {
            return Err(TopologyError::TriangleOutOfRange {
                triangle: tri,
                triangle_count: self.triangle_count,
            });
        }
        self.check_capacity(1)?;

        let vertex_base = self.vertex_count;
        let tri_base = self.triangle_count;

        let [a, b, c] = self.indices.triangle(tri);
        let [pa, pb, pc] = self.corner_positions(tri);
        self.vertices[vertex_base] = spherical_midpoint(pa, pb);
        self.vertices[vertex_base + 1] = spherical_midpoint(pb, pc);
        self.vertices[vertex_base + 2] = spherical_midpoint(pc, pa);
        self.vertex_count += VERTICES_PER_SUBDIVISION;

        let ab = vertex_base as u32;
        let bc = ab + 1;
        let ca = ab + 2;
        self.indices.set_triangle(tri, [ab, bc, ca]);
        self.indices.set_triangle(tri_base, [a, ab, ca]);
        self.indices.set_triangle(tri_base + 1, [ab, b, bc]);
        self.indices.set_triangle(tri_base + 2, [ca, bc, c]);
        self.triangle_count += 3;

        Ok([ab, bc, ca])
    }

    /// Subdivide the triangle under the cursor and advance it.
    ///
    /// Triangle slots are visited in increasing order. When the cursor reaches
    /// the triangle count recorded at the start of its batch, a new batch
    /// starts at slot 0 over every triangle live at that point.
    ///
    /// Returns the slot that was subdivided.
    pub fn subdivide_next(&mut self) -> Result<usize, TopologyError> {
        if self.cursor.next >= self.cursor.batch_end || self.cursor.batch_end > self.triangle_count
        {
            self.cursor = SubdivisionCursor {
                next: 0,
                batch_end: self.triangle_count,
            };
        }
        let tri = self.cursor.next;
        self.subdivide(tri)?;
        self.cursor.next += 1;
        Ok(tri)
    }

    /// Run `steps` subdivisions in cursor order.
    ///
    /// Capacity for all steps is checked before the first one runs.
    pub fn subdivide_steps(&mut self, steps: usize) -> Result<(), TopologyError> {
        self.check_capacity(steps)?;
        for _ in 0..steps {
            self.subdivide_next()?;
        }
        tracing::debug!(
            steps,
            vertices = self.vertex_count,
            triangles = self.triangle_count,
            "subdivision batch complete"
        );
        self.debug_validate();
        Ok(())
    }

    /// Remaining subdivisions that fit in the allocated arrays.
    pub fn remaining_subdivisions(&self) -> usize {
        let by_vertices = (self.vertex_capacity() - self.vertex_count) / VERTICES_PER_SUBDIVISION;
        let by_indices =
            (self.index_capacity() - self.triangle_count * 3) / INDICES_PER_SUBDIVISION;
        by_vertices.min(by_indices)
    }

    fn check_capacity(&self, steps: usize) -> Result<(), TopologyError> {
        let needed = VERTICES_PER_SUBDIVISION
            .checked_mul(steps)
            .and_then(|n| n.checked_add(self.vertex_count))
            .unwrap_or(usize::MAX);
        if needed > self.vertex_capacity() {
            return Err(TopologyError::VertexCapacity {
                needed,
                capacity: self.vertex_capacity(),
            });
        }
        let needed = INDICES_PER_SUBDIVISION
            .checked_mul(steps)
            .and_then(|n| n.checked_add(self.triangle_count * 3))
            .unwrap_or(usize::MAX);
        if needed > self.index_capacity() {
            return Err(TopologyError::IndexCapacity {
                needed,
                capacity: self.index_capacity(),
            });
        }
        Ok(())
    }
}
