//! View-frustum culling: mark off-screen triangles, then compact triangles
//! and vertices in place.
//!
//! Both compactions are stable two-pointer passes. Triangle compaction runs to
//! completion first so that vertex removal sees final reference counts.

use crate::counted::RELEASED;
use crate::topology::{SubdivisionCursor, Topology};
use crate::viewport::CullView;

/// What one cull pass removed and what is left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CullStats {
    /// Triangles marked off-screen and removed.
    pub culled_triangles: usize,
    /// Vertices left unreferenced and removed.
    pub removed_vertices: usize,
    /// Live triangles after the pass.
    pub triangles: usize,
    /// Live vertices after the pass.
    pub vertices: usize,
}

impl CullStats {
    /// Whether the pass changed nothing.
    pub fn is_noop(&self) -> bool {
        self.culled_triangles == 0 && self.removed_vertices == 0
    }
}

impl Topology {
    /// Run one cull pass against `view`.
    ///
    /// A triangle survives if its centroid or any corner is visible. Surviving
    /// triangles keep their relative order, as do surviving vertices; every
    /// index is renumbered by the number of removed vertices below it.
    /// The subdivision cursor restarts at slot 0.
    pub fn cull(&mut self, view: &CullView) -> CullStats {
        let culled_triangles = self.mark_offscreen(view);
        let removed = self.compact_triangles();
        debug_assert_eq!(removed, culled_triangles);
        let removed_vertices = self.compact_vertices();

        self.cursor = SubdivisionCursor {
            next: 0,
            batch_end: self.triangle_count,
        };

        let stats = CullStats {
            culled_triangles,
            removed_vertices,
            triangles: self.triangle_count,
            vertices: self.vertex_count,
        };
        tracing::debug!(
            culled = stats.culled_triangles,
            removed_vertices = stats.removed_vertices,
            triangles = stats.triangles,
            vertices = stats.vertices,
            "cull pass complete"
        );
        self.debug_validate();
        stats
    }

    /// Release every live triangle with no visible test point.
    /// Returns the number released.
    pub(crate) fn mark_offscreen(&mut self, view: &CullView) -> usize {
        let mut released = 0;
        for tri in 0..self.triangle_count {
            let corners = self.corner_positions(tri);
            let centroid = (corners[0] + corners[1] + corners[2]) / 3.0;
            let visible = view.is_visible(centroid) || corners.iter().any(|&p| view.is_visible(p));
            if !visible {
                self.indices.release_triangle(tri);
                released += 1;
            }
        }
        released
    }

    /// Move live triangles down over released ones, preserving order.
    /// Returns the number of triangles removed.
    pub(crate) fn compact_triangles(&mut self) -> usize {
        let old_count = self.triangle_count;
        let mut write = 0;
        for read in 0..old_count {
            if self.indices.is_released(read) {
                continue;
            }
            if write != read {
                let corners = self.indices.triangle(read);
                self.indices.set_triangle(write, corners);
            }
            write += 1;
        }
        // Slots past `write` still hold moved or released triples.
        for tri in write..old_count {
            self.indices.release_triangle(tri);
        }
        self.triangle_count = write;
        old_count - write
    }

    /// Move referenced vertices down over unreferenced ones and renumber the
    /// live indices. Returns the number of vertices removed.
    pub(crate) fn compact_vertices(&mut self) -> usize {
        let old_count = self.vertex_count;
        let mut remap = vec![RELEASED; old_count];
        let mut write = 0;
        for read in 0..old_count {
            if self.indices.ref_count(read) == 0 {
                continue;
            }
            remap[read] = write as u32;
            self.vertices[write] = self.vertices[read];
            write += 1;
        }

        let removed = old_count - write;
        if removed > 0 {
            for slot in 0..self.triangle_count * 3 {
                let old = self.indices.get(slot);
                let new = remap[old as usize];
                debug_assert_ne!(new, RELEASED, "live index {old} refers to a removed vertex");
                self.indices.set_index(slot, new);
            }
        }
        self.vertex_count = write;
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::BaseVariant;

    #[test]
    fn test_triangle_compaction_is_stable() {
        let mut topo = Topology::new(BaseVariant::Icosahedron, 0);
        let original: Vec<[u32; 3]> = (0..20).map(|t| topo.triangle(t)).collect();

        topo.indices.release_triangle(1);
        topo.indices.release_triangle(3);
        topo.indices.release_triangle(19);
        assert_eq!(topo.compact_triangles(), 3);

        let expected: Vec<[u32; 3]> = original
            .iter()
            .enumerate()
            .filter(|(t, _)| ![1, 3, 19].contains(t))
            .map(|(_, tri)| *tri)
            .collect();
        let actual: Vec<[u32; 3]> = (0..topo.triangle_count()).map(|t| topo.triangle(t)).collect();
        assert_eq!(actual, expected);
        topo.validate().unwrap();
    }

    #[test]
    fn test_vertex_compaction_shifts_indices_above_removed_slot() {
        let mut topo = Topology::new(BaseVariant::Icosahedron, 0);
        // Triangles 0..5 are exactly the fan around vertex 0.
        for tri in 0..5 {
            topo.indices.release_triangle(tri);
        }
        topo.compact_triangles();
        let before = topo.indices().to_vec();
        assert_eq!(topo.ref_counts()[0], 0);

        assert_eq!(topo.compact_vertices(), 1);
        assert_eq!(topo.vertex_count(), 11);
        let shifted: Vec<u32> = before.iter().map(|&i| i - 1).collect();
        assert_eq!(topo.indices(), &shifted[..]);
        topo.validate().unwrap();
    }

    #[test]
    fn test_vertex_compaction_moves_positions() {
        let mut topo = Topology::new(BaseVariant::Icosahedron, 0);
        let p1 = topo.positions()[1];
        for tri in 0..5 {
            topo.indices.release_triangle(tri);
        }
        topo.compact_triangles();
        topo.compact_vertices();
        assert_eq!(topo.positions()[0], p1);
    }

    #[test]
    fn test_compacting_everything_leaves_empty_mesh() {
        let mut topo = Topology::new(BaseVariant::Cube, 2);
        topo.subdivide_steps(2).unwrap();
        for tri in 0..topo.triangle_count() {
            topo.indices.release_triangle(tri);
        }
        topo.compact_triangles();
        topo.compact_vertices();
        assert_eq!(topo.triangle_count(), 0);
        assert_eq!(topo.vertex_count(), 0);
        topo.validate().unwrap();
    }

    #[test]
    fn test_noop_stats() {
        assert!(CullStats::default().is_noop());
        assert!(
            !CullStats {
                culled_triangles: 1,
                ..CullStats::default()
            }
            .is_noop()
        );
    }
}
