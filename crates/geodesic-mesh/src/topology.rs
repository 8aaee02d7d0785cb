//! Owned mesh topology: vertex positions, counted indices and live counters.
//!
//! One [`Topology`] is one generation: it is allocated at worst-case capacity
//! for a base variant and subdivision step count, then mutated in place by
//! [`Topology::subdivide`] and [`Topology::cull`]. Slots beyond the live
//! prefixes are never exposed.

use glam::Vec3;

use crate::base::{BaseTopology, BaseVariant};
use crate::counted::{CountedIndices, RELEASED};
use crate::error::InvariantViolation;

/// Vertex slots added by one subdivision.
pub const VERTICES_PER_SUBDIVISION: usize = 3;

/// Index slots added by one subdivision.
pub const INDICES_PER_SUBDIVISION: usize = 9;

/// Largest subdivision count a single generation allocates for.
pub const MAX_SUBDIVISION_STEPS: usize = 1 << 20;

/// Vertex and index capacities needed for `steps` subdivisions of `variant`.
///
/// `steps` is capped at [`MAX_SUBDIVISION_STEPS`]; asking a capped topology
/// for more subdivisions reports a capacity error.
pub fn capacity_for(variant: BaseVariant, steps: usize) -> (usize, usize) {
    let steps = steps.min(MAX_SUBDIVISION_STEPS);
    (
        variant.vertex_count() + VERTICES_PER_SUBDIVISION * steps,
        variant.triangle_count() * 3 + INDICES_PER_SUBDIVISION * steps,
    )
}

/// Deterministic position of the next subdivision.
///
/// Triangles appended during a batch are not visited until the next batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SubdivisionCursor {
    /// Next triangle slot to subdivide.
    pub(crate) next: usize,
    /// Triangle count when the current batch started.
    pub(crate) batch_end: usize,
}

/// Indexed triangle mesh with reference-counted vertices.
#[derive(Clone, Debug)]
pub struct Topology {
    variant: BaseVariant,
    /// Full-capacity vertex array; only `[..vertex_count]` is live.
    pub(crate) vertices: Vec<Vec3>,
    pub(crate) indices: CountedIndices,
    pub(crate) vertex_count: usize,
    pub(crate) triangle_count: usize,
    pub(crate) cursor: SubdivisionCursor,
}

impl Topology {
    /// Allocate a generation for `variant` with room for `steps` subdivisions
    /// and load the base polyhedron into it.
    ///
    /// Base positions are normalized onto the unit sphere on load.
    pub fn new(variant: BaseVariant, steps: usize) -> Self {
        Self::from_base(&variant.topology(), steps)
    }

    /// Like [`Topology::new`] but from already built base data.
    pub fn from_base(base: &BaseTopology, steps: usize) -> Self {
        let (vertex_capacity, index_capacity) = capacity_for(base.variant, steps);

        let mut vertices = vec![Vec3::ZERO; vertex_capacity];
        for (slot, p) in vertices.iter_mut().zip(&base.positions) {
            *slot = p.normalize_or_zero();
        }

        let mut indices = CountedIndices::with_capacity(index_capacity, vertex_capacity);
        for (slot, &value) in base.indices.iter().enumerate() {
            indices.set_index(slot, value);
        }
        debug_assert_eq!(&indices.ref_counts()[..base.ref_counts.len()], &base.ref_counts[..]);

        let triangle_count = base.triangle_count();
        Self {
            variant: base.variant,
            vertices,
            indices,
            vertex_count: base.positions.len(),
            triangle_count,
            cursor: SubdivisionCursor {
                next: 0,
                batch_end: triangle_count,
            },
        }
    }

    /// Reload `base` into the existing arrays without reallocating.
    ///
    /// Every live index slot is released through
    /// [`CountedIndices::set_index`] before the base triangles are written, so
    /// all counts return to the base counts. The cursor restarts at slot 0.
    ///
    /// # Panics
    ///
    /// Panics if `base` is a different variant than this topology was
    /// allocated for.
    pub fn reset(&mut self, base: &BaseTopology) {
        assert_eq!(
            base.variant, self.variant,
            "reset with a {} base on a {} topology",
            base.variant, self.variant
        );

        for tri in 0..self.triangle_count {
            self.indices.release_triangle(tri);
        }
        for (slot, p) in self.vertices.iter_mut().zip(&base.positions) {
            *slot = p.normalize_or_zero();
        }
        for (slot, &value) in base.indices.iter().enumerate() {
            self.indices.set_index(slot, value);
        }

        self.vertex_count = base.positions.len();
        self.triangle_count = base.triangle_count();
        self.cursor = SubdivisionCursor {
            next: 0,
            batch_end: self.triangle_count,
        };
        self.debug_validate();
    }

    /// The base variant this generation was built from.
    pub fn variant(&self) -> BaseVariant {
        self.variant
    }

    /// Number of live vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of live triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    /// Allocated vertex slots.
    pub fn vertex_capacity(&self) -> usize {
        self.vertices.len()
    }

    /// Allocated index slots.
    pub fn index_capacity(&self) -> usize {
        self.indices.index_capacity()
    }

    /// Whether the mesh has no live triangles.
    pub fn is_empty(&self) -> bool {
        self.triangle_count == 0
    }

    /// Live vertex positions.
    pub fn positions(&self) -> &[Vec3] {
        &self.vertices[..self.vertex_count]
    }

    /// Live index entries, three per triangle.
    pub fn indices(&self) -> &[u32] {
        self.indices.prefix(self.triangle_count * 3)
    }

    /// Live reference counts, parallel to [`Topology::positions`].
    pub fn ref_counts(&self) -> &[u32] {
        &self.indices.ref_counts()[..self.vertex_count]
    }

    /// Corners of live triangle `tri`.
    ///
    /// # Panics
    ///
    /// Panics if `tri` is not live.
    pub fn triangle(&self, tri: usize) -> [u32; 3] {
        assert!(
            tri < self.triangle_count,
            "triangle {tri} out of range (count {})",
            self.triangle_count
        );
        self.indices.triangle(tri)
    }

    /// Corner positions of triangle `tri`.
    pub(crate) fn corner_positions(&self, tri: usize) -> [Vec3; 3] {
        self.indices
            .triangle(tri)
            .map(|v| self.vertices[v as usize])
    }

    /// Check every consistency rule between the arrays and counters.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let live = self.triangle_count * 3;
        let mut actual = vec![0u32; self.indices.vertex_capacity()];

        for tri in 0..self.triangle_count {
            if self.indices.is_released(tri) {
                return Err(InvariantViolation::ReleasedInLivePrefix { triangle: tri });
            }
        }

        for slot in 0..live {
            let value = self.indices.get(slot);
            if value == RELEASED || value as usize >= self.vertex_count {
                return Err(InvariantViolation::IndexOutOfRange {
                    slot,
                    value,
                    vertex_count: self.vertex_count,
                });
            }
            actual[value as usize] += 1;
        }

        for slot in live..self.indices.index_capacity() {
            let value = self.indices.get(slot);
            if value != RELEASED {
                return Err(InvariantViolation::StaleIndex { slot, value });
            }
        }

        for (vertex, (&recorded, &actual)) in
            self.indices.ref_counts().iter().zip(&actual).enumerate()
        {
            if recorded != actual {
                return Err(InvariantViolation::RefCountMismatch {
                    vertex,
                    recorded,
                    actual,
                });
            }
        }

        Ok(())
    }

    /// Panics in debug builds if [`Topology::validate`] fails.
    #[inline]
    pub(crate) fn debug_validate(&self) {
        if cfg!(debug_assertions)
            && let Err(e) = self.validate()
        {
            panic!("topology invariant violated: {e}");
        }
    }
}
