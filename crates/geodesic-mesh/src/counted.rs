//! Index buffer paired with per-vertex reference counts.
//!
//! [`CountedIndices`] owns both arrays and only allows index writes through
//! [`CountedIndices::set_index`], which keeps `ref_counts[v]` equal to the
//! number of slots holding `v`. Released slots hold [`RELEASED`] and are not
//! counted.

/// Sentinel stored in index slots that belong to no triangle.
///
/// Out of range for every vertex slot, so a triangle whose three corners are
/// all vertex 0 stays distinguishable from a released one.
pub const RELEASED: u32 = u32::MAX;

/// Fixed-capacity index buffer with reference counts tracked per vertex slot.
#[derive(Clone, Debug)]
pub struct CountedIndices {
    /// One entry per index slot, `RELEASED` when unused.
    indices: Vec<u32>,
    /// One entry per vertex slot.
    ref_counts: Vec<u32>,
}

impl CountedIndices {
    /// Allocates `index_capacity` released slots and `vertex_capacity` zero counts.
    pub fn with_capacity(index_capacity: usize, vertex_capacity: usize) -> Self {
        Self {
            indices: vec![RELEASED; index_capacity],
            ref_counts: vec![0; vertex_capacity],
        }
    }

    /// Number of index slots.
    pub fn index_capacity(&self) -> usize {
        self.indices.len()
    }

    /// Number of vertex slots that can be counted.
    pub fn vertex_capacity(&self) -> usize {
        self.ref_counts.len()
    }

    /// Value stored in `slot`.
    #[inline]
    pub fn get(&self, slot: usize) -> u32 {
        self.indices[slot]
    }

    /// The three indices of triangle `tri`.
    #[inline]
    pub fn triangle(&self, tri: usize) -> [u32; 3] {
        let base = tri * 3;
        [
            self.indices[base],
            self.indices[base + 1],
            self.indices[base + 2],
        ]
    }

    /// Whether triangle `tri` has been released.
    #[inline]
    pub fn is_released(&self, tri: usize) -> bool {
        self.indices[tri * 3] == RELEASED
    }

    /// Reference count of vertex slot `vertex`.
    #[inline]
    pub fn ref_count(&self, vertex: usize) -> u32 {
        self.ref_counts[vertex]
    }

    /// All reference counts, including slots past the live vertex prefix.
    pub fn ref_counts(&self) -> &[u32] {
        &self.ref_counts
    }

    /// The first `len` index slots.
    pub fn prefix(&self, len: usize) -> &[u32] {
        &self.indices[..len]
    }

    /// Writes `value` into `slot`, moving one reference from the old value to
    /// the new one. Either side may be [`RELEASED`].
    ///
    /// This is the only way the index buffer changes.
    pub fn set_index(&mut self, slot: usize, value: u32) {
        let old = self.indices[slot];
        if old == value {
            return;
        }
        if old != RELEASED {
            let count = &mut self.ref_counts[old as usize];
            debug_assert!(*count > 0, "reference count of vertex {old} would go negative");
            *count = count.saturating_sub(1);
        }
        if value != RELEASED {
            self.ref_counts[value as usize] += 1;
        }
        self.indices[slot] = value;
    }

    /// Writes all three corners of triangle `tri`.
    pub fn set_triangle(&mut self, tri: usize, corners: [u32; 3]) {
        let base = tri * 3;
        for (k, corner) in corners.into_iter().enumerate() {
            self.set_index(base + k, corner);
        }
    }

    /// Releases all three corners of triangle `tri`.
    pub fn release_triangle(&mut self, tri: usize) {
        self.set_triangle(tri, [RELEASED; 3]);
    }
}
