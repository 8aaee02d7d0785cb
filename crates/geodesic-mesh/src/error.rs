//! Error types for topology mutation and validation.

use thiserror::Error;

/// Errors returned by topology operations.
///
/// None of these leave the topology partially modified: every check runs
/// before the first write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// The vertex array has no room for three more midpoints.
    #[error("vertex capacity exhausted: need {needed} slots, allocated {capacity}")]
    VertexCapacity {
        /// Slots required after the operation.
        needed: usize,
        /// Slots allocated for this generation.
        capacity: usize,
    },

    /// The index array has no room for three more triangles.
    #[error("index capacity exhausted: need {needed} slots, allocated {capacity}")]
    IndexCapacity {
        /// Slots required after the operation.
        needed: usize,
        /// Slots allocated for this generation.
        capacity: usize,
    },

    /// The targeted triangle is outside the live prefix.
    #[error("triangle {triangle} is not live (triangle count {triangle_count})")]
    TriangleOutOfRange {
        /// Requested triangle slot.
        triangle: usize,
        /// Current live triangle count.
        triangle_count: usize,
    },
}

/// A broken consistency rule found by [`crate::Topology::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A recorded reference count disagrees with the live index entries.
    #[error("vertex {vertex}: recorded {recorded} references, found {actual}")]
    RefCountMismatch {
        /// Vertex slot.
        vertex: usize,
        /// Value stored in the count array.
        recorded: u32,
        /// Occurrences in the live index prefix.
        actual: u32,
    },

    /// A live index entry points at or past the live vertex count.
    #[error("index slot {slot} holds {value}, vertex count is {vertex_count}")]
    IndexOutOfRange {
        /// Index slot.
        slot: usize,
        /// Stored vertex index.
        value: u32,
        /// Live vertex count.
        vertex_count: usize,
    },

    /// A released triangle sits inside the live prefix.
    #[error("triangle {triangle} is released but inside the live prefix")]
    ReleasedInLivePrefix {
        /// Triangle slot.
        triangle: usize,
    },

    /// An index slot past the live prefix still references a vertex.
    #[error("index slot {slot} past the live prefix still holds {value}")]
    StaleIndex {
        /// Index slot.
        slot: usize,
        /// Stored vertex index.
        value: u32,
    },
}
