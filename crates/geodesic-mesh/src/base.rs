//! Fixed starter polyhedra that every topology generation is built from.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Golden ratio, used for the icosahedron's rectangle-based vertex layout.
const PHI: f32 = 1.618_034;

/// Which base polyhedron a topology starts from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseVariant {
    /// Regular icosahedron: 12 vertices, 20 triangles.
    #[default]
    Icosahedron,
    /// Cube: 8 vertices, 12 triangles (two per face).
    Cube,
}

impl BaseVariant {
    /// All variants, in declaration order.
    pub const ALL: [BaseVariant; 2] = [BaseVariant::Icosahedron, BaseVariant::Cube];

    /// Number of vertices in the base polyhedron.
    pub const fn vertex_count(self) -> usize {
        match self {
            BaseVariant::Icosahedron => ICOSAHEDRON_POSITIONS.len(),
            BaseVariant::Cube => CUBE_POSITIONS.len(),
        }
    }

    /// Number of triangles in the base polyhedron.
    pub const fn triangle_count(self) -> usize {
        match self {
            BaseVariant::Icosahedron => ICOSAHEDRON_TRIANGLES.len(),
            BaseVariant::Cube => CUBE_TRIANGLES.len(),
        }
    }

    /// Unnormalized vertex directions.
    pub fn positions(self) -> &'static [[f32; 3]] {
        match self {
            BaseVariant::Icosahedron => &ICOSAHEDRON_POSITIONS,
            BaseVariant::Cube => &CUBE_POSITIONS,
        }
    }

    /// Triangle corner indices, counter-clockwise seen from outside.
    pub fn triangles(self) -> &'static [[u32; 3]] {
        match self {
            BaseVariant::Icosahedron => &ICOSAHEDRON_TRIANGLES,
            BaseVariant::Cube => &CUBE_TRIANGLES,
        }
    }

    /// Build the full starter data for this variant.
    pub fn topology(self) -> BaseTopology {
        BaseTopology::new(self)
    }
}

impl std::fmt::Display for BaseVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaseVariant::Icosahedron => f.write_str("icosahedron"),
            BaseVariant::Cube => f.write_str("cube"),
        }
    }
}

impl std::str::FromStr for BaseVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "icosahedron" | "ico" => Ok(BaseVariant::Icosahedron),
            "cube" => Ok(BaseVariant::Cube),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// A variant name that matches no base polyhedron.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown base variant `{0}` (expected `icosahedron` or `cube`)")]
pub struct UnknownVariant(pub String);

/// Vertex positions, flat index list and reference counts of a base polyhedron.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseTopology {
    /// The variant this data was built from.
    pub variant: BaseVariant,
    /// Unnormalized vertex directions.
    pub positions: Vec<Vec3>,
    /// Flat triangle list, three indices per triangle.
    pub indices: Vec<u32>,
    /// How many base triangle corners reference each vertex.
    pub ref_counts: Vec<u32>,
}

impl BaseTopology {
    /// Build the starter data for `variant`. Reference counts are derived by
    /// counting occurrences in the index list.
    pub fn new(variant: BaseVariant) -> Self {
        let positions: Vec<Vec3> = variant.positions().iter().map(|&p| Vec3::from(p)).collect();
        let indices: Vec<u32> = variant.triangles().iter().flatten().copied().collect();

        let mut ref_counts = vec![0u32; positions.len()];
        for &i in &indices {
            ref_counts[i as usize] += 1;
        }

        Self {
            variant,
            positions,
            indices,
            ref_counts,
        }
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[rustfmt::skip]
const ICOSAHEDRON_POSITIONS: [[f32; 3]; 12] = [
    [-1.0,  PHI,  0.0], [ 1.0,  PHI,  0.0], [-1.0, -PHI,  0.0], [ 1.0, -PHI,  0.0],
    [ 0.0, -1.0,  PHI], [ 0.0,  1.0,  PHI], [ 0.0, -1.0, -PHI], [ 0.0,  1.0, -PHI],
    [ PHI,  0.0, -1.0], [ PHI,  0.0,  1.0], [-PHI,  0.0, -1.0], [-PHI,  0.0,  1.0],
];

#[rustfmt::skip]
const ICOSAHEDRON_TRIANGLES: [[u32; 3]; 20] = [
    [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
    [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
    [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
    [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
];

#[rustfmt::skip]
const CUBE_POSITIONS: [[f32; 3]; 8] = [
    [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0],
    [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0],
];

// Every face diagonal runs through vertex 0 or vertex 6.
#[rustfmt::skip]
const CUBE_TRIANGLES: [[u32; 3]; 12] = [
    [0, 3, 2], [0, 2, 1], // -Z
    [4, 5, 6], [4, 6, 7], // +Z
    [0, 1, 5], [0, 5, 4], // -Y
    [3, 7, 6], [3, 6, 2], // +Y
    [0, 4, 7], [0, 7, 3], // -X
    [1, 2, 6], [1, 6, 5], // +X
];
