//! Geodesic mesh topology: base polyhedra, spherical midpoint subdivision,
//! reference-counted index buffers and in-place view-frustum culling.
//!
//! A [`Topology`] owns three parallel structures: vertex positions, the
//! triangle index list and, per vertex, the number of index slots pointing at
//! it. The index list can only change through
//! [`CountedIndices::set_index`], so the counts cannot drift.
//!
//! ```rust
//! use geodesic_mesh::{BaseVariant, Camera, CullView, Topology};
//! use glam::Vec3;
//!
//! let mut topo = Topology::new(BaseVariant::Icosahedron, 4);
//! topo.subdivide_steps(4).unwrap();
//!
//! let camera = Camera::look_at(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y, Camera::default().projection);
//! topo.cull(&CullView::new(&camera, 0.1));
//!
//! let mesh = topo.emit();
//! assert!(mesh.indices().iter().all(|&i| (i as usize) < mesh.vertex_count()));
//! ```

pub mod base;
pub mod camera;
pub mod counted;
pub mod cull;
pub mod emit;
pub mod engine;
pub mod error;
pub mod params;
mod subdivide;
pub mod topology;
pub mod vertex;
pub mod viewport;

pub use base::{BaseTopology, BaseVariant, UnknownVariant};
pub use camera::{Camera, Projection, ViewportPoint};
pub use counted::{CountedIndices, RELEASED};
pub use cull::CullStats;
pub use emit::MeshSnapshot;
pub use engine::{Frame, GeodesicEngine, MeshSettings};
pub use error::{InvariantViolation, TopologyError};
pub use params::{CASE_MASK, MAX_STEP_ANGLE, SettingsFlags, ShaderParams, ShaderUniform};
pub use subdivide::spherical_midpoint;
pub use topology::{MAX_SUBDIVISION_STEPS, Topology, capacity_for};
pub use vertex::GpuVertex;
pub use viewport::{CullView, ScreenTiling, ViewportRect};
