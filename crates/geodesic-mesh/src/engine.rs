//! Per-frame driver that owns one topology and rebuilds it when its settings
//! change.

use serde::{Deserialize, Serialize};

use crate::base::{BaseTopology, BaseVariant};
use crate::cull::CullStats;
use crate::emit::MeshSnapshot;
use crate::error::TopologyError;
use crate::params::ShaderParams;
use crate::topology::Topology;
use crate::viewport::CullView;

/// The settings a topology generation is built from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshSettings {
    /// Base polyhedron.
    pub variant: BaseVariant,
    /// Midpoint subdivisions applied after loading the base.
    pub subdivision_steps: usize,
}

/// Output of one frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Generation the mesh was built in.
    pub generation: u64,
    /// The emitted mesh.
    pub mesh: MeshSnapshot,
    /// Shader parameters current for this frame.
    pub params: ShaderParams,
    /// Cull statistics, if the frame was culled.
    pub cull: Option<CullStats>,
}

/// Owns a topology and the settings it was allocated for.
///
/// The arrays are allocated once per generation. Each frame resets them to
/// the base polyhedron in place: culling discards geometry, so the previous
/// frame's mesh cannot be the starting point.
#[derive(Debug, Clone)]
pub struct GeodesicEngine {
    settings: MeshSettings,
    generation: u64,
    base: BaseTopology,
    topology: Topology,
    params: ShaderParams,
}

impl GeodesicEngine {
    /// Create an engine at generation 1.
    pub fn new(settings: MeshSettings) -> Self {
        let base = settings.variant.topology();
        let topology = Topology::from_base(&base, settings.subdivision_steps);
        Self {
            settings,
            generation: 1,
            base,
            topology,
            params: ShaderParams::default(),
        }
    }

    /// Settings of the current generation.
    pub fn settings(&self) -> MeshSettings {
        self.settings
    }

    /// Current generation number.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The topology as left by the last frame.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Shader parameters attached to emitted frames.
    pub fn params(&self) -> ShaderParams {
        self.params
    }

    /// Replace the shader parameters. Does not start a new generation.
    pub fn set_params(&mut self, params: ShaderParams) {
        self.params = params;
    }

    /// Start a new generation if `settings` differ from the current ones.
    ///
    /// Returns `true` if the arrays were reallocated.
    pub fn ensure(&mut self, settings: MeshSettings) -> bool {
        if settings == self.settings {
            return false;
        }
        if settings.variant != self.settings.variant {
            self.base = settings.variant.topology();
        }
        self.settings = settings;
        self.generation += 1;
        self.topology = Topology::from_base(&self.base, settings.subdivision_steps);
        tracing::info!(
            generation = self.generation,
            variant = %settings.variant,
            steps = settings.subdivision_steps,
            "rebuilt topology"
        );
        true
    }

    /// Build this frame's mesh: reload the base, subdivide, optionally cull,
    /// and emit.
    pub fn frame(&mut self, view: Option<&CullView>) -> Result<Frame, TopologyError> {
        self.topology.reset(&self.base);
        self.topology
            .subdivide_steps(self.settings.subdivision_steps)?;
        let cull = view.map(|view| self.topology.cull(view));

        Ok(Frame {
            generation: self.generation,
            mesh: self.topology.emit(),
            params: self.params,
            cull,
        })
    }
}
