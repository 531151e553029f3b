use driftspace_common::{ClusterCoord, MatterId, MatterKind, MatterSubkind};
use driftspace_matter::{MatterGenerator, ResourceArena};
use driftspace_render::Scene;

/// Lifecycle state of one cluster.
///
/// `Unloaded` and `Disposing` are transient: untracked coordinates are
/// conceptually `Unloaded`, and `Disposing` only exists while teardown runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterStatus {
    Unloaded,
    Queued,
    Building,
    Active,
    Disposing,
}

/// One procedurally generated object, exclusively owned by its cluster.
pub struct MatterInstance {
    pub id: MatterId,
    pub kind: MatterKind,
    pub subkind: MatterSubkind,
    generator: Box<dyn MatterGenerator>,
}

impl MatterInstance {
    pub fn new(generator: Box<dyn MatterGenerator>) -> Self {
        Self {
            id: MatterId::new(),
            kind: generator.kind(),
            subkind: generator.subkind(),
            generator,
        }
    }

    /// Release this instance's resources. Idempotent via the generator
    /// contract.
    pub fn dispose(&mut self, arena: &mut ResourceArena, scene: &mut dyn Scene) {
        self.generator.dispose(arena, scene);
    }

    pub fn is_generated(&self) -> bool {
        self.generator.is_generated()
    }
}

impl std::fmt::Debug for MatterInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatterInstance")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("subkind", &self.subkind)
            .finish()
    }
}

/// One tracked spatial unit and the matter it owns.
#[derive(Debug)]
pub struct Cluster {
    pub coord: ClusterCoord,
    pub status: ClusterStatus,
    pub(crate) matters: Vec<MatterInstance>,
}

impl Cluster {
    pub fn queued(coord: ClusterCoord) -> Self {
        Self {
            coord,
            status: ClusterStatus::Queued,
            matters: Vec::new(),
        }
    }

    pub fn matters(&self) -> &[MatterInstance] {
        &self.matters
    }

    /// Tear down every owned matter instance. A cluster with no generated
    /// content is a silent no-op, not an error.
    pub fn dispose(&mut self, arena: &mut ResourceArena, scene: &mut dyn Scene) {
        self.status = ClusterStatus::Disposing;
        for matter in &mut self.matters {
            matter.dispose(arena, scene);
        }
        self.matters.clear();
        self.status = ClusterStatus::Unloaded;
    }
}
