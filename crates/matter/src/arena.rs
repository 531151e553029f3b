use std::collections::HashMap;

use glam::Vec3;

use driftspace_common::{GeometryHandle, MaterialHandle, RenderableId, TextureHandle};

/// Record kept per allocated geometry. The vertex data itself belongs to the
/// host GPU layer; the arena tracks lifetime and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryRecord {
    pub vertex_count: usize,
}

/// Record kept per allocated material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialRecord {
    pub size: f32,
    pub opacity: f32,
    pub texture: TextureHandle,
    pub color: Option<u32>,
}

/// Handle-indexed owner of all generation resources.
///
/// Clusters own matter instances; matter instances hold handles into this
/// arena. Releasing a handle invalidates it, so a disposed cluster cannot be
/// used after teardown and double-release degrades to a logged no-op.
#[derive(Debug, Default)]
pub struct ResourceArena {
    geometries: HashMap<GeometryHandle, GeometryRecord>,
    materials: HashMap<MaterialHandle, MaterialRecord>,
    next_id: u64,
}

impl ResourceArena {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Allocate a geometry from a synthesized vertex sequence.
    pub fn alloc_geometry(&mut self, vertices: &[Vec3]) -> GeometryHandle {
        let handle = GeometryHandle(self.next());
        self.geometries.insert(
            handle,
            GeometryRecord {
                vertex_count: vertices.len(),
            },
        );
        handle
    }

    pub fn alloc_material(&mut self, record: MaterialRecord) -> MaterialHandle {
        let handle = MaterialHandle(self.next());
        self.materials.insert(handle, record);
        handle
    }

    /// Mint a renderable identity for the scene sink.
    pub fn mint_renderable(&mut self) -> RenderableId {
        RenderableId(self.next())
    }

    /// Release a geometry. Returns false (and logs) if the handle was already
    /// released; never a crash.
    pub fn release_geometry(&mut self, handle: GeometryHandle) -> bool {
        let released = self.geometries.remove(&handle).is_some();
        if !released {
            tracing::debug!(?handle, "geometry already released");
        }
        released
    }

    /// Release a material. Same idempotency contract as geometries.
    pub fn release_material(&mut self, handle: MaterialHandle) -> bool {
        let released = self.materials.remove(&handle).is_some();
        if !released {
            tracing::debug!(?handle, "material already released");
        }
        released
    }

    pub fn geometry(&self, handle: GeometryHandle) -> Option<&GeometryRecord> {
        self.geometries.get(&handle)
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&MaterialRecord> {
        self.materials.get(&handle)
    }

    /// Number of live geometries. Zero after full teardown.
    pub fn live_geometries(&self) -> usize {
        self.geometries.len()
    }

    /// Number of live materials. Zero after full teardown.
    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }
}
