use glam::Vec3;
use rand::{Rng, RngCore};

use driftspace_common::{
    GeometryHandle, MaterialHandle, MatterKind, MatterSubkind, Range, RenderableId, TextureHandle,
};
use driftspace_library::{LibraryError, ResourceLibrary};
use driftspace_render::Scene;
use driftspace_universe::MatterConfig;

use crate::arena::{MaterialRecord, ResourceArena};

/// Errors from matter synthesis.
#[derive(Debug, thiserror::Error)]
pub enum MatterError {
    /// The factory was handed a kind/subkind pairing it does not support.
    /// Fatal to that single build, never to the grid.
    #[error("unsupported matter type {kind:?}/{subkind:?}")]
    UnsupportedMatter {
        kind: MatterKind,
        subkind: MatterSubkind,
    },
    /// `generate` was called twice without an intervening `dispose`.
    #[error("matter already generated; dispose before regenerating")]
    AlreadyGenerated,
    #[error(transparent)]
    Library(#[from] LibraryError),
}

/// Collaborators handed to a generator per call. The factory and generators
/// hold no references between calls.
pub struct GenerateCtx<'a> {
    /// Live generation parameters of the active universe.
    pub config: &'a MatterConfig,
    pub library: &'a ResourceLibrary,
    pub arena: &'a mut ResourceArena,
    /// World-space center of the cluster being populated.
    pub origin: Vec3,
    /// Edge length of the cluster volume.
    pub extent: f32,
    pub rng: &'a mut dyn RngCore,
}

/// Contract shared by every matter variant.
pub trait MatterGenerator: std::fmt::Debug {
    fn kind(&self) -> MatterKind;
    fn subkind(&self) -> MatterSubkind;

    /// Synthesize this matter's layers. Callable once while unpopulated.
    fn generate(&mut self, ctx: &mut GenerateCtx<'_>) -> Result<(), MatterError>;

    /// Make all layers visible. Diagnostic no-op before `generate`.
    fn show(&mut self, scene: &mut dyn Scene);

    /// Release every layer's resources and scene membership. Idempotent.
    fn dispose(&mut self, arena: &mut ResourceArena, scene: &mut dyn Scene);

    /// Whether `generate` has produced content that is not yet disposed.
    fn is_generated(&self) -> bool;
}

/// One named render layer of a generated matter: geometry + texture + material.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Layer {
    pub name: &'static str,
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    pub texture: TextureHandle,
    pub renderable: RenderableId,
}

impl Layer {
    /// Build one layer from a pre-picked texture: allocate geometry from the
    /// supplied vertices and sample material size and opacity from the
    /// configured ranges.
    ///
    /// Texture picking is the only fallible step of layer construction, so
    /// variants pick every texture up front and reach this infallible path
    /// with nothing to roll back on error.
    pub(crate) fn build(
        ctx: &mut GenerateCtx<'_>,
        name: &'static str,
        texture: TextureHandle,
        vertices: &[Vec3],
        size: Range,
        opacity: Range,
        color: Option<u32>,
    ) -> Self {
        let size = size.sample(ctx.rng);
        let opacity = opacity.sample(ctx.rng);
        let geometry = ctx.arena.alloc_geometry(vertices);
        let material = ctx.arena.alloc_material(MaterialRecord {
            size,
            opacity,
            texture,
            color,
        });
        let renderable = ctx.arena.mint_renderable();
        Self {
            name,
            geometry,
            material,
            texture,
            renderable,
        }
    }

    pub(crate) fn release(&self, arena: &mut ResourceArena, scene: &mut dyn Scene) {
        arena.release_geometry(self.geometry);
        arena.release_material(self.material);
        scene.remove(self.renderable);
    }
}

/// Shared show/dispose plumbing over a variant's layer list.
pub(crate) fn show_layers(
    kind: MatterKind,
    layers: Option<&[Layer]>,
    scene: &mut dyn Scene,
) {
    match layers {
        Some(layers) => {
            for layer in layers {
                scene.add(layer.renderable);
            }
        }
        None => tracing::warn!(?kind, "show called on empty matter"),
    }
}

pub(crate) fn dispose_layers(
    kind: MatterKind,
    layers: Option<Vec<Layer>>,
    arena: &mut ResourceArena,
    scene: &mut dyn Scene,
) {
    match layers {
        Some(layers) => {
            for layer in &layers {
                layer.release(arena, scene);
            }
            tracing::debug!(?kind, layers = layers.len(), "matter disposed");
        }
        // Empty dispose is recovered locally, never a crash.
        None => tracing::debug!(?kind, "dispose called on empty matter"),
    }
}

/// Uniform scatter inside the cluster volume centered on `origin`.
pub(crate) fn scatter(
    origin: Vec3,
    extent: f32,
    count: usize,
    rng: &mut dyn RngCore,
) -> Vec<Vec3> {
    let half = extent / 2.0;
    (0..count)
        .map(|_| {
            origin
                + Vec3::new(
                    rng.gen_range(-half..=half),
                    rng.gen_range(-half..=half),
                    rng.gen_range(-half..=half),
                )
        })
        .collect()
}

/// Uniform pick from a palette. Falls back to white when the palette is empty.
pub(crate) fn pick_color(palette: &[u32], rng: &mut dyn RngCore) -> u32 {
    if palette.is_empty() {
        return 0xFFFFFF;
    }
    palette[rng.gen_range(0..palette.len())]
}

/// Number of vertices a layer receives: budget scaled by a sampled fraction,
/// never below one.
pub(crate) fn layer_count(budget: u32, fraction: Range, rng: &mut dyn RngCore) -> usize {
    ((budget as f32 * fraction.sample(rng)) as usize).max(1)
}
