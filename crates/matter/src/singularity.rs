use glam::Vec3;
use rand::{Rng, RngCore};
use std::f32::consts::TAU;

use driftspace_common::{MatterKind, MatterSubkind, Range};
use driftspace_library::TextureChannel;
use driftspace_render::Scene;

use crate::arena::ResourceArena;
use crate::generator::{
    GenerateCtx, Layer, MatterError, MatterGenerator, dispose_layers, pick_color, show_layers,
};

/// Singularity: an accretion disc ring around a single bright core.
#[derive(Debug)]
pub struct SingularityGenerator {
    subkind: MatterSubkind,
    layers: Option<Vec<Layer>>,
}

impl SingularityGenerator {
    pub fn new(subkind: MatterSubkind) -> Self {
        Self {
            subkind,
            layers: None,
        }
    }
}

/// Flat ring of vertices in the XZ plane.
fn disc(origin: Vec3, inner: f32, outer: f32, count: usize, rng: &mut dyn RngCore) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            let angle = rng.gen_range(0.0..TAU);
            let r = rng.gen_range(inner..=outer);
            origin + Vec3::new(angle.cos() * r, 0.0, angle.sin() * r)
        })
        .collect()
}

impl MatterGenerator for SingularityGenerator {
    fn kind(&self) -> MatterKind {
        MatterKind::Singularity
    }

    fn subkind(&self) -> MatterSubkind {
        self.subkind
    }

    fn generate(&mut self, ctx: &mut GenerateCtx<'_>) -> Result<(), MatterError> {
        if self.layers.is_some() {
            return Err(MatterError::AlreadyGenerated);
        }

        let cfg = ctx.config.singularity.clone();
        let color = pick_color(&cfg.colors, ctx.rng);
        let radius = ctx.extent * 0.1;

        let disc_texture = ctx
            .library
            .pick(MatterKind::Singularity, TextureChannel::Disc, ctx.rng)?;
        let core_texture = ctx
            .library
            .pick(MatterKind::Singularity, TextureChannel::Bright, ctx.rng)?;

        let disc_vertices = disc(ctx.origin, radius * 0.4, radius, 2_000, ctx.rng);
        let disc_layer = Layer::build(
            ctx,
            "disc",
            disc_texture,
            &disc_vertices,
            cfg.disc_size,
            cfg.opacity,
            Some(color),
        );

        let core = Layer::build(
            ctx,
            "core",
            core_texture,
            &[ctx.origin],
            cfg.disc_size,
            // The event horizon core renders fully opaque.
            Range::fixed(1.0),
            None,
        );

        self.layers = Some(vec![disc_layer, core]);
        Ok(())
    }

    fn show(&mut self, scene: &mut dyn Scene) {
        show_layers(self.kind(), self.layers.as_deref(), scene);
    }

    fn dispose(&mut self, arena: &mut ResourceArena, scene: &mut dyn Scene) {
        dispose_layers(self.kind(), self.layers.take(), arena, scene);
    }

    fn is_generated(&self) -> bool {
        self.layers.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftspace_library::ResourceLibrary;
    use driftspace_render::DebugScene;
    use driftspace_universe::MatterConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn blackhole_builds_disc_and_core() {
        let config = MatterConfig::default();
        let library = ResourceLibrary::preloaded();
        let mut arena = ResourceArena::new();
        let mut rng = StdRng::seed_from_u64(61);
        let mut generator = SingularityGenerator::new(MatterSubkind::Blackhole);

        let mut ctx = GenerateCtx {
            config: &config,
            library: &library,
            arena: &mut arena,
            origin: Vec3::ZERO,
            extent: 1000.0,
            rng: &mut rng,
        };
        generator.generate(&mut ctx).unwrap();

        let layers = generator.layers.as_ref().unwrap();
        assert_eq!(layers.len(), 2);
        let core_material = arena.material(layers[1].material).unwrap();
        assert_eq!(core_material.opacity, 1.0);

        let mut scene = DebugScene::new();
        generator.show(&mut scene);
        generator.dispose(&mut arena, &mut scene);
        assert_eq!(arena.live_materials(), 0);
    }

    #[test]
    fn disc_vertices_stay_in_the_ring() {
        let mut rng = StdRng::seed_from_u64(62);
        let vertices = disc(Vec3::ZERO, 40.0, 100.0, 500, &mut rng);
        for v in vertices {
            let r = v.length();
            assert!((40.0..=100.0).contains(&r));
            assert_eq!(v.y, 0.0);
        }
    }
}
