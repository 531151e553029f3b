use glam::Vec3;
use rand::{Rng, RngCore};
use std::f32::consts::TAU;

use driftspace_common::{MatterKind, MatterSubkind};
use driftspace_library::TextureChannel;
use driftspace_render::Scene;
use driftspace_universe::SpiralConfig;

use crate::arena::ResourceArena;
use crate::generator::{
    GenerateCtx, Layer, MatterError, MatterGenerator, dispose_layers, pick_color, show_layers,
};

/// Spiral galaxy: vertices distributed along winding branches.
#[derive(Debug)]
pub struct GalaxyGenerator {
    subkind: MatterSubkind,
    layers: Option<Vec<Layer>>,
}

impl GalaxyGenerator {
    pub fn new(subkind: MatterSubkind) -> Self {
        Self {
            subkind,
            layers: None,
        }
    }
}

/// Vertices along spiral arms. Branch count is sampled from the configured
/// range; randomness_power and branches_amplitude shape the jitter.
fn spiral_arms(
    origin: Vec3,
    radius: f32,
    budget: u32,
    spiral: &SpiralConfig,
    rng: &mut dyn RngCore,
) -> Vec<Vec3> {
    let branches = (spiral.branches.sample(rng).round() as usize).max(1);
    (0..budget as usize)
        .map(|i| {
            let branch = (i % branches) as f32 / branches as f32;
            let distance = rng.gen_range(0.0f32..=1.0).powf(1.0 + spiral.randomness_power);
            let angle = branch * TAU + distance * 2.5;
            let jitter = spiral.branches_amplitude * radius;
            origin
                + Vec3::new(
                    angle.cos() * distance * radius + rng.gen_range(-jitter..=jitter),
                    rng.gen_range(-jitter..=jitter) * 0.5,
                    angle.sin() * distance * radius + rng.gen_range(-jitter..=jitter),
                )
        })
        .collect()
}

impl MatterGenerator for GalaxyGenerator {
    fn kind(&self) -> MatterKind {
        MatterKind::Galaxy
    }

    fn subkind(&self) -> MatterSubkind {
        self.subkind
    }

    fn generate(&mut self, ctx: &mut GenerateCtx<'_>) -> Result<(), MatterError> {
        if self.layers.is_some() {
            return Err(MatterError::AlreadyGenerated);
        }

        let cfg = ctx.config.galaxy.clone();
        let color = pick_color(&cfg.colors, ctx.rng);
        let radius = ctx.extent * 0.35;

        let texture = ctx
            .library
            .pick(MatterKind::Galaxy, TextureChannel::Arm, ctx.rng)?;
        let vertices = spiral_arms(ctx.origin, radius, cfg.budget, &cfg.spiral, ctx.rng);
        let arms = Layer::build(
            ctx,
            "arms",
            texture,
            &vertices,
            cfg.size,
            cfg.opacity,
            Some(color),
        );

        self.layers = Some(vec![arms]);
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
    fn spiral_galaxy_spends_its_full_budget() {
        let config = MatterConfig::default();
        let library = ResourceLibrary::preloaded();
        let mut arena = ResourceArena::new();
        let mut rng = StdRng::seed_from_u64(41);
        let mut generator = GalaxyGenerator::new(MatterSubkind::Spiral);

        let mut ctx = GenerateCtx {
            config: &config,
            library: &library,
            arena: &mut arena,
            origin: Vec3::ZERO,
            extent: 1000.0,
            rng: &mut rng,
        };
        generator.generate(&mut ctx).unwrap();

        let mut scene = DebugScene::new();
        generator.show(&mut scene);
        assert_eq!(scene.visible_count(), 1);
        assert_eq!(arena.live_geometries(), 1);

        let record = arena
            .geometry(
                generator.layers.as_ref().unwrap()[0].geometry,
            )
            .unwrap();
        assert_eq!(record.vertex_count, config.galaxy.budget as usize);
    }

    #[test]
    fn arms_stay_within_the_cluster_volume() {
        let mut rng = StdRng::seed_from_u64(42);
        let spiral = MatterConfig::default().galaxy.spiral;
        let vertices = spiral_arms(Vec3::ZERO, 350.0, 2_000, &spiral, &mut rng);
        for v in vertices {
            assert!(v.length() <= 500.0);
        }
    }
}
