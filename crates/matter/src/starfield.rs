use driftspace_common::{MatterKind, MatterSubkind};
use driftspace_library::TextureChannel;
use driftspace_render::Scene;

use crate::arena::ResourceArena;
use crate::generator::{
    GenerateCtx, Layer, MatterError, MatterGenerator, dispose_layers, layer_count, pick_color,
    scatter, show_layers,
};

/// Star field: bright, normal, and pale star populations scattered through
/// the cluster volume. Globular fields draw from their own palette.
#[derive(Debug)]
pub struct StarfieldGenerator {
    subkind: MatterSubkind,
    layers: Option<Vec<Layer>>,
}

impl StarfieldGenerator {
    pub fn new(subkind: MatterSubkind) -> Self {
        Self {
            subkind,
            layers: None,
        }
    }
}

impl MatterGenerator for StarfieldGenerator {
    fn kind(&self) -> MatterKind {
        MatterKind::Starfield
    }

    fn subkind(&self) -> MatterSubkind {
        self.subkind
    }

    fn generate(&mut self, ctx: &mut GenerateCtx<'_>) -> Result<(), MatterError> {
        if self.layers.is_some() {
            return Err(MatterError::AlreadyGenerated);
        }

        let cfg = ctx.config.starfield.clone();
        let palette = if self.subkind == MatterSubkind::Globular {
            &cfg.globular_colors
        } else {
            &cfg.colors
        };
        let color = pick_color(palette, ctx.rng);

        // Pick every texture up front; it is the only fallible step.
        let bright_texture =
            ctx.library
                .pick(MatterKind::Starfield, TextureChannel::Bright, ctx.rng)?;
        let normal_texture = ctx
            .library
            .pick(MatterKind::Starfield, TextureChannel::Pass, ctx.rng)?;
        let pale_texture = ctx
            .library
            .pick(MatterKind::Starfield, TextureChannel::Pass, ctx.rng)?;

        let bright_count = layer_count(cfg.budget, cfg.bright, ctx.rng);
        let normal_count = layer_count(cfg.budget, cfg.normal, ctx.rng);
        let pale_count = layer_count(cfg.budget, cfg.pale, ctx.rng);

        let bright_vertices = scatter(ctx.origin, ctx.extent, bright_count, ctx.rng);
        let bright = Layer::build(
            ctx,
            "bright",
            bright_texture,
            &bright_vertices,
            cfg.size,
            cfg.opacity,
            Some(color),
        );

        let normal_vertices = scatter(ctx.origin, ctx.extent, normal_count, ctx.rng);
        let normal = Layer::build(
            ctx,
            "normal",
            normal_texture,
            &normal_vertices,
            cfg.pass_size,
            cfg.opacity,
            Some(color),
        );

        let pale_vertices = scatter(ctx.origin, ctx.extent, pale_count, ctx.rng);
        let pale = Layer::build(
            ctx,
            "pale",
            pale_texture,
            &pale_vertices,
            cfg.pass_size,
            // Pale stars stay faint regardless of the configured range floor.
            driftspace_common::Range::new(cfg.opacity.min * 0.4, cfg.opacity.min),
            Some(color),
        );

        self.layers = Some(vec![bright, normal, pale]);
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
    use glam::Vec3;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn generate_one(subkind: MatterSubkind) -> (StarfieldGenerator, ResourceArena, DebugScene) {
        let config = MatterConfig::default();
        let library = ResourceLibrary::preloaded();
        let mut arena = ResourceArena::new();
        let mut rng = StdRng::seed_from_u64(21);
        let mut generator = StarfieldGenerator::new(subkind);

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
        (generator, arena, scene)
    }

    #[test]
    fn generate_builds_three_layers() {
        let (generator, arena, scene) = generate_one(MatterSubkind::Open);
        assert!(generator.is_generated());
        assert_eq!(arena.live_geometries(), 3);
        assert_eq!(arena.live_materials(), 3);
        assert_eq!(scene.visible_count(), 3);
    }

    #[test]
    fn generate_twice_is_a_contract_violation() {
        let (mut generator, mut arena, _scene) = generate_one(MatterSubkind::Open);
        let config = MatterConfig::default();
        let library = ResourceLibrary::preloaded();
        let mut rng = StdRng::seed_from_u64(22);
        let mut ctx = GenerateCtx {
            config: &config,
            library: &library,
            arena: &mut arena,
            origin: Vec3::ZERO,
            extent: 1000.0,
            rng: &mut rng,
        };
        assert!(matches!(
            generator.generate(&mut ctx),
            Err(MatterError::AlreadyGenerated)
        ));
    }

    #[test]
    fn dispose_releases_everything_exactly_once() {
        let (mut generator, mut arena, mut scene) = generate_one(MatterSubkind::Globular);
        generator.dispose(&mut arena, &mut scene);
        assert_eq!(arena.live_geometries(), 0);
        assert_eq!(arena.live_materials(), 0);
        assert_eq!(scene.visible_count(), 0);
        assert!(!generator.is_generated());

        // Second dispose is a logged no-op.
        generator.dispose(&mut arena, &mut scene);
        assert_eq!(arena.live_geometries(), 0);
    }

    #[test]
    fn show_before_generate_is_a_diagnostic_noop() {
        let mut generator = StarfieldGenerator::new(MatterSubkind::Open);
        let mut scene = DebugScene::new();
        generator.show(&mut scene);
        assert_eq!(scene.visible_count(), 0);
    }

    #[test]
    fn regeneration_after_dispose_is_allowed() {
        let (mut generator, mut arena, mut scene) = generate_one(MatterSubkind::Open);
        generator.dispose(&mut arena, &mut scene);

        let config = MatterConfig::default();
        let library = ResourceLibrary::preloaded();
        let mut rng = StdRng::seed_from_u64(23);
        let mut ctx = GenerateCtx {
            config: &config,
            library: &library,
            arena: &mut arena,
            origin: Vec3::ZERO,
            extent: 1000.0,
            rng: &mut rng,
        };
        generator.generate(&mut ctx).unwrap();
        assert!(generator.is_generated());
    }
}
