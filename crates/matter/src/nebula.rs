use glam::Vec3;
use rand::{Rng, RngCore};
use std::f32::consts::TAU;

use driftspace_common::{MatterKind, MatterSubkind};
use driftspace_library::TextureChannel;
use driftspace_render::Scene;

use crate::arena::ResourceArena;
use crate::generator::{
    GenerateCtx, Layer, MatterError, MatterGenerator, dispose_layers, layer_count, pick_color,
    scatter, show_layers,
};

/// Nebula: a cloud shell plus a bright core. Emission nebulae sample the
/// in/out palettes; remnants use the remnant palettes.
#[derive(Debug)]
pub struct NebulaGenerator {
    subkind: MatterSubkind,
    layers: Option<Vec<Layer>>,
}

impl NebulaGenerator {
    pub fn new(subkind: MatterSubkind) -> Self {
        Self {
            subkind,
            layers: None,
        }
    }
}

/// Vertices on a banded spherical shell; `segments` controls ring resolution.
fn shell(origin: Vec3, radius: f32, count: usize, segments: u32, rng: &mut dyn RngCore) -> Vec<Vec3> {
    let segments = segments.max(1) as f32;
    (0..count)
        .map(|_| {
            let theta = rng.gen_range(0.0..TAU);
            // Quantize latitude into rings to get the banded emission look.
            let band = (rng.gen_range(0.0..segments)).floor() / segments;
            let phi = band * std::f32::consts::PI;
            let r = radius * rng.gen_range(0.8..=1.0);
            origin
                + Vec3::new(
                    r * phi.sin() * theta.cos(),
                    r * phi.cos(),
                    r * phi.sin() * theta.sin(),
                )
        })
        .collect()
}

impl MatterGenerator for NebulaGenerator {
    fn kind(&self) -> MatterKind {
        MatterKind::Nebula
    }

    fn subkind(&self) -> MatterSubkind {
        self.subkind
    }

    fn generate(&mut self, ctx: &mut GenerateCtx<'_>) -> Result<(), MatterError> {
        if self.layers.is_some() {
            return Err(MatterError::AlreadyGenerated);
        }

        let cfg = ctx.config.nebula.clone();
        let (palette_in, palette_out) = if self.subkind == MatterSubkind::Remnant {
            (&cfg.remnant_colors_in, &cfg.remnant_colors_out)
        } else {
            (&cfg.colors_in, &cfg.colors_out)
        };
        let color_in = pick_color(palette_in, ctx.rng);
        let color_out = pick_color(palette_out, ctx.rng);

        let cloud_texture = ctx
            .library
            .pick(MatterKind::Nebula, TextureChannel::Cloud, ctx.rng)?;
        let bright_texture = ctx
            .library
            .pick(MatterKind::Nebula, TextureChannel::Bright, ctx.rng)?;

        let cloud_count = layer_count(cfg.budget, cfg.cloud, ctx.rng);
        let bright_count = layer_count(cfg.budget, cfg.bright, ctx.rng);
        let radius = ctx.extent * 0.25;

        let cloud_vertices = shell(
            ctx.origin,
            radius,
            cloud_count,
            cfg.emission_radius_segments,
            ctx.rng,
        );
        let cloud = Layer::build(
            ctx,
            "cloud",
            cloud_texture,
            &cloud_vertices,
            cfg.size,
            cfg.opacity,
            Some(color_out),
        );

        let bright_vertices = scatter(ctx.origin, radius, bright_count, ctx.rng);
        let bright = Layer::build(
            ctx,
            "bright",
            bright_texture,
            &bright_vertices,
            cfg.size,
            cfg.opacity,
            Some(color_in),
        );

        self.layers = Some(vec![cloud, bright]);
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
    fn emission_and_remnant_both_generate_two_layers() {
        for subkind in [MatterSubkind::Emission, MatterSubkind::Remnant] {
            let config = MatterConfig::default();
            let library = ResourceLibrary::preloaded();
            let mut arena = ResourceArena::new();
            let mut rng = StdRng::seed_from_u64(31);
            let mut generator = NebulaGenerator::new(subkind);

            let mut ctx = GenerateCtx {
                config: &config,
                library: &library,
                arena: &mut arena,
                origin: Vec3::new(0.0, 0.0, -2000.0),
                extent: 1000.0,
                rng: &mut rng,
            };
            generator.generate(&mut ctx).unwrap();

            let mut scene = DebugScene::new();
            generator.show(&mut scene);
            assert_eq!(scene.visible_count(), 2);
            assert_eq!(arena.live_geometries(), 2);

            generator.dispose(&mut arena, &mut scene);
            assert_eq!(arena.live_geometries(), 0);
            assert_eq!(scene.visible_count(), 0);
        }
    }

    #[test]
    fn shell_vertices_sit_near_the_radius() {
        let mut rng = StdRng::seed_from_u64(32);
        let origin = Vec3::ZERO;
        let vertices = shell(origin, 100.0, 200, 50, &mut rng);
        for v in vertices {
            let d = v.length();
            assert!((79.0..=101.0).contains(&d), "distance {d} out of shell band");
        }
    }
}
