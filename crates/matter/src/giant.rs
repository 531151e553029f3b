use driftspace_common::{MatterKind, MatterSubkind};
use driftspace_library::TextureChannel;
use driftspace_render::Scene;

use crate::arena::ResourceArena;
use crate::generator::{
    GenerateCtx, Layer, MatterError, MatterGenerator, dispose_layers, pick_color, show_layers,
};

/// Giant star: a single oversized halo sprite at the cluster center.
#[derive(Debug)]
pub struct GiantGenerator {
    subkind: MatterSubkind,
    layers: Option<Vec<Layer>>,
}

impl GiantGenerator {
    pub fn new(subkind: MatterSubkind) -> Self {
        Self {
            subkind,
            layers: None,
        }
    }
}

impl MatterGenerator for GiantGenerator {
    fn kind(&self) -> MatterKind {
        MatterKind::Giant
    }

    fn subkind(&self) -> MatterSubkind {
        self.subkind
    }

    fn generate(&mut self, ctx: &mut GenerateCtx<'_>) -> Result<(), MatterError> {
        if self.layers.is_some() {
            return Err(MatterError::AlreadyGenerated);
        }

        let cfg = ctx.config.giant.clone();
        let palette = if self.subkind == MatterSubkind::Red {
            &cfg.red_colors
        } else {
            &cfg.blue_colors
        };
        let color = pick_color(palette, ctx.rng);

        let texture = ctx
            .library
            .pick(MatterKind::Giant, TextureChannel::Halo, ctx.rng)?;
        let halo = Layer::build(
            ctx,
            "halo",
            texture,
            &[ctx.origin],
            cfg.size,
            cfg.opacity,
            Some(color),
        );

        self.layers = Some(vec![halo]);
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
