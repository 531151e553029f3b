use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use driftspace_common::{MatterKind, MatterSubkind, Range};

use crate::config::MatterConfig;
use crate::distribution::{SpawnEntry, SpawnTable};

/// Universe type preset. Each variant fully defines its own overrides of the
/// matter configuration and the spawn table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniverseType {
    Stable,
    Bloom,
    Filaments,
    Ethereum,
    /// Terminal preset. Reachable only by explicit id; random selection
    /// excludes it.
    Epiphany,
}

impl UniverseType {
    /// Catalog order, used by random selection.
    pub const CATALOG: [UniverseType; 5] = [
        UniverseType::Stable,
        UniverseType::Bloom,
        UniverseType::Filaments,
        UniverseType::Ethereum,
        UniverseType::Epiphany,
    ];
}

/// Universe age axis. Documented extension point; only `Child` exists today
/// and the applier is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UniverseAge {
    #[default]
    Child,
}

/// Diversity axis. Documented extension point, applier is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Diversity {
    #[default]
    SuperExtreme,
}

/// Singularity flavor axis. Documented extension point, applier is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Singularity {
    #[default]
    BlackHole,
}

/// Dominant trait axis. Documented extension point, applier is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DominantTrait {
    #[default]
    Human,
}

/// Modifier bundle produced once per universe activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UniverseModifiers {
    pub universe_type: UniverseType,
    pub age: UniverseAge,
    pub diversity: Diversity,
    pub singularity: Singularity,
    pub dominant_trait: DominantTrait,
}

impl Default for UniverseType {
    fn default() -> Self {
        UniverseType::Stable
    }
}

impl UniverseModifiers {
    fn with_type(universe_type: UniverseType) -> Self {
        Self {
            universe_type,
            ..Self::default()
        }
    }
}

/// How the host selects the universe to activate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniverseSelection {
    /// No explicit choice; the canonical id 1 preset.
    Default,
    /// Explicit catalog id. Unknown ids fall back to the default bundle.
    Id(u32),
    /// Uniform draw over the catalog, excluding the terminal entry.
    Random,
}

/// Activation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniverseState {
    Uninitialized,
    ModifiersComputed,
    MattersConfigured,
    Ready,
}

/// Errors from universe activation.
#[derive(Debug, thiserror::Error)]
pub enum UniverseError {
    #[error("apply called in state {0:?}; activate first")]
    NotActivated(UniverseState),
}

/// The active universe: modifier bundle plus the live matter configuration
/// and spawn table it produced.
///
/// State machine per activation:
/// `Uninitialized -> ModifiersComputed -> MattersConfigured -> Ready`.
/// Cluster population requires `Ready`. Re-activation resets the
/// configuration and table to their defaults before recomputing.
#[derive(Debug)]
pub struct Universe {
    state: UniverseState,
    modifiers: UniverseModifiers,
    config: MatterConfig,
    spawn_table: SpawnTable,
}

impl Universe {
    pub fn new() -> Self {
        Self {
            state: UniverseState::Uninitialized,
            modifiers: UniverseModifiers::default(),
            config: MatterConfig::default(),
            spawn_table: SpawnTable::default(),
        }
    }

    pub fn state(&self) -> UniverseState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == UniverseState::Ready
    }

    pub fn modifiers(&self) -> &UniverseModifiers {
        &self.modifiers
    }

    /// Live generation parameters for the current universe lifetime.
    pub fn config(&self) -> &MatterConfig {
        &self.config
    }

    /// Live weighted spawn table for the current universe lifetime.
    pub fn spawn_table(&self) -> &SpawnTable {
        &self.spawn_table
    }

    /// Compute the modifier bundle for a selection.
    ///
    /// Re-activation is allowed at any state and resets the live
    /// configuration and spawn table to their defaults first.
    pub fn activate(
        &mut self,
        selection: UniverseSelection,
        rng: &mut dyn RngCore,
    ) -> &UniverseModifiers {
        self.config = MatterConfig::default();
        self.spawn_table = SpawnTable::default();

        let universe_type = match selection {
            UniverseSelection::Default => UniverseType::Stable,
            UniverseSelection::Id(id) => Self::type_for_id(id),
            UniverseSelection::Random => Self::random_type(rng),
        };

        self.modifiers = UniverseModifiers::with_type(universe_type);
        self.state = UniverseState::ModifiersComputed;
        tracing::info!(?universe_type, "universe modifiers computed");
        &self.modifiers
    }

    /// Rewrite the matter configuration and spawn table from the computed
    /// modifiers. Must run to completion before any cluster population.
    pub fn apply(&mut self) -> Result<(), UniverseError> {
        if self.state == UniverseState::Uninitialized {
            return Err(UniverseError::NotActivated(self.state));
        }

        let (config, spawn_table) = self.modifiers.universe_type.overrides(self.config.clone());
        self.config = config;
        self.state = UniverseState::MattersConfigured;

        self.spawn_table = spawn_table;
        self.apply_age();
        self.apply_diversity();
        self.apply_singularity();
        self.apply_dominant_trait();
        self.state = UniverseState::Ready;

        tracing::info!(
            universe_type = ?self.modifiers.universe_type,
            entries = self.spawn_table.len(),
            weight = self.spawn_table.total_weight(),
            "universe modifiers applied"
        );
        Ok(())
    }

    fn type_for_id(id: u32) -> UniverseType {
        match id {
            1 => UniverseType::Stable,
            2 => UniverseType::Bloom,
            3 => UniverseType::Filaments,
            4 => UniverseType::Ethereum,
            5 => UniverseType::Epiphany,
            unknown => {
                tracing::warn!(id = unknown, "unknown universe id, using default bundle");
                UniverseType::Stable
            }
        }
    }

    fn random_type(rng: &mut dyn RngCore) -> UniverseType {
        let candidates: Vec<UniverseType> = UniverseType::CATALOG
            .into_iter()
            .filter(|t| *t != UniverseType::Epiphany)
            .collect();
        candidates[rng.gen_range(0..candidates.len())]
    }

    // The four extension-point axes below only carry their default variant
    // today; the appliers intentionally do nothing.

    fn apply_age(&mut self) {
        tracing::trace!(age = ?self.modifiers.age, "age applier is a no-op");
    }

    fn apply_diversity(&mut self) {
        tracing::trace!(diversity = ?self.modifiers.diversity, "diversity applier is a no-op");
    }

    fn apply_singularity(&mut self) {
        tracing::trace!(
            singularity = ?self.modifiers.singularity,
            "singularity applier is a no-op"
        );
    }

    fn apply_dominant_trait(&mut self) {
        tracing::trace!(
            dominant_trait = ?self.modifiers.dominant_trait,
            "dominant trait applier is a no-op"
        );
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::new()
    }
}

impl UniverseType {
    /// Full replacement values for the fields this preset cares about,
    /// applied over the supplied base. One handler per variant; never an
    /// incremental merge.
    pub fn overrides(self, base: MatterConfig) -> (MatterConfig, SpawnTable) {
        match self {
            UniverseType::Stable => stable_overrides(base),
            UniverseType::Bloom => bloom_overrides(base),
            UniverseType::Filaments => filaments_overrides(base),
            UniverseType::Ethereum => ethereum_overrides(base),
            UniverseType::Epiphany => epiphany_overrides(base),
        }
    }
}

fn stable_overrides(mut config: MatterConfig) -> (MatterConfig, SpawnTable) {
    config.global.bloom_intensity = 2.0;
    config.global.clear_color = 0x000000;
    (config, SpawnTable::default())
}

fn bloom_overrides(mut config: MatterConfig) -> (MatterConfig, SpawnTable) {
    config.global.bloom_intensity = 4.0;
    config.global.clear_color = 0x000000;
    config.starfield.bright = Range::new(0.001, 0.01);
    config.starfield.pass_size = Range::new(70.0, 80.0);

    config.nebula.cloud = Range::new(0.20, 0.30);
    config.nebula.bright = Range::new(0.0002, 0.002);
    config.nebula.emission_radius_segments = 100;
    config.nebula.colors_in = vec![
        0x0C8D9F, 0xF9EF2E, 0x08F7FE, 0x09FBD3, 0xFE53BB, 0xF5D300, 0xFFACFC, 0xF148FB,
        0xFF2281, 0xFDC7D7, 0xE8E500, 0x00FECA, 0xFFD300, 0x4DEEEA,
    ];
    config.nebula.colors_out = vec![
        0xE847AE, 0x13CA91, 0xFF9472, 0xFFDEF3, 0xFF61BE, 0xF85125, 0xEBF875, 0x28CF75,
        0xFE6B35, 0xCE0000, 0x7FFF00, 0xE92EFB, 0x74EE15,
    ];
    config.nebula.remnant_colors_in = config.nebula.colors_in.clone();
    config.nebula.remnant_colors_out = config.nebula.colors_out.clone();

    let table = SpawnTable::new(vec![
        SpawnEntry::new(38, MatterKind::Starfield, MatterSubkind::Globular),
        SpawnEntry::new(38, MatterKind::Nebula, MatterSubkind::Emission),
        SpawnEntry::new(10, MatterKind::Starfield, MatterSubkind::Open),
        SpawnEntry::new(8, MatterKind::Nebula, MatterSubkind::Remnant),
        SpawnEntry::new(5, MatterKind::Singularity, MatterSubkind::Blackhole),
    ]);
    (config, table)
}

fn filaments_overrides(mut config: MatterConfig) -> (MatterConfig, SpawnTable) {
    config.global.bloom_intensity = 4.0;
    config.global.clear_color = 0x000000;
    config.galaxy.budget = 100_000;
    config.galaxy.spiral.randomness_power = 0.0002;
    config.galaxy.spiral.branches_amplitude = 0.00008;
    config.galaxy.spiral.branches = Range::new(300.0, 500.0);
    config.galaxy.size = Range::new(10.0, 20.0);

    let table = SpawnTable::new(vec![
        SpawnEntry::new(90, MatterKind::Galaxy, MatterSubkind::Spiral),
        SpawnEntry::new(10, MatterKind::Singularity, MatterSubkind::Blackhole),
    ]);
    (config, table)
}

fn ethereum_overrides(mut config: MatterConfig) -> (MatterConfig, SpawnTable) {
    config.global.bloom_intensity = 2.0;
    config.global.clear_color = 0x000F34;
    config.starfield.colors = config.nebula.colors_in.clone();
    config.starfield.globular_colors = config.nebula.colors_out.clone();
    config.starfield.pass_size = Range::fixed(130.0);

    let table = SpawnTable::new(vec![
        SpawnEntry::new(90, MatterKind::Starfield, MatterSubkind::Open),
        SpawnEntry::new(10, MatterKind::Singularity, MatterSubkind::Blackhole),
    ]);
    (config, table)
}

fn epiphany_overrides(mut config: MatterConfig) -> (MatterConfig, SpawnTable) {
    config.global.bloom_intensity = 2.0;
    config.global.clear_color = 0x000000;

    let table = SpawnTable::new(vec![SpawnEntry::new(
        100,
        MatterKind::Starfield,
        MatterSubkind::Open,
    )]);
    (config, table)
}
