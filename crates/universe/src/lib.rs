//! Universe layer: presets that reshape matter generation.
//!
//! A universe activation derives a modifier bundle from a preset catalog and
//! rewrites the live generation parameters ([`MatterConfig`]) and the weighted
//! spawn table ([`SpawnTable`]). Both are owned by [`Universe`] and threaded
//! through calls; there is no ambient global state.
//!
//! # Invariants
//! - `MatterConfig` and `SpawnTable` are mutated only by `Universe::apply`.
//! - The spawn table is non-empty whenever a cluster is being populated.
//! - `Ready` is required before any cluster population begins.

mod config;
mod distribution;
mod universe;

pub use config::{
    GalaxyConfig, GiantConfig, GlobalConfig, MatterConfig, NebulaConfig, SingularityConfig,
    SpiralConfig, StarfieldConfig,
};
pub use distribution::{SpawnEntry, SpawnTable};
pub use universe::{
    Diversity, DominantTrait, Singularity, Universe, UniverseAge, UniverseError,
    UniverseModifiers, UniverseSelection, UniverseState, UniverseType,
};

pub fn crate_info() -> &'static str {
    "driftspace-universe v0.1.0"
}
