//! Matter synthesis: typed generators behind a factory, resources in an arena.
//!
//! Each generator owns the contract to synthesize, show, hide, and dispose one
//! piece of procedurally generated content. The arena is the single owner of
//! every geometry/material record a generator allocates, so cluster teardown
//! releases resources exactly once.
//!
//! # Invariants
//! - `generate` is callable once per instance while unpopulated.
//! - `dispose` is idempotent; after it the instance holds no handles.
//! - A failed generator never leaves dangling arena records for its layers.

mod arena;
mod factory;
mod galaxy;
mod generator;
mod giant;
mod nebula;
mod singularity;
mod starfield;

pub use arena::{GeometryRecord, MaterialRecord, ResourceArena};
pub use factory::MatterFactory;
pub use galaxy::GalaxyGenerator;
pub use generator::{GenerateCtx, MatterError, MatterGenerator};
pub use giant::GiantGenerator;
pub use nebula::NebulaGenerator;
pub use singularity::SingularityGenerator;
pub use starfield::StarfieldGenerator;

pub fn crate_info() -> &'static str {
    "driftspace-matter v0.1.0"
}
