//! Shared vocabulary for the driftspace engine.
//!
//! # Invariants
//! - Handle newtypes are opaque; only their owning subsystem may interpret them.
//! - `Range` bounds are author-configured; sampling is uniform-continuous.

pub mod types;

pub use types::{
    ClusterCoord, GeometryHandle, MaterialHandle, MatterId, MatterKind, MatterSubkind, Range,
    RenderableId, TextureHandle,
};

pub fn crate_info() -> &'static str {
    "driftspace-common v0.1.0"
}
