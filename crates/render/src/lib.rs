//! Rendering adapter: the scene-membership seam.
//!
//! # Invariants
//! - The scene sink never owns generated resources; it only tracks membership.
//! - Generators add and remove renderables through the trait, never directly.
//!
//! # Workaround
//! Provides a trait-based scene interface with a recording debug scene as a
//! workaround for a real GPU scene graph. The trait is stable; swap in a GPU
//! implementation without changing consumers.

mod scene;

pub use scene::{DebugScene, Scene};

pub fn crate_info() -> &'static str {
    "driftspace-render v0.1.0"
}
