//! Resource library: read-only pools of preloaded visual resources.
//!
//! # Invariants
//! - Pools are populated exactly once at startup and never mutated afterwards.
//! - Generators consume textures by handle, never by raw file paths.

mod library;

pub use library::{LibraryError, ResourceLibrary, TextureChannel, TextureInfo};

pub fn crate_info() -> &'static str {
    "driftspace-library v0.1.0"
}
