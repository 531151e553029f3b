use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one generated matter instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatterId(pub Uuid);

impl MatterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MatterId {
    fn default() -> Self {
        Self::new()
    }
}

/// Cluster index along the traversal axis.
///
/// The viewpoint advances along a single axis; the world is partitioned into
/// fixed-size clusters indexed by this coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClusterCoord(pub i64);

impl ClusterCoord {
    pub fn new(index: i64) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for ClusterCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cluster[{}]", self.0)
    }
}

/// Category of procedurally generated matter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum MatterKind {
    Starfield,
    Nebula,
    Galaxy,
    Giant,
    Singularity,
}

/// Subtype refining a [`MatterKind`]. Not every pairing is valid; the matter
/// factory rejects incompatible combinations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum MatterSubkind {
    Globular,
    Open,
    Emission,
    Remnant,
    Spiral,
    Blue,
    Red,
    Blackhole,
}

/// A handle referencing a preloaded texture in the resource library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

/// A handle referencing an allocated geometry (vertex buffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeometryHandle(pub u64);

/// A handle referencing an allocated material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialHandle(pub u64);

/// Identity of a renderable as seen by the scene-membership sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RenderableId(pub u64);

/// An author-configured `[min, max]` pair sampled uniformly at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Fixed value expressed as a degenerate range.
    pub const fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Uniform-continuous sample over `[min, max]`, inclusive of both bounds.
    pub fn sample(&self, rng: &mut dyn RngCore) -> f32 {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}
