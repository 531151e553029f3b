use std::collections::BTreeSet;

use driftspace_common::RenderableId;

/// Scene-membership sink provided by the host rendering layer.
///
/// Matter generators call `add` when shown and `remove` when disposed. The
/// sink tracks visibility only; resource ownership stays with the clusters.
pub trait Scene {
    fn add(&mut self, renderable: RenderableId);
    fn remove(&mut self, renderable: RenderableId);
}

/// Recording scene for tests, benchmarks, and the CLI driver.
///
/// Tracks current membership plus lifetime add/remove counters so tests can
/// assert that every shown renderable is removed exactly once.
#[derive(Debug, Default)]
pub struct DebugScene {
    visible: BTreeSet<RenderableId>,
    adds: usize,
    removes: usize,
}

impl DebugScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderables currently in the scene.
    pub fn visible(&self) -> &BTreeSet<RenderableId> {
        &self.visible
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Lifetime number of `add` calls.
    pub fn total_adds(&self) -> usize {
        self.adds
    }

    /// Lifetime number of `remove` calls that matched a visible renderable.
    pub fn total_removes(&self) -> usize {
        self.removes
    }
}

impl Scene for DebugScene {
    fn add(&mut self, renderable: RenderableId) {
        tracing::trace!(?renderable, "scene add");
        self.adds += 1;
        self.visible.insert(renderable);
    }

    fn remove(&mut self, renderable: RenderableId) {
        tracing::trace!(?renderable, "scene remove");
        if self.visible.remove(&renderable) {
            self.removes += 1;
        }
    }
}
