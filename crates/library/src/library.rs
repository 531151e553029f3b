use std::collections::BTreeMap;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use driftspace_common::{MatterKind, TextureHandle};

/// Which visual role a texture plays within its matter kind's pools.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TextureChannel {
    /// Regular star sprite.
    Pass,
    /// High-luminosity star sprite.
    Bright,
    /// Soft nebula cloud sprite.
    Cloud,
    /// Galaxy arm particle sprite.
    Arm,
    /// Giant star halo sprite.
    Halo,
    /// Accretion disc sprite.
    Disc,
}

/// Metadata kept for each preloaded texture.
#[derive(Debug, Clone, Serialize)]
pub struct TextureInfo {
    pub name: &'static str,
    pub kind: MatterKind,
    pub channel: TextureChannel,
}

/// Errors from resource library operations.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("library already preloaded")]
    AlreadyPreloaded,
    #[error("no texture pool for {kind:?}/{channel:?}")]
    EmptyPool {
        kind: MatterKind,
        channel: TextureChannel,
    },
}

/// Built-in preload manifest. The host's asset decoding layer owns the actual
/// pixel data; this core only hands out handles.
const SOURCE: &[(MatterKind, TextureChannel, &str)] = &[
    (MatterKind::Starfield, TextureChannel::Pass, "star1.png"),
    (MatterKind::Starfield, TextureChannel::Pass, "star2.png"),
    (MatterKind::Starfield, TextureChannel::Pass, "star3.png"),
    (MatterKind::Starfield, TextureChannel::Pass, "star4.png"),
    (MatterKind::Starfield, TextureChannel::Pass, "star7.png"),
    (MatterKind::Starfield, TextureChannel::Pass, "star8.png"),
    (MatterKind::Starfield, TextureChannel::Pass, "star9.png"),
    (MatterKind::Starfield, TextureChannel::Pass, "star10.png"),
    (MatterKind::Starfield, TextureChannel::Bright, "brightstar1.png"),
    (MatterKind::Starfield, TextureChannel::Bright, "brightstar2.png"),
    (MatterKind::Starfield, TextureChannel::Bright, "brightstar3.png"),
    (MatterKind::Starfield, TextureChannel::Bright, "brightstar4.png"),
    (MatterKind::Nebula, TextureChannel::Cloud, "cloud1.png"),
    (MatterKind::Nebula, TextureChannel::Cloud, "cloud2.png"),
    (MatterKind::Nebula, TextureChannel::Bright, "brightstar1.png"),
    (MatterKind::Nebula, TextureChannel::Bright, "brightstar3.png"),
    (MatterKind::Galaxy, TextureChannel::Arm, "star1.png"),
    (MatterKind::Galaxy, TextureChannel::Arm, "star3.png"),
    (MatterKind::Giant, TextureChannel::Halo, "halo1.png"),
    (MatterKind::Giant, TextureChannel::Halo, "halo2.png"),
    (MatterKind::Singularity, TextureChannel::Disc, "disc1.png"),
    (MatterKind::Singularity, TextureChannel::Bright, "brightstar2.png"),
];

/// Read-only pool of preloaded texture handles.
///
/// Populated once by [`ResourceLibrary::preload`]; every subsequent matter
/// generation call reads from it. There is no mutation API after preload.
#[derive(Debug, Default)]
pub struct ResourceLibrary {
    pools: BTreeMap<(MatterKind, TextureChannel), Vec<TextureHandle>>,
    textures: BTreeMap<TextureHandle, TextureInfo>,
    preloaded: bool,
}

impl ResourceLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor: a library with its pools already populated.
    pub fn preloaded() -> Self {
        let mut library = Self::new();
        library.fill();
        library
    }

    /// Populate every pool from the built-in manifest. Callable exactly once.
    pub fn preload(&mut self) -> Result<(), LibraryError> {
        if self.preloaded {
            return Err(LibraryError::AlreadyPreloaded);
        }
        self.fill();
        Ok(())
    }

    fn fill(&mut self) {
        for (index, (kind, channel, name)) in SOURCE.iter().enumerate() {
            let handle = TextureHandle(index as u64);
            self.textures.insert(
                handle,
                TextureInfo {
                    name,
                    kind: *kind,
                    channel: *channel,
                },
            );
            self.pools.entry((*kind, *channel)).or_default().push(handle);
        }

        self.preloaded = true;
        tracing::info!(
            textures = self.textures.len(),
            pools = self.pools.len(),
            "resource library preloaded"
        );
    }

    pub fn is_preloaded(&self) -> bool {
        self.preloaded
    }

    /// All handles in the pool for a kind/channel pair.
    pub fn pool(&self, kind: MatterKind, channel: TextureChannel) -> &[TextureHandle] {
        self.pools
            .get(&(kind, channel))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Uniform-discrete pick from a pool.
    pub fn pick(
        &self,
        kind: MatterKind,
        channel: TextureChannel,
        rng: &mut dyn RngCore,
    ) -> Result<TextureHandle, LibraryError> {
        let pool = self.pool(kind, channel);
        if pool.is_empty() {
            return Err(LibraryError::EmptyPool { kind, channel });
        }
        Ok(pool[rng.gen_range(0..pool.len())])
    }

    /// Metadata for a handle, if it exists.
    pub fn info(&self, handle: TextureHandle) -> Option<&TextureInfo> {
        self.textures.get(&handle)
    }

    /// Total number of preloaded textures.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}
