use serde::{Deserialize, Serialize};

use driftspace_common::Range;

/// Parameters shared by every matter kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Post-processing bloom strength hint passed through to the host.
    pub bloom_intensity: f32,
    /// Background clear color, 0xRRGGBB.
    pub clear_color: u32,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            bloom_intensity: 2.0,
            clear_color: 0x000000,
        }
    }
}

/// Star field generation parameters.
///
/// The budget is split across the bright/normal/pale layers by sampling each
/// layer's fraction range at generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarfieldConfig {
    /// Total vertex budget per star field.
    pub budget: u32,
    /// Fraction of the budget spent on the bright layer.
    pub bright: Range,
    /// Fraction of the budget spent on the normal layer.
    pub normal: Range,
    /// Fraction of the budget spent on the pale layer.
    pub pale: Range,
    /// Sprite size for the bright layer.
    pub size: Range,
    /// Sprite size for the pass (normal/pale) layers.
    pub pass_size: Range,
    pub opacity: Range,
    /// Palette used by open star fields.
    pub colors: Vec<u32>,
    /// Palette used by globular star fields.
    pub globular_colors: Vec<u32>,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            budget: 12_000,
            bright: Range::new(0.0002, 0.001),
            normal: Range::new(0.2, 0.35),
            pale: Range::new(0.55, 0.75),
            size: Range::new(60.0, 90.0),
            pass_size: Range::new(40.0, 60.0),
            opacity: Range::new(0.6, 1.0),
            colors: vec![0xFFFFFF, 0xF8F7FF, 0xFFF4EA, 0xFFD9B2, 0x9BB0FF],
            globular_colors: vec![0xFFF4EA, 0xFFE9D2, 0xFFD9B2, 0xFFC58F],
        }
    }
}

/// Nebula generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NebulaConfig {
    /// Total vertex budget per nebula.
    pub budget: u32,
    /// Fraction of the budget spent on the cloud shell.
    pub cloud: Range,
    /// Fraction of the budget spent on the bright core.
    pub bright: Range,
    /// Ring resolution of the emission shell.
    pub emission_radius_segments: u32,
    pub size: Range,
    pub opacity: Range,
    /// Inner palette for emission nebulae.
    pub colors_in: Vec<u32>,
    /// Outer palette for emission nebulae.
    pub colors_out: Vec<u32>,
    /// Inner palette for remnant nebulae.
    pub remnant_colors_in: Vec<u32>,
    /// Outer palette for remnant nebulae.
    pub remnant_colors_out: Vec<u32>,
}

impl Default for NebulaConfig {
    fn default() -> Self {
        Self {
            budget: 8_000,
            cloud: Range::new(0.10, 0.15),
            bright: Range::new(0.0001, 0.001),
            emission_radius_segments: 50,
            size: Range::new(180.0, 240.0),
            opacity: Range::new(0.3, 0.7),
            colors_in: vec![0xFF6B6B, 0xFFA06B, 0xFFD56B, 0xC9FF6B],
            colors_out: vec![0x4B0082, 0x6A5ACD, 0x483D8B, 0x191970],
            remnant_colors_in: vec![0x7FDBFF, 0x39CCCC, 0x3D9970],
            remnant_colors_out: vec![0x85144B, 0xB10DC9, 0xF012BE],
        }
    }
}

/// Spiral arm shaping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpiralConfig {
    /// Exponent controlling how tightly vertices hug the arm.
    pub randomness_power: f32,
    /// Lateral jitter amplitude applied along each branch.
    pub branches_amplitude: f32,
    /// Number of arms.
    pub branches: Range,
}

/// Galaxy generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalaxyConfig {
    /// Total vertex budget per galaxy.
    pub budget: u32,
    pub spiral: SpiralConfig,
    pub size: Range,
    pub opacity: Range,
    pub colors: Vec<u32>,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            budget: 50_000,
            spiral: SpiralConfig {
                randomness_power: 0.0005,
                branches_amplitude: 0.0002,
                branches: Range::new(2.0, 8.0),
            },
            size: Range::new(20.0, 40.0),
            opacity: Range::new(0.5, 0.9),
            colors: vec![0xFFDFBA, 0xBAE1FF, 0xFFFFBA, 0xFFB3BA],
        }
    }
}

/// Giant star generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiantConfig {
    pub size: Range,
    pub opacity: Range,
    pub blue_colors: Vec<u32>,
    pub red_colors: Vec<u32>,
}

impl Default for GiantConfig {
    fn default() -> Self {
        Self {
            size: Range::new(300.0, 420.0),
            opacity: Range::new(0.4, 0.8),
            blue_colors: vec![0x9BB0FF, 0xAABFFF, 0xCAD7FF],
            red_colors: vec![0xFFCC6F, 0xFFAD51, 0xFF8912],
        }
    }
}

/// Singularity generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingularityConfig {
    pub disc_size: Range,
    /// Accretion discs render fully opaque; the range stays degenerate unless
    /// a universe preset overrides it.
    pub opacity: Range,
    pub colors: Vec<u32>,
}

impl Default for SingularityConfig {
    fn default() -> Self {
        Self {
            disc_size: Range::new(220.0, 320.0),
            opacity: Range::fixed(1.0),
            colors: vec![0xFF9500, 0xFFB340, 0xFFE0A3],
        }
    }
}

/// The live, universe-scoped parameter bundle consumed by matter generators.
///
/// Owned by the active universe and rewritten on every (re)activation; read
/// by every subsequent matter generation call until the next activation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatterConfig {
    pub global: GlobalConfig,
    pub starfield: StarfieldConfig,
    pub nebula: NebulaConfig,
    pub galaxy: GalaxyConfig,
    pub giant: GiantConfig,
    pub singularity: SingularityConfig,
}
