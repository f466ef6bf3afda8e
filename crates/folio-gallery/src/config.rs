#![forbid(unsafe_code)]

//! Gallery tuning as data.
//!
//! Every hand-tuned constant of the grid (cell geometry, overdraw, spring
//! parameters, proximity radius and bump, fade timings, image list) lives in
//! [`GalleryConfig`] and can be loaded from TOML or JSON.
//!
//! ```toml
//! # folio.toml
//! [grid]
//! cell_size = 285.0
//! gap = 20.0
//!
//! [proximity]
//! radius = 420.0
//! max_scale_bump = 0.08
//!
//! [images]
//! policy = "shift-on-wrap"
//! base = ["a.jpg", "b.jpg"]
//! ```
//!
//! # Defaults
//!
//! `GalleryConfig::default()` is the stock portfolio gallery: 300px cells
//! with a 20px gap, two cells of overdraw, an overdamped 400/60 glide, and a
//! 12% hover bump within 360px.

use std::path::Path;

use folio_core::animation::Spring;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Smallest overdraw that keeps a full spare cell on every side of the
/// viewport: one on the leading edge from the `-stride` wrap origin, and
/// `overdraw - 1` on the trailing edge.
pub const MIN_OVERDRAW: u32 = 2;

const SCALE_REST_DELTA: f64 = 0.0005;
const SCALE_REST_SPEED: f64 = 0.01;

const IMAGE_DIR: &str = "/src/public/Website";

const STOCK_IMAGES: [&str; 27] = [
    "1164962732570788597.jpg",
    "IMG_0486.JPG",
    "IMG_1007.JPG",
    "IMG_1454.JPG",
    "IMG_3177.JPG",
    "IMG_3195.JPG",
    "IMG_3356.JPG",
    "IMG_3476.JPG",
    "IMG_4263.JPG",
    "IMG_4951.JPG",
    "IMG_5224.JPG",
    "IMG_5422.JPG",
    "IMG_5475.JPG",
    "IMG_5649.JPG",
    "IMG_6065.JPG",
    "IMG_6111.JPG",
    "IMG_6168.JPG",
    "IMG_6414.JPG",
    "IMG_6881.JPG",
    "IMG_6972.JPG",
    "IMG_7194.JPG",
    "IMG_7496.JPG",
    "IMG_7795.JPG",
    "IMG_8234.JPG",
    "IMG_8416.JPG",
    "IMG_8949.JPG",
    "IMG_9231.JPG",
];

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Complete gallery configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub grid: GridConfig,
    pub pan: PanConfig,
    pub proximity: ProximityConfig,
    pub fade: FadeConfig,
    pub images: ImageConfig,
}

impl GalleryConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.checked()
    }

    /// Read, parse, and validate a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.checked()
    }

    /// Return `self` if valid, otherwise the first validation error.
    pub fn checked(self) -> Result<Self> {
        match self.validate().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    /// Validate all parameters. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !(self.grid.cell_size > 0.0) {
            errors.push(ConfigError::invalid(
                "grid.cell_size",
                format!("must be > 0, got {}", self.grid.cell_size),
            ));
        }
        if !(self.grid.gap >= 0.0) {
            errors.push(ConfigError::invalid(
                "grid.gap",
                format!("must be >= 0, got {}", self.grid.gap),
            ));
        }
        if self.grid.overdraw < MIN_OVERDRAW {
            errors.push(ConfigError::invalid(
                "grid.overdraw",
                format!("must be >= {MIN_OVERDRAW}, got {}", self.grid.overdraw),
            ));
        }

        if !(self.pan.stiffness > 0.0) {
            errors.push(ConfigError::invalid("pan.stiffness", "must be > 0"));
        }
        if !(self.pan.mass > 0.0) {
            errors.push(ConfigError::invalid("pan.mass", "must be > 0"));
        }
        if self.pan.stiffness > 0.0 && self.pan.mass > 0.0 {
            let critical = self.pan.critical_damping();
            if self.pan.damping < critical {
                errors.push(ConfigError::invalid(
                    "pan.damping",
                    format!(
                        "glide would overshoot: {} is below critical damping {critical:.3}",
                        self.pan.damping
                    ),
                ));
            }
        }
        if !(self.pan.rest_delta > 0.0) {
            errors.push(ConfigError::invalid("pan.rest_delta", "must be > 0"));
        }
        if !(self.pan.rest_speed > 0.0) {
            errors.push(ConfigError::invalid("pan.rest_speed", "must be > 0"));
        }
        if !(self.pan.drag_threshold >= 0.0) {
            errors.push(ConfigError::invalid("pan.drag_threshold", "must be >= 0"));
        }

        if !(self.proximity.radius > 0.0) {
            errors.push(ConfigError::invalid(
                "proximity.radius",
                format!("must be > 0, got {}", self.proximity.radius),
            ));
        }
        if !(0.0..=1.0).contains(&self.proximity.max_scale_bump) {
            errors.push(ConfigError::invalid(
                "proximity.max_scale_bump",
                format!("must be in [0, 1], got {}", self.proximity.max_scale_bump),
            ));
        }
        if !(self.proximity.stiffness > 0.0) {
            errors.push(ConfigError::invalid("proximity.stiffness", "must be > 0"));
        }
        if !(self.proximity.damping >= 0.0) {
            errors.push(ConfigError::invalid("proximity.damping", "must be >= 0"));
        }
        if !(self.proximity.mass > 0.0) {
            errors.push(ConfigError::invalid("proximity.mass", "must be > 0"));
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Cell geometry and overdraw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cell edge length in px. Default: 300.
    pub cell_size: f64,
    /// Gap between cells in px. Default: 20.
    pub gap: f64,
    /// Extra columns/rows beyond what covers the viewport. Default: 2.
    pub overdraw: u32,
}

impl GridConfig {
    /// Distance between neighbouring cell origins.
    #[inline]
    #[must_use]
    pub fn stride(&self) -> f64 {
        self.cell_size + self.gap
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 300.0,
            gap: 20.0,
            overdraw: MIN_OVERDRAW,
        }
    }
}

/// Momentum glide spring and drag recognition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    /// Distance from target (px) below which the glide may rest.
    pub rest_delta: f64,
    /// Speed (px/s) below which the glide may rest.
    pub rest_speed: f64,
    /// Pointer travel (manhattan px) before a press becomes a drag.
    pub drag_threshold: f64,
}

impl PanConfig {
    #[must_use]
    pub fn critical_damping(&self) -> f64 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// One axis of the glide, resting at 0.
    #[must_use]
    pub fn glide_spring(&self) -> Spring {
        Spring::settled(0.0)
            .with_stiffness(self.stiffness)
            .with_damping(self.damping)
            .with_mass(self.mass)
            .with_rest_threshold(self.rest_delta)
            .with_velocity_threshold(self.rest_speed)
    }
}

impl Default for PanConfig {
    fn default() -> Self {
        Self {
            stiffness: 400.0,
            damping: 60.0,
            mass: 1.0,
            rest_delta: 0.1,
            rest_speed: 1.0,
            drag_threshold: 3.0,
        }
    }
}

/// Hover scaling around the cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    /// Distance (px) from a cell center beyond which scale is exactly 1.0.
    pub radius: f64,
    /// Scale increase at zero distance (0.12 = 12% larger).
    pub max_scale_bump: f64,
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
}

impl ProximityConfig {
    /// A per-cell scale spring resting at 1.0.
    #[must_use]
    pub fn scale_spring(&self) -> Spring {
        Spring::settled(1.0)
            .with_stiffness(self.stiffness)
            .with_damping(self.damping)
            .with_mass(self.mass)
            .with_rest_threshold(SCALE_REST_DELTA)
            .with_velocity_threshold(SCALE_REST_SPEED)
    }
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            radius: 360.0,
            max_scale_bump: 0.12,
            stiffness: 700.0,
            damping: 53.0,
            mass: 1.0,
        }
    }
}

/// Reveal timings once every image has settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeConfig {
    pub grid_fade_in_ms: u64,
    pub indicator_fade_out_ms: u64,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            grid_fade_in_ms: 700,
            indicator_fade_out_ms: 500,
        }
    }
}

/// How a cell's image relates to its wrap history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImagePolicy {
    /// The pool-assigned image never changes while the layout is unchanged.
    #[default]
    Fixed,
    /// The image index advances by one per completed wrap lap on either axis.
    ShiftOnWrap,
}

/// Image set and assignment policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Base image references, in declaration order.
    pub base: Vec<String>,
    pub policy: ImagePolicy,
    /// Fixed shuffle seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base: STOCK_IMAGES
                .iter()
                .map(|name| format!("{IMAGE_DIR}/{name}"))
                .collect(),
            policy: ImagePolicy::Fixed,
            seed: None,
        }
    }
}
