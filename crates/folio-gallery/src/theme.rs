#![forbid(unsafe_code)]

//! Light/dark theme colours for the gallery surface.

use serde::{Deserialize, Serialize};

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque colour from `0xRRGGBB`.
    #[must_use]
    pub const fn rgb(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
            a: 0xFF,
        }
    }

    /// Same colour with alpha `fraction` of fully opaque.
    #[must_use]
    pub fn with_alpha(self, fraction: f32) -> Self {
        Self {
            a: (fraction.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// CSS `#rrggbbaa` notation.
    #[must_use]
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// Page theme supplied by the surrounding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub const fn background(self) -> Rgba {
        match self {
            Self::Light => Rgba::rgb(0xF5F5F5),
            Self::Dark => Rgba::rgb(0x111111),
        }
    }

    /// Translucent fill shown behind a cell while its image loads.
    #[must_use]
    pub fn cell_fill(self) -> Rgba {
        match self {
            Self::Light => Rgba::rgb(0x000000).with_alpha(0.03),
            Self::Dark => Rgba::rgb(0xFFFFFF).with_alpha(0.03),
        }
    }

    /// Hairline ring around each cell.
    #[must_use]
    pub fn cell_ring(self) -> Rgba {
        match self {
            Self::Light => Rgba::rgb(0x000000).with_alpha(0.05),
            Self::Dark => Rgba::rgb(0xFFFFFF).with_alpha(0.10),
        }
    }
}
