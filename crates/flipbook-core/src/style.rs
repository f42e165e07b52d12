//! Colours and stroke styles.

use peniko::Color;
use serde::{Deserialize, Serialize};

use crate::render::Blend;

/// RGBA8 colour that round-trips through serde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorRgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ColorRgba {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const GREEN: Self = Self::new(0, 255, 0, 255);
    pub const MAGENTA: Self = Self::new(255, 0, 255, 255);
    pub const YELLOW: Self = Self::new(255, 255, 0, 255);
    pub const DENIM: Self = Self::from_hex(0x1976DB);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from a `0xRRGGBB` value.
    pub const fn from_hex(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255)
    }

    pub fn is_transparent(self) -> bool {
        self.a == 0
    }
}

impl From<Color> for ColorRgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<ColorRgba> for Color {
    fn from(c: ColorRgba) -> Self {
        Color::from_rgba8(c.r, c.g, c.b, c.a)
    }
}

/// Stroke end cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCap {
    #[default]
    Round,
    Square,
    Butt,
}

/// How a layer's paths are painted.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub color: Color,
    pub width: f64,
    pub line_cap: LineCap,
}

impl Style {
    /// Round-capped style, the default for every instrument.
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            line_cap: LineCap::Round,
        }
    }

    /// A fully transparent colour erases instead of painting.
    pub fn is_eraser(&self) -> bool {
        self.color.to_rgba8().a == 0
    }

    /// Blend mode used when compositing this style.
    pub fn blend(&self) -> Blend {
        if self.is_eraser() {
            Blend::Copy
        } else {
            Blend::SourceOver
        }
    }
}

impl PartialEq for Style {
    fn eq(&self, other: &Self) -> bool {
        ColorRgba::from(self.color) == ColorRgba::from(other.color)
            && self.width == other.width
            && self.line_cap == other.line_cap
    }
}
