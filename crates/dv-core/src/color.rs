//! RGBA color value produced by color parsing

use crate::config::ColorRange;

/// Parsed color: 8-bit channels plus a CSS-style alpha in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    /// Create a color with explicit alpha
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Channels as a quadruple in the requested range
    pub fn to_array(self, range: ColorRange) -> [f32; 4] {
        let a = self.a.clamp(0.0, 1.0);
        match range {
            ColorRange::Byte => [self.r as f32, self.g as f32, self.b as f32, a * 255.0],
            ColorRange::Unit => [
                self.r as f32 / 255.0,
                self.g as f32 / 255.0,
                self.b as f32 / 255.0,
                a,
            ],
        }
    }
}
