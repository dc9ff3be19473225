use crate::foundation::math::mix_u8;

/// Opacity, 0 = transparent, 255 = opaque.
pub type Opa = u8;

pub const OPA_TRANSP: Opa = 0;
/// At or below this an element is treated as invisible.
pub const OPA_MIN: Opa = 2;
/// At or above this an element is treated as opaque.
pub const OPA_MAX: Opa = 253;
pub const OPA_COVER: Opa = 255;
pub const OPA_50: Opa = 127;

/// Snap opacities close to opaque to fully opaque.
pub fn snap_cover(opa: Opa) -> Opa {
    if opa >= OPA_MAX { OPA_COVER } else { opa }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    /// Pure green, the transparent key of chroma-keyed images.
    pub const CHROMA_KEY: Self = Self::rgb(0, 0xff, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `0xRRGGBB`.
    pub const fn from_hex(v: u32) -> Self {
        Self::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// `fg` over `bg` with weight `mix` for `fg`, rounded to nearest.
    pub fn mix(fg: Color, bg: Color, mix: Opa) -> Color {
        Color {
            r: mix_u8(fg.r, bg.r, mix),
            g: mix_u8(fg.g, bg.g, mix),
            b: mix_u8(fg.b, bg.b, mix),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}
