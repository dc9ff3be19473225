use crate::foundation::core::{Color, OPA_COVER, Opa};

/// Destination pixel layout. Multi-byte pixels are stored little endian.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorDepth {
    /// `rrrrrggg gggbbbbb` as a little-endian `u16`.
    Rgb565,
    /// Bytes `b, g, r`.
    Rgb888,
    /// Bytes `b, g, r, x`; `x` is written as `0xff`.
    #[default]
    Xrgb8888,
}

impl ColorDepth {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb565 => 2,
            Self::Rgb888 => 3,
            Self::Xrgb8888 => 4,
        }
    }

    pub const fn bits(self) -> u32 {
        match self {
            Self::Rgb565 => 16,
            Self::Rgb888 => 24,
            Self::Xrgb8888 => 32,
        }
    }

    /// Decode the pixel at the start of `px`.
    pub fn read(self, px: &[u8]) -> Color {
        match self {
            Self::Rgb565 => {
                let v = u16::from_le_bytes([px[0], px[1]]);
                let r = ((v >> 11) & 0x1f) as u8;
                let g = ((v >> 5) & 0x3f) as u8;
                let b = (v & 0x1f) as u8;
                Color::rgb((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
            }
            Self::Rgb888 | Self::Xrgb8888 => Color::rgb(px[2], px[1], px[0]),
        }
    }

    /// Encode `c` into the start of `px`.
    pub fn write(self, px: &mut [u8], c: Color) {
        match self {
            Self::Rgb565 => {
                let v = ((c.r as u16 >> 3) << 11) | ((c.g as u16 >> 2) << 5) | (c.b as u16 >> 3);
                px[..2].copy_from_slice(&v.to_le_bytes());
            }
            Self::Rgb888 => px[..3].copy_from_slice(&[c.b, c.g, c.r]),
            Self::Xrgb8888 => px[..4].copy_from_slice(&[c.b, c.g, c.r, 0xff]),
        }
    }

    /// `c` as it reads back after a round trip through this depth.
    pub fn quantize(self, c: Color) -> Color {
        let mut px = [0u8; 4];
        self.write(&mut px, c);
        self.read(&px)
    }
}

/// Layout of source image pixels relative to the image's color depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    /// Opaque pixels in the depth's native layout.
    #[default]
    Native,
    /// Native layout followed by one alpha byte.
    NativeAlpha,
    /// Native layout where pure green is transparent.
    NativeChromaKeyed,
}

impl ImageFormat {
    pub const fn bytes_per_pixel(self, depth: ColorDepth) -> usize {
        match self {
            Self::NativeAlpha => depth.bytes_per_pixel() + 1,
            Self::Native | Self::NativeChromaKeyed => depth.bytes_per_pixel(),
        }
    }

    /// Decode one pixel into color and alpha.
    pub fn read(self, depth: ColorDepth, px: &[u8]) -> (Color, Opa) {
        let c = depth.read(px);
        match self {
            Self::Native => (c, OPA_COVER),
            Self::NativeAlpha => (c, px[depth.bytes_per_pixel()]),
            Self::NativeChromaKeyed => {
                if c == depth.quantize(Color::CHROMA_KEY) {
                    (c, 0)
                } else {
                    (c, OPA_COVER)
                }
            }
        }
    }
}

/// Color packed in device channel order, `0xAABBGGRR`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DeviceColor(pub u32);

impl DeviceColor {
    pub const fn new(c: Color, a: Opa) -> Self {
        Self(((a as u32) << 24) | ((c.b as u32) << 16) | ((c.g as u32) << 8) | c.r as u32)
    }

    pub const fn color(self) -> Color {
        Color::rgb(self.0 as u8, (self.0 >> 8) as u8, (self.0 >> 16) as u8)
    }

    pub const fn alpha(self) -> Opa {
        (self.0 >> 24) as u8
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/format.rs"]
mod tests;
