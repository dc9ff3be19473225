use crate::foundation::core::{Color, OPA_COVER, OPA_TRANSP, Opa, Point};
use crate::pixel::buffer::ImageBuf;
use crate::render::blend::BlendMode;
use crate::render::ops::{GradDir, Paint};
use crate::render::transform::ZOOM_NONE;

bitflags::bitflags! {
    /// Sides of a rectangle that carry a border.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    pub struct BorderSide: u8 {
        const BOTTOM = 0b0001;
        const TOP    = 0b0010;
        const LEFT   = 0b0100;
        const RIGHT  = 0b1000;
        const FULL   = 0b1111;
    }
}

impl Default for BorderSide {
    fn default() -> Self {
        Self::FULL
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GradStop {
    pub color: Color,
    /// Position along the gradient, 0..=255.
    pub frac: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GradDesc {
    pub dir: GradDir,
    pub stops: Vec<GradStop>,
}

impl Default for GradDesc {
    fn default() -> Self {
        Self {
            dir: GradDir::None,
            stops: vec![
                GradStop {
                    color: Color::WHITE,
                    frac: 0,
                },
                GradStop {
                    color: Color::BLACK,
                    frac: 255,
                },
            ],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BgDesc {
    pub color: Color,
    pub opa: Opa,
    pub grad: GradDesc,
}

impl Default for BgDesc {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            opa: OPA_COVER,
            grad: GradDesc::default(),
        }
    }
}

impl BgDesc {
    /// What the background is filled with.
    ///
    /// Only a two-stop gradient ending at fraction 255 is drawn as a gradient; any other stop
    /// layout falls back to the first stop, and equal stops collapse to a solid fill.
    pub fn paint(&self) -> Paint {
        if self.grad.dir == GradDir::None {
            return Paint::Solid(self.color);
        }
        let Some(first) = self.grad.stops.first() else {
            return Paint::Solid(self.color);
        };
        match self.grad.stops.as_slice() {
            [from, to] if to.frac == 255 && from.color != to.color => Paint::Gradient {
                dir: self.grad.dir,
                from: from.color,
                to: to.color,
            },
            _ => Paint::Solid(first.color),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BorderDesc {
    pub color: Color,
    pub width: i32,
    pub opa: Opa,
    pub side: BorderSide,
    /// Drawn later by the caller, after the children; skipped here.
    pub post: bool,
}

impl Default for BorderDesc {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 0,
            opa: OPA_COVER,
            side: BorderSide::FULL,
            post: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OutlineDesc {
    pub color: Color,
    pub width: i32,
    pub opa: Opa,
    /// Gap between the rectangle and the outline.
    pub pad: i32,
}

impl Default for OutlineDesc {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 0,
            opa: OPA_COVER,
            pad: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShadowDesc {
    pub color: Color,
    pub width: i32,
    pub ofs_x: i32,
    pub ofs_y: i32,
    pub spread: i32,
    pub opa: Opa,
}

impl Default for ShadowDesc {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 0,
            ofs_x: 0,
            ofs_y: 0,
            spread: 0,
            opa: OPA_COVER,
        }
    }
}

/// Glyph coverage, one byte per pixel, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct A8Bitmap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<Opa>,
}

/// Glyph source for symbol background images.
pub trait SymbolFont {
    /// Pixel size of `text` when rendered.
    fn measure(&self, text: &str) -> (i32, i32);

    /// Coverage of `text`; `None` when the font has no glyphs for it.
    fn rasterize(&self, text: &str) -> Option<A8Bitmap>;
}

#[derive(Clone, Copy)]
pub enum ImageSource<'a> {
    Image(ImageBuf<'a>),
    Symbol {
        text: &'a str,
        font: &'a dyn SymbolFont,
    },
}

impl std::fmt::Debug for ImageSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image(img) => f.debug_tuple("Image").field(img).finish(),
            Self::Symbol { text, .. } => f.debug_struct("Symbol").field("text", text).finish(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct BgImageDesc<'a> {
    pub src: ImageSource<'a>,
    pub opa: Opa,
    pub recolor: Color,
    pub recolor_opa: Opa,
    /// Repeat from the top-left instead of centering once.
    pub tiled: bool,
}

impl<'a> BgImageDesc<'a> {
    pub fn new(src: ImageSource<'a>) -> Self {
        Self {
            src,
            opa: OPA_COVER,
            recolor: Color::BLACK,
            recolor_opa: OPA_TRANSP,
            tiled: false,
        }
    }
}

/// Everything drawn for one rectangle.
#[derive(Clone, Debug, Default)]
pub struct RectDesc<'a> {
    pub radius: i32,
    pub blend_mode: BlendMode,
    pub bg: BgDesc,
    pub bg_img: Option<BgImageDesc<'a>>,
    pub border: BorderDesc,
    pub outline: OutlineDesc,
    pub shadow: ShadowDesc,
}

/// Placement and tint of an image.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ImageDesc {
    /// Rotation in tenths of a degree.
    pub angle: i32,
    /// Scale factor where 256 is 1:1.
    pub zoom: u16,
    /// Rotation centre relative to the image's top-left.
    pub pivot: Point,
    pub blend_mode: BlendMode,
    pub opa: Opa,
    pub recolor: Color,
    pub recolor_opa: Opa,
}

impl Default for ImageDesc {
    fn default() -> Self {
        Self {
            angle: 0,
            zoom: ZOOM_NONE,
            pivot: Point::default(),
            blend_mode: BlendMode::Normal,
            opa: OPA_COVER,
            recolor: Color::BLACK,
            recolor_opa: OPA_TRANSP,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/desc.rs"]
mod tests;
