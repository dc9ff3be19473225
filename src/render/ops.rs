use crate::foundation::core::{Color, Opa};
use crate::geometry::area::Area;
use crate::geometry::mask::MaskView;
use crate::pixel::buffer::ImageBuf;
use crate::render::blend::{BlendDesc, BlendMode};
use crate::render::transform::ImageTransform;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradDir {
    #[default]
    None,
    Horizontal,
    Vertical,
}

/// Fill color of a shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Paint {
    Solid(Color),
    /// Two-stop linear gradient across the shape's area.
    Gradient { dir: GradDir, from: Color, to: Color },
}

impl Paint {
    pub fn color_at(&self, area: &Area, x: i32, y: i32) -> Color {
        match *self {
            Self::Solid(c) => c,
            Self::Gradient { dir, from, to } => {
                let (pos, len) = match dir {
                    GradDir::None => return from,
                    GradDir::Horizontal => (x - area.x1, area.width()),
                    GradDir::Vertical => (y - area.y1, area.height()),
                };
                if len <= 1 {
                    return from;
                }
                let t = pos.clamp(0, len - 1) as i64 * 255 / (len - 1) as i64;
                Color::mix(to, from, t as Opa)
            }
        }
    }
}

/// Filled rectangle with optionally rounded corners.
#[derive(Clone, Copy, Debug)]
pub struct FillDesc<'a> {
    pub area: Area,
    pub radius: i32,
    pub paint: Paint,
    pub opa: Opa,
    pub mask: Option<MaskView<'a>>,
    pub mode: BlendMode,
}

/// `width` concentric 1px rounded outlines, outermost along `area`.
#[derive(Clone, Copy, Debug)]
pub struct StrokeDesc<'a> {
    pub area: Area,
    pub radius: i32,
    pub width: i32,
    pub color: Color,
    pub opa: Opa,
    pub mask: Option<MaskView<'a>>,
    pub mode: BlendMode,
}

/// Image placed with its top-left at `coords`, optionally rotated and scaled.
#[derive(Clone, Copy, Debug)]
pub struct ImageBlit<'a> {
    pub image: ImageBuf<'a>,
    pub coords: Area,
    pub transform: ImageTransform,
    pub opa: Opa,
    pub recolor: Color,
    pub recolor_opa: Opa,
    pub mask: Option<MaskView<'a>>,
    pub mode: BlendMode,
}

/// Any operation a backend executes.
#[derive(Clone, Copy, Debug)]
pub enum DrawOp<'a> {
    Blend(BlendDesc<'a>),
    Fill(FillDesc<'a>),
    Stroke(StrokeDesc<'a>),
    Blit(ImageBlit<'a>),
}

impl DrawOp<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blend(_) => "blend",
            Self::Fill(_) => "fill",
            Self::Stroke(_) => "stroke",
            Self::Blit(_) => "blit",
        }
    }
}
