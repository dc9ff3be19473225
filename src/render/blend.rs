use crate::foundation::core::{Color, OPA_COVER, Opa};
use crate::foundation::math::{mul_div255_u8, opa_mul};
use crate::geometry::area::Area;
use crate::geometry::mask::MaskView;
use crate::pixel::buffer::PixelBuf;

/// How a source color combines with the destination before opacity is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Normal,
    Additive,
    Subtractive,
    Multiply,
}

impl BlendMode {
    /// The color written at full opacity.
    pub fn apply(self, src: Color, dst: Color) -> Color {
        match self {
            Self::Normal => src,
            Self::Additive => Color::rgb(
                dst.r.saturating_add(src.r),
                dst.g.saturating_add(src.g),
                dst.b.saturating_add(src.b),
            ),
            Self::Subtractive => Color::rgb(
                dst.r.saturating_sub(src.r),
                dst.g.saturating_sub(src.g),
                dst.b.saturating_sub(src.b),
            ),
            Self::Multiply => Color::rgb(
                mul_div255_u8(dst.r, src.r),
                mul_div255_u8(dst.g, src.g),
                mul_div255_u8(dst.b, src.b),
            ),
        }
    }
}

/// Source pixels of a blend.
#[derive(Clone, Copy, Debug)]
pub enum BlendSource<'a> {
    Solid(Color),
    /// One color per pixel of the blend area, row-major.
    Colors(&'a [Color]),
}

/// One composite of a source onto the destination, restricted to `area`.
#[derive(Clone, Copy, Debug)]
pub struct BlendDesc<'a> {
    pub area: Area,
    pub source: BlendSource<'a>,
    pub opa: Opa,
    pub mask: Option<MaskView<'a>>,
    pub mode: BlendMode,
}

impl<'a> BlendDesc<'a> {
    pub fn solid(area: Area, color: Color, opa: Opa) -> Self {
        Self {
            area,
            source: BlendSource::Solid(color),
            opa,
            mask: None,
            mode: BlendMode::Normal,
        }
    }
}

/// Composite `len` pixels starting at `(x, y)`.
///
/// Per pixel `a = cover * opa` and `out = (src*a + dst*(255-a) + 127) / 255`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn composite_span(
    buf: &mut PixelBuf<'_>,
    x: i32,
    y: i32,
    len: usize,
    source: BlendSource<'_>,
    cover: Option<&[Opa]>,
    opa: Opa,
    mode: BlendMode,
) {
    let depth = buf.depth();
    let bpp = depth.bytes_per_pixel();
    let Some(bytes) = buf.span_mut(x, y, len) else {
        return;
    };
    for (i, px) in bytes.chunks_exact_mut(bpp).enumerate() {
        let a = match cover {
            Some(c) => match c.get(i) {
                Some(&v) => opa_mul(v, opa),
                None => 0,
            },
            None => opa,
        };
        if a == 0 {
            continue;
        }
        let src = match source {
            BlendSource::Solid(c) => c,
            BlendSource::Colors(cs) => match cs.get(i) {
                Some(&c) => c,
                None => continue,
            },
        };
        if mode == BlendMode::Normal && a == OPA_COVER {
            depth.write(px, src);
            continue;
        }
        let dst = depth.read(px);
        let src = mode.apply(src, dst);
        let out = if a == OPA_COVER {
            src
        } else {
            Color::mix(src, dst, a)
        };
        depth.write(px, out);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
