//! Scanline kernels shared by every backend that rasterizes on the host.

use crate::foundation::core::{Color, OPA_COVER, OPA_MIN, OPA_TRANSP, Opa};
use crate::foundation::error::{Outcome, Skip};
use crate::geometry::area::Area;
use crate::geometry::mask::{MaskResult, MaskView};
use crate::geometry::radius::{ring_coverage, rounded_coverage};
use crate::pixel::buffer::PixelBuf;
use crate::render::blend::{BlendDesc, BlendSource, composite_span};
use crate::render::ops::{FillDesc, GradDir, ImageBlit, Paint, StrokeDesc};

/// Pixels of `area` that may be written: inside the clip and the buffer.
pub(crate) fn draw_area(buf: &PixelBuf<'_>, clip: &Area, area: &Area) -> Option<Area> {
    area.intersect(clip)?.intersect(&buf.area())
}

/// Shared early-outs, in the order every backend reports them.
pub(crate) fn precheck(
    buf: &PixelBuf<'_>,
    clip: &Area,
    area: &Area,
    opa: Opa,
) -> Result<Area, Outcome> {
    if opa <= OPA_MIN {
        return Err(Outcome::Skipped(Skip::Invisible));
    }
    draw_area(buf, clip, area).ok_or(Outcome::Skipped(Skip::Clipped))
}

/// Apply the optional mask to `cover`; `None` when the row can be skipped.
fn masked<'c>(
    mask: Option<&MaskView<'_>>,
    cover: &'c mut [Opa],
    x: i32,
    y: i32,
) -> Option<&'c [Opa]> {
    if let Some(m) = mask
        && m.apply(cover, x, y) == MaskResult::Transparent
    {
        return None;
    }
    Some(cover)
}

pub(crate) fn blend(buf: &mut PixelBuf<'_>, clip: &Area, dsc: &BlendDesc<'_>) -> Outcome {
    let draw = match precheck(buf, clip, &dsc.area, dsc.opa) {
        Ok(a) => a,
        Err(o) => return o,
    };
    let w = draw.width() as usize;
    let src_w = dsc.area.width() as usize;
    let mut cover = vec![OPA_COVER; w];

    for y in draw.y1..=draw.y2 {
        let source = match dsc.source {
            BlendSource::Solid(c) => BlendSource::Solid(c),
            BlendSource::Colors(colors) => {
                let start = (y - dsc.area.y1) as usize * src_w + (draw.x1 - dsc.area.x1) as usize;
                match colors.get(start..start + w) {
                    Some(row) => BlendSource::Colors(row),
                    None => continue,
                }
            }
        };
        let row_cover = match &dsc.mask {
            None => None,
            Some(m) => {
                cover.fill(OPA_COVER);
                match masked(Some(m), &mut cover, draw.x1, y) {
                    Some(c) => Some(c),
                    None => continue,
                }
            }
        };
        composite_span(buf, draw.x1, y, w, source, row_cover, dsc.opa, dsc.mode);
    }
    Outcome::Drawn
}

pub(crate) fn fill(buf: &mut PixelBuf<'_>, clip: &Area, dsc: &FillDesc<'_>) -> Outcome {
    let draw = match precheck(buf, clip, &dsc.area, dsc.opa) {
        Ok(a) => a,
        Err(o) => return o,
    };
    let w = draw.width() as usize;
    let radius = dsc.area.clamp_radius(dsc.radius);
    let mut cover = vec![OPA_COVER; w];
    let colors: Vec<Color> = match dsc.paint {
        Paint::Gradient {
            dir: GradDir::Horizontal,
            ..
        } => (draw.x1..=draw.x2)
            .map(|x| dsc.paint.color_at(&dsc.area, x, draw.y1))
            .collect(),
        _ => Vec::new(),
    };

    for y in draw.y1..=draw.y2 {
        let rounded = radius > 0
            && (y < dsc.area.y1 + radius || y > dsc.area.y2 - radius);
        if rounded {
            for (i, c) in cover.iter_mut().enumerate() {
                *c = rounded_coverage(&dsc.area, radius, draw.x1 + i as i32, y);
            }
        } else {
            cover.fill(OPA_COVER);
        }
        let needs_cover = rounded || dsc.mask.is_some();
        let row_cover = if needs_cover {
            match masked(dsc.mask.as_ref(), &mut cover, draw.x1, y) {
                Some(c) => Some(c),
                None => continue,
            }
        } else {
            None
        };
        let source = if colors.is_empty() {
            BlendSource::Solid(dsc.paint.color_at(&dsc.area, draw.x1, y))
        } else {
            BlendSource::Colors(&colors)
        };
        composite_span(buf, draw.x1, y, w, source, row_cover, dsc.opa, dsc.mode);
    }
    Outcome::Drawn
}

pub(crate) fn stroke(buf: &mut PixelBuf<'_>, clip: &Area, dsc: &StrokeDesc<'_>) -> Outcome {
    if dsc.width <= 0 {
        return Outcome::Skipped(Skip::Invisible);
    }
    let draw = match precheck(buf, clip, &dsc.area, dsc.opa) {
        Ok(a) => a,
        Err(o) => return o,
    };
    let mut cover = vec![OPA_TRANSP; draw.width() as usize];

    for i in 0..dsc.width {
        let ring = dsc.area.increase(-i, -i);
        if !ring.is_valid() {
            break;
        }
        let radius = (dsc.radius - i).max(0);
        let Some(span) = ring.intersect(&draw) else {
            continue;
        };
        let w = span.width() as usize;
        for y in span.y1..=span.y2 {
            let row = &mut cover[..w];
            let mut any = false;
            for (j, c) in row.iter_mut().enumerate() {
                *c = ring_coverage(&ring, radius, span.x1 + j as i32, y);
                any |= *c != 0;
            }
            if !any {
                continue;
            }
            let Some(row) = masked(dsc.mask.as_ref(), row, span.x1, y) else {
                continue;
            };
            composite_span(
                buf,
                span.x1,
                y,
                w,
                BlendSource::Solid(dsc.color),
                Some(row),
                dsc.opa,
                dsc.mode,
            );
        }
    }
    Outcome::Drawn
}

pub(crate) fn blit(buf: &mut PixelBuf<'_>, clip: &Area, dsc: &ImageBlit<'_>) -> Outcome {
    let bounds = dsc.transform.bounds(&dsc.coords);
    let draw = match precheck(buf, clip, &bounds, dsc.opa) {
        Ok(a) => a,
        Err(o) => return o,
    };
    let w = draw.width() as usize;
    let inverse = dsc.transform.affine(&dsc.coords).inverse();
    let mut cover = vec![OPA_TRANSP; w];
    let mut colors = vec![Color::BLACK; w];

    for y in draw.y1..=draw.y2 {
        let mut any = false;
        for (i, (c, a)) in colors.iter_mut().zip(cover.iter_mut()).enumerate() {
            let x = draw.x1 + i as i32;
            let (sx, sy) = if dsc.transform.is_copy() {
                ((x - dsc.coords.x1) as i64, (y - dsc.coords.y1) as i64)
            } else {
                let p = inverse * kurbo::Point::new(x as f64 + 0.5, y as f64 + 0.5);
                (p.x.floor() as i64, p.y.floor() as i64)
            };
            let (color, alpha) = dsc.image.texel(sx, sy);
            *c = if dsc.recolor_opa > OPA_TRANSP {
                Color::mix(dsc.recolor, color, dsc.recolor_opa)
            } else {
                color
            };
            *a = alpha;
            any |= alpha != 0;
        }
        if !any {
            continue;
        }
        let Some(row) = masked(dsc.mask.as_ref(), &mut cover, draw.x1, y) else {
            continue;
        };
        composite_span(
            buf,
            draw.x1,
            y,
            w,
            BlendSource::Colors(&colors),
            Some(row),
            dsc.opa,
            dsc.mode,
        );
    }
    Outcome::Drawn
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
