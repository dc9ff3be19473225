use crate::compose::ctx::{DrawCtx, LiveMask};
use crate::compose::desc::{BgImageDesc, BorderSide, ImageDesc, ImageSource, RectDesc};
use crate::compose::shadow::{Region, ShadowPass, ShadowPlan};
use crate::foundation::core::{Color, OPA_COVER, OPA_MIN, Opa, snap_cover};
use crate::foundation::error::{Outcome, RectResult, Skip};
use crate::foundation::settings::CompositorOpts;
use crate::geometry::area::Area;
use crate::geometry::mask::{MaskResult, MaskView};
use crate::geometry::radius::RadiusMask;
use crate::pixel::buffer::{ImageBuf, PixelBuf};
use crate::render::backend::{DrawBackend, execute_op};
use crate::render::blend::{BlendDesc, BlendMode, BlendSource};
use crate::render::ops::{DrawOp, FillDesc, ImageBlit, StrokeDesc};
use crate::render::software::SoftwareBackend;
use crate::render::transform::ImageTransform;
use crate::shadow::cache::{ShadowCache, ShadowCacheStats};

const CLIPPED: Outcome = Outcome::Skipped(Skip::Clipped);
const INVISIBLE: Outcome = Outcome::Skipped(Skip::Invisible);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositorStats {
    pub rects: u64,
    pub images: u64,
    /// Operations the backend handed back and the software path drew instead.
    pub fallbacks: u64,
}

/// Draws rectangles and images through a backend, falling back to the software rasterizer for
/// anything the backend reports unsupported.
#[derive(Debug)]
pub struct Compositor<B: DrawBackend> {
    backend: B,
    reference: SoftwareBackend,
    shadow_cache: ShadowCache,
    opts: CompositorOpts,
    stats: CompositorStats,
}

impl<B: DrawBackend> Compositor<B> {
    pub fn new(backend: B, opts: CompositorOpts) -> Self {
        Self {
            backend,
            reference: SoftwareBackend::new(),
            shadow_cache: ShadowCache::new(opts.shadow_cache),
            opts,
            stats: CompositorStats::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn opts(&self) -> &CompositorOpts {
        &self.opts
    }

    pub fn stats(&self) -> CompositorStats {
        self.stats
    }

    pub fn shadow_cache_stats(&self) -> ShadowCacheStats {
        self.shadow_cache.stats()
    }

    /// Run `op` on the backend, redoing it in software when the backend declines.
    fn dispatch(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        op: &DrawOp<'_>,
    ) -> RectResult<Outcome> {
        let outcome = execute_op(&mut self.backend, buf, clip, op)?;
        if !outcome.needs_fallback() {
            return Ok(outcome);
        }
        self.stats.fallbacks = self.stats.fallbacks.saturating_add(1);
        if self.stats.fallbacks == 1 {
            tracing::warn!(
                op = op.name(),
                backend = ?self.backend.kind(),
                ?outcome,
                "backend declined operation, drawing in software"
            );
        } else {
            tracing::debug!(op = op.name(), ?outcome, "software fallback");
        }
        execute_op(&mut self.reference, buf, clip, op)
    }

    /// Composite `dsc` into the context's buffer within its clip.
    #[tracing::instrument(level = "trace", skip(self, ctx, dsc), fields(area = ?dsc.area))]
    pub fn blend(&mut self, ctx: &mut DrawCtx<'_>, dsc: &BlendDesc<'_>) -> RectResult<Outcome> {
        let clip = ctx.clip;
        self.dispatch(&mut ctx.buf, &clip, &DrawOp::Blend(*dsc))
    }

    /// Draw `width` concentric 1px rounded outlines inward from `outer`, limited to `clip`.
    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(level = "trace", skip(self, ctx))]
    pub fn draw_border_like(
        &mut self,
        ctx: &mut DrawCtx<'_>,
        outer: &Area,
        clip: &Area,
        radius: i32,
        width: i32,
        color: Color,
        opa: Opa,
    ) -> RectResult<Outcome> {
        let DrawCtx {
            buf,
            clip: ctx_clip,
            masks,
        } = ctx;
        let extent = outer.intersect(clip).and_then(|a| a.intersect(ctx_clip));
        let live = LiveMask::build(masks, extent);
        let Some(clip) = clip.intersect(ctx_clip) else {
            return Ok(CLIPPED);
        };
        self.border_ring(buf, &clip, &live, outer, radius, width, color, opa, BlendMode::Normal)
    }

    #[allow(clippy::too_many_arguments)]
    fn border_ring(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        live: &LiveMask<'_>,
        outer: &Area,
        radius: i32,
        width: i32,
        color: Color,
        opa: Opa,
        mode: BlendMode,
    ) -> RectResult<Outcome> {
        if opa <= OPA_MIN || width <= 0 {
            return Ok(INVISIBLE);
        }
        let op = DrawOp::Stroke(StrokeDesc {
            area: *outer,
            radius: radius.max(0),
            width,
            color,
            opa: snap_cover(opa),
            mask: live.view(),
            mode,
        });
        self.dispatch(buf, clip, &op)
    }

    /// Draw an image with its top-left at `coords`, rotated and scaled per `dsc`.
    #[tracing::instrument(
        level = "debug",
        skip(self, ctx, dsc, image),
        fields(w = image.width(), h = image.height())
    )]
    pub fn draw_image(
        &mut self,
        ctx: &mut DrawCtx<'_>,
        dsc: &ImageDesc,
        coords: &Area,
        image: ImageBuf<'_>,
    ) -> RectResult<Outcome> {
        self.stats.images = self.stats.images.saturating_add(1);
        if !coords.is_valid() {
            return Ok(CLIPPED);
        }
        let DrawCtx { buf, clip, masks } = ctx;
        let transform = ImageTransform::from_params(dsc.angle, dsc.zoom, dsc.pivot);
        let extent = transform.bounds(coords).intersect(clip);
        let live = LiveMask::build(masks, extent);
        let clip = *clip;
        self.blit(
            buf,
            &clip,
            &live,
            ImageBlit {
                image,
                coords: *coords,
                transform,
                opa: dsc.opa,
                recolor: dsc.recolor,
                recolor_opa: dsc.recolor_opa,
                mask: None,
                mode: dsc.blend_mode,
            },
        )
    }

    fn blit<'a>(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        live: &'a LiveMask<'a>,
        mut blit: ImageBlit<'a>,
    ) -> RectResult<Outcome> {
        if blit.opa <= OPA_MIN {
            return Ok(INVISIBLE);
        }
        blit.opa = snap_cover(blit.opa);
        blit.mask = live.view();
        self.dispatch(buf, clip, &DrawOp::Blit(blit))
    }

    /// Draw a rectangle: shadow, background, background image, border, then outline.
    ///
    /// Every stage is skipped on its own; the result is `Drawn` when any stage wrote.
    #[tracing::instrument(
        level = "debug",
        skip(self, ctx, dsc),
        fields(backend = ?self.backend.kind())
    )]
    pub fn draw_rect(
        &mut self,
        ctx: &mut DrawCtx<'_>,
        dsc: &RectDesc<'_>,
        coords: &Area,
    ) -> RectResult<Outcome> {
        self.stats.rects = self.stats.rects.saturating_add(1);
        if !coords.is_valid() {
            return Ok(CLIPPED);
        }
        let DrawCtx { buf, clip, masks } = ctx;
        let clip = *clip;
        let extent = visible_extent(dsc, coords).intersect(&clip);
        if extent.is_none() {
            return Ok(CLIPPED);
        }
        let live = LiveMask::build(masks, extent);

        let mut out = CLIPPED;
        out = out.merge(self.draw_shadow(buf, &clip, &live, dsc, coords)?);
        out = out.merge(self.draw_bg(buf, &clip, &live, dsc, coords)?);
        out = out.merge(self.draw_bg_img(buf, &clip, &live, dsc, coords)?);
        out = out.merge(self.draw_border(buf, &clip, &live, dsc, coords)?);
        out = out.merge(self.draw_outline(buf, &clip, &live, dsc, coords)?);
        tracing::trace!(?out, "rect done");
        Ok(out)
    }

    fn draw_shadow(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        live: &LiveMask<'_>,
        dsc: &RectDesc<'_>,
        coords: &Area,
    ) -> RectResult<Outcome> {
        let sh = &dsc.shadow;
        if sh.width <= 0 || sh.opa <= OPA_MIN {
            return Ok(INVISIBLE);
        }
        if sh.width == 1 && sh.spread <= 0 && sh.ofs_x == 0 && sh.ofs_y == 0 {
            return Ok(INVISIBLE);
        }

        let plan = ShadowPlan::new(coords, dsc.radius, sh, self.opts.shadow_enhance);
        if plan.area.intersect(clip).is_none() {
            return Ok(CLIPPED);
        }
        let kernel = match self.shadow_cache.get_or_build(&plan.params) {
            Ok(k) => k,
            Err(skip) => return Ok(Outcome::Skipped(skip)),
        };

        let opa = snap_cover(sh.opa);
        let simple = !live.is_active()
            && snap_cover(dsc.bg.opa) == OPA_COVER
            && dsc.blend_mode == BlendMode::Normal;
        let pass = ShadowPass {
            plan: &plan,
            kernel: &kernel,
            live,
            occluder: (!simple)
                .then(|| RadiusMask::inverted(plan.occluder, plan.occluder_radius)),
        };

        let mut out = CLIPPED;
        for (region, area) in plan.regions() {
            let Some(sub) = area.intersect(clip) else {
                continue;
            };
            if sub.is_in(&plan.occluder, plan.occluder_radius) {
                continue;
            }
            let drawn = match (simple, region) {
                (true, Region::Centre) => {
                    let op = DrawOp::Blend(BlendDesc::solid(sub, sh.color, opa));
                    self.dispatch(buf, clip, &op)?
                }
                (true, Region::HorizontalEdge) => {
                    let mut row_out = CLIPPED;
                    for y in sub.y1..=sub.y2 {
                        let k = plan.value(&kernel, sub.x1, y);
                        let row_opa = if opa == OPA_COVER {
                            k
                        } else {
                            ((k as u16 * sh.opa as u16) >> 8) as Opa
                        };
                        let row = Area::new(sub.x1, y, sub.x2, y);
                        let op = DrawOp::Blend(BlendDesc::solid(row, sh.color, row_opa));
                        row_out = row_out.merge(self.dispatch(buf, clip, &op)?);
                    }
                    row_out
                }
                _ => self.shadow_region(
                    buf,
                    clip,
                    &pass,
                    &sub,
                    !simple,
                    sh.color,
                    opa,
                    dsc.blend_mode,
                )?,
            };
            out = out.merge(drawn);
        }
        Ok(out)
    }

    /// Blend one shadow region through a coverage buffer, row by row when memory is short.
    #[allow(clippy::too_many_arguments)]
    fn shadow_region(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        pass: &ShadowPass<'_>,
        sub: &Area,
        masked: bool,
        color: Color,
        opa: Opa,
        mode: BlendMode,
    ) -> RectResult<Outcome> {
        let bands: Vec<Area> = match pass.cover(sub, masked) {
            Ok(cover) => return self.shadow_band(buf, clip, sub, &cover, color, opa, mode),
            Err(_) => (sub.y1..=sub.y2)
                .map(|y| Area::new(sub.x1, y, sub.x2, y))
                .collect(),
        };
        tracing::debug!(area = ?sub, "shadow region drawn per row");
        let mut out = CLIPPED;
        for band in bands {
            let Ok(cover) = pass.cover(&band, masked) else {
                return Ok(Outcome::Skipped(Skip::OutOfMemory));
            };
            out = out.merge(self.shadow_band(buf, clip, &band, &cover, color, opa, mode)?);
        }
        Ok(out)
    }

    #[allow(clippy::too_many_arguments)]
    fn shadow_band(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        area: &Area,
        cover: &[Opa],
        color: Color,
        opa: Opa,
        mode: BlendMode,
    ) -> RectResult<Outcome> {
        let op = DrawOp::Blend(BlendDesc {
            area: *area,
            source: BlendSource::Solid(color),
            opa,
            mask: Some(MaskView::Buffer {
                data: cover,
                area: *area,
            }),
            mode,
        });
        self.dispatch(buf, clip, &op)
    }

    fn draw_bg(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        live: &LiveMask<'_>,
        dsc: &RectDesc<'_>,
        coords: &Area,
    ) -> RectResult<Outcome> {
        if dsc.bg.opa <= OPA_MIN {
            return Ok(INVISIBLE);
        }
        let op = DrawOp::Fill(FillDesc {
            area: *coords,
            radius: coords.clamp_radius(dsc.radius),
            paint: dsc.bg.paint(),
            opa: snap_cover(dsc.bg.opa),
            mask: live.view(),
            mode: dsc.blend_mode,
        });
        self.dispatch(buf, clip, &op)
    }

    fn draw_bg_img(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        live: &LiveMask<'_>,
        dsc: &RectDesc<'_>,
        coords: &Area,
    ) -> RectResult<Outcome> {
        let Some(img) = &dsc.bg_img else {
            return Ok(INVISIBLE);
        };
        if img.opa <= OPA_MIN {
            return Ok(INVISIBLE);
        }
        let Some(clip) = coords.intersect(clip) else {
            return Ok(CLIPPED);
        };
        match img.src {
            ImageSource::Symbol { text, font } => {
                let (w, h) = font.measure(text);
                let Some(glyph) = font.rasterize(text) else {
                    tracing::warn!(text, "symbol font has no glyphs");
                    return Ok(INVISIBLE);
                };
                let x1 = coords.x1 + coords.width() / 2 - w / 2;
                let y1 = coords.y1 + coords.height() / 2 - h / 2;
                let area = Area::from_size(x1, y1, glyph.width as i32, glyph.height as i32);
                if !area.is_valid() {
                    return Ok(INVISIBLE);
                }
                if glyph.data.len() < area.size() {
                    tracing::warn!(text, "symbol bitmap is smaller than its size");
                    return Ok(INVISIBLE);
                }
                self.draw_glyph(buf, &clip, live, &area, &glyph.data, img, dsc.blend_mode)
            }
            ImageSource::Image(image) => {
                let (w, h) = (image.width() as i32, image.height() as i32);
                let mut out = CLIPPED;
                if w <= 0 || h <= 0 {
                    return Ok(INVISIBLE);
                }
                for coords in bg_image_tiles(coords, &clip, w, h, img.tiled) {
                    let blit = ImageBlit {
                        image,
                        coords,
                        transform: ImageTransform::Copy,
                        opa: img.opa,
                        recolor: img.recolor,
                        recolor_opa: img.recolor_opa,
                        mask: None,
                        mode: dsc.blend_mode,
                    };
                    out = out.merge(self.blit(buf, &clip, live, blit)?);
                }
                Ok(out)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_glyph(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        live: &LiveMask<'_>,
        area: &Area,
        coverage: &[Opa],
        img: &BgImageDesc<'_>,
        mode: BlendMode,
    ) -> RectResult<Outcome> {
        let mut cover = coverage[..area.size()].to_vec();
        if live.is_active() {
            let w = area.width() as usize;
            for (row, y) in cover.chunks_exact_mut(w).zip(area.y1..=area.y2) {
                if live.apply(row, area.x1, y) == MaskResult::Transparent {
                    row.fill(0);
                }
            }
        }
        let op = DrawOp::Blend(BlendDesc {
            area: *area,
            source: BlendSource::Solid(img.recolor),
            opa: snap_cover(img.opa),
            mask: Some(MaskView::Buffer {
                data: &cover,
                area: *area,
            }),
            mode,
        });
        self.dispatch(buf, clip, &op)
    }

    fn draw_border(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        live: &LiveMask<'_>,
        dsc: &RectDesc<'_>,
        coords: &Area,
    ) -> RectResult<Outcome> {
        let b = &dsc.border;
        if b.opa <= OPA_MIN || b.width <= 0 || b.side.is_empty() || b.post {
            return Ok(INVISIBLE);
        }
        let radius = coords.clamp_radius(dsc.radius);
        let ofs = radius.max(b.width);
        let sides = Area::new(
            coords.x1 + if b.side.contains(BorderSide::LEFT) { 0 } else { ofs },
            coords.y1 + if b.side.contains(BorderSide::TOP) { 0 } else { ofs },
            coords.x2 - if b.side.contains(BorderSide::RIGHT) { 0 } else { ofs },
            coords.y2 - if b.side.contains(BorderSide::BOTTOM) { 0 } else { ofs },
        );
        let Some(clip) = sides.intersect(clip) else {
            return Ok(CLIPPED);
        };
        self.border_ring(
            buf,
            &clip,
            live,
            coords,
            radius,
            b.width,
            b.color,
            b.opa,
            dsc.blend_mode,
        )
    }

    fn draw_outline(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        live: &LiveMask<'_>,
        dsc: &RectDesc<'_>,
        coords: &Area,
    ) -> RectResult<Outcome> {
        let o = &dsc.outline;
        if o.opa <= OPA_MIN || o.width <= 0 {
            return Ok(INVISIBLE);
        }
        let inner = coords.increase(o.pad - 1, o.pad - 1);
        let outer = inner.increase(o.width, o.width);
        let radius = inner.clamp_radius(dsc.radius) + o.width;
        self.border_ring(
            buf,
            clip,
            live,
            &outer,
            radius,
            o.width,
            o.color,
            o.opa,
            dsc.blend_mode,
        )
    }
}

/// Union of everything a rectangle may touch: itself, its shadow and its outline.
fn visible_extent(dsc: &RectDesc<'_>, coords: &Area) -> Area {
    let mut extent = *coords;
    let sh = &dsc.shadow;
    if sh.width > 0 && sh.opa > OPA_MIN {
        let plan_area = ShadowPlan::new(coords, dsc.radius, sh, false).area;
        if plan_area.is_valid() {
            extent = extent.union(&plan_area);
        }
    }
    let o = &dsc.outline;
    if o.width > 0 && o.opa > OPA_MIN {
        let grow = o.pad - 1 + o.width;
        let outer = coords.increase(grow, grow);
        if outer.is_valid() {
            extent = extent.union(&outer);
        }
    }
    extent
}

/// Placements of a `w`×`h` background image: centered once, or tiled from the top-left.
///
/// Tiles that cannot touch `clip` are not produced.
fn bg_image_tiles(coords: &Area, clip: &Area, w: i32, h: i32, tiled: bool) -> Vec<Area> {
    if !tiled {
        let x1 = coords.x1 + coords.width() / 2 - w / 2;
        let y1 = coords.y1 + coords.height() / 2 - h / 2;
        return vec![Area::from_size(x1, y1, w, h)];
    }
    let first = |start: i32, edge: i32, step: i32| start + (edge - start).max(0) / step * step;
    let x_end = coords.x2.min(clip.x2);
    let y_end = coords.y2.min(clip.y2);
    let mut tiles = Vec::new();
    let mut y = first(coords.y1, clip.y1, h);
    while y <= y_end {
        let mut x = first(coords.x1, clip.x1, w);
        while x <= x_end {
            tiles.push(Area::from_size(x, y, w, h));
            x += w;
        }
        y += h;
    }
    tiles
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
