use crate::foundation::error::{Outcome, RectResult};
use crate::geometry::area::Area;
use crate::pixel::buffer::PixelBuf;
use crate::render::backend::{BackendKind, DrawBackend};
use crate::render::blend::BlendDesc;
use crate::render::ops::{FillDesc, ImageBlit, StrokeDesc};
use crate::render::raster;

/// Host rasterizer; supports every operation and blend mode.
#[derive(Clone, Copy, Debug, Default)]
pub struct SoftwareBackend;

impl SoftwareBackend {
    pub fn new() -> Self {
        Self
    }
}

impl DrawBackend for SoftwareBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Software
    }

    fn exec_blend(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        dsc: &BlendDesc<'_>,
    ) -> RectResult<Outcome> {
        Ok(raster::blend(buf, clip, dsc))
    }

    fn exec_fill(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        dsc: &FillDesc<'_>,
    ) -> RectResult<Outcome> {
        Ok(raster::fill(buf, clip, dsc))
    }

    fn exec_stroke(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        dsc: &StrokeDesc<'_>,
    ) -> RectResult<Outcome> {
        Ok(raster::stroke(buf, clip, dsc))
    }

    fn exec_blit(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        dsc: &ImageBlit<'_>,
    ) -> RectResult<Outcome> {
        Ok(raster::blit(buf, clip, dsc))
    }
}
