use crate::foundation::error::{Outcome, RectResult};
use crate::geometry::area::Area;
use crate::pixel::buffer::PixelBuf;
use crate::render::accelerated::AcceleratedBackend;
use crate::render::blend::BlendDesc;
use crate::render::emulated::EmulatedDevice;
use crate::render::ops::{DrawOp, FillDesc, ImageBlit, StrokeDesc};
use crate::render::software::SoftwareBackend;

/// Executes draw operations into a destination buffer.
///
/// Every method writes only inside `clip` and the buffer. A request the backend cannot
/// express comes back as `Outcome::Skipped(Skip::Unsupported(_))` with nothing written;
/// device failures are errors.
pub trait DrawBackend {
    fn kind(&self) -> BackendKind;

    fn exec_blend(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        dsc: &BlendDesc<'_>,
    ) -> RectResult<Outcome>;

    fn exec_fill(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        dsc: &FillDesc<'_>,
    ) -> RectResult<Outcome>;

    fn exec_stroke(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        dsc: &StrokeDesc<'_>,
    ) -> RectResult<Outcome>;

    fn exec_blit(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        dsc: &ImageBlit<'_>,
    ) -> RectResult<Outcome>;

    fn execute(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        op: &DrawOp<'_>,
    ) -> RectResult<Outcome> {
        execute_op(self, buf, clip, op)
    }
}

impl<B: DrawBackend + ?Sized> DrawBackend for Box<B> {
    fn kind(&self) -> BackendKind {
        (**self).kind()
    }

    fn exec_blend(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        dsc: &BlendDesc<'_>,
    ) -> RectResult<Outcome> {
        (**self).exec_blend(buf, clip, dsc)
    }

    fn exec_fill(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        dsc: &FillDesc<'_>,
    ) -> RectResult<Outcome> {
        (**self).exec_fill(buf, clip, dsc)
    }

    fn exec_stroke(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        dsc: &StrokeDesc<'_>,
    ) -> RectResult<Outcome> {
        (**self).exec_stroke(buf, clip, dsc)
    }

    fn exec_blit(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        dsc: &ImageBlit<'_>,
    ) -> RectResult<Outcome> {
        (**self).exec_blit(buf, clip, dsc)
    }
}

pub fn execute_op<B: DrawBackend + ?Sized>(
    backend: &mut B,
    buf: &mut PixelBuf<'_>,
    clip: &Area,
    op: &DrawOp<'_>,
) -> RectResult<Outcome> {
    match op {
        DrawOp::Blend(d) => backend.exec_blend(buf, clip, d),
        DrawOp::Fill(d) => backend.exec_fill(buf, clip, d),
        DrawOp::Stroke(d) => backend.exec_stroke(buf, clip, d),
        DrawOp::Blit(d) => backend.exec_blit(buf, clip, d),
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Software,
    /// Command lists submitted to a device; the stock device runs them on the host.
    Accelerated,
}

pub fn create_backend(kind: BackendKind) -> Box<dyn DrawBackend> {
    match kind {
        BackendKind::Software => Box::new(SoftwareBackend::new()),
        BackendKind::Accelerated => Box::new(AcceleratedBackend::new(EmulatedDevice::new())),
    }
}
