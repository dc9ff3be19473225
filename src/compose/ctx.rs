use crate::foundation::core::Opa;
use crate::geometry::area::Area;
use crate::geometry::mask::{MaskContributor, MaskResult, MaskSet, MaskView};
use crate::pixel::buffer::PixelBuf;

/// Destination of a draw call: the buffer, the active clip and the registered masks.
#[derive(Debug)]
pub struct DrawCtx<'a> {
    pub buf: PixelBuf<'a>,
    pub clip: Area,
    pub masks: MaskSet<'a>,
}

impl<'a> DrawCtx<'a> {
    /// Clip to the whole buffer, no masks.
    pub fn new(buf: PixelBuf<'a>) -> Self {
        let clip = buf.area();
        Self {
            buf,
            clip,
            masks: MaskSet::new(),
        }
    }

    pub fn with_clip(mut self, clip: Area) -> Self {
        self.clip = clip;
        self
    }

    pub fn with_mask(mut self, mask: &'a dyn MaskContributor) -> Self {
        self.masks.push(mask);
        self
    }
}

/// Opacity of the registered masks over one draw call's visible extent, computed once.
#[derive(Debug)]
pub(crate) enum LiveMask<'m> {
    /// No mask touches the extent.
    None,
    Buffer { data: Vec<Opa>, area: Area },
    /// The buffer could not be allocated; masks are evaluated per scanline.
    Scanline(&'m MaskSet<'m>),
}

impl<'m> LiveMask<'m> {
    pub(crate) fn build(masks: &'m MaskSet<'m>, extent: Option<Area>) -> Self {
        let Some(extent) = extent else {
            return Self::None;
        };
        match masks.render_area(&extent) {
            Ok(None) => Self::None,
            Ok(Some(data)) => Self::Buffer { data, area: extent },
            Err(_) => {
                tracing::debug!(?extent, "mask buffer allocation failed, masking per scanline");
                Self::Scanline(masks)
            }
        }
    }

    pub(crate) fn view(&self) -> Option<MaskView<'_>> {
        match self {
            Self::None => None,
            Self::Buffer { data, area } => Some(MaskView::Buffer {
                data: data.as_slice(),
                area: *area,
            }),
            Self::Scanline(set) => Some(MaskView::Scanline(*set)),
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Multiply `row` at `(x, y)` by the live mask.
    pub(crate) fn apply(&self, row: &mut [Opa], x: i32, y: i32) -> MaskResult {
        match self.view() {
            None => MaskResult::FullCover,
            Some(v) => v.apply(row, x, y),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/ctx.rs"]
mod tests;
