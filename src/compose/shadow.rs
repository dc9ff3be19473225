//! Geometry of a rectangle's blurred shadow and the per-pixel lookup into its corner kernel.

use crate::compose::ctx::LiveMask;
use crate::compose::desc::ShadowDesc;
use crate::foundation::core::{OPA_COVER, Opa};
use crate::foundation::error::Skip;
use crate::geometry::area::Area;
use crate::geometry::mask::{MaskContributor, MaskResult};
use crate::geometry::radius::RadiusMask;
use crate::shadow::kernel::{CornerKernel, KernelParams};

/// Part of the shadow drawn with one blend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Region {
    Corner,
    /// Top or bottom edge: every pixel of a row has the same opacity.
    HorizontalEdge,
    VerticalEdge,
    Centre,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ShadowPlan {
    /// Rectangle that is blurred: the target moved by the offset and grown by the spread.
    pub core: Area,
    /// Bounding box of everything the shadow touches.
    pub area: Area,
    /// Part hidden by the background; shrunk by 1px so the shadow reaches under its edge.
    pub occluder: Area,
    pub occluder_radius: i32,
    pub params: KernelParams,
    corner: i32,
    w_half: i32,
    h_half: i32,
}

impl ShadowPlan {
    pub(crate) fn new(coords: &Area, radius: i32, sh: &ShadowDesc, enhance: bool) -> Self {
        let core = Area::new(
            coords.x1 + sh.ofs_x - sh.spread,
            coords.y1 + sh.ofs_y - sh.spread,
            coords.x2 + sh.ofs_x + sh.spread,
            coords.y2 + sh.ofs_y + sh.spread,
        );
        let grow = sh.width / 2 + 1;
        let area = core.increase(grow, grow);
        let occluder = coords.increase(-1, -1);
        let occluder_radius = occluder.clamp_radius(radius);
        let core_radius = core.clamp_radius(radius);
        let params = KernelParams {
            shadow_width: sh.width,
            radius: core_radius,
            core_width: core.width(),
            core_height: core.height(),
            enhance,
        };
        Self {
            core,
            area,
            occluder,
            occluder_radius,
            params,
            corner: sh.width + core_radius,
            w_half: area.x1 + area.width() / 2,
            h_half: area.y1 + area.height() / 2,
        }
    }

    /// The nine regions, split at the half width and height so none overlaps another.
    /// Regions may be empty (inverted) for small shadows.
    pub(crate) fn regions(&self) -> [(Region, Area); 9] {
        let a = &self.area;
        let cs = self.corner;
        let right_x1 = (a.x2 - cs + 1).max(self.w_half);
        let left_x2 = (a.x1 + cs - 1).min(self.w_half - 1);
        let top_y2 = (a.y1 + cs - 1).min(self.h_half);
        let bottom_y1 = (a.y2 - cs + 1).max(self.h_half + 1);
        let side_y1 = (a.y1 + cs).min(self.h_half + 1);
        let side_y2 = (a.y2 - cs).max(self.h_half);
        [
            (Region::Corner, Area::new(right_x1, a.y1, a.x2, top_y2)),
            (Region::Corner, Area::new(right_x1, bottom_y1, a.x2, a.y2)),
            (
                Region::HorizontalEdge,
                Area::new(a.x1 + cs, a.y1, a.x2 - cs, top_y2),
            ),
            (
                Region::HorizontalEdge,
                Area::new(a.x1 + cs, bottom_y1, a.x2 - cs, a.y2),
            ),
            (Region::VerticalEdge, Area::new(right_x1, side_y1, a.x2, side_y2)),
            (Region::VerticalEdge, Area::new(a.x1, side_y1, left_x2, side_y2)),
            (Region::Corner, Area::new(a.x1, a.y1, left_x2, top_y2)),
            (Region::Corner, Area::new(a.x1, bottom_y1, left_x2, a.y2)),
            (
                Region::Centre,
                Area::new(a.x1 + cs, a.y1 + cs, a.x2 - cs, a.y2 - cs),
            ),
        ]
    }

    /// Shadow opacity at `(x, y)` read from the top-right kernel, mirrored for the other sides.
    ///
    /// Lookups use the distance to the nearest edge, so the result is symmetric even where
    /// the corners meet in the middle.
    pub(crate) fn value(&self, kernel: &CornerKernel, x: i32, y: i32) -> Opa {
        let a = &self.area;
        let cs = self.corner;
        let kx = cs - 1 - (x - a.x1).min(a.x2 - x).max(0);
        let ky = (y - a.y1).min(a.y2 - y).max(0);
        match (kx >= 0, ky < cs) {
            (false, false) => OPA_COVER,
            (false, true) => kernel.at(0, ky as usize),
            (true, false) => kernel.at(kx as usize, (cs - 1) as usize),
            (true, true) => kernel.at(kx as usize, ky as usize),
        }
    }
}

/// Per-draw state for turning shadow regions into coverage.
pub(crate) struct ShadowPass<'p> {
    pub plan: &'p ShadowPlan,
    pub kernel: &'p CornerKernel,
    pub live: &'p LiveMask<'p>,
    /// Inverted occluder, present outside the simple path.
    pub occluder: Option<RadiusMask>,
}

impl ShadowPass<'_> {
    /// Coverage of `area`, row-major, with the live and occluder masks applied.
    pub(crate) fn cover(&self, area: &Area, masked: bool) -> Result<Vec<Opa>, Skip> {
        let w = area.width() as usize;
        let mut buf = Vec::new();
        buf.try_reserve_exact(area.size())
            .map_err(|_| Skip::OutOfMemory)?;
        buf.resize(area.size(), 0);
        let occluder = self
            .occluder
            .filter(|o| !area.is_out(&o.area(), o.radius()));
        for (row, y) in buf.chunks_exact_mut(w).zip(area.y1..=area.y2) {
            for (i, px) in row.iter_mut().enumerate() {
                *px = self.plan.value(self.kernel, area.x1 + i as i32, y);
            }
            if !masked {
                continue;
            }
            if self.live.apply(row, area.x1, y) == MaskResult::Transparent {
                continue;
            }
            if let Some(o) = &occluder {
                o.apply(row, area.x1, y);
            }
        }
        Ok(buf)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/shadow.rs"]
mod tests;
