use crate::foundation::core::{OPA_COVER, Opa};
use crate::foundation::error::Skip;
use crate::foundation::math::opa_mul;
use crate::geometry::area::Area;

/// Effect of applying masks to one scanline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaskResult {
    /// Every pixel ended up at 0; the row can be skipped.
    Transparent,
    /// The row was left untouched.
    FullCover,
    /// Some pixels were attenuated.
    Changed,
}

/// A source of per-pixel opacity, such as a rounded clip.
pub trait MaskContributor {
    /// Whether this contributor may lower opacity anywhere inside `area`.
    fn affects(&self, area: &Area) -> bool;

    /// Multiply `row`, which covers `x..x + row.len()` on line `y`, by this contributor.
    fn apply(&self, row: &mut [Opa], x: i32, y: i32) -> MaskResult;
}

/// Ordered set of mask contributors active for a draw call.
///
/// The set is immutable while a draw runs.
#[derive(Clone, Default)]
pub struct MaskSet<'a> {
    items: Vec<&'a dyn MaskContributor>,
}

impl std::fmt::Debug for MaskSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaskSet")
            .field("len", &self.items.len())
            .finish()
    }
}

impl<'a> MaskSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mask: &'a dyn MaskContributor) {
        self.items.push(mask);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether any contributor may lower opacity inside `area`.
    pub fn is_any(&self, area: &Area) -> bool {
        self.items.iter().any(|m| m.affects(area))
    }

    /// Multiply `row` by every contributor in registration order.
    pub fn apply(&self, row: &mut [Opa], x: i32, y: i32) -> MaskResult {
        let mut changed = false;
        for m in &self.items {
            match m.apply(row, x, y) {
                MaskResult::Transparent => return MaskResult::Transparent,
                MaskResult::Changed => changed = true,
                MaskResult::FullCover => {}
            }
        }
        if changed {
            MaskResult::Changed
        } else {
            MaskResult::FullCover
        }
    }

    /// Opacity of one scanline written into `row`; `FullCover` leaves it all 255.
    pub fn evaluate(&self, row: &mut [Opa], x: i32, y: i32) -> MaskResult {
        row.fill(OPA_COVER);
        self.apply(row, x, y)
    }

    /// Materialise the opacity of `area` row by row, or `None` when no mask is active there.
    pub fn render_area(&self, area: &Area) -> Result<Option<Vec<Opa>>, Skip> {
        if !area.is_valid() || !self.is_any(area) {
            return Ok(None);
        }
        let w = area.width() as usize;
        let mut buf = Vec::new();
        buf.try_reserve_exact(area.size())
            .map_err(|_| Skip::OutOfMemory)?;
        buf.resize(area.size(), 0);
        for (row, y) in buf.chunks_exact_mut(w).zip(area.y1..=area.y2) {
            if self.evaluate(row, area.x1, y) == MaskResult::Transparent {
                row.fill(0);
            }
        }
        Ok(Some(buf))
    }
}

/// Opacity source attached to a draw operation.
#[derive(Clone, Copy, Debug)]
pub enum MaskView<'a> {
    /// Precomputed opacities for `area`, row-major; pixels outside `area` are transparent.
    Buffer { data: &'a [Opa], area: Area },
    /// Masks evaluated scanline by scanline.
    Scanline(&'a MaskSet<'a>),
}

impl MaskView<'_> {
    /// Multiply `row`, covering `x..x + row.len()` on line `y`, by this mask.
    pub fn apply(&self, row: &mut [Opa], x: i32, y: i32) -> MaskResult {
        match self {
            Self::Scanline(set) => set.apply(row, x, y),
            Self::Buffer { data, area } => {
                let mut all_cover = true;
                let mut any_visible = false;
                let w = area.width() as usize;
                for (i, px) in row.iter_mut().enumerate() {
                    let gx = x + i as i32;
                    let v = if area.contains_point(gx, y) {
                        let idx = (y - area.y1) as usize * w + (gx - area.x1) as usize;
                        data.get(idx).copied().unwrap_or(0)
                    } else {
                        0
                    };
                    all_cover &= v == OPA_COVER;
                    *px = opa_mul(*px, v);
                    any_visible |= *px != 0;
                }
                if all_cover {
                    MaskResult::FullCover
                } else if !any_visible {
                    MaskResult::Transparent
                } else {
                    MaskResult::Changed
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/mask.rs"]
mod tests;
