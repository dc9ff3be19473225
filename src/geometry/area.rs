use crate::foundation::core::OPA_COVER;
use crate::geometry::radius::rounded_coverage;

/// Axis-aligned rectangle with inclusive integer bounds.
///
/// `x1 == x2 && y1 == y2` is a single pixel. Operations that can produce an empty result
/// return `Option` instead of an inverted area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Area {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Area {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Area with top-left `(x, y)` and the given size (both >= 1).
    pub const fn from_size(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self::new(x, y, x + w - 1, y + h - 1)
    }

    /// Swap inverted bounds.
    pub fn normalized(self) -> Self {
        Self::new(
            self.x1.min(self.x2),
            self.y1.min(self.y2),
            self.x1.max(self.x2),
            self.y1.max(self.y2),
        )
    }

    pub fn is_valid(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1 + 1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1 + 1
    }

    /// Pixel count; 0 for inverted areas.
    pub fn size(&self) -> usize {
        if !self.is_valid() {
            return 0;
        }
        (self.width() as usize).saturating_mul(self.height() as usize)
    }

    pub fn intersect(&self, other: &Area) -> Option<Area> {
        let out = Area::new(
            self.x1.max(other.x1),
            self.y1.max(other.y1),
            self.x2.min(other.x2),
            self.y2.min(other.y2),
        );
        (self.is_valid() && other.is_valid() && out.is_valid()).then_some(out)
    }

    pub fn translate(self, dx: i32, dy: i32) -> Area {
        Area::new(self.x1 + dx, self.y1 + dy, self.x2 + dx, self.y2 + dy)
    }

    /// Grow every side by `w` horizontally and `h` vertically (negative shrinks).
    pub fn increase(self, w: i32, h: i32) -> Area {
        Area::new(self.x1 - w, self.y1 - h, self.x2 + w, self.y2 + h)
    }

    /// Smallest area covering both.
    pub fn union(&self, other: &Area) -> Area {
        Area::new(
            self.x1.min(other.x1),
            self.y1.min(other.y1),
            self.x2.max(other.x2),
            self.y2.max(other.y2),
        )
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }

    /// Corner radius limited to half the shorter side, never negative.
    pub fn clamp_radius(&self, radius: i32) -> i32 {
        let short = self.width().min(self.height());
        radius.min(short / 2).max(0)
    }

    /// Every pixel of `self` is fully covered by the rounded `holder`.
    pub fn is_in(&self, holder: &Area, radius: i32) -> bool {
        if !self.is_valid()
            || self.x1 < holder.x1
            || self.y1 < holder.y1
            || self.x2 > holder.x2
            || self.y2 > holder.y2
        {
            return false;
        }
        if radius <= 0 {
            return true;
        }
        // The rounded shape is convex, so its four corners decide.
        [
            (self.x1, self.y1),
            (self.x2, self.y1),
            (self.x1, self.y2),
            (self.x2, self.y2),
        ]
        .into_iter()
        .all(|(x, y)| rounded_coverage(holder, radius, x, y) == OPA_COVER)
    }

    /// No pixel of `self` receives any coverage from the rounded `holder`.
    pub fn is_out(&self, holder: &Area, radius: i32) -> bool {
        let Some(overlap) = self.intersect(holder) else {
            return true;
        };
        if radius <= 0 {
            return false;
        }
        // Coverage only falls off with the distance from the holder's centre lines, so the
        // overlap pixel closest to the centre has the highest coverage.
        let cx = (holder.x1 + (holder.x2 - holder.x1) / 2).clamp(overlap.x1, overlap.x2);
        let cy = (holder.y1 + (holder.y2 - holder.y1) / 2).clamp(overlap.y1, overlap.y2);
        rounded_coverage(holder, radius, cx, cy) == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/area.rs"]
mod tests;
