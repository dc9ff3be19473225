use crate::foundation::core::{OPA_COVER, Opa};
use crate::foundation::math::opa_mul;
use crate::geometry::area::Area;
use crate::geometry::mask::{MaskContributor, MaskResult};

/// Antialiased coverage of pixel `(x, y)` by the rectangle `area` with rounded corners.
///
/// Corner pixels are shaded by the distance of their centre to the corner arc, so the shape
/// is exactly symmetric under horizontal and vertical mirroring.
pub fn rounded_coverage(area: &Area, radius: i32, x: i32, y: i32) -> Opa {
    if !area.contains_point(x, y) {
        return 0;
    }
    let r = area.clamp_radius(radius) as i64;
    if r == 0 {
        return OPA_COVER;
    }

    // Doubled coordinates put pixel centres on integers.
    let px = 2 * x as i64 + 1;
    let py = 2 * y as i64 + 1;
    let left = 2 * (area.x1 as i64 + r);
    let right = 2 * (area.x2 as i64 + 1 - r);
    let top = 2 * (area.y1 as i64 + r);
    let bottom = 2 * (area.y2 as i64 + 1 - r);

    let dx = if px < left {
        left - px
    } else if px > right {
        px - right
    } else {
        return OPA_COVER;
    };
    let dy = if py < top {
        top - py
    } else if py > bottom {
        py - bottom
    } else {
        return OPA_COVER;
    };

    let dist = ((dx * dx + dy * dy) as f32).sqrt() * 0.5;
    let cov = (r as f32 + 0.5 - dist).clamp(0.0, 1.0);
    (cov * 255.0 + 0.5) as Opa
}

/// Coverage of the 1px ring along the edge of the rounded rectangle.
pub fn ring_coverage(area: &Area, radius: i32, x: i32, y: i32) -> Opa {
    let outer = rounded_coverage(area, radius, x, y);
    if outer == 0 {
        return 0;
    }
    let inner_area = area.increase(-1, -1);
    let inner = if inner_area.is_valid() {
        rounded_coverage(&inner_area, (radius - 1).max(0), x, y)
    } else {
        0
    };
    outer.saturating_sub(inner)
}

/// Rounded-rectangle clip: keeps the inside, or the outside when inverted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadiusMask {
    area: Area,
    radius: i32,
    inverted: bool,
}

impl RadiusMask {
    pub fn new(area: Area, radius: i32) -> Self {
        Self {
            area,
            radius: area.clamp_radius(radius),
            inverted: false,
        }
    }

    pub fn inverted(area: Area, radius: i32) -> Self {
        Self {
            inverted: true,
            ..Self::new(area, radius)
        }
    }

    pub fn area(&self) -> Area {
        self.area
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }
}

impl MaskContributor for RadiusMask {
    fn affects(&self, area: &Area) -> bool {
        if self.inverted {
            !area.is_out(&self.area, self.radius)
        } else {
            !area.is_in(&self.area, self.radius)
        }
    }

    fn apply(&self, row: &mut [Opa], x: i32, y: i32) -> MaskResult {
        if y < self.area.y1 || y > self.area.y2 {
            if self.inverted {
                return MaskResult::FullCover;
            }
            row.fill(0);
            return MaskResult::Transparent;
        }

        let mut any_visible = false;
        let mut all_cover = true;
        for (i, px) in row.iter_mut().enumerate() {
            let cov = rounded_coverage(&self.area, self.radius, x + i as i32, y);
            let cov = if self.inverted { OPA_COVER - cov } else { cov };
            all_cover &= cov == OPA_COVER;
            *px = opa_mul(*px, cov);
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

#[cfg(test)]
#[path = "../../tests/unit/geometry/radius.rs"]
mod tests;
