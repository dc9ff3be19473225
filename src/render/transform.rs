use kurbo::{Affine, Rect, Vec2};

use crate::foundation::core::Point;
use crate::geometry::area::Area;

/// Zoom factor meaning "no scaling" (256 = 1.0).
pub const ZOOM_NONE: u16 = 256;

/// Placement of an image relative to its target area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImageTransform {
    /// Pixels are copied one to one.
    Copy,
    /// Rotation by `angle` radians about `pivot` (relative to the image's top-left).
    Rotate { angle: f64, pivot: Point },
    /// Uniform scale then rotation, both about `pivot`.
    RotateScale { angle: f64, scale: f64, pivot: Point },
}

impl ImageTransform {
    /// `angle` in tenths of a degree, `zoom` in 1/256 steps; 0 zoom is treated as none.
    pub fn from_params(angle: i32, zoom: u16, pivot: Point) -> Self {
        let angle = angle.rem_euclid(3600);
        let zoom = if zoom == 0 { ZOOM_NONE } else { zoom };
        let radians = (angle as f64 / 10.0).to_radians();
        match (angle, zoom) {
            (0, ZOOM_NONE) => Self::Copy,
            (_, ZOOM_NONE) => Self::Rotate {
                angle: radians,
                pivot,
            },
            (_, z) => Self::RotateScale {
                angle: radians,
                scale: z as f64 / ZOOM_NONE as f64,
                pivot,
            },
        }
    }

    pub fn is_copy(&self) -> bool {
        matches!(self, Self::Copy)
    }

    /// Image-local coordinates to destination coordinates for an image placed at `coords`.
    pub fn affine(&self, coords: &Area) -> Affine {
        let origin = Vec2::new(coords.x1 as f64, coords.y1 as f64);
        match *self {
            Self::Copy => Affine::translate(origin),
            Self::Rotate { angle, pivot } => {
                let p = Vec2::new(pivot.x as f64, pivot.y as f64);
                Affine::translate(origin + p) * Affine::rotate(angle) * Affine::translate(-p)
            }
            Self::RotateScale {
                angle,
                scale,
                pivot,
            } => {
                let p = Vec2::new(pivot.x as f64, pivot.y as f64);
                Affine::translate(origin + p)
                    * Affine::rotate(angle)
                    * Affine::scale(scale)
                    * Affine::translate(-p)
            }
        }
    }

    /// Destination pixels the transformed image can touch.
    pub fn bounds(&self, coords: &Area) -> Area {
        if self.is_copy() {
            return *coords;
        }
        let local = Rect::new(0.0, 0.0, coords.width() as f64, coords.height() as f64);
        let bb = self.affine(coords).transform_rect_bbox(local);
        Area::new(
            snap(bb.x0).floor() as i32,
            snap(bb.y0).floor() as i32,
            snap(bb.x1).ceil() as i32 - 1,
            snap(bb.y1).ceil() as i32 - 1,
        )
    }
}

/// Drop float noise around integers so exact right angles do not grow the bounds.
fn snap(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < 1e-9 { r } else { v }
}

#[cfg(test)]
#[path = "../../tests/unit/render/transform.rs"]
mod tests;
