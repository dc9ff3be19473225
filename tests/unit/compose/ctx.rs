use super::*;
use crate::foundation::core::{Color, OPA_COVER};
use crate::geometry::radius::RadiusMask;
use crate::pixel::buffer::Framebuffer;
use crate::pixel::format::ColorDepth;

#[test]
fn new_context_clips_to_buffer() {
    let mut fb = Framebuffer::new(7, 3, ColorDepth::Rgb888, Color::BLACK).unwrap();
    let ctx = DrawCtx::new(fb.view().unwrap());
    assert_eq!(ctx.clip, Area::new(0, 0, 6, 2));
    assert!(ctx.masks.is_empty());
}

#[test]
fn live_mask_is_absent_without_contributors() {
    let masks = MaskSet::new();
    let live = LiveMask::build(&masks, Some(Area::new(0, 0, 9, 9)));
    assert!(!live.is_active());
    assert!(live.view().is_none());
    let mut row = [OPA_COVER; 4];
    assert_eq!(live.apply(&mut row, 0, 0), MaskResult::FullCover);
}

#[test]
fn live_mask_buffers_the_extent() {
    let circle = RadiusMask::new(Area::new(0, 0, 9, 9), 5);
    let mut masks = MaskSet::new();
    masks.push(&circle);
    let live = LiveMask::build(&masks, Some(Area::new(0, 0, 9, 9)));
    assert!(matches!(live, LiveMask::Buffer { .. }));

    let mut corner = [OPA_COVER; 1];
    live.apply(&mut corner, 0, 0);
    assert_eq!(corner[0], 0);

    let mut centre = [OPA_COVER; 1];
    live.apply(&mut centre, 5, 5);
    assert_eq!(centre[0], OPA_COVER);
}

#[test]
fn live_mask_skips_when_nothing_is_visible() {
    let circle = RadiusMask::new(Area::new(0, 0, 9, 9), 5);
    let mut masks = MaskSet::new();
    masks.push(&circle);
    assert!(!LiveMask::build(&masks, None).is_active());
}
