use super::*;
use crate::geometry::radius::RadiusMask;

#[test]
fn empty_set_is_full_cover() {
    let set = MaskSet::new();
    let mut row = [0u8; 5];
    assert_eq!(set.evaluate(&mut row, 0, 0), MaskResult::FullCover);
    assert_eq!(row, [OPA_COVER; 5]);
    assert!(!set.is_any(&Area::new(0, 0, 10, 10)));
    assert_eq!(set.render_area(&Area::new(0, 0, 3, 3)), Ok(None));
}

#[test]
fn contributors_multiply_in_order() {
    let left = RadiusMask::new(Area::new(0, 0, 5, 10), 0);
    let right = RadiusMask::new(Area::new(3, 0, 10, 10), 0);
    let mut set = MaskSet::new();
    set.push(&left);
    set.push(&right);
    let mut row = [0u8; 8];
    assert_eq!(set.evaluate(&mut row, 0, 2), MaskResult::Changed);
    assert_eq!(row, [0, 0, 0, 255, 255, 255, 0, 0]);
}

#[test]
fn transparent_row_short_circuits() {
    let m = RadiusMask::new(Area::new(0, 0, 5, 5), 0);
    let mut set = MaskSet::new();
    set.push(&m);
    let mut row = [7u8; 3];
    assert_eq!(set.evaluate(&mut row, 0, 9), MaskResult::Transparent);
}

#[test]
fn render_area_matches_scanlines() {
    let m = RadiusMask::new(Area::from_size(0, 0, 12, 12), 5);
    let mut set = MaskSet::new();
    set.push(&m);
    let area = Area::new(-2, -2, 13, 13);
    let buf = set.render_area(&area).unwrap().unwrap();
    assert_eq!(buf.len(), area.size());
    let w = area.width() as usize;
    let mut row = vec![0u8; w];
    for y in area.y1..=area.y2 {
        set.evaluate(&mut row, area.x1, y);
        let start = (y - area.y1) as usize * w;
        assert_eq!(&buf[start..start + w], row.as_slice());
    }
}

#[test]
fn buffer_view_is_transparent_outside_its_area() {
    let data = [255u8, 128, 0, 255];
    let view = MaskView::Buffer {
        data: &data,
        area: Area::new(0, 0, 1, 1),
    };
    let mut row = [255u8; 4];
    assert_eq!(view.apply(&mut row, -1, 0), MaskResult::Changed);
    assert_eq!(row, [0, 255, 128, 0]);

    let mut row = [255u8; 2];
    assert_eq!(view.apply(&mut row, 0, 5), MaskResult::Transparent);
}
