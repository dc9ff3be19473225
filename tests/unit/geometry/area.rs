use super::*;

#[test]
fn single_pixel_area_has_unit_size() {
    let a = Area::new(3, 4, 3, 4);
    assert_eq!(a.width(), 1);
    assert_eq!(a.height(), 1);
    assert_eq!(a.size(), 1);
}

#[test]
fn intersect_overlap_and_disjoint() {
    let a = Area::new(0, 0, 9, 9);
    let b = Area::new(5, 5, 20, 20);
    assert_eq!(a.intersect(&b), Some(Area::new(5, 5, 9, 9)));

    let far = Area::new(10, 0, 12, 9);
    assert_eq!(a.intersect(&far), None);

    let touching = Area::new(9, 9, 12, 12);
    assert_eq!(a.intersect(&touching), Some(Area::new(9, 9, 9, 9)));
}

#[test]
fn intersect_rejects_inverted_inputs() {
    let inverted = Area::new(5, 5, 1, 1);
    assert_eq!(Area::new(0, 0, 10, 10).intersect(&inverted), None);
    assert_eq!(inverted.size(), 0);
    assert_eq!(inverted.normalized(), Area::new(1, 1, 5, 5));
}

#[test]
fn translate_and_increase() {
    let a = Area::new(1, 2, 3, 4);
    assert_eq!(a.translate(-1, 10), Area::new(0, 12, 2, 14));
    assert_eq!(a.increase(2, 1), Area::new(-1, 1, 5, 5));
    assert_eq!(a.increase(-1, -1), Area::new(2, 3, 2, 3));
}

#[test]
fn clamp_radius_limits_to_half_short_side() {
    let a = Area::from_size(0, 0, 100, 20);
    assert_eq!(a.clamp_radius(50), 10);
    assert_eq!(a.clamp_radius(4), 4);
    assert_eq!(a.clamp_radius(-3), 0);
}

#[test]
fn is_in_respects_rounded_corners() {
    let holder = Area::from_size(0, 0, 40, 40);
    assert!(Area::new(10, 10, 20, 20).is_in(&holder, 10));
    assert!(Area::new(0, 0, 0, 0).is_in(&holder, 0));
    assert!(!Area::new(0, 0, 0, 0).is_in(&holder, 10));
    assert!(!Area::new(-1, 10, 5, 12).is_in(&holder, 0));
}

#[test]
fn is_out_detects_corner_gaps() {
    let holder = Area::from_size(0, 0, 40, 40);
    assert!(Area::new(50, 50, 60, 60).is_out(&holder, 0));
    assert!(!Area::new(0, 0, 0, 0).is_out(&holder, 0));
    assert!(Area::new(0, 0, 0, 0).is_out(&holder, 10));
    assert!(!Area::new(0, 0, 39, 0).is_out(&holder, 10));
}
