use super::*;
use crate::geometry::mask::MaskSet;
use crate::shadow::kernel::build_corner_kernel;

fn desc(width: i32) -> ShadowDesc {
    ShadowDesc {
        width,
        ..ShadowDesc::default()
    }
}

#[test]
fn shadow_area_grows_core_by_half_width_plus_one() {
    let sh = ShadowDesc {
        width: 10,
        ofs_x: 3,
        ofs_y: -2,
        spread: 1,
        ..ShadowDesc::default()
    };
    let plan = ShadowPlan::new(&Area::new(10, 10, 49, 29), 4, &sh, true);
    assert_eq!(plan.core, Area::new(12, 7, 53, 28));
    assert_eq!(plan.area, Area::new(6, 1, 59, 34));
    assert_eq!(plan.occluder, Area::new(11, 11, 48, 28));
    assert_eq!(plan.params.radius, 4);
}

#[test]
fn regions_tile_the_shadow_without_overlap() {
    for (w, h, sw, r) in [(40, 40, 10, 8), (5, 3, 12, 2), (30, 8, 7, 20), (1, 1, 2, 0)] {
        let plan = ShadowPlan::new(&Area::from_size(0, 0, w, h), r, &desc(sw), true);
        let a = plan.area;
        let mut hits = vec![0u8; a.size()];
        for (_, region) in plan.regions() {
            if !region.is_valid() {
                continue;
            }
            for y in region.y1..=region.y2 {
                for x in region.x1..=region.x2 {
                    assert!(a.contains_point(x, y), "{region:?} leaves {a:?}");
                    let i = ((y - a.y1) * a.width() + (x - a.x1)) as usize;
                    hits[i] += 1;
                }
            }
        }
        assert!(
            hits.iter().all(|&n| n == 1),
            "{w}x{h} sw {sw} r {r}: {:?}",
            hits.iter().filter(|&&n| n != 1).count()
        );
    }
}

#[test]
fn lookup_is_mirror_symmetric() {
    for (w, h) in [(20, 20), (21, 14), (6, 6)] {
        let plan = ShadowPlan::new(&Area::from_size(0, 0, w, h), 6, &desc(9), true);
        let kernel = build_corner_kernel(&plan.params).unwrap();
        let a = plan.area;
        for y in a.y1..=a.y2 {
            for x in a.x1..=a.x2 {
                let v = plan.value(&kernel, x, y);
                assert_eq!(v, plan.value(&kernel, a.x1 + a.x2 - x, y));
                assert_eq!(v, plan.value(&kernel, x, a.y1 + a.y2 - y));
            }
        }
    }
}

#[test]
fn lookup_fades_outward() {
    let plan = ShadowPlan::new(&Area::from_size(0, 0, 40, 40), 0, &desc(8), true);
    let kernel = build_corner_kernel(&plan.params).unwrap();
    let a = plan.area;
    let mid = (a.y1 + a.y2) / 2;
    assert_eq!(plan.value(&kernel, (a.x1 + a.x2) / 2, mid), OPA_COVER);
    let edge = plan.value(&kernel, a.x2, mid);
    let inner = plan.value(&kernel, a.x2 - 6, mid);
    assert!(edge < inner, "{edge} !< {inner}");
}

#[test]
fn occluder_clears_coverage_under_the_background() {
    let coords = Area::from_size(0, 0, 30, 30);
    let plan = ShadowPlan::new(&coords, 0, &desc(6), true);
    let kernel = build_corner_kernel(&plan.params).unwrap();
    let masks = MaskSet::new();
    let live = LiveMask::build(&masks, Some(plan.area));
    let pass = ShadowPass {
        plan: &plan,
        kernel: &kernel,
        live: &live,
        occluder: Some(RadiusMask::inverted(plan.occluder, plan.occluder_radius)),
    };
    let row = Area::new(plan.area.x1, 15, plan.area.x2, 15);
    let cover = pass.cover(&row, true).unwrap();
    let at = |x: i32| cover[(x - row.x1) as usize];
    assert_eq!(at(15), 0);
    assert_eq!(at(1), 0);
    assert!(at(-1) > 0);

    let unmasked = pass.cover(&row, false).unwrap();
    assert_eq!(unmasked[(15 - row.x1) as usize], OPA_COVER);
}
