use super::*;

fn grad(dir: GradDir, stops: &[(Color, u8)]) -> BgDesc {
    BgDesc {
        color: Color::rgb(1, 2, 3),
        opa: OPA_COVER,
        grad: GradDesc {
            dir,
            stops: stops
                .iter()
                .map(|&(color, frac)| GradStop { color, frac })
                .collect(),
        },
    }
}

#[test]
fn no_direction_paints_bg_color() {
    let bg = grad(GradDir::None, &[(Color::WHITE, 0), (Color::BLACK, 255)]);
    assert_eq!(bg.paint(), Paint::Solid(Color::rgb(1, 2, 3)));
}

#[test]
fn two_stops_ending_at_full_fraction_form_a_gradient() {
    let bg = grad(
        GradDir::Vertical,
        &[(Color::WHITE, 0), (Color::BLACK, 255)],
    );
    assert_eq!(
        bg.paint(),
        Paint::Gradient {
            dir: GradDir::Vertical,
            from: Color::WHITE,
            to: Color::BLACK,
        }
    );
}

#[test]
fn other_stop_layouts_use_the_first_stop() {
    let red = Color::rgb(255, 0, 0);
    let partial = grad(GradDir::Horizontal, &[(red, 0), (Color::BLACK, 200)]);
    assert_eq!(partial.paint(), Paint::Solid(red));

    let three = grad(
        GradDir::Horizontal,
        &[(red, 0), (Color::BLACK, 128), (Color::WHITE, 255)],
    );
    assert_eq!(three.paint(), Paint::Solid(red));

    let equal = grad(GradDir::Horizontal, &[(red, 0), (red, 255)]);
    assert_eq!(equal.paint(), Paint::Solid(red));

    let empty = grad(GradDir::Horizontal, &[]);
    assert_eq!(empty.paint(), Paint::Solid(Color::rgb(1, 2, 3)));
}

#[test]
fn defaults_follow_an_opaque_white_rect() {
    let d = RectDesc::default();
    assert_eq!(d.bg.color, Color::WHITE);
    assert_eq!(d.bg.opa, OPA_COVER);
    assert_eq!(d.border.side, BorderSide::FULL);
    assert_eq!(d.border.width, 0);
    assert_eq!(d.shadow.width, 0);
    assert!(d.bg_img.is_none());
    assert_eq!(ImageDesc::default().zoom, ZOOM_NONE);
}

#[test]
fn border_sides_parse_from_flag_names() {
    let b: BorderDesc = serde_json::from_str(r#"{"width":2,"side":"TOP | LEFT"}"#).unwrap();
    assert_eq!(b.width, 2);
    assert_eq!(b.side, BorderSide::TOP | BorderSide::LEFT);
    assert_eq!(b.opa, OPA_COVER);
}
