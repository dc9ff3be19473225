use super::*;

const RECT_SCENE: &str = r#"{
    "width": 16,
    "height": 12,
    "items": [
        {
            "kind": "rect",
            "area": {"x1": 2, "y1": 2, "x2": 13, "y2": 9},
            "radius": 2,
            "bg": {"color": {"r": 255, "g": 0, "b": 0}},
            "border": {"width": 1, "side": "TOP | BOTTOM"}
        }
    ]
}"#;

#[test]
fn parse_fills_in_defaults() {
    let scene = Scene::from_json(RECT_SCENE).unwrap();
    assert_eq!(scene.depth, ColorDepth::Xrgb8888);
    assert_eq!(scene.clear, Color::WHITE);
    assert!(scene.opts.shadow_enhance);
    let Item::Rect(r) = &scene.items[0] else {
        panic!("expected a rect item");
    };
    assert_eq!(r.bg.opa, OPA_COVER);
    assert_eq!(r.shadow.width, 0);
    assert_eq!(r.blend_mode, BlendMode::Normal);
}

#[test]
fn validation_rejects_bad_scenes() {
    let err = Scene::from_json(r#"{"width": 0, "height": 4, "items": []}"#).unwrap_err();
    assert!(matches!(err, RectError::Scene(_)), "{err}");

    let inverted = r#"{"width": 4, "height": 4, "items": [
        {"kind": "rect", "area": {"x1": 3, "y1": 0, "x2": 1, "y2": 2}}
    ]}"#;
    assert!(matches!(Scene::from_json(inverted), Err(RectError::Scene(_))));

    let garbage = Scene::from_json("{").unwrap_err();
    assert!(garbage.to_string().starts_with("scene error: parse"));
}

#[test]
fn rect_scene_renders_on_both_backends() {
    let scene = Scene::from_json(RECT_SCENE).unwrap();
    let soft = render_scene(&scene, Path::new("."), BackendKind::Software).unwrap();
    let accel = render_scene(&scene, Path::new("."), BackendKind::Accelerated).unwrap();
    assert_eq!(soft, accel);
    assert_eq!(soft.pixel(7, 5), Some(Color::rgb(255, 0, 0)));
    assert_eq!(soft.pixel(7, 2), Some(Color::BLACK));
    assert_eq!(soft.pixel(0, 0), Some(Color::WHITE));
}

#[test]
fn scene_masks_and_clip_limit_every_item() {
    let mut scene = Scene::from_json(RECT_SCENE).unwrap();
    scene.masks.push(SceneMask {
        area: Area::new(0, 0, 7, 11),
        radius: 0,
        inverted: false,
    });
    scene.clip = Some(Area::new(0, 0, 15, 6));
    let fb = render_scene(&scene, Path::new("."), BackendKind::Software).unwrap();
    assert_eq!(fb.pixel(5, 5), Some(Color::rgb(255, 0, 0)));
    assert_eq!(fb.pixel(10, 5), Some(Color::WHITE));
    assert_eq!(fb.pixel(5, 8), Some(Color::WHITE));
}

#[test]
fn missing_image_file_is_reported() {
    let json = r#"{"width": 4, "height": 4, "items": [
        {"kind": "image", "path": "does-not-exist.png", "x": 0, "y": 0}
    ]}"#;
    let scene = Scene::from_json(json).unwrap();
    let err = render_scene(&scene, Path::new("."), BackendKind::Software).unwrap_err();
    assert!(matches!(err, RectError::Other(_)));
    assert!(err.to_string().contains("does-not-exist.png"), "{err}");
}

#[test]
fn image_items_load_relative_to_the_base_dir() {
    let dir = std::path::PathBuf::from("target").join("scene_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let px = image::RgbaImage::from_raw(2, 2, [0u8, 0, 255, 255].repeat(4)).unwrap();
    px.save_with_format(dir.join("blue.png"), image::ImageFormat::Png)
        .unwrap();

    let json = r#"{"width": 6, "height": 6, "items": [
        {"kind": "image", "path": "blue.png", "x": 1, "y": 3},
        {"kind": "rect", "area": {"x1": 3, "y1": 0, "x2": 5, "y2": 1},
         "bg": {"opa": 0}, "bg_image": {"path": "blue.png", "tiled": true}}
    ]}"#;
    let scene = Scene::from_json(json).unwrap();
    let fb = render_scene(&scene, &dir, BackendKind::Accelerated).unwrap();
    let blue = Color::rgb(0, 0, 255);
    assert_eq!(fb.pixel(1, 3), Some(blue));
    assert_eq!(fb.pixel(2, 4), Some(blue));
    assert_eq!(fb.pixel(3, 3), Some(Color::WHITE));
    assert_eq!(fb.pixel(5, 1), Some(blue));
    assert_eq!(fb.pixel(2, 0), Some(Color::WHITE));
}
