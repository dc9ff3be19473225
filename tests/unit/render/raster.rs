use super::*;
use crate::pixel::buffer::{Framebuffer, ImageData};
use crate::pixel::format::ColorDepth;
use crate::render::blend::BlendMode;
use crate::render::transform::{ImageTransform, ZOOM_NONE};

fn fb(w: u32, h: u32) -> Framebuffer {
    Framebuffer::new(w, h, ColorDepth::Xrgb8888, Color::BLACK).unwrap()
}

#[test]
fn blend_outside_clip_writes_nothing() {
    let mut f = fb(8, 8);
    let before = f.clone();
    let out = {
        let mut buf = f.view().unwrap();
        let dsc = BlendDesc::solid(Area::new(0, 0, 3, 3), Color::WHITE, OPA_COVER);
        blend(&mut buf, &Area::new(5, 5, 7, 7), &dsc)
    };
    assert_eq!(out, Outcome::Skipped(Skip::Clipped));
    assert_eq!(f, before);
}

#[test]
fn blend_below_min_opacity_is_invisible() {
    let mut f = fb(4, 4);
    let mut buf = f.view().unwrap();
    let dsc = BlendDesc::solid(Area::new(0, 0, 3, 3), Color::WHITE, OPA_MIN);
    assert_eq!(
        blend(&mut buf, &Area::new(0, 0, 3, 3), &dsc),
        Outcome::Skipped(Skip::Invisible)
    );
}

#[test]
fn blend_color_rows_respect_clip_offset() {
    let mut f = fb(4, 2);
    let colors: Vec<Color> = (0..8).map(|i| Color::rgb(i * 10, 0, 0)).collect();
    {
        let mut buf = f.view().unwrap();
        let dsc = BlendDesc {
            area: Area::new(0, 0, 3, 1),
            source: BlendSource::Colors(&colors),
            opa: OPA_COVER,
            mask: None,
            mode: BlendMode::Normal,
        };
        assert_eq!(blend(&mut buf, &Area::new(2, 1, 3, 1), &dsc), Outcome::Drawn);
    }
    assert_eq!(f.pixel(2, 1), Some(Color::rgb(60, 0, 0)));
    assert_eq!(f.pixel(3, 1), Some(Color::rgb(70, 0, 0)));
    assert_eq!(f.pixel(1, 1), Some(Color::BLACK));
    assert_eq!(f.pixel(2, 0), Some(Color::BLACK));
}

#[test]
fn blend_mask_buffer_attenuates() {
    let mut f = fb(2, 1);
    let mask = [255u8, 0];
    {
        let mut buf = f.view().unwrap();
        let mut dsc = BlendDesc::solid(Area::new(0, 0, 1, 0), Color::WHITE, OPA_COVER);
        dsc.mask = Some(MaskView::Buffer {
            data: &mask,
            area: Area::new(0, 0, 1, 0),
        });
        blend(&mut buf, &Area::new(0, 0, 1, 0), &dsc);
    }
    assert_eq!(f.pixel(0, 0), Some(Color::WHITE));
    assert_eq!(f.pixel(1, 0), Some(Color::BLACK));
}

#[test]
fn rounded_fill_leaves_corners_and_fills_centre() {
    let mut f = fb(20, 20);
    {
        let mut buf = f.view().unwrap();
        let dsc = FillDesc {
            area: Area::new(0, 0, 19, 19),
            radius: 6,
            paint: Paint::Solid(Color::WHITE),
            opa: OPA_COVER,
            mask: None,
            mode: BlendMode::Normal,
        };
        assert_eq!(fill(&mut buf, &Area::new(0, 0, 19, 19), &dsc), Outcome::Drawn);
    }
    assert_eq!(f.pixel(0, 0), Some(Color::BLACK));
    assert_eq!(f.pixel(19, 19), Some(Color::BLACK));
    assert_eq!(f.pixel(10, 10), Some(Color::WHITE));
    assert_eq!(f.pixel(0, 10), Some(Color::WHITE));
}

#[test]
fn horizontal_gradient_runs_between_stops() {
    let mut f = fb(6, 1);
    {
        let mut buf = f.view().unwrap();
        let dsc = FillDesc {
            area: Area::new(0, 0, 5, 0),
            radius: 0,
            paint: Paint::Gradient {
                dir: GradDir::Horizontal,
                from: Color::BLACK,
                to: Color::rgb(255, 0, 0),
            },
            opa: OPA_COVER,
            mask: None,
            mode: BlendMode::Normal,
        };
        fill(&mut buf, &Area::new(0, 0, 5, 0), &dsc);
    }
    assert_eq!(f.pixel(0, 0), Some(Color::BLACK));
    assert_eq!(f.pixel(5, 0), Some(Color::rgb(255, 0, 0)));
    assert_eq!(f.pixel(1, 0), Some(Color::rgb(51, 0, 0)));
}

#[test]
fn stroke_width_counts_rings() {
    for width in 1..=3 {
        let mut f = fb(16, 16);
        {
            let mut buf = f.view().unwrap();
            let dsc = StrokeDesc {
                area: Area::new(0, 0, 15, 15),
                radius: 4,
                width,
                color: Color::WHITE,
                opa: OPA_COVER,
                mask: None,
                mode: BlendMode::Normal,
            };
            stroke(&mut buf, &Area::new(0, 0, 15, 15), &dsc);
        }
        let lit = (0..16)
            .filter(|&x| f.pixel(x, 8) == Some(Color::WHITE))
            .count();
        assert_eq!(lit, 2 * width as usize, "width {width}");
    }
}

#[test]
fn copy_blit_reproduces_source() {
    let rgba: Vec<u8> = (0..6u8)
        .flat_map(|i| [i * 40, 255 - i * 40, 7, 255])
        .collect();
    let img = ImageData::from_rgba8(&rgba, 3, 2, ColorDepth::Xrgb8888).unwrap();
    let mut f = fb(5, 4);
    {
        let mut buf = f.view().unwrap();
        let dsc = ImageBlit {
            image: img.as_buf(),
            coords: Area::from_size(1, 1, 3, 2),
            transform: ImageTransform::from_params(0, ZOOM_NONE, Default::default()),
            opa: OPA_COVER,
            recolor: Color::BLACK,
            recolor_opa: 0,
            mask: None,
            mode: BlendMode::Normal,
        };
        assert_eq!(blit(&mut buf, &Area::new(0, 0, 4, 3), &dsc), Outcome::Drawn);
    }
    for y in 0..2 {
        for x in 0..3 {
            let i = (y * 3 + x) as u8;
            assert_eq!(
                f.pixel(x + 1, y + 1),
                Some(Color::rgb(i * 40, 255 - i * 40, 7))
            );
        }
    }
    assert_eq!(f.pixel(0, 0), Some(Color::BLACK));
}

#[test]
fn rotated_blit_moves_texels() {
    let rgba = [
        255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255, 255, 255, 255, 255,
    ];
    let img = ImageData::from_rgba8(&rgba, 4, 1, ColorDepth::Xrgb8888).unwrap();
    let mut f = fb(12, 12);
    {
        let mut buf = f.view().unwrap();
        let dsc = ImageBlit {
            image: img.as_buf(),
            coords: Area::from_size(5, 5, 4, 1),
            transform: ImageTransform::from_params(900, ZOOM_NONE, Default::default()),
            opa: OPA_COVER,
            recolor: Color::BLACK,
            recolor_opa: 0,
            mask: None,
            mode: BlendMode::Normal,
        };
        blit(&mut buf, &Area::new(0, 0, 11, 11), &dsc);
    }
    assert_eq!(f.pixel(4, 5), Some(Color::rgb(255, 0, 0)));
    assert_eq!(f.pixel(4, 6), Some(Color::rgb(0, 255, 0)));
    assert_eq!(f.pixel(4, 8), Some(Color::WHITE));
    assert_eq!(f.pixel(5, 5), Some(Color::BLACK));
}

#[test]
fn recolor_tints_source() {
    let rgba = [0, 0, 0, 255];
    let img = ImageData::from_rgba8(&rgba, 1, 1, ColorDepth::Xrgb8888).unwrap();
    let mut f = fb(1, 1);
    {
        let mut buf = f.view().unwrap();
        let dsc = ImageBlit {
            image: img.as_buf(),
            coords: Area::from_size(0, 0, 1, 1),
            transform: ImageTransform::Copy,
            opa: OPA_COVER,
            recolor: Color::WHITE,
            recolor_opa: OPA_COVER,
            mask: None,
            mode: BlendMode::Normal,
        };
        blit(&mut buf, &Area::new(0, 0, 0, 0), &dsc);
    }
    assert_eq!(f.pixel(0, 0), Some(Color::WHITE));
}
