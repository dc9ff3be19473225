use super::*;
use crate::foundation::core::OPA_50;
use crate::pixel::buffer::{Framebuffer, ImageData};
use crate::render::emulated::EmulatedDevice;
use crate::render::software::SoftwareBackend;

fn fb(w: u32, h: u32) -> Framebuffer {
    Framebuffer::new(w, h, ColorDepth::Xrgb8888, Color::BLACK).unwrap()
}

fn fill_desc(area: Area, mode: BlendMode) -> FillDesc<'static> {
    FillDesc {
        area,
        radius: 3,
        paint: Paint::Solid(Color::rgb(200, 10, 40)),
        opa: OPA_50,
        mask: None,
        mode,
    }
}

#[test]
fn fill_matches_software() {
    let clip = Area::new(2, 1, 14, 9);
    let dsc = fill_desc(Area::new(1, 1, 12, 10), BlendMode::Normal);

    let mut soft = fb(16, 12);
    SoftwareBackend::new()
        .exec_fill(&mut soft.view().unwrap(), &clip, &dsc)
        .unwrap();

    let mut accel = fb(16, 12);
    let mut backend = AcceleratedBackend::new(EmulatedDevice::new());
    let out = backend
        .exec_fill(&mut accel.view().unwrap(), &clip, &dsc)
        .unwrap();

    assert_eq!(out, Outcome::Drawn);
    assert_eq!(soft, accel);
    assert_eq!(backend.stats().submits, 1);
}

#[test]
fn non_normal_blend_is_unsupported_and_untouched() {
    let mut f = fb(8, 8);
    let before = f.clone();
    let mut backend = AcceleratedBackend::new(EmulatedDevice::new());
    let out = backend
        .exec_fill(
            &mut f.view().unwrap(),
            &Area::new(0, 0, 7, 7),
            &fill_desc(Area::new(0, 0, 7, 7), BlendMode::Additive),
        )
        .unwrap();
    assert_eq!(
        out,
        Outcome::Skipped(Skip::Unsupported(Unsupported::BlendMode(
            BlendMode::Additive
        )))
    );
    assert_eq!(f, before);
    assert_eq!(backend.device().stats().lists, 0);
}

#[test]
fn clipped_request_reports_clipped_before_capabilities() {
    let mut f = fb(8, 8);
    let mut backend = AcceleratedBackend::new(EmulatedDevice::new());
    let out = backend
        .exec_fill(
            &mut f.view().unwrap(),
            &Area::new(6, 6, 7, 7),
            &fill_desc(Area::new(0, 0, 3, 3), BlendMode::Multiply),
        )
        .unwrap();
    assert_eq!(out, Outcome::Skipped(Skip::Clipped));
}

#[test]
fn stroke_lowers_one_command_per_ring() {
    let mut f = fb(20, 20);
    let mut backend = AcceleratedBackend::new(EmulatedDevice::new());
    let dsc = StrokeDesc {
        area: Area::new(0, 0, 19, 19),
        radius: 5,
        width: 3,
        color: Color::WHITE,
        opa: OPA_COVER,
        mask: None,
        mode: BlendMode::Normal,
    };
    backend
        .exec_stroke(&mut f.view().unwrap(), &Area::new(0, 0, 19, 19), &dsc)
        .unwrap();
    assert_eq!(backend.stats().commands, 3);
    assert_eq!(f.pixel(2, 10), Some(Color::WHITE));
    assert_eq!(f.pixel(3, 10), Some(Color::BLACK));
}

#[test]
fn scanline_masks_are_not_lowered() {
    use crate::geometry::mask::MaskSet;
    use crate::geometry::radius::RadiusMask;

    let circle = RadiusMask::new(Area::new(0, 0, 7, 7), 4);
    let mut set = MaskSet::new();
    set.push(&circle);
    let mut dsc = BlendDesc::solid(Area::new(0, 0, 7, 7), Color::WHITE, OPA_COVER);
    dsc.mask = Some(MaskView::Scanline(&set));

    let mut f = fb(8, 8);
    let mut backend = AcceleratedBackend::new(EmulatedDevice::new());
    let out = backend
        .exec_blend(&mut f.view().unwrap(), &Area::new(0, 0, 7, 7), &dsc)
        .unwrap();
    assert_eq!(
        out,
        Outcome::Skipped(Skip::Unsupported(Unsupported::ScanlineMask))
    );
}

#[test]
fn recolor_and_alpha_565_need_fallback() {
    let rgba = [10, 20, 30, 128];
    let img565 = ImageData::from_rgba8(&rgba, 1, 1, ColorDepth::Rgb565).unwrap();
    let mut f = Framebuffer::new(2, 2, ColorDepth::Rgb565, Color::BLACK).unwrap();
    let mut backend = AcceleratedBackend::new(EmulatedDevice::new());

    let mut dsc = ImageBlit {
        image: img565.as_buf(),
        coords: Area::from_size(0, 0, 1, 1),
        transform: ImageTransform::Copy,
        opa: OPA_COVER,
        recolor: Color::WHITE,
        recolor_opa: OPA_50,
        mask: None,
        mode: BlendMode::Normal,
    };
    let clip = Area::new(0, 0, 1, 1);
    let out = backend.exec_blit(&mut f.view().unwrap(), &clip, &dsc).unwrap();
    assert_eq!(out, Outcome::Skipped(Skip::Unsupported(Unsupported::Recolor)));

    dsc.recolor_opa = 0;
    let out = backend.exec_blit(&mut f.view().unwrap(), &clip, &dsc).unwrap();
    assert!(matches!(
        out,
        Outcome::Skipped(Skip::Unsupported(Unsupported::ImageFormat { .. }))
    ));

    let mut capable = AcceleratedBackend::new(EmulatedDevice::with_caps(DeviceCaps {
        alpha_16bit: true,
        ..DeviceCaps::default()
    }));
    let out = capable.exec_blit(&mut f.view().unwrap(), &clip, &dsc).unwrap();
    assert_eq!(out, Outcome::Drawn);
}

#[test]
fn device_fault_propagates() {
    let mut f = fb(4, 4);
    let mut backend = AcceleratedBackend::new(EmulatedDevice::new());
    backend.device_mut().fail_next(DeviceError::Timeout);
    let err = backend
        .exec_fill(
            &mut f.view().unwrap(),
            &Area::new(0, 0, 3, 3),
            &fill_desc(Area::new(0, 0, 3, 3), BlendMode::Normal),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        crate::foundation::error::RectError::Device(DeviceError::Timeout)
    ));
}

#[test]
fn offset_buffers_are_addressed_locally() {
    let area = Area::new(10, 20, 17, 27);
    let mut soft_bytes = vec![0u8; 8 * 8 * 4];
    let mut accel_bytes = soft_bytes.clone();
    let dsc = fill_desc(Area::new(12, 22, 30, 30), BlendMode::Normal);
    let clip = Area::new(0, 0, 100, 100);

    SoftwareBackend::new()
        .exec_fill(
            &mut PixelBuf::new(&mut soft_bytes, area, ColorDepth::Xrgb8888).unwrap(),
            &clip,
            &dsc,
        )
        .unwrap();
    AcceleratedBackend::new(EmulatedDevice::new())
        .exec_fill(
            &mut PixelBuf::new(&mut accel_bytes, area, ColorDepth::Xrgb8888).unwrap(),
            &clip,
            &dsc,
        )
        .unwrap();
    assert_eq!(soft_bytes, accel_bytes);
    assert_ne!(soft_bytes, vec![0u8; 8 * 8 * 4]);
}
