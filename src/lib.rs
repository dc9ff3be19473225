#![forbid(unsafe_code)]

pub mod compose;
pub mod foundation;
pub mod geometry;
pub mod pixel;
pub mod render;
pub mod scene;
pub mod shadow;

pub use compose::{
    A8Bitmap, BgDesc, BgImageDesc, BorderDesc, BorderSide, Compositor, CompositorStats, DrawCtx,
    GradDesc, GradStop, ImageDesc, ImageSource, OutlineDesc, RectDesc, ShadowDesc, SymbolFont,
};
pub use foundation::core::{Color, OPA_50, OPA_COVER, OPA_MAX, OPA_MIN, OPA_TRANSP, Opa, Point};
pub use foundation::error::{Outcome, RectError, RectResult, Skip, Unsupported};
pub use foundation::settings::{CompositorOpts, ShadowCacheOpts};
pub use geometry::area::Area;
pub use geometry::mask::{MaskContributor, MaskResult, MaskSet, MaskView};
pub use geometry::radius::RadiusMask;
pub use pixel::{ColorDepth, Framebuffer, ImageBuf, ImageData, ImageFormat, PixelBuf};
pub use render::{
    AcceleratedBackend, BackendKind, BlendDesc, BlendMode, BlendSource, DeviceCaps, DeviceError,
    DrawBackend, DrawOp, EmulatedDevice, GpuDevice, GradDir, Paint, SoftwareBackend,
    create_backend,
};
pub use scene::{Scene, render_scene};
