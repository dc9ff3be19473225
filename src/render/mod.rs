pub mod accelerated;
pub mod backend;
pub mod blend;
pub mod emulated;
pub mod ops;
pub(crate) mod raster;
pub mod software;
pub mod transform;

pub use accelerated::{AcceleratedBackend, DeviceCaps, DeviceError, GpuDevice};
pub use backend::{BackendKind, DrawBackend, create_backend, execute_op};
pub use blend::{BlendDesc, BlendMode, BlendSource};
pub use emulated::EmulatedDevice;
pub use ops::{DrawOp, FillDesc, GradDir, ImageBlit, Paint, StrokeDesc};
pub use software::SoftwareBackend;
pub use transform::{ImageTransform, ZOOM_NONE};
