pub mod buffer;
pub mod format;

pub use buffer::{Framebuffer, ImageBuf, ImageData, PixelBuf};
pub use format::{ColorDepth, DeviceColor, ImageFormat};
