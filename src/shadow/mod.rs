pub mod cache;
pub mod fixed;
pub mod kernel;

pub use cache::{ShadowCache, ShadowCacheStats};
pub use fixed::UpsOpa;
pub use kernel::{CornerKernel, KernelParams, build_corner_kernel};
