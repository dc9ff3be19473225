pub mod compositor;
pub mod ctx;
pub mod desc;
pub(crate) mod shadow;

pub use compositor::{Compositor, CompositorStats};
pub use ctx::DrawCtx;
pub use desc::{
    A8Bitmap, BgDesc, BgImageDesc, BorderDesc, BorderSide, GradDesc, GradStop, ImageDesc,
    ImageSource, OutlineDesc, RectDesc, ShadowDesc, SymbolFont,
};
