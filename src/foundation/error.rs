use crate::pixel::{ColorDepth, ImageFormat};
use crate::render::accelerated::DeviceError;
use crate::render::blend::BlendMode;

pub type RectResult<T> = Result<T, RectError>;

#[derive(thiserror::Error, Debug)]
pub enum RectError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("scene error: {0}")]
    Scene(String),

    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RectError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }
}

/// Result of a draw step that did not hard-fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Drawn,
    Skipped(Skip),
}

impl Outcome {
    pub fn is_drawn(self) -> bool {
        matches!(self, Self::Drawn)
    }

    /// Whether the software reference path should redo this step.
    pub fn needs_fallback(self) -> bool {
        matches!(
            self,
            Self::Skipped(Skip::Unsupported(_)) | Self::Skipped(Skip::OutOfMemory)
        )
    }

    /// Combine the outcomes of independent stages: drawn if any stage drew.
    pub fn merge(self, other: Outcome) -> Outcome {
        match (self, other) {
            (Self::Drawn, _) | (_, Self::Drawn) => Self::Drawn,
            (Self::Skipped(Skip::Clipped), s) | (s, Self::Skipped(Skip::Clipped)) => s,
            (s, _) => s,
        }
    }
}

/// Why nothing was written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Skip {
    /// The drawing lies outside the clip or the buffer.
    Clipped,
    /// Opacity, width or flags make the element invisible.
    Invisible,
    /// The backend cannot express the request.
    Unsupported(Unsupported),
    /// A scratch allocation failed.
    OutOfMemory,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unsupported {
    BlendMode(BlendMode),
    ImageFormat { format: ImageFormat, depth: ColorDepth },
    Recolor,
    Transform,
    TextureSize,
    ScanlineMask,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
