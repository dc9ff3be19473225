use crate::foundation::core::{Color, OPA_COVER, OPA_TRANSP, Opa};
use crate::foundation::error::{Outcome, RectResult, Skip, Unsupported};
use crate::geometry::area::Area;
use crate::geometry::mask::MaskView;
use crate::pixel::buffer::{ImageBuf, PixelBuf};
use crate::pixel::format::{ColorDepth, DeviceColor, ImageFormat};
use crate::render::backend::{BackendKind, DrawBackend};
use crate::render::blend::{BlendDesc, BlendMode, BlendSource};
use crate::render::ops::{FillDesc, GradDir, ImageBlit, Paint, StrokeDesc};
use crate::render::raster::precheck;
use crate::render::transform::ImageTransform;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("timed out waiting for the device")]
    Timeout,
    #[error("device memory exhausted")]
    OutOfMemory,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("operation not supported by the device")]
    NotSupported,
    #[error("device failure: {0}")]
    Failed(String),
}

/// What a device can render without host help.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceCaps {
    /// Textures with per-pixel alpha on 16-bit targets.
    pub alpha_16bit: bool,
    pub transforms: bool,
    pub max_texture_side: u32,
}

impl Default for DeviceCaps {
    fn default() -> Self {
        Self {
            alpha_16bit: false,
            transforms: true,
            max_texture_side: 4096,
        }
    }
}

/// Opacity texture bound to a command, in target-local coordinates.
#[derive(Clone, Copy, Debug)]
pub struct Stencil<'a> {
    pub data: &'a [Opa],
    pub area: Area,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Texels {
    /// Every pixel takes the command color.
    Constant,
    /// One opaque color per pixel of the command area, row-major.
    Colors(Vec<DeviceColor>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceGradient {
    pub dir: GradDir,
    pub from: DeviceColor,
    pub to: DeviceColor,
}

/// One device command. Areas are relative to the target's top-left; the alpha channel of
/// `color` is the command opacity.
#[derive(Clone, Debug)]
pub enum Command<'a> {
    Fill {
        area: Area,
        radius: i32,
        color: DeviceColor,
        gradient: Option<DeviceGradient>,
        stencil: Option<Stencil<'a>>,
    },
    /// 1px rounded outline along `area`.
    Stroke {
        area: Area,
        radius: i32,
        color: DeviceColor,
        stencil: Option<Stencil<'a>>,
    },
    Blit {
        area: Area,
        texels: Texels,
        color: DeviceColor,
        stencil: Option<Stencil<'a>>,
    },
    BlitImage {
        image: ImageBuf<'a>,
        coords: Area,
        transform: ImageTransform,
        color: DeviceColor,
        stencil: Option<Stencil<'a>>,
    },
}

/// Commands sharing one clip rectangle, executed in order.
#[derive(Clone, Debug)]
pub struct CommandList<'a> {
    clip: Area,
    commands: Vec<Command<'a>>,
}

impl<'a> CommandList<'a> {
    pub fn new(clip: Area) -> Self {
        Self {
            clip,
            commands: Vec::new(),
        }
    }

    pub fn clip(&self) -> Area {
        self.clip
    }

    pub fn push(&mut self, cmd: Command<'a>) {
        self.commands.push(cmd);
    }

    pub fn commands(&self) -> &[Command<'a>] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Completion token of a submitted command list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Fence(pub u64);

/// Hardware able to execute command lists against a target buffer.
pub trait GpuDevice {
    fn caps(&self) -> DeviceCaps;

    /// Queue `list` against `target`, addressed from `(0, 0)`.
    fn submit(
        &mut self,
        target: &mut PixelBuf<'_>,
        list: &CommandList<'_>,
    ) -> Result<Fence, DeviceError>;

    /// Block until `fence` has signalled.
    fn wait(&mut self, fence: Fence) -> Result<(), DeviceError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AcceleratedStats {
    pub submits: u64,
    pub commands: u64,
}

/// Lowers draw operations to device command lists and waits for each to finish.
///
/// Only normal blending is offered; the rest is reported unsupported so the caller can
/// route it to the software path.
#[derive(Debug)]
pub struct AcceleratedBackend<D: GpuDevice> {
    device: D,
    stats: AcceleratedStats,
}

impl<D: GpuDevice> AcceleratedBackend<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            stats: AcceleratedStats::default(),
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn stats(&self) -> AcceleratedStats {
        self.stats
    }

    fn submit(&mut self, buf: &mut PixelBuf<'_>, list: &CommandList<'_>) -> RectResult<Outcome> {
        let mut target = buf.local_view();
        let fence = self.device.submit(&mut target, list)?;
        self.device.wait(fence)?;
        self.stats.submits = self.stats.submits.saturating_add(1);
        self.stats.commands = self.stats.commands.saturating_add(list.len() as u64);
        tracing::trace!(commands = list.len(), fence = fence.0, "command list done");
        Ok(Outcome::Drawn)
    }
}

fn unsupported(why: Unsupported) -> RectResult<Outcome> {
    Ok(Outcome::Skipped(Skip::Unsupported(why)))
}

fn check_mode(mode: BlendMode) -> Result<(), Unsupported> {
    match mode {
        BlendMode::Normal => Ok(()),
        other => Err(Unsupported::BlendMode(other)),
    }
}

fn stencil<'a>(
    mask: Option<MaskView<'a>>,
    origin: &Area,
) -> Result<Option<Stencil<'a>>, Unsupported> {
    match mask {
        None => Ok(None),
        Some(MaskView::Buffer { data, area }) => Ok(Some(Stencil {
            data,
            area: area.translate(-origin.x1, -origin.y1),
        })),
        Some(MaskView::Scanline(_)) => Err(Unsupported::ScanlineMask),
    }
}

/// Unwrap a lowering step, returning `Skip::Unsupported` from the caller on failure.
macro_rules! lower_or_return {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            Err(why) => return unsupported(why),
        }
    };
}

impl<D: GpuDevice> DrawBackend for AcceleratedBackend<D> {
    fn kind(&self) -> BackendKind {
        BackendKind::Accelerated
    }

    fn exec_blend(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        dsc: &BlendDesc<'_>,
    ) -> RectResult<Outcome> {
        let target = match precheck(buf, clip, &dsc.area, dsc.opa) {
            Ok(a) => a,
            Err(o) => return Ok(o),
        };
        lower_or_return!(check_mode(dsc.mode));
        let origin = buf.area();
        let stencil = lower_or_return!(stencil(dsc.mask, &origin));

        let (texels, color) = match dsc.source {
            BlendSource::Solid(c) => (Texels::Constant, DeviceColor::new(c, dsc.opa)),
            BlendSource::Colors(colors) => (
                Texels::Colors(
                    colors
                        .iter()
                        .map(|c| DeviceColor::new(*c, OPA_COVER))
                        .collect(),
                ),
                DeviceColor::new(Color::BLACK, dsc.opa),
            ),
        };
        let mut list = CommandList::new(target.translate(-origin.x1, -origin.y1));
        list.push(Command::Blit {
            area: dsc.area.translate(-origin.x1, -origin.y1),
            texels,
            color,
            stencil,
        });
        self.submit(buf, &list)
    }

    fn exec_fill(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        dsc: &FillDesc<'_>,
    ) -> RectResult<Outcome> {
        let target = match precheck(buf, clip, &dsc.area, dsc.opa) {
            Ok(a) => a,
            Err(o) => return Ok(o),
        };
        lower_or_return!(check_mode(dsc.mode));
        let origin = buf.area();
        let stencil = lower_or_return!(stencil(dsc.mask, &origin));

        let (color, gradient) = match dsc.paint {
            Paint::Solid(c) => (DeviceColor::new(c, dsc.opa), None),
            Paint::Gradient { dir, from, to } => (
                DeviceColor::new(from, dsc.opa),
                Some(DeviceGradient {
                    dir,
                    from: DeviceColor::new(from, OPA_COVER),
                    to: DeviceColor::new(to, OPA_COVER),
                }),
            ),
        };
        let mut list = CommandList::new(target.translate(-origin.x1, -origin.y1));
        list.push(Command::Fill {
            area: dsc.area.translate(-origin.x1, -origin.y1),
            radius: dsc.radius,
            color,
            gradient,
            stencil,
        });
        self.submit(buf, &list)
    }

    fn exec_stroke(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        dsc: &StrokeDesc<'_>,
    ) -> RectResult<Outcome> {
        if dsc.width <= 0 {
            return Ok(Outcome::Skipped(Skip::Invisible));
        }
        let target = match precheck(buf, clip, &dsc.area, dsc.opa) {
            Ok(a) => a,
            Err(o) => return Ok(o),
        };
        lower_or_return!(check_mode(dsc.mode));
        let origin = buf.area();
        let stencil = lower_or_return!(stencil(dsc.mask, &origin));

        let color = DeviceColor::new(dsc.color, dsc.opa);
        let outer = dsc.area.translate(-origin.x1, -origin.y1);
        let mut list = CommandList::new(target.translate(-origin.x1, -origin.y1));
        for i in 0..dsc.width {
            let ring = outer.increase(-i, -i);
            if !ring.is_valid() {
                break;
            }
            list.push(Command::Stroke {
                area: ring,
                radius: (dsc.radius - i).max(0),
                color,
                stencil,
            });
        }
        self.submit(buf, &list)
    }

    fn exec_blit(
        &mut self,
        buf: &mut PixelBuf<'_>,
        clip: &Area,
        dsc: &ImageBlit<'_>,
    ) -> RectResult<Outcome> {
        let bounds = dsc.transform.bounds(&dsc.coords);
        let target = match precheck(buf, clip, &bounds, dsc.opa) {
            Ok(a) => a,
            Err(o) => return Ok(o),
        };
        lower_or_return!(check_mode(dsc.mode));
        let caps = self.device.caps();
        if dsc.recolor_opa > OPA_TRANSP {
            return unsupported(Unsupported::Recolor);
        }
        let format = dsc.image.format();
        let depth = dsc.image.depth();
        if format == ImageFormat::NativeAlpha && depth == ColorDepth::Rgb565 && !caps.alpha_16bit {
            return unsupported(Unsupported::ImageFormat { format, depth });
        }
        if !dsc.transform.is_copy() && !caps.transforms {
            return unsupported(Unsupported::Transform);
        }
        if dsc.image.width() > caps.max_texture_side || dsc.image.height() > caps.max_texture_side {
            return unsupported(Unsupported::TextureSize);
        }
        let origin = buf.area();
        let stencil = lower_or_return!(stencil(dsc.mask, &origin));

        let mut list = CommandList::new(target.translate(-origin.x1, -origin.y1));
        list.push(Command::BlitImage {
            image: dsc.image,
            coords: dsc.coords.translate(-origin.x1, -origin.y1),
            transform: dsc.transform,
            color: DeviceColor::new(Color::WHITE, dsc.opa),
            stencil,
        });
        self.submit(buf, &list)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/accelerated.rs"]
mod tests;
