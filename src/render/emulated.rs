use crate::foundation::core::Color;
use crate::geometry::mask::MaskView;
use crate::pixel::buffer::PixelBuf;
use crate::render::accelerated::{
    Command, CommandList, DeviceCaps, DeviceError, Fence, GpuDevice, Stencil, Texels,
};
use crate::render::blend::{BlendDesc, BlendMode, BlendSource};
use crate::render::ops::{FillDesc, ImageBlit, Paint, StrokeDesc};
use crate::render::raster;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeviceStats {
    pub lists: u64,
    pub commands: u64,
}

/// Device that executes command lists synchronously on the host.
///
/// Stands in for real hardware wherever none is attached; `fail_next` injects a fault
/// into the next submission.
#[derive(Debug)]
pub struct EmulatedDevice {
    caps: DeviceCaps,
    issued: u64,
    completed: u64,
    fault: Option<DeviceError>,
    stats: DeviceStats,
}

impl Default for EmulatedDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl EmulatedDevice {
    pub fn new() -> Self {
        Self::with_caps(DeviceCaps::default())
    }

    pub fn with_caps(caps: DeviceCaps) -> Self {
        Self {
            caps,
            issued: 0,
            completed: 0,
            fault: None,
            stats: DeviceStats::default(),
        }
    }

    pub fn fail_next(&mut self, err: DeviceError) {
        self.fault = Some(err);
    }

    pub fn stats(&self) -> DeviceStats {
        self.stats
    }

    fn validate(target: &PixelBuf<'_>, list: &CommandList<'_>) -> Result<(), DeviceError> {
        let clip = list.clip();
        if clip.intersect(&target.area()) != Some(clip) {
            return Err(DeviceError::InvalidArgument(format!(
                "clip {clip:?} exceeds target {:?}",
                target.area()
            )));
        }
        for cmd in list.commands() {
            let stencil = match cmd {
                Command::Fill { stencil, .. }
                | Command::Stroke { stencil, .. }
                | Command::Blit { stencil, .. }
                | Command::BlitImage { stencil, .. } => stencil,
            };
            if let Some(s) = stencil
                && s.data.len() < s.area.size()
            {
                return Err(DeviceError::InvalidArgument(format!(
                    "stencil of {} texels for {:?}",
                    s.data.len(),
                    s.area
                )));
            }
            if let Command::Blit {
                area,
                texels: Texels::Colors(colors),
                ..
            } = cmd
                && colors.len() != area.size()
            {
                return Err(DeviceError::InvalidArgument(format!(
                    "{} texels for blit area {area:?}",
                    colors.len()
                )));
            }
        }
        Ok(())
    }
}

fn stencil_view(stencil: Option<Stencil<'_>>) -> Option<MaskView<'_>> {
    stencil.map(|s| MaskView::Buffer {
        data: s.data,
        area: s.area,
    })
}

fn execute(target: &mut PixelBuf<'_>, list: &CommandList<'_>, cmd: &Command<'_>) {
    let clip = list.clip();
    match cmd {
        Command::Fill {
            area,
            radius,
            color,
            gradient,
            stencil,
        } => {
            let paint = match gradient {
                Some(g) => Paint::Gradient {
                    dir: g.dir,
                    from: g.from.color(),
                    to: g.to.color(),
                },
                None => Paint::Solid(color.color()),
            };
            let dsc = FillDesc {
                area: *area,
                radius: *radius,
                paint,
                opa: color.alpha(),
                mask: stencil_view(*stencil),
                mode: BlendMode::Normal,
            };
            raster::fill(target, &clip, &dsc);
        }
        Command::Stroke {
            area,
            radius,
            color,
            stencil,
        } => {
            let dsc = StrokeDesc {
                area: *area,
                radius: *radius,
                width: 1,
                color: color.color(),
                opa: color.alpha(),
                mask: stencil_view(*stencil),
                mode: BlendMode::Normal,
            };
            raster::stroke(target, &clip, &dsc);
        }
        Command::Blit {
            area,
            texels,
            color,
            stencil,
        } => {
            let decoded: Vec<Color>;
            let source = match texels {
                Texels::Constant => BlendSource::Solid(color.color()),
                Texels::Colors(colors) => {
                    decoded = colors.iter().map(|c| c.color()).collect();
                    BlendSource::Colors(&decoded)
                }
            };
            let dsc = BlendDesc {
                area: *area,
                source,
                opa: color.alpha(),
                mask: stencil_view(*stencil),
                mode: BlendMode::Normal,
            };
            raster::blend(target, &clip, &dsc);
        }
        Command::BlitImage {
            image,
            coords,
            transform,
            color,
            stencil,
        } => {
            let dsc = ImageBlit {
                image: *image,
                coords: *coords,
                transform: *transform,
                opa: color.alpha(),
                recolor: Color::BLACK,
                recolor_opa: 0,
                mask: stencil_view(*stencil),
                mode: BlendMode::Normal,
            };
            raster::blit(target, &clip, &dsc);
        }
    }
}

impl GpuDevice for EmulatedDevice {
    fn caps(&self) -> DeviceCaps {
        self.caps
    }

    fn submit(
        &mut self,
        target: &mut PixelBuf<'_>,
        list: &CommandList<'_>,
    ) -> Result<Fence, DeviceError> {
        if let Some(err) = self.fault.take() {
            tracing::debug!(error = %err, "injected device fault");
            return Err(err);
        }
        Self::validate(target, list)?;
        for cmd in list.commands() {
            execute(target, list, cmd);
        }
        self.issued += 1;
        self.completed = self.issued;
        self.stats.lists += 1;
        self.stats.commands += list.len() as u64;
        Ok(Fence(self.issued))
    }

    fn wait(&mut self, fence: Fence) -> Result<(), DeviceError> {
        if fence.0 > self.completed {
            return Err(DeviceError::Timeout);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/emulated.rs"]
mod tests;
