use crate::foundation::core::Opa;
use crate::foundation::error::Skip;
use crate::geometry::area::Area;
use crate::geometry::radius::rounded_coverage;
use crate::shadow::fixed::UpsOpa;

/// Inputs of one corner kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KernelParams {
    /// Blur width in pixels, at least 1.
    pub shadow_width: i32,
    /// Corner radius of the shadow core, already clamped to the core.
    pub radius: i32,
    pub core_width: i32,
    pub core_height: i32,
    pub enhance: bool,
}

impl KernelParams {
    /// Side of the square kernel.
    pub fn size(&self) -> usize {
        (self.shadow_width + self.radius).max(0) as usize
    }

    /// Cache identity. Core extents reaching past the kernel do not change its contents.
    pub fn key(&self) -> KernelKey {
        let side = self.size() as i32;
        KernelKey {
            size: self.size(),
            radius: self.radius,
            span_w: self.core_width.min(side),
            span_h: self.core_height.min(side),
            enhance: self.enhance,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KernelKey {
    pub size: usize,
    pub radius: i32,
    pub span_w: i32,
    pub span_h: i32,
    pub enhance: bool,
}

/// Blurred alpha falloff of the top-right shadow corner, row-major, `size * size` bytes.
///
/// Column 0 faces the inside of the shape and row 0 the outside; the other corners read it
/// mirrored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CornerKernel {
    size: usize,
    radius: i32,
    data: Vec<Opa>,
}

impl CornerKernel {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn at(&self, x: usize, y: usize) -> Opa {
        self.data[y * self.size + x]
    }

    pub fn row(&self, y: usize) -> &[Opa] {
        &self.data[y * self.size..(y + 1) * self.size]
    }

    pub fn as_slice(&self) -> &[Opa] {
        &self.data
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}

/// Rasterize and blur one corner kernel.
#[tracing::instrument(level = "trace")]
pub fn build_corner_kernel(params: &KernelParams) -> Result<CornerKernel, Skip> {
    let sw = params.shadow_width;
    if sw < 1 || params.core_width < 1 || params.core_height < 1 || params.radius < 0 {
        return Err(Skip::Invisible);
    }
    let size = params.size();
    let len = size * size;

    let mut ups: Vec<UpsOpa> = Vec::new();
    ups.try_reserve_exact(len).map_err(|_| Skip::OutOfMemory)?;
    let mut line: Vec<UpsOpa> = Vec::new();
    let mut out: Vec<UpsOpa> = Vec::new();
    line.try_reserve_exact(size).map_err(|_| Skip::OutOfMemory)?;
    out.try_reserve_exact(size).map_err(|_| Skip::OutOfMemory)?;
    line.resize(size, UpsOpa::ZERO);
    out.resize(size, UpsOpa::ZERO);

    let even = if sw % 2 == 0 { 1 } else { 0 };
    let x2 = sw / 2 + params.radius - 1 - even;
    let y1 = sw / 2 + 1;
    let shape = Area::new(
        x2 - params.core_width + 1,
        y1,
        x2,
        y1 + params.core_height - 1,
    );
    for y in 0..size {
        for x in 0..size {
            ups.push(UpsOpa::from_opa(rounded_coverage(
                &shape,
                params.radius,
                x as i32,
                y as i32,
            )));
        }
    }

    let sw = sw as u32;
    let (first, second) = if params.enhance {
        let half = if sw == 1 { 1 } else { sw >> 1 };
        (half, half + (sw & 1))
    } else {
        (sw, 1)
    };
    if first > 1 {
        blur_pass(&mut ups, size, first, &mut line, &mut out);
        if second > 1 {
            blur_pass(&mut ups, size, second, &mut line, &mut out);
        }
    }

    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| Skip::OutOfMemory)?;
    data.extend(ups.iter().map(|v| v.to_opa()));
    Ok(CornerKernel {
        size,
        radius: params.radius,
        data,
    })
}

/// One horizontal then one vertical box blur of width `window`.
///
/// Horizontally output `x` averages `x - (window-1)/2 ..= x + window/2`; the vertical window
/// is mirrored. Samples past the edges repeat the edge value.
pub(crate) fn blur_pass(
    buf: &mut [UpsOpa],
    size: usize,
    window: u32,
    line: &mut [UpsOpa],
    out: &mut [UpsOpa],
) {
    let before = ((window - 1) / 2) as i64;
    let after = (window / 2) as i64;

    for row in buf.chunks_exact_mut(size) {
        line.copy_from_slice(row);
        box_line(line, out, before, after, window);
        row.copy_from_slice(out);
    }

    for x in 0..size {
        for (y, v) in line.iter_mut().enumerate() {
            *v = buf[y * size + x];
        }
        box_line(line, out, after, before, window);
        for (y, v) in out.iter().enumerate() {
            buf[y * size + x] = *v;
        }
    }
}

fn box_line(src: &[UpsOpa], out: &mut [UpsOpa], before: i64, after: i64, window: u32) {
    let n = src.len() as i64;
    if n == 0 {
        return;
    }
    let sample = |i: i64| src[i.clamp(0, n - 1) as usize].raw() as u32;

    let mut sum: u32 = (-before..=after).map(sample).sum();
    for i in 0..n {
        out[i as usize] = UpsOpa::from_window_sum(sum, window);
        sum = sum + sample(i + 1 + after) - sample(i - before);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shadow/kernel.rs"]
mod tests;
