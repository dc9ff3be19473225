use crate::foundation::core::{Color, Opa};
use crate::foundation::error::{RectError, RectResult};
use crate::geometry::area::Area;
use crate::pixel::format::{ColorDepth, ImageFormat};

/// Caller-owned destination pixels covering `area` in global coordinates.
#[derive(Debug)]
pub struct PixelBuf<'a> {
    data: &'a mut [u8],
    area: Area,
    depth: ColorDepth,
    stride: usize,
}

impl<'a> PixelBuf<'a> {
    /// Tightly packed rows.
    pub fn new(data: &'a mut [u8], area: Area, depth: ColorDepth) -> RectResult<Self> {
        let stride = area.width().max(0) as usize * depth.bytes_per_pixel();
        Self::with_stride(data, area, depth, stride)
    }

    /// Rows `stride` bytes apart.
    pub fn with_stride(
        data: &'a mut [u8],
        area: Area,
        depth: ColorDepth,
        stride: usize,
    ) -> RectResult<Self> {
        if !area.is_valid() {
            return Err(RectError::validation(format!(
                "buffer area {area:?} is inverted"
            )));
        }
        let row_bytes = area.width() as usize * depth.bytes_per_pixel();
        if stride < row_bytes {
            return Err(RectError::validation(format!(
                "stride {stride} is shorter than a row of {row_bytes} bytes"
            )));
        }
        let needed = stride * (area.height() as usize - 1) + row_bytes;
        if data.len() < needed {
            return Err(RectError::validation(format!(
                "buffer holds {} bytes, {needed} needed for {area:?}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            area,
            depth,
            stride,
        })
    }

    pub fn area(&self) -> Area {
        self.area
    }

    pub fn depth(&self) -> ColorDepth {
        self.depth
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..]
    }

    /// The same pixels addressed with the top-left at `(0, 0)`.
    pub fn local_view(&mut self) -> PixelBuf<'_> {
        PixelBuf {
            data: &mut *self.data,
            area: Area::from_size(0, 0, self.area.width(), self.area.height()),
            depth: self.depth,
            stride: self.stride,
        }
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        self.area.contains_point(x, y).then(|| {
            (y - self.area.y1) as usize * self.stride
                + (x - self.area.x1) as usize * self.depth.bytes_per_pixel()
        })
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        let off = self.offset(x, y)?;
        Some(self.depth.read(&self.data[off..]))
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, c: Color) -> bool {
        match self.offset(x, y) {
            Some(off) => {
                self.depth.write(&mut self.data[off..], c);
                true
            }
            None => false,
        }
    }

    /// Bytes of the pixels `x..x + len` on line `y`; `None` unless all lie inside the buffer.
    pub(crate) fn span_mut(&mut self, x: i32, y: i32, len: usize) -> Option<&mut [u8]> {
        if len == 0 || !self.area.contains_point(x + len as i32 - 1, y) {
            return None;
        }
        let start = self.offset(x, y)?;
        let end = start + len * self.depth.bytes_per_pixel();
        self.data.get_mut(start..end)
    }

    pub fn fill(&mut self, c: Color) {
        let bpp = self.depth.bytes_per_pixel();
        let row_bytes = self.area.width() as usize * bpp;
        for row in self.data.chunks_mut(self.stride) {
            let end = row_bytes.min(row.len());
            for px in row[..end].chunks_exact_mut(bpp) {
                self.depth.write(px, c);
            }
        }
    }
}

/// Owned destination buffer for tools and tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    data: Vec<u8>,
    area: Area,
    depth: ColorDepth,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32, depth: ColorDepth, clear: Color) -> RectResult<Self> {
        if width == 0 || height == 0 {
            return Err(RectError::validation("framebuffer must not be empty"));
        }
        let area = Area::from_size(0, 0, width as i32, height as i32);
        let px = depth.bytes_per_pixel();
        let mut data = vec![0u8; area.size() * px];
        for chunk in data.chunks_exact_mut(px) {
            depth.write(chunk, clear);
        }
        Ok(Self { data, area, depth })
    }

    pub fn area(&self) -> Area {
        self.area
    }

    pub fn depth(&self) -> ColorDepth {
        self.depth
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn view(&mut self) -> RectResult<PixelBuf<'_>> {
        PixelBuf::new(&mut self.data, self.area, self.depth)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if !self.area.contains_point(x, y) {
            return None;
        }
        let px = self.depth.bytes_per_pixel();
        let off = ((y - self.area.y1) as usize * self.area.width() as usize
            + (x - self.area.x1) as usize)
            * px;
        Some(self.depth.read(&self.data[off..]))
    }

    /// Straight RGBA8, alpha 255.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let px = self.depth.bytes_per_pixel();
        let mut out = Vec::with_capacity(self.area.size() * 4);
        for chunk in self.data.chunks_exact(px) {
            let c = self.depth.read(chunk);
            out.extend_from_slice(&[c.r, c.g, c.b, 0xff]);
        }
        out
    }
}

/// Borrowed source image.
#[derive(Clone, Copy, Debug)]
pub struct ImageBuf<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    depth: ColorDepth,
    format: ImageFormat,
}

impl<'a> ImageBuf<'a> {
    pub fn new(
        data: &'a [u8],
        width: u32,
        height: u32,
        depth: ColorDepth,
        format: ImageFormat,
    ) -> RectResult<Self> {
        if width == 0 || height == 0 {
            return Err(RectError::validation(format!(
                "image size {width}x{height} is empty"
            )));
        }
        let needed = width as usize * height as usize * format.bytes_per_pixel(depth);
        if data.len() < needed {
            return Err(RectError::validation(format!(
                "image holds {} bytes, {needed} needed",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            depth,
            format,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn depth(&self) -> ColorDepth {
        self.depth
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Color and alpha of texel `(x, y)`; transparent outside the image.
    pub fn texel(&self, x: i64, y: i64) -> (Color, Opa) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return (Color::BLACK, 0);
        }
        let px = self.format.bytes_per_pixel(self.depth);
        let off = (y as usize * self.width as usize + x as usize) * px;
        self.format.read(self.depth, &self.data[off..off + px])
    }
}

/// Owned source image, usually decoded from a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageData {
    data: Vec<u8>,
    width: u32,
    height: u32,
    depth: ColorDepth,
    format: ImageFormat,
}

impl ImageData {
    /// Encode straight RGBA8 pixels as a `NativeAlpha` image of `depth`.
    pub fn from_rgba8(rgba: &[u8], width: u32, height: u32, depth: ColorDepth) -> RectResult<Self> {
        let count = width as usize * height as usize;
        if count == 0 || rgba.len() != count * 4 {
            return Err(RectError::validation(format!(
                "rgba buffer of {} bytes does not match {width}x{height}",
                rgba.len()
            )));
        }
        let format = ImageFormat::NativeAlpha;
        let px = format.bytes_per_pixel(depth);
        let mut data = vec![0u8; count * px];
        for (src, dst) in rgba.chunks_exact(4).zip(data.chunks_exact_mut(px)) {
            depth.write(dst, Color::rgb(src[0], src[1], src[2]));
            dst[px - 1] = src[3];
        }
        Ok(Self {
            data,
            width,
            height,
            depth,
            format,
        })
    }

    /// Wrap raw native bytes.
    pub fn from_native(
        data: Vec<u8>,
        width: u32,
        height: u32,
        depth: ColorDepth,
        format: ImageFormat,
    ) -> RectResult<Self> {
        ImageBuf::new(&data, width, height, depth, format)?;
        Ok(Self {
            data,
            width,
            height,
            depth,
            format,
        })
    }

    pub fn as_buf(&self) -> ImageBuf<'_> {
        ImageBuf {
            data: &self.data,
            width: self.width,
            height: self.height,
            depth: self.depth,
            format: self.format,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/buffer.rs"]
mod tests;
