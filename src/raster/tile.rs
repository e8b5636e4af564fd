use crate::foundation::core::PixelLayout;
use crate::foundation::error::{GammaError, GammaResult};

fn required_len(width: u32, height: u32, stride: usize) -> GammaResult<usize> {
    if (width as usize) > stride {
        return Err(GammaError::validation(format!(
            "raster stride {stride} is smaller than width {width}"
        )));
    }
    if width == 0 || height == 0 {
        return Ok(0);
    }
    (height as usize - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width as usize))
        .ok_or_else(|| GammaError::validation("raster size overflow"))
}

/// Read-only view of a rectangle of packed pixels.
#[derive(Clone, Copy, Debug)]
pub struct Raster<'a> {
    data: &'a [u32],
    width: u32,
    height: u32,
    stride: usize,
    layout: PixelLayout,
}

impl<'a> Raster<'a> {
    /// Wrap `data`, where row `y` starts at `y * stride`.
    pub fn new(
        data: &'a [u32],
        width: u32,
        height: u32,
        stride: usize,
        layout: PixelLayout,
    ) -> GammaResult<Self> {
        let need = required_len(width, height, stride)?;
        if data.len() < need {
            return Err(GammaError::validation(format!(
                "raster needs {need} pixels, buffer has {}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
            layout,
        })
    }

    /// Wrap a tightly packed buffer (`stride == width`).
    pub fn packed(
        data: &'a [u32],
        width: u32,
        height: u32,
        layout: PixelLayout,
    ) -> GammaResult<Self> {
        Self::new(data, width, height, width as usize, layout)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel layout of the words.
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Row `y`, exactly `width` pixels.
    #[inline]
    pub fn row(&self, y: u32) -> &'a [u32] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize]
    }
}

/// Writable view of a rectangle of packed pixels.
#[derive(Debug)]
pub struct RasterMut<'a> {
    data: &'a mut [u32],
    width: u32,
    height: u32,
    stride: usize,
    layout: PixelLayout,
}

impl<'a> RasterMut<'a> {
    /// Wrap `data`, where row `y` starts at `y * stride`.
    pub fn new(
        data: &'a mut [u32],
        width: u32,
        height: u32,
        stride: usize,
        layout: PixelLayout,
    ) -> GammaResult<Self> {
        let need = required_len(width, height, stride)?;
        if data.len() < need {
            return Err(GammaError::validation(format!(
                "raster needs {need} pixels, buffer has {}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
            layout,
        })
    }

    /// Wrap a tightly packed buffer (`stride == width`).
    pub fn packed(
        data: &'a mut [u32],
        width: u32,
        height: u32,
        layout: PixelLayout,
    ) -> GammaResult<Self> {
        Self::new(data, width, height, width as usize, layout)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel layout of the words.
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Row `y`, exactly `width` pixels.
    #[inline]
    pub fn row(&self, y: u32) -> &[u32] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize]
    }

    /// Mutable row `y`, exactly `width` pixels.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u32] {
        let start = y as usize * self.stride;
        &mut self.data[start..start + self.width as usize]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/tile.rs"]
mod tests;
