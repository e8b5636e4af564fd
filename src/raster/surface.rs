use crate::foundation::core::{
    Argb32, PixelLayout, TileRect, argb, argb_channels, premultiply_argb, unpremultiply_argb,
};
use crate::foundation::error::{GammaError, GammaResult};
use crate::raster::tile::RasterMut;

/// Destination of a compositing sequence.
///
/// Tiles are exchanged as straight ARGB words whatever the storage layout. Callers
/// must only pass rectangles that fit within `width x height`.
pub trait DestinationSurface {
    /// Storage layout.
    fn layout(&self) -> PixelLayout;

    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Direct straight-ARGB view of `rect`, or `None` when the storage cannot be
    /// addressed that way and tiles must go through [`read_tile`](Self::read_tile)
    /// and [`write_tile`](Self::write_tile).
    fn writable_tile(&mut self, rect: TileRect) -> Option<RasterMut<'_>>;

    /// Copy `rect` into `out` (tightly packed, `rect.area()` words) as straight ARGB.
    fn read_tile(&self, rect: TileRect, out: &mut [Argb32]);

    /// Store tightly packed straight-ARGB `pixels` into `rect`.
    ///
    /// With a mask, pixels whose mask byte is zero are left untouched.
    fn write_tile(&mut self, rect: TileRect, pixels: &[Argb32], mask: Option<&[u8]>);
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Storage {
    Int(Vec<u32>),
    Byte(Vec<u8>),
}

/// In-memory surface with a fixed layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    layout: PixelLayout,
    storage: Storage,
}

impl Surface {
    /// Transparent surface of the given size and layout.
    pub fn new(width: u32, height: u32, layout: PixelLayout) -> GammaResult<Self> {
        let px = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| GammaError::validation("surface size overflow"))?;
        let storage = if layout.is_packed_int() {
            Storage::Int(vec![0; px])
        } else {
            let bytes = px
                .checked_mul(4)
                .ok_or_else(|| GammaError::validation("surface size overflow"))?;
            Storage::Byte(vec![0; bytes])
        };
        Ok(Self {
            width,
            height,
            layout,
            storage,
        })
    }

    /// Surface of `layout` holding the given straight-ARGB pixels.
    pub fn from_argb(
        width: u32,
        height: u32,
        layout: PixelLayout,
        pixels: &[Argb32],
    ) -> GammaResult<Self> {
        let mut s = Self::new(width, height, layout)?;
        if pixels.len() != s.pixel_count() {
            return Err(GammaError::validation(format!(
                "surface expects {} pixels, got {}",
                s.pixel_count(),
                pixels.len()
            )));
        }
        for (i, &px) in pixels.iter().enumerate() {
            s.store(i, px);
        }
        Ok(s)
    }

    /// Surface of `layout` decoded from a straight RGBA8 image.
    pub fn from_rgba_image(img: &image::RgbaImage, layout: PixelLayout) -> GammaResult<Self> {
        let pixels: Vec<Argb32> = img
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                argb(a, r, g, b)
            })
            .collect();
        Self::from_argb(img.width(), img.height(), layout, &pixels)
    }

    /// Straight RGBA8 copy of the surface.
    pub fn to_rgba_image(&self) -> GammaResult<image::RgbaImage> {
        let mut data = Vec::with_capacity(self.pixel_count() * 4);
        for i in 0..self.pixel_count() {
            let [a, r, g, b] = argb_channels(self.load(i));
            data.extend_from_slice(&[r, g, b, a]);
        }
        image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| GammaError::validation("rgba buffer does not match surface size"))
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Straight ARGB value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Argb32 {
        self.load(self.index(x, y))
    }

    /// Store a straight ARGB value at `(x, y)`.
    pub fn set_pixel(&mut self, x: u32, y: u32, px: Argb32) {
        let i = self.index(x, y);
        self.store(i, px);
    }

    /// Set every pixel to `px`.
    pub fn fill(&mut self, px: Argb32) {
        for i in 0..self.pixel_count() {
            self.store(i, px);
        }
    }

    /// All pixels as straight ARGB, row-major.
    pub fn to_argb_vec(&self) -> Vec<Argb32> {
        (0..self.pixel_count()).map(|i| self.load(i)).collect()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    fn load(&self, i: usize) -> Argb32 {
        match &self.storage {
            Storage::Int(words) => {
                let w = words[i];
                match self.layout {
                    PixelLayout::IntArgbPre => unpremultiply_argb(w),
                    PixelLayout::IntRgb => w | 0xFF00_0000,
                    _ => w,
                }
            }
            Storage::Byte(bytes) => {
                let p = &bytes[i * 4..i * 4 + 4];
                let px = argb(p[0], p[3], p[2], p[1]);
                if self.layout.is_premultiplied() {
                    unpremultiply_argb(px)
                } else {
                    px
                }
            }
        }
    }

    fn store(&mut self, i: usize, px: Argb32) {
        let layout = self.layout;
        match &mut self.storage {
            Storage::Int(words) => {
                words[i] = match layout {
                    PixelLayout::IntArgbPre => premultiply_argb(px),
                    PixelLayout::IntRgb => px & 0x00FF_FFFF,
                    _ => px,
                };
            }
            Storage::Byte(bytes) => {
                let px = if layout.is_premultiplied() {
                    premultiply_argb(px)
                } else {
                    px
                };
                let [a, r, g, b] = argb_channels(px);
                bytes[i * 4..i * 4 + 4].copy_from_slice(&[a, b, g, r]);
            }
        }
    }
}

impl DestinationSurface for Surface {
    fn layout(&self) -> PixelLayout {
        self.layout
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn writable_tile(&mut self, rect: TileRect) -> Option<RasterMut<'_>> {
        if self.layout != PixelLayout::IntArgb || !rect.fits_within(self.width, self.height) {
            return None;
        }
        let stride = self.width as usize;
        let Storage::Int(words) = &mut self.storage else {
            return None;
        };
        let start = (rect.y as usize) * stride + rect.x as usize;
        RasterMut::new(&mut words[start..], rect.w, rect.h, stride, PixelLayout::IntArgb).ok()
    }

    fn read_tile(&self, rect: TileRect, out: &mut [Argb32]) {
        let w = rect.w as usize;
        for (j, row) in out.chunks_exact_mut(w).take(rect.h as usize).enumerate() {
            let base = self.index(rect.x, rect.y + j as u32);
            for (i, px) in row.iter_mut().enumerate() {
                *px = self.load(base + i);
            }
        }
    }

    fn write_tile(&mut self, rect: TileRect, pixels: &[Argb32], mask: Option<&[u8]>) {
        let w = rect.w as usize;
        for (j, row) in pixels.chunks_exact(w).take(rect.h as usize).enumerate() {
            let base = self.index(rect.x, rect.y + j as u32);
            for (i, &px) in row.iter().enumerate() {
                if let Some(mask) = mask
                    && mask[j * w + i] == 0
                {
                    continue;
                }
                self.store(base + i, px);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/surface.rs"]
mod tests;
