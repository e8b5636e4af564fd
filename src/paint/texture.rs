use crate::foundation::core::{Argb32, PixelLayout, TileRect};
use crate::foundation::error::{GammaError, GammaResult};
use crate::paint::PaintSource;
use crate::raster::tile::Raster;

/// Image repeated across the device plane, anchored at `origin`.
#[derive(Clone, Debug)]
pub struct TexturePaint {
    pixels: Vec<Argb32>,
    width: u32,
    height: u32,
    origin: (i64, i64),
    tile: Vec<Argb32>,
}

impl TexturePaint {
    /// Wrap tightly packed straight-ARGB `pixels`.
    pub fn new(pixels: Vec<Argb32>, width: u32, height: u32) -> GammaResult<Self> {
        if width == 0 || height == 0 {
            return Err(GammaError::validation("texture must be non-empty"));
        }
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(GammaError::validation(
                "texture expects pixels matching width*height",
            ));
        }
        Ok(Self {
            pixels,
            width,
            height,
            origin: (0, 0),
            tile: Vec::new(),
        })
    }

    /// Move the texture's top-left corner to device position `(x, y)`.
    pub fn with_origin(mut self, x: i64, y: i64) -> Self {
        self.origin = (x, y);
        self
    }
}

impl PaintSource for TexturePaint {
    fn raster(&mut self, rect: TileRect) -> GammaResult<Raster<'_>> {
        let n = rect.area();
        if self.tile.len() < n {
            self.tile.resize(n, 0);
        }
        let (tw, th) = (i64::from(self.width), i64::from(self.height));
        let w = rect.w as usize;
        for j in 0..rect.h as usize {
            let ty = (i64::from(rect.y) + j as i64 - self.origin.1).rem_euclid(th) as usize;
            let row = &self.pixels[ty * self.width as usize..][..self.width as usize];
            for i in 0..w {
                let tx = (i64::from(rect.x) + i as i64 - self.origin.0).rem_euclid(tw) as usize;
                self.tile[j * w + i] = row[tx];
            }
        }
        Raster::packed(&self.tile[..n], rect.w, rect.h, PixelLayout::IntArgb)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/texture.rs"]
mod tests;
