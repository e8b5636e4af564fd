use kurbo::{Point, Vec2};

use crate::foundation::core::{Argb32, PixelLayout, TileRect, argb, argb_channels};
use crate::foundation::error::{GammaError, GammaResult};
use crate::paint::PaintSource;
use crate::raster::tile::Raster;

/// Two-stop linear gradient, padded beyond its end points.
///
/// Colors are interpolated on straight display values at pixel centers.
#[derive(Clone, Debug)]
pub struct LinearGradient {
    start: Point,
    dir: Vec2,
    inv_len2: f64,
    c0: [f32; 4],
    c1: [f32; 4],
    tile: Vec<Argb32>,
}

impl LinearGradient {
    /// Gradient from `c0` at `start` to `c1` at `end`.
    pub fn new(start: Point, end: Point, c0: Argb32, c1: Argb32) -> GammaResult<Self> {
        let dir = end - start;
        let len2 = dir.hypot2();
        if !len2.is_finite() || len2 <= f64::EPSILON {
            return Err(GammaError::validation(
                "gradient start and end must be distinct finite points",
            ));
        }
        Ok(Self {
            start,
            dir,
            inv_len2: 1.0 / len2,
            c0: channels_f32(c0),
            c1: channels_f32(c1),
            tile: Vec::new(),
        })
    }

    fn color_at(&self, p: Point) -> Argb32 {
        let t = ((p - self.start).dot(self.dir) * self.inv_len2).clamp(0.0, 1.0) as f32;
        let mut out = [0u8; 4];
        for (i, o) in out.iter_mut().enumerate() {
            let v = self.c0[i] + (self.c1[i] - self.c0[i]) * t;
            *o = v.round().clamp(0.0, 255.0) as u8;
        }
        argb(out[0], out[1], out[2], out[3])
    }
}

impl PaintSource for LinearGradient {
    fn raster(&mut self, rect: TileRect) -> GammaResult<Raster<'_>> {
        let n = rect.area();
        if self.tile.len() < n {
            self.tile.resize(n, 0);
        }
        let w = rect.w as usize;
        for j in 0..rect.h as usize {
            for i in 0..w {
                let p = Point::new(
                    f64::from(rect.x) + i as f64 + 0.5,
                    f64::from(rect.y) + j as f64 + 0.5,
                );
                self.tile[j * w + i] = self.color_at(p);
            }
        }
        Raster::packed(&self.tile[..n], rect.w, rect.h, PixelLayout::IntArgb)
    }
}

fn channels_f32(c: Argb32) -> [f32; 4] {
    argb_channels(c).map(f32::from)
}

#[cfg(test)]
#[path = "../../tests/unit/paint/gradient.rs"]
mod tests;
