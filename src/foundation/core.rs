use crate::foundation::error::{GammaError, GammaResult};
use crate::foundation::math::{div_alpha_u8, mul_div255_u8};

pub use kurbo::{Point, Rect};

/// Packed straight-alpha ARGB pixel: alpha in the high byte, then red, green, blue.
pub type Argb32 = u32;

/// Fully transparent white, written wherever compositing yields zero alpha.
pub const TRANSPARENT_WHITE: Argb32 = 0x00FF_FFFF;

/// Pack four 8-bit channels into an [`Argb32`].
#[inline]
pub fn argb(a: u8, r: u8, g: u8, b: u8) -> Argb32 {
    (u32::from(a) << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Split an [`Argb32`] into `[a, r, g, b]`.
#[inline]
pub fn argb_channels(px: Argb32) -> [u8; 4] {
    [(px >> 24) as u8, (px >> 16) as u8, (px >> 8) as u8, px as u8]
}

/// Convert straight ARGB to premultiplied ARGB.
pub fn premultiply_argb(px: Argb32) -> Argb32 {
    let [a, r, g, b] = argb_channels(px);
    if a == 0xFF {
        return px;
    }
    argb(
        a,
        mul_div255_u8(r, a),
        mul_div255_u8(g, a),
        mul_div255_u8(b, a),
    )
}

/// Convert premultiplied ARGB to straight ARGB.
///
/// Zero alpha maps to transparent black.
pub fn unpremultiply_argb(px: Argb32) -> Argb32 {
    let [a, r, g, b] = argb_channels(px);
    match a {
        0 => 0,
        0xFF => px,
        _ => argb(a, div_alpha_u8(r, a), div_alpha_u8(g, a), div_alpha_u8(b, a)),
    }
}

/// Grow-only scratch: replaced by a larger buffer when too small, never shrunk.
pub(crate) fn grow_scratch<T: Copy + Default>(buf: &mut Vec<T>, len: usize) -> &mut [T] {
    if buf.len() < len {
        *buf = vec![T::default(); len];
    }
    &mut buf[..len]
}

/// Memory layout of a raster or surface.
///
/// Rasters are always addressed as `u32` words; the byte layouts only describe
/// surfaces whose storage cannot be handed out as packed ints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelLayout {
    /// Packed `0xAARRGGBB`, straight alpha.
    IntArgb,
    /// Packed `0xAARRGGBB`, premultiplied alpha.
    IntArgbPre,
    /// Packed `0x00RRGGBB`, implicitly opaque.
    IntRgb,
    /// Four bytes per pixel in `A, B, G, R` order, straight alpha.
    FourByteAbgr,
    /// Four bytes per pixel in `A, B, G, R` order, premultiplied alpha.
    FourByteAbgrPre,
}

impl PixelLayout {
    /// Return `true` for layouts stored as one `u32` per pixel.
    pub fn is_packed_int(self) -> bool {
        matches!(self, Self::IntArgb | Self::IntArgbPre | Self::IntRgb)
    }

    /// Return `true` for layouts whose color channels are premultiplied.
    pub fn is_premultiplied(self) -> bool {
        matches!(self, Self::IntArgbPre | Self::FourByteAbgrPre)
    }

    /// Return `true` when the compositor can blend onto a surface of this layout.
    pub fn is_composite_target(self) -> bool {
        matches!(
            self,
            Self::IntArgb | Self::IntArgbPre | Self::FourByteAbgr | Self::FourByteAbgrPre
        )
    }
}

/// Integer device-space rectangle `[x, x + w) x [y, y + h)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TileRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub w: u32,
    /// Height in pixels.
    pub h: u32,
}

impl TileRect {
    /// Create a rectangle.
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Smallest pixel-aligned rectangle covering `rect`, clipped to the positive quadrant.
    pub fn covering(rect: Rect) -> Self {
        let r = rect.expand();
        let x0 = r.x0.max(0.0) as u32;
        let y0 = r.y0.max(0.0) as u32;
        let x1 = r.x1.max(0.0) as u32;
        let y1 = r.y1.max(0.0) as u32;
        Self::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }

    /// Exclusive right edge.
    pub fn right(self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Number of pixels covered.
    pub fn area(self) -> usize {
        (self.w as usize) * (self.h as usize)
    }

    /// Return `true` when the rectangle covers no pixels.
    pub fn is_empty(self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Return `true` when `self` lies entirely inside a `width x height` surface.
    pub fn fits_within(self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }

    /// Intersection of two rectangles (empty when disjoint).
    pub fn intersect(self, other: Self) -> Self {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        Self::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }

    /// Walk `self` in `size x size` tiles, left to right then top to bottom.
    ///
    /// Edge tiles are clipped to the rectangle.
    pub fn tiles(self, size: u32) -> GammaResult<TileIter> {
        if size == 0 {
            return Err(GammaError::validation("tile size must be > 0"));
        }
        Ok(TileIter {
            bounds: self,
            size,
            x: self.x,
            y: self.y,
        })
    }
}

/// Raster-order iterator returned by [`TileRect::tiles`].
#[derive(Clone, Debug)]
pub struct TileIter {
    bounds: TileRect,
    size: u32,
    x: u32,
    y: u32,
}

impl Iterator for TileIter {
    type Item = TileRect;

    fn next(&mut self) -> Option<TileRect> {
        if self.bounds.is_empty() || self.y >= self.bounds.bottom() {
            return None;
        }
        let w = self.size.min(self.bounds.right() - self.x);
        let h = self.size.min(self.bounds.bottom() - self.y);
        let tile = TileRect::new(self.x, self.y, w, h);

        self.x += w;
        if self.x >= self.bounds.right() {
            self.x = self.bounds.x;
            self.y += h;
        }
        Some(tile)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
