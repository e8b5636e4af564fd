//! Gamma-corrected source-over compositing of one tile.
//!
//! Every pixel is gamma-expanded to linear light, premultiplied, blended,
//! un-premultiplied and compressed again. All arithmetic is integer with truncating
//! division; the only floating point lives in the lookup tables.

use std::sync::Arc;

use crate::blend::mode::{BlendComposite, BlendMode, Pixel16};
use crate::foundation::core::{Argb32, PixelLayout, TRANSPARENT_WHITE, grow_scratch};
use crate::foundation::error::{GammaError, GammaResult};
use crate::foundation::math::{MAX_COLORS_8, MAX_COLORS_16};
use crate::gamma::lut::GammaLut;
use crate::raster::tile::{Raster, RasterMut};

/// Source pixels for one compose call.
#[derive(Clone, Copy, Debug)]
pub enum Source<'a> {
    /// The same straight ARGB color for every pixel.
    Solid(Argb32),
    /// A straight ARGB raster at least as large as the destination.
    Raster(Raster<'a>),
}

/// Per-worker compositing engine with reusable scratch rows.
///
/// Rows grow to the widest tile seen and are never shrunk, so a warmed-up context
/// composes without allocating.
#[derive(Debug)]
pub struct BlendingContext {
    lut: Arc<GammaLut>,
    mode: BlendMode,
    extra_alpha: u32,

    src_row: Vec<Argb32>,
    dst_row: Vec<Argb32>,
    mask_row: Vec<u8>,
}

impl BlendingContext {
    /// Create a context blending through `lut`, bound to opaque source-over.
    pub fn new(lut: Arc<GammaLut>) -> Self {
        Self {
            lut,
            mode: BlendMode::SrcOver,
            extra_alpha: MAX_COLORS_8,
            src_row: Vec::new(),
            dst_row: Vec::new(),
            mask_row: Vec::new(),
        }
    }

    /// Re-bind blend formula and extra alpha.
    pub fn init(&mut self, composite: &BlendComposite) {
        self.mode = composite.mode();
        self.extra_alpha = u32::from(composite.extra_alpha());
    }

    /// Lookup tables in use.
    pub fn lut(&self) -> &Arc<GammaLut> {
        &self.lut
    }

    /// Current scratch capacity in pixels.
    pub fn scratch_capacity(&self) -> usize {
        self.dst_row.len()
    }

    /// Current full-coverage mask row capacity in pixels.
    pub fn mask_row_capacity(&self) -> usize {
        self.mask_row.len()
    }

    /// Composite one pixel: `src` over `dst` with coverage `m`.
    pub fn compose_pixel(&self, src: Argb32, dst: Argb32, m: u8) -> Argb32 {
        if m == 0 {
            return dst;
        }
        blend_pixel(&self.lut, self.mode, self.extra_alpha, src, dst, u32::from(m))
    }

    /// Composite `src` over the destination, writing into `dst_out`.
    ///
    /// `dst_in` is the destination to read; `None` reads `dst_out` itself. `coverage`
    /// is tightly packed (`width * height` bytes of `dst_out`); `None` means fully
    /// covered. Pixels with zero coverage keep their destination value bit for bit.
    ///
    /// Fails with [`GammaError::UnsupportedPixelFormat`] before touching any pixel
    /// when a raster is not [`PixelLayout::IntArgb`].
    pub fn compose(
        &mut self,
        src: Source<'_>,
        dst_in: Option<&Raster<'_>>,
        dst_out: &mut RasterMut<'_>,
        coverage: Option<&[u8]>,
    ) -> GammaResult<()> {
        if let Source::Raster(r) = &src {
            check_layout(r.layout())?;
        }
        if let Some(r) = dst_in {
            check_layout(r.layout())?;
        }
        check_layout(dst_out.layout())?;

        let width = dst_out.width();
        let height = dst_out.height();
        if let Source::Raster(r) = &src
            && (r.width() < width || r.height() < height)
        {
            return Err(GammaError::validation(format!(
                "source raster {}x{} smaller than destination {width}x{height}",
                r.width(),
                r.height()
            )));
        }
        if let Some(r) = dst_in
            && (r.width() < width || r.height() < height)
        {
            return Err(GammaError::validation(format!(
                "destination input {}x{} smaller than output {width}x{height}",
                r.width(),
                r.height()
            )));
        }
        let w = width as usize;
        if let Some(cov) = coverage
            && cov.len() < w * height as usize
        {
            return Err(GammaError::validation(format!(
                "coverage tile has {} bytes, need {}",
                cov.len(),
                w * height as usize
            )));
        }

        let Self {
            lut,
            mode,
            extra_alpha,
            src_row,
            dst_row,
            mask_row,
        } = self;
        let (lut, mode, extra_alpha) = (&**lut, *mode, *extra_alpha);

        let src_row = grow_scratch(src_row, w);
        let dst_row = grow_scratch(dst_row, w);
        let full_row: &[u8] = match coverage {
            Some(_) => &[],
            None => {
                let row = grow_scratch(mask_row, w);
                row.fill(0xFF);
                row
            }
        };

        if let Source::Solid(c) = src {
            src_row.fill(c);
        }

        for y in 0..height {
            if let Source::Raster(r) = &src {
                src_row.copy_from_slice(&r.row(y)[..w]);
            }
            match dst_in {
                Some(r) => dst_row.copy_from_slice(&r.row(y)[..w]),
                None => dst_row.copy_from_slice(dst_out.row(y)),
            }
            let mask: &[u8] = match coverage {
                Some(cov) => &cov[y as usize * w..][..w],
                None => full_row,
            };

            for x in 0..w {
                let m = mask[x];
                // zero coverage: result = destination (already in dst_row)
                if m != 0 {
                    dst_row[x] =
                        blend_pixel(lut, mode, extra_alpha, src_row[x], dst_row[x], u32::from(m));
                }
            }
            dst_out.row_mut(y).copy_from_slice(dst_row);
        }
        Ok(())
    }
}

fn check_layout(layout: PixelLayout) -> GammaResult<()> {
    if layout != PixelLayout::IntArgb {
        return Err(GammaError::UnsupportedPixelFormat(layout));
    }
    Ok(())
}

#[inline]
fn blend_pixel(
    lut: &GammaLut,
    mode: BlendMode,
    extra_alpha: u32,
    src: Argb32,
    dst: Argb32,
    m: u32,
) -> Argb32 {
    const NORM_ALPHA: u32 = MAX_COLORS_8 * MAX_COLORS_8;

    // fade operator: coverage and extra alpha folded into the source alpha
    let a_s = ((src >> 24) * m * extra_alpha) / NORM_ALPHA;

    let mut s: Pixel16 = [
        lut.expand((src >> 16) as u8),
        lut.expand((src >> 8) as u8),
        lut.expand(src as u8),
        a_s,
    ];

    // src over dst: factors in [0; 255]
    let fs = MAX_COLORS_8;
    let fd = MAX_COLORS_8 - a_s;

    let mut d: Pixel16 = [0; 4];
    if a_s != MAX_COLORS_8 {
        premultiply(&mut s, a_s);

        let a_d = dst >> 24;
        d = [
            lut.expand((dst >> 16) as u8),
            lut.expand((dst >> 8) as u8),
            lut.expand(dst as u8),
            a_d,
        ];
        if a_d != MAX_COLORS_8 {
            premultiply(&mut d, a_d);
        }
    }

    let res = mode.blend(&s, &d, fs, fd);

    let a_r = res[3];
    if a_r == 0 {
        return TRANSPARENT_WHITE;
    }
    debug_assert!(a_r <= MAX_COLORS_8, "blended alpha out of range: {a_r}");

    let r = lut.compress8(unpremultiply(res[0], a_r));
    let g = lut.compress8(unpremultiply(res[1], a_r));
    let b = lut.compress8(unpremultiply(res[2], a_r));
    (a_r << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

#[inline]
fn premultiply(px: &mut Pixel16, a: u32) {
    px[0] = px[0] * a / MAX_COLORS_8;
    px[1] = px[1] * a / MAX_COLORS_8;
    px[2] = px[2] * a / MAX_COLORS_8;
}

/// Linear-space un-premultiply of a blended channel, clamped to the table range.
#[inline]
fn unpremultiply(c: u32, a: u32) -> u32 {
    if a == MAX_COLORS_8 {
        return c;
    }
    (c * MAX_COLORS_8 / a).min(MAX_COLORS_16)
}

#[cfg(test)]
#[path = "../../tests/unit/blend/context.rs"]
mod tests;
