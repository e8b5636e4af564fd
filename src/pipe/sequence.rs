//! Per-shape tile sequence.
//!
//! A rasterizer drives one [`TileSequence`] per filled or stroked shape:
//! `start_sequence`, then `need_tile` / `render_tile` / `skip_tile` for every tile
//! of the shape's bounding box, then `end`. The sequence owns the paint sampler for
//! its lifetime and releases it exactly once, on `end` or when dropped early.

use std::sync::Arc;

use crate::blend::context::{BlendingContext, Source};
use crate::blend::mode::{BlendComposite, Composite};
use crate::config::CompositeConfig;
use crate::foundation::core::{Argb32, PixelLayout, TileRect, grow_scratch};
use crate::foundation::error::{GammaError, GammaResult};
use crate::gamma::lut::GammaLut;
use crate::paint::{Paint, PaintSource};
use crate::raster::surface::DestinationSurface;
use crate::raster::tile::RasterMut;

/// Counters reported when a sequence ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SequenceStats {
    /// Tiles passed to `render_tile`.
    pub tiles_rendered: u64,
    /// Tiles reported through `skip_tile`.
    pub tiles_skipped: u64,
    /// Rendered tiles that went through read / compose / write-back.
    pub tiles_staged: u64,
    /// Pixels with non-zero coverage.
    pub pixels_covered: u64,
}

/// Reusable per-worker compositing state.
///
/// Holds the blending context plus the mask and staging buffers. Buffers grow to
/// the largest tile seen and are reused by every later sequence, so one context per
/// thread is enough. A context is not shareable between threads while a sequence
/// is open.
#[derive(Debug)]
pub struct TileContext {
    blending: BlendingContext,
    mask: Vec<u8>,
    staging: Vec<Argb32>,
}

impl Default for TileContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TileContext {
    /// Context using the process-wide lookup tables.
    pub fn new() -> Self {
        Self::with_lut(GammaLut::shared())
    }

    /// Context using explicit lookup tables.
    pub fn with_lut(lut: Arc<GammaLut>) -> Self {
        Self {
            blending: BlendingContext::new(lut),
            mask: Vec::new(),
            staging: Vec::new(),
        }
    }

    /// Context built from `cfg` instead of the process-wide configuration.
    pub fn with_config(cfg: &CompositeConfig) -> GammaResult<Self> {
        Ok(Self::with_lut(cfg.lut()?))
    }

    /// Blending context (lookup tables and scratch rows).
    pub fn blending(&self) -> &BlendingContext {
        &self.blending
    }

    /// Current mask buffer capacity in pixels.
    pub fn mask_capacity(&self) -> usize {
        self.mask.len()
    }

    /// Begin compositing one shape onto `surface`.
    ///
    /// Fails without writing anything when the operator cannot be composited with
    /// gamma correction ([`GammaError::UnsupportedOperator`]) or the surface layout
    /// is not a blend target ([`GammaError::UnsupportedSurface`]). On failure the
    /// paint is dropped immediately.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(bounds = ?bounds, layout = ?surface.layout(), rule = ?composite.rule)
    )]
    pub fn start_sequence<'a>(
        &'a mut self,
        surface: &'a mut dyn DestinationSurface,
        bounds: TileRect,
        paint: Paint,
        composite: Composite,
    ) -> GammaResult<TileSequence<'a>> {
        let resolved = BlendComposite::resolve(&composite, paint.is_opaque_solid())?;

        let layout = surface.layout();
        if !layout.is_composite_target() {
            return Err(GammaError::UnsupportedSurface(layout));
        }

        self.blending.init(&resolved);
        let bounds = bounds.intersect(TileRect::new(0, 0, surface.width(), surface.height()));
        tracing::debug!(
            extra_alpha = resolved.extra_alpha(),
            direct = layout == PixelLayout::IntArgb,
            "tile sequence started"
        );

        let paint = match paint {
            Paint::Solid(c) => SequencePaint::Solid(c),
            Paint::Source(s) => SequencePaint::Sampler(s),
        };
        Ok(TileSequence {
            ctx: self,
            surface,
            bounds,
            composite: resolved,
            paint,
            stats: SequenceStats::default(),
        })
    }
}

enum SequencePaint {
    Solid(Argb32),
    Sampler(Box<dyn PaintSource>),
}

/// An open compositing sequence for one shape.
///
/// Tiles are independent: a failure in one leaves earlier tiles composited and the
/// surface partially rendered; there is no rollback.
pub struct TileSequence<'a> {
    ctx: &'a mut TileContext,
    surface: &'a mut dyn DestinationSurface,
    bounds: TileRect,
    composite: BlendComposite,
    paint: SequencePaint,
    stats: SequenceStats,
}

impl std::fmt::Debug for TileSequence<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileSequence")
            .field("bounds", &self.bounds)
            .field("composite", &self.composite)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl TileSequence<'_> {
    /// Shape bounds clipped to the surface.
    pub fn bounds(&self) -> TileRect {
        self.bounds
    }

    /// Resolved blend formula and extra alpha.
    pub fn composite(&self) -> BlendComposite {
        self.composite
    }

    /// Counters so far.
    pub fn stats(&self) -> SequenceStats {
        self.stats
    }

    /// Whether the sequence wants `rect` rendered. Always `true`.
    pub fn need_tile(&self, _rect: TileRect) -> bool {
        true
    }

    /// Composite the paint through `coverage` into `rect` of the surface.
    ///
    /// Coverage byte `(i, j)` of the tile is `coverage[offset + j * stride + i]`;
    /// `None` means fully covered. `rect` must fit within the surface.
    pub fn render_tile(
        &mut self,
        coverage: Option<&[u8]>,
        offset: usize,
        stride: usize,
        rect: TileRect,
    ) -> GammaResult<()> {
        if rect.is_empty() {
            return Ok(());
        }
        if !rect.fits_within(self.surface.width(), self.surface.height()) {
            return Err(GammaError::validation(format!(
                "tile {rect:?} outside {}x{} surface",
                self.surface.width(),
                self.surface.height()
            )));
        }

        let Self {
            ctx,
            surface,
            paint,
            stats,
            ..
        } = self;
        let TileContext {
            blending,
            mask,
            staging,
        } = &mut **ctx;

        let mask = expand_coverage(mask, coverage, offset, stride, rect)?;
        let covered = mask.iter().filter(|&&m| m != 0).count() as u64;

        let src = match paint {
            SequencePaint::Solid(c) => Source::Solid(*c),
            SequencePaint::Sampler(p) => Source::Raster(p.raster(rect)?),
        };

        let staged = match surface.writable_tile(rect) {
            Some(mut out) => {
                blending.compose(src, None, &mut out, Some(mask))?;
                false
            }
            None => {
                let buf = grow_scratch(staging, rect.area());
                surface.read_tile(rect, buf);
                let mut out = RasterMut::packed(buf, rect.w, rect.h, PixelLayout::IntArgb)?;
                blending.compose(src, None, &mut out, Some(mask))?;
                surface.write_tile(rect, buf, Some(mask));
                true
            }
        };

        stats.tiles_rendered += 1;
        stats.pixels_covered += covered;
        if staged {
            stats.tiles_staged += 1;
        }
        tracing::trace!(
            x = rect.x,
            y = rect.y,
            w = rect.w,
            h = rect.h,
            covered,
            staged,
            "tile composed"
        );
        Ok(())
    }

    /// Record that the rasterizer found no coverage in `rect`.
    pub fn skip_tile(&mut self, _rect: TileRect) {
        self.stats.tiles_skipped += 1;
    }

    /// Close the sequence, releasing the paint.
    pub fn end(self) -> SequenceStats {
        self.stats
    }
}

impl Drop for TileSequence<'_> {
    // the paint sampler is dropped with the sequence's fields right after this
    fn drop(&mut self) {
        tracing::debug!(
            tiles_rendered = self.stats.tiles_rendered,
            tiles_skipped = self.stats.tiles_skipped,
            tiles_staged = self.stats.tiles_staged,
            pixels_covered = self.stats.pixels_covered,
            "tile sequence ended"
        );
    }
}

/// Copy the strided coverage of `rect` into a tightly packed mask, or fill it with
/// full coverage.
fn expand_coverage<'m>(
    buf: &'m mut Vec<u8>,
    coverage: Option<&[u8]>,
    offset: usize,
    stride: usize,
    rect: TileRect,
) -> GammaResult<&'m [u8]> {
    let w = rect.w as usize;
    let h = rect.h as usize;
    let mask = grow_scratch(buf, w * h);
    let Some(tile) = coverage else {
        mask.fill(0xFF);
        return Ok(mask);
    };

    if stride < w {
        return Err(GammaError::validation(format!(
            "coverage stride {stride} smaller than tile width {w}"
        )));
    }
    let need = (h - 1)
        .checked_mul(stride)
        .and_then(|n| n.checked_add(w))
        .and_then(|n| n.checked_add(offset))
        .ok_or_else(|| GammaError::validation("coverage extent overflow"))?;
    if tile.len() < need {
        return Err(GammaError::validation(format!(
            "coverage has {} bytes, tile needs {need}",
            tile.len()
        )));
    }

    for (j, row) in mask.chunks_exact_mut(w).enumerate() {
        row.copy_from_slice(&tile[offset + j * stride..][..w]);
    }
    Ok(mask)
}

#[cfg(test)]
#[path = "../../tests/unit/pipe/sequence.rs"]
mod tests;
