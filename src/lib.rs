//! gammapipe is a tile-streamed, gamma-corrected source-over compositor.
//!
//! A rasterizer hands coverage tiles of one shape to a [`TileSequence`]; every
//! covered pixel is blended in linear light through a pair of [`GammaLut`] tables
//! and written back to a [`DestinationSurface`]:
//!
//! - Build a [`TileContext`] (one per worker thread)
//! - [`TileContext::start_sequence`] with a surface, a [`Paint`] and a [`Composite`]
//! - Call `render_tile` / `skip_tile` for each tile, then `end`
//!
//! Gamma and the correction toggle come from [`CompositeConfig`].
#![forbid(unsafe_code)]

mod config;
mod foundation;

pub(crate) mod blend;
pub(crate) mod gamma;
pub(crate) mod paint;
pub(crate) mod pipe;
pub(crate) mod raster;

pub use crate::config::{CompositeConfig, DEFAULT_GAMMA, GAMMA_CORRECTION_ENV, GAMMA_ENV};
pub use crate::foundation::core::{
    Argb32, PixelLayout, Point, Rect, TRANSPARENT_WHITE, TileIter, TileRect, argb, argb_channels,
    premultiply_argb, unpremultiply_argb,
};
pub use crate::foundation::error::{GammaError, GammaResult};
pub use crate::foundation::math::{MAX_COLORS_8, MAX_COLORS_16};

pub use crate::blend::context::{BlendingContext, Source};
pub use crate::blend::mode::{BlendComposite, BlendMode, Composite, CompositeRule, Pixel16};
pub use crate::gamma::lut::GammaLut;
pub use crate::paint::gradient::LinearGradient;
pub use crate::paint::texture::TexturePaint;
pub use crate::paint::{Paint, PaintSource};
pub use crate::pipe::parallel::{FillJob, ParallelOpts, ParallelRunner, run_parallel};
pub use crate::pipe::sequence::{SequenceStats, TileContext, TileSequence};
pub use crate::raster::surface::{DestinationSurface, Surface};
pub use crate::raster::tile::{Raster, RasterMut};
