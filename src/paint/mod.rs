//! Paint sources sampled per tile.
//!
//! Solid colors never go through a sampler; everything else implements
//! [`PaintSource`]. A sampler's resources are released when it is dropped, which
//! the tile sequence does when it ends.

pub(crate) mod gradient;
pub(crate) mod texture;

use crate::foundation::core::{Argb32, TileRect};
use crate::foundation::error::GammaResult;
use crate::raster::tile::Raster;

/// Produces straight-ARGB source pixels for device-space rectangles.
pub trait PaintSource: Send {
    /// Pixels for `rect`, as a [`PixelLayout::IntArgb`](crate::PixelLayout::IntArgb)
    /// raster of at least `rect.w x rect.h`.
    ///
    /// The raster may borrow an internal buffer reused across calls.
    fn raster(&mut self, rect: TileRect) -> GammaResult<Raster<'_>>;
}

/// Paint of one fill or stroke.
pub enum Paint {
    /// A constant straight ARGB color.
    Solid(Argb32),
    /// A per-tile sampler.
    Source(Box<dyn PaintSource>),
}

impl Paint {
    /// Wrap a sampler.
    pub fn source(src: impl PaintSource + 'static) -> Self {
        Self::Source(Box::new(src))
    }

    /// Return `true` for a solid color with full alpha.
    pub fn is_opaque_solid(&self) -> bool {
        matches!(self, Self::Solid(c) if c >> 24 == 0xFF)
    }
}

impl std::fmt::Debug for Paint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Solid(c) => write!(f, "Solid({c:#010x})"),
            Self::Source(_) => f.write_str("Source(..)"),
        }
    }
}

impl From<Argb32> for Paint {
    fn from(c: Argb32) -> Self {
        Self::Solid(c)
    }
}
