use std::sync::{Arc, OnceLock};

use crate::config::CompositeConfig;
use crate::foundation::math::{MAX_COLORS_8, MAX_COLORS_16};

static SHARED: OnceLock<Arc<GammaLut>> = OnceLock::new();

/// Forward and inverse gamma lookup tables.
///
/// `dir` maps an 8-bit display value to linear light in `[0, 65025]`; `inv` maps a
/// linear value in `[0, 65025]` back to a display value in the same 16-bit range.
/// Immutable after construction and safe to read from any thread.
pub struct GammaLut {
    gamma: f64,
    dir: [u32; 256],
    inv: Box<[u16]>,
}

impl GammaLut {
    /// Build both tables for `gamma`.
    ///
    /// # Panics
    ///
    /// Panics when `gamma` is not finite or not strictly positive.
    pub fn new(gamma: f64) -> Self {
        assert!(
            gamma.is_finite() && gamma > 0.0,
            "gamma must be finite and > 0, got {gamma}"
        );
        let inv_gamma = 1.0 / gamma;

        // [0; 255] to [0; 65025]
        let max = f64::from(MAX_COLORS_8);
        let scale = f64::from(MAX_COLORS_16);
        let mut dir = [0u32; 256];
        for (i, d) in dir.iter_mut().enumerate() {
            *d = (scale * (i as f64 / max).powf(gamma)).round() as u32;
        }

        // [0; 65025] to [0; 65025]
        let inv: Box<[u16]> = (0..=MAX_COLORS_16)
            .map(|i| (scale * (f64::from(i) / scale).powf(inv_gamma)).round() as u16)
            .collect();

        Self { gamma, dir, inv }
    }

    /// Tables for gamma `1.0`: blending then happens directly on display values.
    pub fn identity() -> Self {
        Self::new(1.0)
    }

    /// Process-wide tables for [`CompositeConfig::global`].
    pub fn shared() -> Arc<GammaLut> {
        SHARED
            .get_or_init(|| {
                let cfg = CompositeConfig::global();
                tracing::debug!(
                    gamma = cfg.gamma,
                    gamma_correction = cfg.gamma_correction,
                    "building shared gamma tables"
                );
                Arc::new(Self::new(cfg.effective_gamma()))
            })
            .clone()
    }

    /// Gamma the tables were built for.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Forward table.
    pub fn dir(&self) -> &[u32; 256] {
        &self.dir
    }

    /// Inverse table, `65026` entries.
    pub fn inv(&self) -> &[u16] {
        &self.inv
    }

    /// Display channel to linear light.
    #[inline]
    pub fn expand(&self, c: u8) -> u32 {
        self.dir[usize::from(c)]
    }

    /// Linear light to a 16-bit display value.
    #[inline]
    pub fn compress(&self, v: u32) -> u32 {
        u32::from(self.inv[v as usize])
    }

    /// Linear light to an 8-bit display channel (truncating).
    #[inline]
    pub fn compress8(&self, v: u32) -> u8 {
        (self.compress(v) / MAX_COLORS_8) as u8
    }
}

impl std::fmt::Debug for GammaLut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GammaLut")
            .field("gamma", &self.gamma)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gamma/lut.rs"]
mod tests;
