//! Process-wide compositing configuration.
//!
//! The display gamma and the gamma-correction toggle are fixed at startup: either
//! installed explicitly with [`CompositeConfig::install`] or read once from the
//! environment by [`CompositeConfig::global`].

use std::sync::{Arc, OnceLock};

use crate::foundation::error::{GammaError, GammaResult};
use crate::gamma::lut::GammaLut;

/// Environment variable overriding [`CompositeConfig::gamma`].
pub const GAMMA_ENV: &str = "GAMMAPIPE_GAMMA";
/// Environment variable overriding [`CompositeConfig::gamma_correction`].
pub const GAMMA_CORRECTION_ENV: &str = "GAMMAPIPE_GAMMA_CORRECTION";

/// Standard gamma for current LCD/CRT monitors.
pub const DEFAULT_GAMMA: f64 = 2.2;

static GLOBAL: OnceLock<CompositeConfig> = OnceLock::new();

/// Compositing configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositeConfig {
    /// Display gamma used to build the lookup tables.
    pub gamma: f64,
    /// When `false`, blending happens directly on display values (identity tables).
    pub gamma_correction: bool,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            gamma_correction: true,
        }
    }
}

impl CompositeConfig {
    /// Defaults overridden by `GAMMAPIPE_GAMMA` / `GAMMAPIPE_GAMMA_CORRECTION`.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(raw) = get(GAMMA_ENV) {
            match raw.trim().parse::<f64>() {
                Ok(g) => cfg.gamma = g,
                Err(_) => tracing::warn!(var = GAMMA_ENV, value = %raw, "ignoring invalid gamma"),
            }
        }
        if let Some(raw) = get(GAMMA_CORRECTION_ENV) {
            match parse_bool(&raw) {
                Some(b) => cfg.gamma_correction = b,
                None => tracing::warn!(
                    var = GAMMA_CORRECTION_ENV,
                    value = %raw,
                    "ignoring invalid gamma correction toggle"
                ),
            }
        }
        cfg
    }

    /// Parse and validate a JSON document; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> GammaResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| GammaError::config(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check that the gamma is usable for table construction.
    pub fn validate(&self) -> GammaResult<()> {
        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(GammaError::config(format!(
                "gamma must be finite and > 0, got {}",
                self.gamma
            )));
        }
        Ok(())
    }

    /// Gamma actually applied by the tables: `1.0` when correction is disabled.
    pub fn effective_gamma(&self) -> f64 {
        if self.gamma_correction {
            self.gamma
        } else {
            1.0
        }
    }

    /// Build the lookup tables described by this configuration.
    pub fn lut(&self) -> GammaResult<Arc<GammaLut>> {
        self.validate()?;
        Ok(Arc::new(GammaLut::new(self.effective_gamma())))
    }

    /// Install the process-wide configuration.
    ///
    /// Fails when the configuration is invalid or a global value is already in use.
    pub fn install(self) -> GammaResult<()> {
        self.validate()?;
        GLOBAL
            .set(self)
            .map_err(|_| GammaError::config("composite config already initialized"))
    }

    /// Process-wide configuration, read from the environment on first use.
    ///
    /// An invalid environment gamma falls back to the defaults.
    pub fn global() -> &'static CompositeConfig {
        GLOBAL.get_or_init(|| {
            let cfg = Self::from_env();
            match cfg.validate() {
                Ok(()) => cfg,
                Err(e) => {
                    tracing::warn!(error = %e, "falling back to default composite config");
                    Self::default()
                }
            }
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
