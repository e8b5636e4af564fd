use crate::foundation::error::{GammaError, GammaResult};
use crate::foundation::math::MAX_COLORS_8;

/// Gamma-expanded, premultiplied working pixel `[r, g, b, a]`.
///
/// Colors lie in `[0, 65025]`, alpha in `[0, 255]`.
pub type Pixel16 = [u32; 4];

/// Porter-Duff rule requested by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeRule {
    Clear,
    Src,
    Dst,
    SrcOver,
    DstOver,
    SrcIn,
    DstIn,
    SrcOut,
    DstOut,
    SrcAtop,
    DstAtop,
    Xor,
}

/// A requested composite: a Porter-Duff rule plus a uniform opacity in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Composite {
    /// Porter-Duff rule.
    pub rule: CompositeRule,
    /// Extra alpha applied on top of per-pixel coverage.
    pub alpha: f32,
}

impl Default for Composite {
    fn default() -> Self {
        Self::src_over()
    }
}

impl Composite {
    /// Create a validated composite.
    pub fn new(rule: CompositeRule, alpha: f32) -> GammaResult<Self> {
        let c = Self { rule, alpha };
        c.validate()?;
        Ok(c)
    }

    /// Opaque source-over.
    pub fn src_over() -> Self {
        Self {
            rule: CompositeRule::SrcOver,
            alpha: 1.0,
        }
    }

    /// Return a copy with a different extra alpha.
    pub fn with_alpha(self, alpha: f32) -> GammaResult<Self> {
        Self::new(self.rule, alpha)
    }

    /// Check that the extra alpha lies in `[0, 1]`.
    pub fn validate(&self) -> GammaResult<()> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(GammaError::validation(format!(
                "composite alpha must be in [0, 1], got {}",
                self.alpha
            )));
        }
        Ok(())
    }

    /// Extra alpha as an 8-bit factor, `round(255 * alpha)`.
    pub fn alpha8(&self) -> u8 {
        (self.alpha * 255.0).round().clamp(0.0, 255.0) as u8
    }
}

/// Blend formula applied to premultiplied linear pixels.
///
/// Adding a Porter-Duff rule means adding a variant here and its formula in
/// [`BlendMode::blend`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    #[default]
    SrcOver,
}

impl BlendMode {
    /// Select the blend formula for a requested rule.
    pub fn for_rule(rule: CompositeRule) -> GammaResult<Self> {
        match rule {
            CompositeRule::SrcOver => Ok(Self::SrcOver),
            other => Err(GammaError::unsupported_operator(format!(
                "no gamma-corrected blender for {other:?}"
            ))),
        }
    }

    /// Combine `src` and `dst` with Porter-Duff weights `fs`, `fd` in `[0, 255]`.
    #[inline]
    pub fn blend(self, src: &Pixel16, dst: &Pixel16, fs: u32, fd: u32) -> Pixel16 {
        match self {
            Self::SrcOver => [
                (src[0] * fs + dst[0] * fd) / MAX_COLORS_8,
                (src[1] * fs + dst[1] * fd) / MAX_COLORS_8,
                (src[2] * fs + dst[2] * fd) / MAX_COLORS_8,
                (src[3] * fs + dst[3] * fd) / MAX_COLORS_8,
            ],
        }
    }
}

/// A resolved composite: the blend formula and the 8-bit extra alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlendComposite {
    mode: BlendMode,
    extra_alpha: u8,
}

impl BlendComposite {
    /// Create a resolved composite directly.
    pub fn new(mode: BlendMode, extra_alpha: u8) -> Self {
        Self { mode, extra_alpha }
    }

    /// Resolve a requested composite.
    ///
    /// `Src` is accepted only when the paint is an opaque solid color and the
    /// composite is fully opaque, since it then paints exactly like source-over.
    pub fn resolve(composite: &Composite, opaque_solid_paint: bool) -> GammaResult<Self> {
        composite.validate()?;
        let rule = match composite.rule {
            CompositeRule::Src if opaque_solid_paint && composite.alpha8() == 0xFF => {
                CompositeRule::SrcOver
            }
            rule => rule,
        };
        Ok(Self {
            mode: BlendMode::for_rule(rule)?,
            extra_alpha: composite.alpha8(),
        })
    }

    /// Selected blend formula.
    pub fn mode(&self) -> BlendMode {
        self.mode
    }

    /// Uniform opacity in `[0, 255]`.
    pub fn extra_alpha(&self) -> u8 {
        self.extra_alpha
    }
}

impl Default for BlendComposite {
    fn default() -> Self {
        Self::new(BlendMode::SrcOver, 0xFF)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blend/mode.rs"]
mod tests;
