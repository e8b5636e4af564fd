use crate::foundation::core::PixelLayout;

/// Convenience result type used across gammapipe.
pub type GammaResult<T> = Result<T, GammaError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum GammaError {
    /// The requested composite rule has no gamma-corrected implementation.
    ///
    /// Callers are expected to fall back to a different compositing path.
    #[error("unsupported composite: {0}")]
    UnsupportedOperator(String),

    /// A source or destination raster is not packed 32-bit straight ARGB.
    #[error("unsupported pixel format: {0:?}")]
    UnsupportedPixelFormat(PixelLayout),

    /// The destination surface layout cannot be composited onto.
    #[error("unsupported surface type: {0:?}")]
    UnsupportedSurface(PixelLayout),

    /// Invalid caller-provided geometry, buffers or parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid process configuration (environment, JSON, install order).
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GammaError {
    /// Build a [`GammaError::UnsupportedOperator`] value.
    pub fn unsupported_operator(msg: impl Into<String>) -> Self {
        Self::UnsupportedOperator(msg.into())
    }

    /// Build a [`GammaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GammaError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
