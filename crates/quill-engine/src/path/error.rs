use thiserror::Error;

/// Errors raised while preparing path geometry and IDs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    /// Every ID in `1..=MAX_PATH_ID` is in use for the current scene.
    #[error("path ids exhausted ({0} paths already allocated)")]
    IdsExhausted(u32),

    /// Flattening tolerance must be finite and strictly positive.
    #[error("invalid flattening tolerance {0}")]
    BadTolerance(f32),
}
