use thiserror::Error;

/// Top-level error type for bandagraph.
#[derive(Debug, Error)]
pub enum GrapherError {
    /// A signature string could not be decoded into a cube.
    #[error("invalid signature {signature:?}: {reason}")]
    InvalidSignature {
        signature: String,
        reason: &'static str,
    },

    /// A batch source is missing a required column.
    #[error("batch source is missing required column {0:?}")]
    Schema(String),

    /// The exploration oracle failed or returned malformed data.
    #[error("cube exploration failed: {0}")]
    Explore(String),

    /// The external layout engine failed.
    #[error("layout engine failed: {0}")]
    Layout(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for results using [`GrapherError`].
pub type Result<T> = std::result::Result<T, GrapherError>;
