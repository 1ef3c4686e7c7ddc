//! Error types for orbitframe

use thiserror::Error;

/// Main error type for orbitframe operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A load was superseded by a newer one. Never surfaced to callers of
    /// `set_source`; loaders may return it when they notice cancellation.
    #[error("Load cancelled")]
    LoadCancelled,

    #[error("Failed to load {url}: {source}")]
    LoadFailed {
        url: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Model does not have any animations")]
    AnimationUnavailable,

    #[error("Animation error: {0}")]
    Animation(String),

    #[error("Scene node {0} not found")]
    NodeNotFound(usize),
}

impl Error {
    /// Wrap a loader failure with the url it came from.
    pub fn load_failed(url: impl Into<String>, source: Error) -> Self {
        Error::LoadFailed {
            url: url.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error only signals that a load was superseded.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::LoadCancelled)
    }
}

/// Result type alias for orbitframe operations
pub type Result<T> = std::result::Result<T, Error>;
