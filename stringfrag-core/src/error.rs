//! Error types for stringfrag-core.

use thiserror::Error;

/// Result type alias for stringfrag operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for stringfrag operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A record index does not exist in the event.
    #[error("particle index {index} out of range for event of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    /// Invalid seed-string parameters.
    #[error("invalid seed string: {0}")]
    InvalidSeed(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Engine boundary error.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Outcome of a failed call into the event-generation engine.
///
/// `Failed` is a per-event condition: the caller skips the iteration and
/// keeps going. `Exhausted` means the source has no further events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The engine could not produce this event.
    #[error("event generation failed: {0}")]
    Failed(String),

    /// The source has no more events to produce.
    #[error("event source exhausted")]
    Exhausted,
}

impl GenerationError {
    /// Returns true if the run can continue with the next event.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}
