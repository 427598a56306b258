//! Engine error types

use thiserror::Error;

use crate::pool::TweenId;

/// Errors surfaced at the configuration and management boundaries.
///
/// Lifecycle misuse (repeating a started tween, negative durations) is not an
/// error: it is either a debug assertion or a logged no-op.
#[derive(Error, Debug)]
pub enum TwineError {
    /// Configuration text could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration parsed but holds unusable values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The id does not name a vended tween (never issued, or back in the pool)
    #[error("Unknown or pooled tween: {0:?}")]
    UnknownTween(TweenId),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, TwineError>;
