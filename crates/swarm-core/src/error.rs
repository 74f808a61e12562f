//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `SwarmError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// Errors raised while validating scenario configuration.
///
/// Every variant is a configuration fault: it is reported at initialisation
/// and the simulation refuses to start.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SwarmError {
    #[error("unknown scenario preset {0:?}")]
    UnknownPreset(String),

    #[error("field grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `swarm-core`.
pub type SwarmResult<T> = Result<T, SwarmError>;
