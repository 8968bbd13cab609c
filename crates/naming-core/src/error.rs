//! Error types for the naming game core.

use thiserror::Error;

/// Errors raised while setting up a simulation.
///
/// Once a population has been built, interactions and runs cannot fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A constructor argument was out of range or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl SimError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SimError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
