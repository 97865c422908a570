//! Error types for the reactive runtime.
//!
//! The error surface is deliberately small: the runtime itself never fails.
//! The only failures are the ones raised inside an effect's own function,
//! and those propagate synchronously to whatever write or invocation caused
//! the run. Nothing is retried, logged-and-swallowed, or downgraded.

use thiserror::Error;

/// An error raised by (or through) a reactive computation.
#[derive(Debug, Error)]
pub enum ReactiveError {
    /// A failure raised inside an effect's function.
    #[error("effect computation failed: {0}")]
    Computation(String),

    /// An arbitrary caller error carried through the runtime unchanged.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl ReactiveError {
    /// Build a [`ReactiveError::Computation`] from any displayable message.
    pub fn computation(message: impl Into<String>) -> Self {
        Self::Computation(message.into())
    }
}
