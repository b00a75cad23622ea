//! Error taxonomy for command execution.
//!
//! Absence of data (no karma row, no association, empty denomination table)
//! is never an error — those paths return defaults or `Option::None`.
//! [`CommandError`] covers the two failure classes a handler can actually
//! produce: a user typed something malformed, or the store rejected a write.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    /// Malformed command input. The display text is the user-facing reply,
    /// so it is never logged as a system error.
    #[error("{0}")]
    InvalidArgument(String),

    /// The store rejected a statement. Logged; the handler decides whether
    /// to still answer the user.
    #[error("store operation failed: {0}")]
    Store(#[from] rusqlite::Error),

    /// Shared state was unusable (poisoned connection lock). Logged like a
    /// store failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CommandError {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
