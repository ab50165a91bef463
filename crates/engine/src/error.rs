//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`InvalidExpense`] an expense (or a group) failed validation before any
//!   write. The caller can fix the input and retry.
//! - [`DuplicateParticipant`] a split set or member list repeats an id.
//! - [`InconsistentData`] stored records disagree with each other (an expense
//!   referencing a foreign group or a non-member). Never auto-healed.
//! - [`RepositoryUnavailable`] the store failed transiently; nothing was
//!   committed and the single write may be retried.
//!
//!  [`InvalidExpense`]: EngineError::InvalidExpense
//!  [`DuplicateParticipant`]: EngineError::DuplicateParticipant
//!  [`InconsistentData`]: EngineError::InconsistentData
//!  [`RepositoryUnavailable`]: EngineError::RepositoryUnavailable
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),
    #[error("Duplicate participant: {0}")]
    DuplicateParticipant(String),
    #[error("Inconsistent data: {0}")]
    InconsistentData(String),
    #[error("Repository unavailable: {0}")]
    RepositoryUnavailable(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

impl EngineError {
    /// Returns `true` when retrying the same call may succeed.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::RepositoryUnavailable(_))
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidExpense(a), Self::InvalidExpense(b)) => a == b,
            (Self::DuplicateParticipant(a), Self::DuplicateParticipant(b)) => a == b,
            (Self::InconsistentData(a), Self::InconsistentData(b)) => a == b,
            (Self::RepositoryUnavailable(a), Self::RepositoryUnavailable(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            _ => false,
        }
    }
}
