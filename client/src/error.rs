use std::time::Duration;

use thiserror::Error;
use versus_battle::{AdapterError, Phase, ValidationReport};

use crate::guard::DenialCode;
use crate::retry::RetryError;

/// Errors reported by a [`crate::SnapshotStore`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The document does not exist, or is not visible yet
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store deadline exceeded: {0}")]
    DeadlineExceeded(String),

    /// A conditional write lost against a concurrent writer
    #[error("Write rejected: expected version {expected}, found {actual}")]
    Aborted { expected: u64, actual: u64 },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Request is not authenticated")]
    Unauthenticated,

    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Stable code, as the store spells it
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "not-found",
            StoreError::Unavailable(_) => "unavailable",
            StoreError::DeadlineExceeded(_) => "deadline-exceeded",
            StoreError::Aborted { .. } => "aborted",
            StoreError::PermissionDenied(_) => "permission-denied",
            StoreError::Unauthenticated => "unauthenticated",
            StoreError::Internal(_) => "internal",
        }
    }
}

/// Errors from [`crate::BattleSync`] operations
#[derive(Error, Debug)]
pub enum SyncError {
    /// The guard refused the operation
    #[error("{}", .0.message())]
    Denied(DenialCode),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The caller's deadline expired before the store answered
    #[error("Gave up after {attempts} attempts ({deadline:?} deadline)")]
    TimedOut { attempts: u32, deadline: Duration },

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// The engine returned a state that fails validation
    #[error("Engine produced an invalid state: {0}")]
    InvalidState(ValidationReport),

    #[error("Illegal phase transition from {from} to {to}")]
    IllegalTransition { from: Phase, to: Phase },

    /// Not every participant has chosen yet
    #[error("Waiting for choices from {}", .0.join(", "))]
    ChoicesPending(Vec<String>),

    /// The choice is malformed or names an impossible target
    #[error("Invalid choice: {0}")]
    InvalidChoice(String),
}

impl SyncError {
    /// Denial the user should see, including store-level permission failures
    pub fn denial(&self) -> Option<DenialCode> {
        match self {
            SyncError::Denied(code) => Some(*code),
            SyncError::Store(e) => DenialCode::from_store(e),
            _ => None,
        }
    }
}

impl From<DenialCode> for SyncError {
    fn from(code: DenialCode) -> Self {
        SyncError::Denied(code)
    }
}

impl From<RetryError<StoreError>> for SyncError {
    fn from(e: RetryError<StoreError>) -> Self {
        match e {
            RetryError::Failed(e) => SyncError::Store(e),
            RetryError::TimedOut { attempts, deadline } => SyncError::TimedOut { attempts, deadline },
        }
    }
}
