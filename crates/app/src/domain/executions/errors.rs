//! Executions service errors.

use thiserror::Error;
use wayfarer::executions::ExecutionError;

use crate::{domain::FailureKind, store::StoreError};

#[derive(Debug, Error)]
pub enum ExecutionsServiceError {
    #[error("Execution not found")]
    NotFound,

    #[error("Tour not purchased. Please buy the tour first.")]
    NotPurchased,

    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Terminated(#[from] ExecutionError),

    #[error("Execution was changed concurrently, please retry")]
    StaleExecution,

    #[error("storage error")]
    Storage(#[source] StoreError),
}

impl ExecutionsServiceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound => FailureKind::NotFound,
            Self::Unauthorized => FailureKind::Unauthorized,
            Self::NotPurchased | Self::Terminated(_) => FailureKind::InvalidState,
            Self::StaleExecution => FailureKind::Conflict,
            Self::Storage(_) => FailureKind::PersistenceFailure,
        }
    }
}

impl From<StoreError> for ExecutionsServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::NotFound,
            StoreError::StaleRevision { .. } => Self::StaleExecution,
            StoreError::AlreadyExists | StoreError::Unavailable(_) => Self::Storage(error),
        }
    }
}
