//! Positions service errors.

use thiserror::Error;

use crate::{domain::FailureKind, store::StoreError};

#[derive(Debug, Error)]
pub enum PositionsServiceError {
    #[error("Position not found")]
    NotFound,

    #[error("storage error")]
    Storage(#[source] StoreError),
}

impl PositionsServiceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound => FailureKind::NotFound,
            Self::Storage(_) => FailureKind::PersistenceFailure,
        }
    }
}

impl From<StoreError> for PositionsServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::NotFound,
            StoreError::AlreadyExists
            | StoreError::StaleRevision { .. }
            | StoreError::Unavailable(_) => Self::Storage(error),
        }
    }
}
