//! Tours service errors.

use thiserror::Error;
use wayfarer::tours::TourError;

use crate::{domain::FailureKind, store::StoreError};

#[derive(Debug, Error)]
pub enum ToursServiceError {
    #[error("Tour not found")]
    TourNotFound,

    #[error("Keypoint not found")]
    KeyPointNotFound,

    #[error("Unauthorized: You don't own this tour")]
    Unauthorized,

    #[error(transparent)]
    InvalidPrice(#[from] TourError),

    #[error("storage error")]
    Storage(#[source] StoreError),
}

impl ToursServiceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::TourNotFound | Self::KeyPointNotFound => FailureKind::NotFound,
            Self::Unauthorized => FailureKind::Unauthorized,
            Self::InvalidPrice(_) => FailureKind::InvalidState,
            Self::Storage(_) => FailureKind::PersistenceFailure,
        }
    }
}

impl From<StoreError> for ToursServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => Self::TourNotFound,
            StoreError::AlreadyExists
            | StoreError::StaleRevision { .. }
            | StoreError::Unavailable(_) => Self::Storage(error),
        }
    }
}
