//! Carts service errors.

use thiserror::Error;
use wayfarer::carts::CartError;

use crate::{domain::FailureKind, store::StoreError};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("Tour not found")]
    TourNotFound,

    #[error("Cannot add unpublished tour to cart")]
    NotPublished,

    #[error("Tour already in cart")]
    AlreadyInCart,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Cart was changed concurrently, please retry")]
    StaleCart,

    #[error("storage error")]
    Storage(#[source] StoreError),
}

impl CartsServiceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::TourNotFound => FailureKind::NotFound,
            Self::NotPublished | Self::EmptyCart => FailureKind::InvalidState,
            Self::AlreadyInCart | Self::StaleCart => FailureKind::Conflict,
            Self::Storage(_) => FailureKind::PersistenceFailure,
        }
    }
}

impl From<CartError> for CartsServiceError {
    fn from(error: CartError) -> Self {
        match error {
            CartError::NotPublished(_) => Self::NotPublished,
            CartError::AlreadyInCart(_) => Self::AlreadyInCart,
        }
    }
}

impl From<StoreError> for CartsServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::StaleRevision { .. } => Self::StaleCart,
            StoreError::NotFound | StoreError::AlreadyExists | StoreError::Unavailable(_) => {
                Self::Storage(error)
            }
        }
    }
}
