//! Purchases service errors.

use thiserror::Error;

use crate::{domain::FailureKind, store::StoreError};

#[derive(Debug, Error)]
pub enum PurchasesServiceError {
    #[error("storage error")]
    Storage(#[from] StoreError),
}

impl PurchasesServiceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Storage(_) => FailureKind::PersistenceFailure,
        }
    }
}
