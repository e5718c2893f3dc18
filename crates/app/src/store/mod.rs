//! Persistence collaborator
//!
//! Each domain declares the repository trait it needs; [`MemoryStore`] implements
//! all of them. Carts and executions are revision-checked on update so that a
//! write based on a stale read is rejected rather than silently overwriting a
//! concurrent change.

use thiserror::Error;

mod memory;

pub use memory::MemoryStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("record already exists")]
    AlreadyExists,

    #[error("stale revision: expected {expected}, found {found}")]
    StaleRevision { expected: u64, found: u64 },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
