//! Domain services

use serde::Serialize;

pub mod carts;
pub mod executions;
pub mod positions;
pub mod purchases;
pub mod tours;

/// Caller-facing classification shared by every service error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotFound,
    Unauthorized,
    InvalidState,
    Conflict,
    PersistenceFailure,
}
