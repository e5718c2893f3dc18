//! Positions

pub mod errors;
pub mod repository;
pub mod service;

pub use errors::PositionsServiceError;
pub use service::*;
