//! Tour Executions

pub mod errors;
pub mod repository;
pub mod service;

pub use errors::ExecutionsServiceError;
pub use service::*;
