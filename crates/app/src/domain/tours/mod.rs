//! Tours

pub mod errors;
pub mod repository;
pub mod service;

pub use errors::ToursServiceError;
pub use service::*;
