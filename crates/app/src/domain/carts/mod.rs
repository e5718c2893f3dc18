//! Carts

pub mod errors;
pub mod repository;
pub mod service;

pub use errors::CartsServiceError;
pub use service::*;
