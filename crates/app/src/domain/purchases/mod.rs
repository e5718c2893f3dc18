//! Purchases

pub mod errors;
pub mod repository;
pub mod service;
pub mod token;

pub use errors::PurchasesServiceError;
pub use service::*;
