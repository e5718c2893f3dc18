//! Wayfarer application services, operation boundary and walk simulation.

pub mod api;
pub mod config;
pub mod context;
pub mod domain;
pub mod fixtures;
pub mod observability;
pub mod simulation;
pub mod store;

#[cfg(test)]
mod test;
