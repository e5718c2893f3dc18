//! Wayfarer
//!
//! Domain core for guided tours: the purchase ledger that gates walking a tour,
//! the execution state machine that tracks a walk, and the proximity check that
//! advances it as the tourist reaches each key point.

pub mod carts;
pub mod executions;
pub mod geo;
pub mod guards;
pub mod ids;
pub mod positions;
pub mod prelude;
pub mod purchases;
pub mod tours;
