//! Meridian Test Harness - scenario driving and invariant checking
//!
//! This crate provides:
//! - Structural invariants of a rendered card set
//! - A scenario harness that steps the engine through manual time
//! - A seeded churn simulator mixing zone, settings and clock changes

pub mod churn;
pub mod invariants;
pub mod scenario;

pub use churn::*;
pub use invariants::*;
pub use scenario::*;
