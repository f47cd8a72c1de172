//! Meridian Time - where clock values come from
//!
//! This crate implements the time side of the engine:
//! - AngleMapper: clock unit to hand rotation
//! - ZoneList: the configured, normalized zone identifiers
//! - TimeSource: per-tick zone records for a zone list

pub mod angle;
pub mod source;
pub mod zones;

pub use angle::*;
pub use source::*;
pub use zones::*;
