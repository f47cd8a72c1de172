//! Meridian Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every layer of the clock engine:
//! - Identifiers (NodeId, ZoneId)
//! - Zone records and hand values produced once per tick
//! - Display settings and the events that change them
//! - The engine error type

pub mod id;
pub mod record;
pub mod settings;
pub mod error;

pub use id::*;
pub use record::*;
pub use settings::*;
pub use error::*;
