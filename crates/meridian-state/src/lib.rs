//! Meridian State - one card per zone, reconciled every tick
//!
//! This crate implements the card layer:
//! - Card: a zone header with one analog and one digital face
//! - CardSet: create, update in place, and remove cards against the
//!   zone records of a tick

pub mod card;
pub mod reconcile;

pub use card::*;
pub use reconcile::*;
