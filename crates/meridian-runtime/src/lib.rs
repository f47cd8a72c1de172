//! Meridian Runtime - the periodic driver
//!
//! This crate wires the engine into a running process:
//! 1. Drain settings events queued since the last tick
//! 2. Ask the time source for fresh zone records
//! 3. Reconcile the card set
//! 4. Apply the colon pulse
//! 5. Publish the rendered page

pub mod cli;
pub mod config;
pub mod controller;
pub mod page;
pub mod server;
pub mod telemetry;

pub use cli::*;
pub use config::*;
pub use controller::*;
pub use page::*;
pub use server::*;
pub use telemetry::*;
