//! Error types for the Meridian clock engine

use thiserror::Error;

use crate::NodeId;

/// Core Meridian errors
#[derive(Error, Debug)]
pub enum ClockError {
    // Substrate errors
    #[error("Unknown visual node: {0}")]
    UnknownNode(NodeId),

    // Zone errors
    #[error("Unknown time zone: {0}")]
    UnknownZone(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Outer surface errors
    #[error("Server error: {0}")]
    Server(String),
}

/// Result type for Meridian operations
pub type ClockResult<T> = Result<T, ClockError>;
