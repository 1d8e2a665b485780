//! Error types
//!
//! Transport and decode failures inside the running loops are logged and
//! swallowed. The variants here surface from setup (`bind`, `subscribe`),
//! from the codec and factory when called directly, and from lifecycle
//! misuse.

use std::io;

use crate::protocol::ContentType;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Socket setup or I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Wire envelope could not be encoded or decoded
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Shape could not be built from a notification
    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),

    /// Operation called in the wrong lifecycle phase
    #[error("invalid state: {0}")]
    State(#[from] StateError),
}

/// Wire codec errors
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Payload is not valid JSON for the expected envelope
    #[error("malformed envelope: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Control request carries an address that does not parse
    #[error("invalid callback address: {0}")]
    InvalidAddress(String),
}

/// Shape factory errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// No creator registered for this content type
    #[error("invalid shape type: {0}")]
    UnknownType(ContentType),

    /// Wrong number of parameters
    #[error("{kind} expects {expected} params, got {actual}")]
    Arity {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A parameter has the wrong JSON type or is out of range
    #[error("{kind} param {index} must be {expected}")]
    InvalidParam {
        kind: &'static str,
        index: usize,
        expected: &'static str,
    },
}

/// Lifecycle ordering errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// `publish` or `subscribe` called while already running
    #[error("already running")]
    AlreadyRunning,

    /// `stop`, `unsubscribe` or similar called when nothing is running
    #[error("not running")]
    NotRunning,

    /// The component was stopped and cannot be restarted
    #[error("already stopped")]
    Stopped,
}
