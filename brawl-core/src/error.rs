//! Errors in the library.
use thiserror::Error;

/// Errors raised by environments.
///
/// Environment methods return [`anyhow::Result`]; these variants are wrapped in it
/// and can be recovered with `err.downcast_ref::<EnvError>()`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvError {
    /// The emulator could not produce a starting frame. Fatal to the session.
    #[error("emulator unavailable: {0}")]
    EmulatorUnavailable(String),

    /// The emulator failed in the middle of an episode.
    #[error("emulator fault: {0}")]
    EmulatorFault(String),

    /// The caller broke the interaction protocol, e.g. stepping a finished episode.
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// The environment was closed.
    #[error("environment is closed")]
    Closed,
}

/// Errors in accessing [`Record`](crate::record::Record).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// Record key error.
    #[error("record key error: {0}")]
    KeyError(String),

    /// Record value type error.
    #[error("record value type error: {0}")]
    ValueTypeError(String),
}
