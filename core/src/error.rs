//! Error types shared by the controller and the adaptors.

use std::io;
use thiserror::Error;

/// Errors surfaced by the keyboard controller.
///
/// Lookups never fail with "not found" (they return the zero sentinel), and
/// activation failures are reported through [`Activation`](crate::Activation).
/// What is left is misconfiguration and lifecycle misuse.
#[derive(Debug, Error)]
pub enum KeyboardError {
    #[error("no applicable adaptor for primary system keyboards could be installed")]
    NoPrimaryAdaptor,

    #[error("keyboard controller used after shutdown")]
    Disposed,

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] io::Error),
}

/// Errors reported by a retrieving adaptor.
///
/// Each adaptor translates its native failures into these variants; nothing
/// subsystem-specific crosses into the controller.
#[derive(Debug, Error)]
pub enum AdaptorError {
    #[error("{0} is not available on this host")]
    Unavailable(String),

    #[error("`{program}` failed ({status}): {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("unknown keyboard '{0}'")]
    UnknownKeyboard(String),

    #[error("unexpected output: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = KeyboardError> = std::result::Result<T, E>;
