//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: field error (bad dimensions, invalid configuration)
//! - 11: I/O error (image load, frame write, config file read)
//! - 12: input error (bad color, bad pointer spec, bad JSON params)
//! - 13: serialization error

use dissolve_core::DissolveError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// A field-level error (bad dimensions, invalid configuration).
    Field(DissolveError),
    /// An I/O error (image decode, PNG write, config file read).
    Io(String),
    /// A user input error (bad color, bad pointer spec, bad JSON params).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Field(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Field(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl From<DissolveError> for CliError {
    fn from(e: DissolveError) -> Self {
        match e {
            DissolveError::Io(msg) => CliError::Io(msg),
            DissolveError::InvalidColor(msg) => CliError::Input(msg),
            other => CliError::Field(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
