// ============================================================================
// mediabot-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for mediabot-core
//
// This module defines the error taxonomy of the resolution pipeline. Recoverable
// outcomes (an unsupported hosting domain, a specialized-extractor miss) are not
// errors at all: they surface as `Ok(None)` from the pipeline. Everything below
// is a hard failure that propagates to the caller.
//
// KEY COMPONENTS:
// - CoreError: Main error enum with variants per failure class
// - CoreResult: Type alias for Result with CoreError
// - Helper functions for subprocess errors

use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors produced by the resolution-and-download pipeline.
#[derive(Error, Debug)]
pub enum CoreError {
    // ---- Fetch failures ----
    #[error("Request to '{url}' failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to '{url}' returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected payload: {0}")]
    InvalidPayload(String),

    // ---- Extraction / normalization ----
    #[error("Specialized extraction failed: {0}")]
    Extraction(String),

    #[error("Normalization failed: {0}")]
    Normalization(String),

    // ---- Subprocess plumbing ----
    #[error("Required external command '{0}' not found")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed waiting for command '{0}': {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("Command '{0}' failed with status {1}. Stderr: {2}")]
    CommandFailed(String, ExitStatus, String),

    // ---- Model / configuration ----
    #[error("Invalid media descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CoreError {
    /// True for errors caused by the remote source rather than the local
    /// environment (network errors, non-2xx responses, malformed listings).
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            CoreError::Fetch { .. }
                | CoreError::HttpStatus { .. }
                | CoreError::Json(_)
                | CoreError::InvalidPayload(_)
        )
    }
}

/// Result type for mediabot-core operations
pub type CoreResult<T> = Result<T, CoreError>;

// ---- Helper functions ----

/// Maps a spawn error, turning `NotFound` into `DependencyNotFound`.
pub fn command_start_error(cmd: impl Into<String>, error: io::Error) -> CoreError {
    let cmd = cmd.into();
    if error.kind() == io::ErrorKind::NotFound {
        CoreError::DependencyNotFound(cmd)
    } else {
        CoreError::CommandStart(cmd, error)
    }
}

pub fn command_wait_error(cmd: impl Into<String>, error: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), error)
}

pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(cmd.into(), status, stderr.into())
}
