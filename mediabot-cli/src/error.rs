// ============================================================================
// mediabot-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// The CLI reports failures through the core error type; this module only
// adds context to local I/O errors.

use mediabot_core::{CoreError, CoreResult};
use std::fmt;
use std::io;

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Adds a message to an I/O error while keeping its kind.
pub trait IoContext<T> {
    fn io_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C;
}

impl<T> IoContext<T> for io::Result<T> {
    fn io_context<C, F>(self, f: F) -> CliResult<T>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| CoreError::Io(io::Error::new(e.kind(), format!("{}: {}", f(), e))))
    }
}
