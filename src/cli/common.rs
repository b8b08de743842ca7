//! Shared CLI plumbing: errors, exit codes, and output helpers.

use crate::services::AirportResolver;
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// Process exit codes used by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed
    Success = 0,
    /// Bad input or rejected settings
    Validation = 1,
    /// File system or parse failure
    Io = 2,
    /// Requested facility, area, or map does not exist
    NotFound = 3,
}

impl ExitCode {
    /// Numeric process exit code.
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Error reported by a CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Exit code to terminate with
    pub kind: ExitCode,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// An I/O or parse failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::Io,
            message: message.into(),
        }
    }

    /// A validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::Validation,
            message: message.into(),
        }
    }

    /// A lookup that found nothing.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::NotFound,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type returned by command handlers.
pub type CliResult<T> = Result<T, CliError>;

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

/// The bundled airport table, with a warning that it only covers a sample.
pub fn bundled_airports() -> &'static AirportResolver {
    let resolver = AirportResolver::bundled();
    warn!(
        "Using the bundled airport sample ({} airports); pass --airports or set paths.airports_file for full coverage",
        resolver.len()
    );
    resolver
}

/// Formats an anyhow error with its context chain on one line.
pub fn describe(error: &anyhow::Error) -> String {
    format!("{error:#}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(CliError::validation("x").kind.code(), 1);
        assert_eq!(CliError::io("x").kind.code(), 2);
        assert_eq!(CliError::not_found("x").kind.code(), 3);
    }

    #[test]
    fn test_describe_keeps_context() {
        let err = anyhow::anyhow!("inner").context("outer");
        assert_eq!(describe(&err), "outer: inner");
        assert_eq!(CliError::io("boom").to_string(), "boom");
    }
}
