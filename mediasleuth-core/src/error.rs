// ============================================================================
// mediasleuth-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for MediaSleuth Core
//
// This module defines the error types used throughout the core library.
// External tool failures (ffmpeg, ffprobe, tesseract) are funnelled through
// a handful of helper constructors so that every call site reports the tool
// name and the cause in the same shape.
//
// KEY COMPONENTS:
// - CoreError: Main error enum with variants for each failure category
// - CoreResult: Type alias for Result with CoreError
// - Helper functions for creating common process errors
//
// Stage runners catch these errors and turn them into null properties, so
// nothing here is fatal to an inspection on its own.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors produced by the inspection core.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to start {command}: {source}")]
    CommandStart {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed waiting for {command}: {source}")]
    CommandWait {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("ffprobe output could not be parsed: {0}")]
    FfprobeParse(String),

    #[error("Required stream field missing: {0}")]
    MissingField(&'static str),

    #[error("Image decode failed for {path}: {message}")]
    ImageDecode { path: PathBuf, message: String },

    #[error("Required dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("OCR engine unavailable: {0}")]
    OcrUnavailable(String),

    #[error("No inspectable media files found")]
    NoFilesFound,

    #[error("Container not supported for inspection: {0}")]
    UnsupportedContainer(String),

    #[error("Result for a superseded inspection was discarded")]
    StaleResult,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Builds a `CommandStart` error for a process that could not be spawned.
pub fn command_start_error(command: impl Into<String>, source: io::Error) -> CoreError {
    CoreError::CommandStart {
        command: command.into(),
        source,
    }
}

/// Builds a `CommandWait` error for a process whose exit could not be collected.
pub fn command_wait_error(command: impl Into<String>, source: io::Error) -> CoreError {
    CoreError::CommandWait {
        command: command.into(),
        source,
    }
}

/// Builds a `CommandFailed` error for a process that exited unsuccessfully.
pub fn command_failed_error(
    command: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        command: command.into(),
        status,
        stderr: stderr.into(),
    }
}

/// Maps a spawn failure for an optional external tool. A missing binary
/// becomes `OcrUnavailable`, anything else a regular start error.
pub fn tool_start_error(command: &str, source: io::Error) -> CoreError {
    if source.kind() == io::ErrorKind::NotFound {
        CoreError::OcrUnavailable(format!("{command} not found on PATH"))
    } else {
        command_start_error(command, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_maps_to_unavailable() {
        let err = tool_start_error("tesseract", io::Error::new(io::ErrorKind::NotFound, "nope"));
        assert!(matches!(err, CoreError::OcrUnavailable(_)));

        let err = tool_start_error(
            "tesseract",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, CoreError::CommandStart { .. }));
    }

    #[test]
    fn test_error_messages_name_the_command() {
        let err = command_start_error("ffprobe", io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(err.to_string(), "Failed to start ffprobe: boom");
    }
}
