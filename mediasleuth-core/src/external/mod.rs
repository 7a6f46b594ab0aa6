// ============================================================================
// mediasleuth-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg, ffprobe and tesseract
//
// This module encapsulates every process the inspection pipeline spawns.
// Each tool sits behind a trait so the stages can be driven by mocks in
// tests and by the real binaries in production.
//
// KEY COMPONENTS:
// - FfmpegSpawner / FfmpegProcess: ffmpeg via ffmpeg-sidecar
// - FfprobeExecutor: stream metadata via the ffprobe binary
// - OcrEngine: word boxes via the tesseract binary
// - MediaTools: the bundle of all three handed to the pipeline
// - Dependency checking functions
//
// DESIGN PHILOSOPHY:
// Dependency injection through generics. `MediaTools` is generic over the
// three seams so production code pays no dynamic dispatch.
//
// AI-ASSISTANT-INFO: External tool interactions and abstractions

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult, command_start_error};

// ---- Standard library imports ----
use std::io;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Traits and implementations for executing ffprobe commands
pub mod ffprobe_executor;

/// Traits and implementations for running OCR
pub mod ocr_executor;

/// Test doubles for the traits above
#[cfg(unix)]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg_executor::{
    FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner, collect_log_lines,
    run_to_completion,
};
pub use ffprobe_executor::{CliFfprobeExecutor, FfprobeExecutor};
pub use ocr_executor::{OcrEngine, TesseractEngine};

// ============================================================================
// TOOL BUNDLE
// ============================================================================

/// The three process seams one inspection needs.
#[derive(Debug, Clone, Default)]
pub struct MediaTools<S, P, O> {
    pub ffmpeg: S,
    pub ffprobe: P,
    pub ocr: O,
}

/// Tools backed by the real binaries on `PATH`.
pub type SystemTools = MediaTools<SidecarSpawner, CliFfprobeExecutor, TesseractEngine>;

impl<S, P, O> MediaTools<S, P, O>
where
    S: FfmpegSpawner,
    P: FfprobeExecutor,
    O: OcrEngine,
{
    pub fn new(ffmpeg: S, ffprobe: P, ocr: O) -> Self {
        Self {
            ffmpeg,
            ffprobe,
            ocr,
        }
    }
}

impl SystemTools {
    pub fn system() -> Self {
        Self::default()
    }
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks if an external command is available and executable.
///
/// Runs `cmd_name version_arg` with output discarded. A missing binary is
/// reported as `CoreError::DependencyNotFound`.
pub fn check_dependency(cmd_name: &str, version_arg: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg(version_arg)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
            Err(command_start_error(cmd_name, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dependency() {
        let err = check_dependency("mediasleuth-surely-missing-tool", "-version").unwrap_err();
        assert!(matches!(err, CoreError::DependencyNotFound(_)));
    }
}
