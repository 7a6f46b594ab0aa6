//! ffprobe integration for stream metadata.
//!
//! ffprobe is run directly with JSON output and parsed into
//! [`StreamMetadata`]; every optional field the stages read degrades to
//! `None` instead of failing the whole probe.

use crate::error::{CoreResult, command_failed_error, command_start_error};
use crate::media::metadata::StreamMetadata;
use crate::utils::log_command;
use std::path::Path;
use std::process::Command;

/// Trait for anything that can produce stream metadata for a file.
pub trait FfprobeExecutor: Send + Sync {
    fn probe(&self, input_path: &Path) -> CoreResult<StreamMetadata>;
}

/// Production executor invoking the `ffprobe` binary.
#[derive(Debug, Clone)]
pub struct CliFfprobeExecutor {
    program: String,
}

impl Default for CliFfprobeExecutor {
    fn default() -> Self {
        Self {
            program: "ffprobe".to_string(),
        }
    }
}

impl CliFfprobeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a specific ffprobe binary instead of the one on `PATH`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl FfprobeExecutor for CliFfprobeExecutor {
    fn probe(&self, input_path: &Path) -> CoreResult<StreamMetadata> {
        let mut cmd = Command::new(&self.program);
        cmd.args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(input_path);

        log_command(&cmd);

        let output = cmd
            .output()
            .map_err(|e| command_start_error(self.program.as_str(), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            log::error!(
                "ffprobe failed for {}: {} {}",
                input_path.display(),
                output.status,
                stderr
            );
            return Err(command_failed_error(self.program.as_str(), output.status, stderr));
        }

        let metadata = StreamMetadata::from_json(&String::from_utf8_lossy(&output.stdout))?;
        log::debug!(
            "Probed {}: {} stream(s), fps={:?}, frames={:?}",
            input_path.display(),
            metadata.streams.len(),
            metadata.fps(),
            metadata.frame_count()
        );
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_missing_binary_is_a_start_error() {
        let executor = CliFfprobeExecutor::with_program("mediasleuth-no-such-ffprobe");
        let err = executor.probe(Path::new("clip.mov")).unwrap_err();
        assert!(matches!(err, CoreError::CommandStart { .. }));
    }
}
