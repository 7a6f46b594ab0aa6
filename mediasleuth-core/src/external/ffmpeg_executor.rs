// ============================================================================
// mediasleuth-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// This module provides abstractions for spawning and interacting with FFmpeg
// processes. Analysis passes (volumedetect, ebur128, cropdetect) report
// their results only through ffmpeg's log output, so the main helper here
// runs a command to completion while collecting every log line.
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active FFmpeg process
// - FfmpegSpawner: Trait for creating new FFmpeg processes
// - SidecarSpawner: Concrete implementation using ffmpeg-sidecar
// - collect_log_lines / run_to_completion: run helpers used by every stage
//
// AI-ASSISTANT-INFO: FFmpeg process management and execution abstraction

use crate::error::{CoreResult, command_failed_error, command_start_error, command_wait_error};
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::process::ExitStatus;

// --- FFmpeg Execution Abstraction ---

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an FfmpegProcess.
///
/// Spawners are shared by every worker of the inspection pool.
pub trait FfmpegSpawner: Send + Sync {
    type Process: FfmpegProcess;
    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {}", e);
            command_failed_error("ffmpeg (event iterator)", ExitStatus::default(), e.to_string())
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0.wait().map_err(|e| command_wait_error("ffmpeg", e))
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg", e))
    }
}

// --- Run Helpers ---

/// Runs `cmd` to completion and returns every log and error line ffmpeg
/// printed, in order. A non-zero exit is an error carrying the last line.
pub fn collect_log_lines<S: FfmpegSpawner>(
    spawner: &S,
    cmd: FfmpegCommand,
    label: &str,
) -> CoreResult<Vec<String>> {
    log::debug!("Running {} command: {:?}", label, cmd);

    let mut process = spawner.spawn(cmd)?;
    let mut lines = Vec::new();
    process.handle_events(|event| {
        match event {
            FfmpegEvent::Log(_, line) | FfmpegEvent::Error(line) => {
                log::trace!("[{}] {}", label, line);
                lines.push(line);
            }
            _ => {}
        }
        Ok(())
    })?;

    let status = process.wait()?;
    if !status.success() {
        let last = lines.last().cloned().unwrap_or_default();
        log::error!("{} exited with {}: {}", label, status, last);
        return Err(command_failed_error(format!("ffmpeg ({label})"), status, last));
    }
    Ok(lines)
}

/// Runs an artifact-producing command, discarding its log output.
pub fn run_to_completion<S: FfmpegSpawner>(
    spawner: &S,
    cmd: FfmpegCommand,
    label: &str,
) -> CoreResult<()> {
    collect_log_lines(spawner, cmd, label).map(|_| ())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::external::mocks::MockFfmpegSpawner;
    use ffmpeg_sidecar::event::LogLevel;

    #[test]
    fn test_collect_log_lines_keeps_order() {
        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation(
            "volumedetect",
            vec![
                FfmpegEvent::Log(LogLevel::Info, "first".to_string()),
                FfmpegEvent::Error("second".to_string()),
            ],
            false,
        );

        let mut cmd = FfmpegCommand::new();
        cmd.args(["-af", "volumedetect"]);
        let lines = collect_log_lines(&spawner, cmd, "volume scan").unwrap();
        assert_eq!(lines, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_non_zero_exit_is_reported() {
        let spawner = MockFfmpegSpawner::new();
        spawner.add_exit_error_expectation(
            "ebur128",
            vec![FfmpegEvent::Error("No such file".to_string())],
            1,
        );

        let mut cmd = FfmpegCommand::new();
        cmd.args(["-filter_complex", "ebur128"]);
        let err = collect_log_lines(&spawner, cmd, "loudness scan").unwrap_err();
        match err {
            CoreError::CommandFailed { stderr, .. } => assert_eq!(stderr, "No such file"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
