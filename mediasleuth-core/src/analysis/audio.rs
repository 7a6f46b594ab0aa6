// ============================================================================
// mediasleuth-core/src/analysis/audio.rs
// ============================================================================
//
// AUDIO COMPLIANCE: OP48 and OP59 Checks
//
// Both checks require silence in a guard window at the head and at the tail
// of the content. OP48 adds a whole-clip peak ceiling, OP59 an integrated
// loudness band. The window arithmetic and the verdict rules are pure
// functions; `AudioComplianceChecker` wires them to the ffmpeg scans.
//
// AI-ASSISTANT-INFO: OP48/OP59 silence windows, peak and loudness verdicts

// ---- External crate imports ----
use serde::Serialize;

// ---- Standard library imports ----
use std::fmt;
use std::path::Path;

// ---- Internal crate imports ----
use crate::analysis::visual::ContentBounds;
use crate::config::AudioSettings;
use crate::error::CoreResult;
use crate::external::FfmpegSpawner;
use crate::media::scans::{ScanWindow, VolumeReport, run_loudness_scan, run_volume_scan};
use crate::utils::format_float;

// ============================================================================
// WINDOWS
// ============================================================================

/// Head and tail guard windows of the content, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuardWindows {
    pub head: ScanWindow,
    pub tail: ScanWindow,
}

/// Computes the guard windows for a content range.
///
/// Head: `[start/fps, (start + guard)/fps)`.
/// Tail: `[(end - guard)/fps + nudge/fps, end/fps)`; the nudge moves the
/// tail window one frame inward by default. A window start before the
/// beginning of the clip is clamped to zero after the nudge is applied.
pub fn guard_windows(start_frame: u64, end_frame: u64, fps: f64, settings: &AudioSettings) -> GuardWindows {
    let guard = f64::from(settings.guard_frames);
    let (start, end) = (start_frame as f64, end_frame as f64);
    GuardWindows {
        head: ScanWindow {
            from: start / fps,
            to: (start + guard) / fps,
        },
        tail: ScanWindow {
            from: ((end - guard + settings.end_nudge_frames) / fps).max(0.0),
            to: end / fps,
        },
    }
}

/// Max volume measured inside each guard window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilenceLevels {
    pub head_max_db: f64,
    pub tail_max_db: f64,
}

// ============================================================================
// VERDICTS
// ============================================================================

/// Which delivery standard a verdict refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AudioStandard {
    Op48,
    Op59,
}

impl fmt::Display for AudioStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioStandard::Op48 => write!(f, "OP48"),
            AudioStandard::Op59 => write!(f, "OP59"),
        }
    }
}

/// Outcome of one compliance check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceVerdict {
    pub standard: AudioStandard,
    pub issues: Vec<String>,
}

impl ComplianceVerdict {
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for ComplianceVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            write!(f, "{}", self.standard)
        } else {
            write!(f, "Not {} - {}", self.standard, self.issues.join(", "))
        }
    }
}

fn silence_issues(levels: &SilenceLevels, settings: &AudioSettings, issues: &mut Vec<String>) {
    // not below the threshold counts as sound
    if levels.head_max_db >= settings.silence_threshold_db {
        issues.push("first frames not silent".to_string());
    }
    if levels.tail_max_db >= settings.silence_threshold_db {
        issues.push("last frames not silent".to_string());
    }
}

/// OP48: whole-clip peak under the ceiling and silent guard windows.
pub fn evaluate_op48(peak_db: f64, levels: &SilenceLevels, settings: &AudioSettings) -> ComplianceVerdict {
    let mut issues = Vec::new();
    if peak_db >= settings.peak_ceiling_db {
        issues.push(format!(
            "audio peaks above {} dB",
            format_float(settings.peak_ceiling_db)
        ));
    }
    silence_issues(levels, settings, &mut issues);
    ComplianceVerdict {
        standard: AudioStandard::Op48,
        issues,
    }
}

/// OP59: integrated loudness strictly inside the band and silent guard windows.
pub fn evaluate_op59(integrated_lkfs: f64, levels: &SilenceLevels, settings: &AudioSettings) -> ComplianceVerdict {
    let mut issues = Vec::new();
    let (low, high) = settings.loudness_bounds();
    if !(low < integrated_lkfs && integrated_lkfs < high) {
        issues.push(format!(
            "loudness outside {} ±{} LKFS bounds",
            format_float(settings.loudness_target),
            format_float(settings.loudness_tolerance)
        ));
    }
    silence_issues(levels, settings, &mut issues);
    ComplianceVerdict {
        standard: AudioStandard::Op59,
        issues,
    }
}

// ============================================================================
// CHECKER
// ============================================================================

/// Runs the scans a compliance check needs.
pub struct AudioComplianceChecker<'a, S> {
    spawner: &'a S,
    settings: &'a AudioSettings,
}

impl<'a, S: FfmpegSpawner> AudioComplianceChecker<'a, S> {
    pub fn new(spawner: &'a S, settings: &'a AudioSettings) -> Self {
        Self { spawner, settings }
    }

    /// Whole-clip volume report. Its max volume is the clip peak.
    pub fn scan_clip(&self, input_path: &Path) -> CoreResult<VolumeReport> {
        run_volume_scan(self.spawner, input_path, None)
    }

    /// Max volume inside the head and tail guard windows.
    pub fn scan_silence(
        &self,
        input_path: &Path,
        bounds: &ContentBounds,
        fps: f64,
    ) -> CoreResult<SilenceLevels> {
        let windows = guard_windows(bounds.start_frame, bounds.end_frame, fps, self.settings);
        let head = run_volume_scan(self.spawner, input_path, Some(windows.head))?;
        let tail = run_volume_scan(self.spawner, input_path, Some(windows.tail))?;
        Ok(SilenceLevels {
            head_max_db: head.max_volume_db(),
            tail_max_db: tail.max_volume_db(),
        })
    }

    /// OP48 given an already measured clip peak.
    pub fn check_op48(
        &self,
        input_path: &Path,
        peak_db: f64,
        bounds: &ContentBounds,
        fps: f64,
    ) -> CoreResult<ComplianceVerdict> {
        let levels = self.scan_silence(input_path, bounds, fps)?;
        let verdict = evaluate_op48(peak_db, &levels, self.settings);
        log::debug!("{}: {} (peak {} dB, {:?})", input_path.display(), verdict, peak_db, levels);
        Ok(verdict)
    }

    pub fn check_op59(
        &self,
        input_path: &Path,
        bounds: &ContentBounds,
        fps: f64,
    ) -> CoreResult<ComplianceVerdict> {
        let loudness = run_loudness_scan(self.spawner, input_path)?;
        for warning in &loudness.warnings {
            log::warn!("{}: {}", input_path.display(), warning);
        }
        let levels = self.scan_silence(input_path, bounds, fps)?;
        let verdict = evaluate_op59(loudness.integrated, &levels, self.settings);
        log::debug!(
            "{}: {} (I {} LKFS, {:?})",
            input_path.display(),
            verdict,
            loudness.integrated,
            levels
        );
        Ok(verdict)
    }
}
