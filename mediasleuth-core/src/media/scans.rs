// ============================================================================
// mediasleuth-core/src/media/scans.rs
// ============================================================================
//
// SIGNAL SCANS: volumedetect, ebur128 and cropdetect Passes
//
// Each scan runs ffmpeg once with an analysis filter and a null muxer, then
// scrapes the filter's report out of the log lines. The report text is not
// a stable interface, so every field is parsed on its own: a missing or
// malformed field becomes a default plus a `ScanParseWarning` instead of
// failing the scan. A process that fails to start or exits non-zero is an
// error and is never retried.
//
// AI-ASSISTANT-INFO: ffmpeg analysis passes and their report parsers

// ---- External crate imports ----
use ffmpeg_sidecar::command::FfmpegCommand;
use once_cell::sync::Lazy;
use regex::Regex;

// ---- Standard library imports ----
use std::fmt;
use std::path::Path;

// ---- Internal crate imports ----
use crate::config::{DEFAULT_CROP_LIMIT, DEFAULT_CROP_RESET, DEFAULT_CROP_ROUND};
use crate::error::CoreResult;
use crate::external::{FfmpegSpawner, collect_log_lines};

/// Histogram buckets reported by volumedetect that we keep.
pub const HISTOGRAM_BUCKETS: [u8; 6] = [10, 11, 12, 13, 14, 15];

static LOUDNESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)I:\s*(\S+)").expect("valid loudness regex"));

static CROP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"crop=(\d+):(\d+):(\d+):(\d+)").expect("valid crop regex"));

// ============================================================================
// WARNINGS
// ============================================================================

/// A report field that was missing or malformed and fell back to a default.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanParseWarning {
    pub scan: &'static str,
    pub field: String,
    pub detail: String,
}

impl fmt::Display for ScanParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} scan: field '{}' {}", self.scan, self.field, self.detail)
    }
}

fn warn(scan: &'static str, field: &str, detail: impl Into<String>) -> ScanParseWarning {
    let warning = ScanParseWarning {
        scan,
        field: field.to_string(),
        detail: detail.into(),
    };
    log::warn!("{}", warning);
    warning
}

/// First whitespace-delimited token following `label: ` anywhere in `lines`.
fn labelled_token<'a>(lines: &'a [String], label: &str) -> Option<&'a str> {
    let needle = format!("{label}: ");
    lines.iter().find_map(|line| {
        let start = line.find(&needle)? + needle.len();
        line[start..].split_whitespace().next()
    })
}

// ============================================================================
// VOLUME
// ============================================================================

/// Parsed volumedetect report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeReport {
    pub n_samples: Option<u64>,
    pub mean_volume: Option<f64>,
    pub max_volume: Option<f64>,
    /// `(bucket dB, sample count)` for the buckets present in the report
    pub histogram: Vec<(u8, u64)>,
    pub warnings: Vec<ScanParseWarning>,
}

impl VolumeReport {
    /// Parses the log lines of a volumedetect run.
    pub fn parse(lines: &[String]) -> Self {
        let mut warnings = Vec::new();

        let mut number = |field: &str| -> Option<f64> {
            match labelled_token(lines, field) {
                Some(token) => match token.parse::<f64>() {
                    Ok(v) => Some(v),
                    Err(_) => {
                        warnings.push(warn("volume", field, format!("is not numeric: {token}")));
                        None
                    }
                },
                None => {
                    warnings.push(warn("volume", field, "is missing"));
                    None
                }
            }
        };

        let n_samples = number("n_samples").map(|v| v.max(0.0) as u64);
        let mean_volume = number("mean_volume");
        let max_volume = number("max_volume");

        let histogram = HISTOGRAM_BUCKETS
            .iter()
            .filter_map(|bucket| {
                let token = labelled_token(lines, &format!("histogram_{bucket}db"))?;
                token.parse::<u64>().ok().map(|count| (*bucket, count))
            })
            .collect();

        Self {
            n_samples,
            mean_volume,
            max_volume,
            histogram,
            warnings,
        }
    }

    /// Max volume in dB, 0 dB when the report had none.
    pub fn max_volume_db(&self) -> f64 {
        self.max_volume.unwrap_or(0.0)
    }

    pub fn mean_volume_db(&self) -> f64 {
        self.mean_volume.unwrap_or(0.0)
    }
}

/// Time window in seconds, `from` inclusive, `to` exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanWindow {
    pub from: f64,
    pub to: f64,
}

/// Runs volumedetect over the whole file or over `window`.
pub fn run_volume_scan<S: FfmpegSpawner>(
    spawner: &S,
    input_path: &Path,
    window: Option<ScanWindow>,
) -> CoreResult<VolumeReport> {
    let mut cmd = FfmpegCommand::new();
    if let Some(window) = window {
        cmd.args(["-ss", &format!("{:.6}", window.from)]);
        cmd.args(["-to", &format!("{:.6}", window.to)]);
    }
    cmd.input(input_path.to_string_lossy().as_ref());
    cmd.args(["-af", "volumedetect", "-vn", "-sn", "-f", "null"]);
    cmd.output("-");

    let lines = collect_log_lines(spawner, cmd, "volume scan")?;
    let report = VolumeReport::parse(&lines);
    log::debug!(
        "Volume scan of {} ({:?}): max={:?} mean={:?}",
        input_path.display(),
        window,
        report.max_volume,
        report.mean_volume
    );
    Ok(report)
}

// ============================================================================
// LOUDNESS
// ============================================================================

/// Parsed ebur128 summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoudnessReport {
    /// Integrated loudness in LKFS; 0 when the report was unusable
    pub integrated: f64,
    pub warnings: Vec<ScanParseWarning>,
}

impl LoudnessReport {
    /// Uses the last `I:` line, which is the final summary of the filter.
    pub fn parse(lines: &[String]) -> Self {
        let last = lines
            .iter()
            .rev()
            .find_map(|line| LOUDNESS_RE.captures(line).map(|c| c[1].to_string()));

        match last {
            Some(token) => match token.parse::<f64>() {
                Ok(integrated) => Self {
                    integrated,
                    warnings: Vec::new(),
                },
                Err(_) => Self {
                    integrated: 0.0,
                    warnings: vec![warn("loudness", "I", format!("is not numeric: {token}"))],
                },
            },
            None => Self {
                integrated: 0.0,
                warnings: vec![warn("loudness", "I", "is missing")],
            },
        }
    }
}

/// Runs ebur128 over the whole file.
pub fn run_loudness_scan<S: FfmpegSpawner>(
    spawner: &S,
    input_path: &Path,
) -> CoreResult<LoudnessReport> {
    let mut cmd = FfmpegCommand::new();
    cmd.arg("-nostats");
    cmd.input(input_path.to_string_lossy().as_ref());
    cmd.args(["-filter_complex", "ebur128", "-f", "null"]);
    cmd.output("-");

    let lines = collect_log_lines(spawner, cmd, "loudness scan")?;
    let report = LoudnessReport::parse(&lines);
    log::debug!(
        "Loudness scan of {}: I={} LKFS",
        input_path.display(),
        report.integrated
    );
    Ok(report)
}

// ============================================================================
// CROP
// ============================================================================

/// One `crop=W:H:X:Y` suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CropRect {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

/// cropdetect parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropScanParams {
    pub limit: u32,
    pub round: u32,
    pub reset: u32,
}

impl Default for CropScanParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_CROP_LIMIT,
            round: DEFAULT_CROP_ROUND,
            reset: DEFAULT_CROP_RESET,
        }
    }
}

/// Every crop suggestion in the log, in order.
pub fn parse_crop_rects(lines: &[String]) -> Vec<CropRect> {
    lines
        .iter()
        .flat_map(|line| CROP_RE.captures_iter(line))
        .filter_map(|c| {
            Some(CropRect {
                width: c[1].parse().ok()?,
                height: c[2].parse().ok()?,
                x: c[3].parse().ok()?,
                y: c[4].parse().ok()?,
            })
        })
        .collect()
}

/// Runs cropdetect over the whole file. Not used by the default pipeline.
pub fn run_crop_scan<S: FfmpegSpawner>(
    spawner: &S,
    input_path: &Path,
    params: CropScanParams,
) -> CoreResult<Vec<CropRect>> {
    let mut cmd = FfmpegCommand::new();
    cmd.input(input_path.to_string_lossy().as_ref());
    cmd.args([
        "-vf",
        &format!("cropdetect={}:{}:{}", params.limit, params.round, params.reset),
        "-an",
        "-f",
        "null",
    ]);
    cmd.output("-");

    let lines = collect_log_lines(spawner, cmd, "crop scan")?;
    Ok(parse_crop_rects(&lines))
}
