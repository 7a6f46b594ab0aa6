//! Configuration structures and constants for the mediasleuth-core library.
//!
//! An [`InspectionConfig`] is built once (from defaults, `MEDIASLEUTH_*`
//! environment overrides, or the builder), validated, and then shared by
//! reference with every stage. Nothing mutates it after construction.

mod audio;
mod builder;
mod detection;
pub mod utils;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use audio::*;
pub use builder::InspectionConfigBuilder;
pub use detection::*;

use crate::error::{CoreError, CoreResult};
use utils::{get_env_path, get_env_string, get_env_usize};

/// Name of the scratch folder created under the system temp directory.
pub const SCRATCH_DIR_NAME: &str = "mediasleuth";

/// Default ffmpeg log level for artifact-producing runs.
pub const DEFAULT_FFMPEG_LOG_LEVEL: &str = "error";

/// Default image container for pixel strips and head frames.
pub const DEFAULT_PROXY_FILETYPE: &str = "png";

/// Container extensions the pipeline inspects.
pub const VIDEO_CONTAINERS: &[&str] = &["mov", "mkv", "mp4", "flv", "mxf", "avi"];

/// cropdetect parameters used by the crop scan.
pub const DEFAULT_CROP_LIMIT: u32 = 72;
pub const DEFAULT_CROP_ROUND: u32 = 16;
pub const DEFAULT_CROP_RESET: u32 = 0;

/// Settings shared by every ffmpeg invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FfmpegSettings {
    /// `-loglevel` passed to runs whose output is an artifact
    pub log_level: String,

    /// Extension of image artifacts (pixel strips, head frames)
    pub proxy_filetype: String,
}

impl Default for FfmpegSettings {
    fn default() -> Self {
        Self {
            log_level: get_env_string(
                "MEDIASLEUTH_FFMPEG_LOG_LEVEL",
                DEFAULT_FFMPEG_LOG_LEVEL.to_string(),
            ),
            proxy_filetype: get_env_string(
                "MEDIASLEUTH_PROXY_FILETYPE",
                DEFAULT_PROXY_FILETYPE.to_string(),
            ),
        }
    }
}

/// Main configuration for an inspection run.
///
/// # Examples
///
/// ```rust
/// use mediasleuth_core::config::InspectionConfigBuilder;
///
/// let config = InspectionConfigBuilder::new()
///     .worker_count(2)
///     .tile_size(256)
///     .slate_keys(["key", "date", "title"])
///     .build()
///     .unwrap();
/// assert_eq!(config.pixel_strip.tile_size, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionConfig {
    /// Root folder for pixel strips and head frames
    pub scratch_root: PathBuf,

    /// Number of pool workers; bounds concurrent external processes
    pub worker_count: usize,

    /// Container extensions accepted for inspection (lowercase)
    pub containers: Vec<String>,

    pub ffmpeg: FfmpegSettings,
    pub pixel_strip: PixelStripSettings,
    pub slate: SlateHeuristics,
    pub slate_reader: SlateReaderSettings,
    pub audio: AudioSettings,
}

impl Default for InspectionConfig {
    fn default() -> Self {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            scratch_root: get_env_path(
                "MEDIASLEUTH_SCRATCH_ROOT",
                std::env::temp_dir().join(SCRATCH_DIR_NAME),
            ),
            worker_count: get_env_usize("MEDIASLEUTH_WORKERS", cpus),
            containers: VIDEO_CONTAINERS.iter().map(|s| s.to_string()).collect(),
            ffmpeg: FfmpegSettings::default(),
            pixel_strip: PixelStripSettings::default(),
            slate: SlateHeuristics::default(),
            slate_reader: SlateReaderSettings::default(),
            audio: AudioSettings::default(),
        }
    }
}

impl InspectionConfig {
    /// Rejects values no inspection could run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.worker_count == 0 {
            return Err(CoreError::Config("worker_count must be at least 1".into()));
        }
        if self.pixel_strip.tile_size == 0 {
            return Err(CoreError::Config("tile_size must be at least 1".into()));
        }
        if !self.pixel_strip.tolerance.is_finite() {
            return Err(CoreError::Config("luma tolerance must be finite".into()));
        }
        if self.ffmpeg.proxy_filetype.trim().is_empty() {
            return Err(CoreError::Config("proxy_filetype must not be empty".into()));
        }
        let (low, high) = self.audio.loudness_bounds();
        if low >= high {
            return Err(CoreError::Config(
                "loudness tolerance must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Whether `extension` (without the dot) names an inspectable container.
    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.containers
            .iter()
            .any(|c| c.eq_ignore_ascii_case(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = InspectionConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.worker_count >= 1);
        assert!(config.accepts_extension("MOV"));
        assert!(!config.accepts_extension("txt"));
    }

    #[test]
    fn test_zero_tile_size_rejected() {
        let mut config = InspectionConfig::default();
        config.pixel_strip.tile_size = 0;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_config_serializes() {
        let config = InspectionConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: InspectionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
