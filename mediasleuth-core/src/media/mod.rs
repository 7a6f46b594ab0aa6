//! Media information and probing module
//!
//! Stream metadata parsed from ffprobe, the ffmpeg signal scans
//! (volume, loudness, crop), and SMPTE timecode arithmetic.

pub mod metadata;
pub mod scans;
pub mod timecode;

// Re-export commonly used types
pub use metadata::{FormatInfo, FrameRate, StreamDescriptor, StreamMetadata};
pub use scans::{
    CropRect, CropScanParams, LoudnessReport, ScanParseWarning, ScanWindow, VolumeReport,
    run_crop_scan, run_loudness_scan, run_volume_scan,
};
pub use timecode::{Timecode, TimecodeError};
