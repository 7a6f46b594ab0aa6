//! Visual detection configuration
//!
//! Settings for the pixel strip proxy, the slate/black heuristics applied to
//! its luma chunks, and the slate text reader.

use serde::{Deserialize, Serialize};

use super::utils::*;
use crate::analysis::luma::LumaMethod;

/// Default tile edge of the pixel strip image (N in `tile=NxN`).
pub const DEFAULT_TILE_SIZE: u32 = 512;

/// Default luma tolerance for chunk segmentation.
pub const DEFAULT_LUMA_TOLERANCE: f64 = 1.0;

/// Chunks shorter than this many frames are merged when normalizing.
pub const DEFAULT_NORMALIZE_MIN_FRAMES: usize = 24;

/// Default slate chunk length in seconds.
pub const DEFAULT_SLATE_SECONDS: f64 = 8.0;

/// Default black-after-slate chunk length in seconds.
pub const DEFAULT_SLATE_BLACK_SECONDS: f64 = 2.0;

/// Luma below which the last chunk counts as tail black.
pub const DEFAULT_TAIL_BLACK_LUMA: f64 = 5.0;

/// Default pixel margin cropped from each edge before OCR.
pub const DEFAULT_EDGE_CROP: u32 = 80;

/// Filter chain applied to the head frame before OCR.
pub const DEFAULT_SLATE_FILTER: &str =
    "negate, eq=saturation=0:brightness=0.01:gamma=0.2:contrast=1.2, unsharp=5:5:1.5:5:5:0.0";

/// Slate keys searched for by default.
pub const DEFAULT_SLATE_KEYS: &[&str] = &["key", "date", "duration", "aspect"];

/// Pixel strip proxy settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelStripSettings {
    /// Tile edge N; the proxy holds at most N*N frames
    pub tile_size: u32,

    /// Absolute luma tolerance of the rolling reference
    pub tolerance: f64,

    /// Luma weighting applied to each pixel
    pub luma_method: LumaMethod,

    /// Minimum chunk length used when normalizing chunks for the debug log
    pub normalize_min_frames: usize,
}

impl Default for PixelStripSettings {
    fn default() -> Self {
        Self {
            tile_size: get_env_u32("MEDIASLEUTH_TILE_SIZE", DEFAULT_TILE_SIZE),
            tolerance: get_env_f64("MEDIASLEUTH_LUMA_TOLERANCE", DEFAULT_LUMA_TOLERANCE),
            luma_method: LumaMethod::default(),
            normalize_min_frames: get_env_usize(
                "MEDIASLEUTH_NORMALIZE_MIN_FRAMES",
                DEFAULT_NORMALIZE_MIN_FRAMES,
            ),
        }
    }
}

/// Heuristics turning luma chunks into slate, tail black and content bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlateHeuristics {
    /// Rounded duration of the first chunk when a slate is present
    pub slate_seconds: f64,

    /// Rounded duration of the black chunk following the slate
    pub black_after_slate_seconds: f64,

    /// First-sample luma below which the last chunk is tail black
    pub tail_black_luma: f64,
}

impl Default for SlateHeuristics {
    fn default() -> Self {
        Self {
            slate_seconds: get_env_f64("MEDIASLEUTH_SLATE_SECONDS", DEFAULT_SLATE_SECONDS),
            black_after_slate_seconds: get_env_f64(
                "MEDIASLEUTH_SLATE_BLACK_SECONDS",
                DEFAULT_SLATE_BLACK_SECONDS,
            ),
            tail_black_luma: get_env_f64("MEDIASLEUTH_TAIL_BLACK_LUMA", DEFAULT_TAIL_BLACK_LUMA),
        }
    }
}

/// Slate text reader settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlateReaderSettings {
    /// Margin in pixels removed from every edge of the head frame
    pub edge_crop: u32,

    /// ffmpeg filter chain appended after the crop
    pub filter: String,

    /// Keys looked up in the reconstructed lines, in order
    pub keys: Vec<String>,
}

impl Default for SlateReaderSettings {
    fn default() -> Self {
        Self {
            edge_crop: get_env_u32("MEDIASLEUTH_EDGE_CROP", DEFAULT_EDGE_CROP),
            filter: get_env_string("MEDIASLEUTH_SLATE_FILTER", DEFAULT_SLATE_FILTER.to_string()),
            keys: get_env_list("MEDIASLEUTH_SLATE_KEYS", DEFAULT_SLATE_KEYS),
        }
    }
}
