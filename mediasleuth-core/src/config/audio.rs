//! Audio compliance configuration
//!
//! Thresholds for the OP48 and OP59 delivery checks.

use serde::{Deserialize, Serialize};

use super::utils::*;

/// Whole-clip peak must stay below this level (dB).
pub const DEFAULT_PEAK_CEILING_DB: f64 = -9.0;

/// Window max volume must be below this level to count as silent (dB).
pub const DEFAULT_SILENCE_THRESHOLD_DB: f64 = -50.0;

/// Frames at each end of the content checked for silence.
pub const DEFAULT_GUARD_FRAMES: u32 = 12;

/// Frames added to the start of the end window.
pub const DEFAULT_END_NUDGE_FRAMES: f64 = 1.0;

/// Integrated loudness target (LKFS) and the allowed deviation.
pub const DEFAULT_LOUDNESS_TARGET: f64 = -24.0;
pub const DEFAULT_LOUDNESS_TOLERANCE: f64 = 1.0;

/// OP48/OP59 thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    /// OP48 peak ceiling in dB
    pub peak_ceiling_db: f64,

    /// Silence threshold in dB
    pub silence_threshold_db: f64,

    /// Guard window length in frames
    pub guard_frames: u32,

    /// End window start offset, in frames
    pub end_nudge_frames: f64,

    /// OP59 integrated loudness target
    pub loudness_target: f64,

    /// OP59 exclusive tolerance around the target
    pub loudness_tolerance: f64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            peak_ceiling_db: get_env_f64("MEDIASLEUTH_PEAK_CEILING_DB", DEFAULT_PEAK_CEILING_DB),
            silence_threshold_db: get_env_f64(
                "MEDIASLEUTH_SILENCE_THRESHOLD_DB",
                DEFAULT_SILENCE_THRESHOLD_DB,
            ),
            guard_frames: get_env_u32("MEDIASLEUTH_GUARD_FRAMES", DEFAULT_GUARD_FRAMES),
            end_nudge_frames: get_env_f64("MEDIASLEUTH_END_NUDGE_FRAMES", DEFAULT_END_NUDGE_FRAMES),
            loudness_target: get_env_f64("MEDIASLEUTH_LOUDNESS_TARGET", DEFAULT_LOUDNESS_TARGET),
            loudness_tolerance: get_env_f64(
                "MEDIASLEUTH_LOUDNESS_TOLERANCE",
                DEFAULT_LOUDNESS_TOLERANCE,
            ),
        }
    }
}

impl AudioSettings {
    /// Open interval of acceptable integrated loudness.
    pub fn loudness_bounds(&self) -> (f64, f64) {
        (
            self.loudness_target - self.loudness_tolerance,
            self.loudness_target + self.loudness_tolerance,
        )
    }
}
