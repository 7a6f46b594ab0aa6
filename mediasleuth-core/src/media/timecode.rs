//! SMPTE timecode arithmetic.
//!
//! A [`Timecode`] is a zero-based frame count at a nominal integer rate.
//! `HH:MM:SS:FF` is non-drop; `HH:MM:SS;FF` (or `.`) at a nominal rate of 30
//! or 60 uses drop-frame numbering.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a timecode string is rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimecodeError {
    #[error("timecode '{0}' is not HH:MM:SS:FF")]
    Malformed(String),

    #[error("timecode '{text}' has a field out of range for {rate} fps")]
    OutOfRange { text: String, rate: u32 },

    #[error("frame rate {0} cannot carry a timecode")]
    InvalidRate(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timecode {
    rate: u32,
    drop_frame: bool,
    frames: u64,
}

/// Nominal integer rate for a (possibly fractional) fps, e.g. 29.97 => 30.
fn nominal_rate(fps: f64) -> Result<u32, TimecodeError> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(TimecodeError::InvalidRate(fps));
    }
    Ok((fps.round() as u32).max(1))
}

fn supports_drop_frame(rate: u32) -> bool {
    rate == 30 || rate == 60
}

impl Timecode {
    /// Parses `HH:MM:SS:FF` at the given fps.
    pub fn parse(text: &str, fps: f64) -> Result<Self, TimecodeError> {
        let rate = nominal_rate(fps)?;
        let trimmed = text.trim();
        let drop_frame = trimmed.contains(';') || trimmed.contains('.');

        let fields: Vec<u64> = trimmed
            .split([':', ';', '.'])
            .map(|f| f.parse::<u64>())
            .collect::<Result<_, _>>()
            .map_err(|_| TimecodeError::Malformed(text.to_string()))?;

        let &[hours, minutes, seconds, frames] = fields.as_slice() else {
            return Err(TimecodeError::Malformed(text.to_string()));
        };
        if minutes >= 60 || seconds >= 60 || frames >= u64::from(rate) {
            return Err(TimecodeError::OutOfRange {
                text: text.to_string(),
                rate,
            });
        }

        let drop_frame = drop_frame && supports_drop_frame(rate);
        let rate64 = u64::from(rate);
        let out_of_range = || TimecodeError::OutOfRange {
            text: text.to_string(),
            rate,
        };
        let mut total = hours
            .checked_mul(3600)
            .and_then(|s| s.checked_add(minutes * 60 + seconds))
            .and_then(|s| s.checked_mul(rate64))
            .and_then(|f| f.checked_add(frames))
            .ok_or_else(out_of_range)?;
        if drop_frame {
            let drop = rate64 / 15;
            total = hours
                .checked_mul(60)
                .and_then(|m| m.checked_add(minutes))
                .and_then(|m| (m - m / 10).checked_mul(drop))
                .and_then(|dropped| total.checked_sub(dropped))
                .ok_or_else(out_of_range)?;
        }

        Ok(Self {
            rate,
            drop_frame,
            frames: total,
        })
    }

    /// Non-drop timecode `frames` frames from zero.
    pub fn from_frames(frames: u64, fps: f64) -> Result<Self, TimecodeError> {
        Ok(Self {
            rate: nominal_rate(fps)?,
            drop_frame: false,
            frames,
        })
    }

    /// Returns the timecode `count` frames later.
    pub fn add_frames(&self, count: u64) -> Self {
        Self {
            frames: self.frames.saturating_add(count),
            ..*self
        }
    }

    pub fn total_frames(&self) -> u64 {
        self.frames
    }

    pub fn rate(&self) -> u32 {
        self.rate
    }

    pub fn is_drop_frame(&self) -> bool {
        self.drop_frame
    }

    /// (hours, minutes, seconds, frames) fields for display.
    fn fields(&self) -> (u64, u64, u64, u64) {
        let rate = u64::from(self.rate);
        let mut frames = self.frames;

        if self.drop_frame {
            let drop = rate / 15;
            let per_ten_minutes = rate * 600 - drop * 9;
            let per_minute = rate * 60 - drop;
            let tens = frames / per_ten_minutes;
            let rem = frames % per_ten_minutes;
            frames = frames.saturating_add(drop * 9 * tens);
            if rem > drop {
                frames = frames.saturating_add(drop * ((rem - drop) / per_minute));
            }
        }

        let ff = frames % rate;
        let total_seconds = frames / rate;
        (
            total_seconds / 3600,
            (total_seconds / 60) % 60,
            total_seconds % 60,
            ff,
        )
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s, ff) = self.fields();
        let sep = if self.drop_frame { ';' } else { ':' };
        write!(f, "{h:02}:{m:02}:{s:02}{sep}{ff:02}")
    }
}
