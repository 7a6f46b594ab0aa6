// ============================================================================
// mediasleuth-core/src/media/metadata.rs
// ============================================================================
//
// STREAM METADATA: Parsed ffprobe Snapshot
//
// Holds the container format and stream descriptors of one file, parsed
// once from `ffprobe -print_format json -show_format -show_streams`.
// ffprobe reports most numbers as strings and omits fields freely, so every
// optional field is parsed leniently and degrades to `None`.
//
// KEY COMPONENTS:
// - StreamMetadata: format + streams with the accessors the stages need
// - StreamDescriptor: one stream, all optional fields
// - FrameRate: `num/den` fraction as ffprobe prints it
//
// AI-ASSISTANT-INFO: ffprobe JSON model and metadata accessors

// ---- External crate imports ----
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---- Standard library imports ----
use std::collections::HashMap;
use std::fmt;

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ============================================================================
// FRAME RATE
// ============================================================================

/// A frame rate fraction such as `24000/1001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRate {
    pub num: u64,
    pub den: u64,
}

impl FrameRate {
    /// Parses `a/b` or a bare number. `0/0` and unparseable input are `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (num, den) = match text.split_once('/') {
            Some((n, d)) => (n.trim().parse().ok()?, d.trim().parse().ok()?),
            None => (text.parse().ok()?, 1),
        };
        if num == 0 || den == 0 {
            return None;
        }
        Some(Self { num, den })
    }

    pub fn as_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

// ============================================================================
// LENIENT FIELD PARSING
// ============================================================================

/// Accepts a JSON number or a numeric string; anything else is `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Tag values are strings in practice; other JSON scalars are stringified.
fn lenient_tags<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<HashMap<String, Value>>::deserialize(deserializer)?;
    Ok(value
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| {
            let text = match v {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (k, text)
        })
        .collect())
}

// ============================================================================
// STREAMS AND FORMAT
// ============================================================================

/// Container-level information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatInfo {
    #[serde(default)]
    pub format_name: Option<String>,
    #[serde(default)]
    pub format_long_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub bit_rate: Option<u64>,
}

/// One stream as ffprobe describes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    #[serde(default)]
    pub codec_type: Option<String>,
    #[serde(default)]
    pub codec_name: Option<String>,
    #[serde(default)]
    pub codec_long_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub width: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub height: Option<u64>,
    #[serde(default)]
    pub avg_frame_rate: Option<String>,
    #[serde(default)]
    pub r_frame_rate: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub bit_rate: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub bits_per_sample: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub sample_rate: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub nb_frames: Option<u64>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: HashMap<String, String>,
}

impl StreamDescriptor {
    fn is_kind(&self, kind: &str) -> bool {
        self.codec_type.as_deref() == Some(kind)
    }

    /// Average rate, falling back to the nominal rate when the average is
    /// absent or `0/0`.
    pub fn frame_rate(&self) -> Option<FrameRate> {
        self.avg_frame_rate
            .as_deref()
            .and_then(FrameRate::parse)
            .or_else(|| self.r_frame_rate.as_deref().and_then(FrameRate::parse))
    }

    pub fn timecode_tag(&self) -> Option<&str> {
        self.tags
            .get("timecode")
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
    }
}

/// Immutable probe result for one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamMetadata {
    #[serde(default)]
    pub format: FormatInfo,
    #[serde(default)]
    pub streams: Vec<StreamDescriptor>,
}

impl StreamMetadata {
    /// Parses the ffprobe JSON document.
    pub fn from_json(text: &str) -> CoreResult<Self> {
        serde_json::from_str(text).map_err(|e| CoreError::FfprobeParse(e.to_string()))
    }

    pub fn video_stream(&self) -> Option<&StreamDescriptor> {
        self.streams.iter().find(|s| s.is_kind("video"))
    }

    pub fn audio_stream(&self) -> Option<&StreamDescriptor> {
        self.streams.iter().find(|s| s.is_kind("audio"))
    }

    pub fn data_stream(&self) -> Option<&StreamDescriptor> {
        self.streams.iter().find(|s| s.is_kind("data"))
    }

    /// Video frames per second.
    pub fn fps(&self) -> Option<f64> {
        self.video_stream()?.frame_rate().map(|r| r.as_f64())
    }

    /// Video frame count from `nb_frames`.
    pub fn frame_count(&self) -> Option<u64> {
        self.video_stream()?.nb_frames
    }

    /// Video `(width, height)`.
    pub fn resolution(&self) -> Option<(u64, u64)> {
        let video = self.video_stream()?;
        Some((video.width?, video.height?))
    }

    /// Resolution joined with `delimiter`, e.g. `1920x1080`.
    pub fn resolution_string(&self, delimiter: &str) -> Option<String> {
        self.resolution()
            .map(|(w, h)| format!("{w}{delimiter}{h}"))
    }

    /// Start timecode tag of the video stream, falling back to a data (tmcd) stream.
    pub fn start_timecode(&self) -> Option<String> {
        self.video_stream()
            .and_then(StreamDescriptor::timecode_tag)
            .or_else(|| self.data_stream().and_then(StreamDescriptor::timecode_tag))
            .map(String::from)
    }

    /// Container duration in seconds.
    pub fn duration_secs(&self) -> Option<f64> {
        self.format.duration
    }
}
