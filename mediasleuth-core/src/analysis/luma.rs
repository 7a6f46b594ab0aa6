// ============================================================================
// mediasleuth-core/src/analysis/luma.rs
// ============================================================================
//
// LUMA CHUNKS: Segmenting a Per-Frame Luminance Sequence
//
// Every frame of a clip is reduced to one RGB pixel. Consecutive frames
// whose luminance stays within a tolerance of a rolling reference form a
// chunk; a sample outside the band starts a new chunk and becomes the new
// reference. Chunks partition the samples contiguously and in frame order.
//
// KEY COMPONENTS:
// - LumaMethod: weighting used to turn RGB into luminance
// - PixelSample: one frame's pixel and luminance
// - LumaChunk: an ordered run of samples with duration helpers
// - segment_luma_chunks: the single-pass segmentation
// - normalize_chunks: merges short chunks for readable debug output
//
// AI-ASSISTANT-INFO: Pixel strip luminance segmentation

// ---- External crate imports ----
use serde::{Deserialize, Serialize};

// ---- Internal crate imports ----
use crate::utils::format_float;

// ============================================================================
// LUMINANCE
// ============================================================================

/// RGB to luminance weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LumaMethod {
    /// 0.2126 R + 0.7152 G + 0.0722 B
    #[default]
    Rec709,
    /// 0.299 R + 0.587 G + 0.114 B
    Perceived,
    /// sqrt(0.299 R² + 0.587 G² + 0.114 B²)
    Hsp,
}

impl LumaMethod {
    pub fn luma(self, rgb: [u8; 3]) -> f64 {
        let [r, g, b] = rgb.map(f64::from);
        match self {
            LumaMethod::Rec709 => 0.2126 * r + 0.7152 * g + 0.0722 * b,
            LumaMethod::Perceived => 0.299 * r + 0.587 * g + 0.114 * b,
            LumaMethod::Hsp => (0.299 * r * r + 0.587 * g * g + 0.114 * b * b).sqrt(),
        }
    }
}

/// Plain average of the three channels.
pub fn channel_average(rgb: [u8; 3]) -> f64 {
    rgb.iter().map(|&c| f64::from(c)).sum::<f64>() / 3.0
}

/// One frame of the pixel strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSample {
    /// Zero-based frame index
    pub frame: u64,
    /// Tile coordinates in the strip image
    pub x: u32,
    pub y: u32,
    pub rgb: [u8; 3],
    pub luma: f64,
}

impl PixelSample {
    pub fn new(frame: u64, x: u32, y: u32, rgb: [u8; 3], method: LumaMethod) -> Self {
        Self {
            frame,
            x,
            y,
            rgb,
            luma: method.luma(rgb),
        }
    }
}

// ============================================================================
// CHUNKS
// ============================================================================

/// An ordered run of similar-luma samples.
#[derive(Debug, Clone, PartialEq)]
pub struct LumaChunk {
    samples: Vec<PixelSample>,
    fps: f64,
}

impl LumaChunk {
    pub fn new(fps: f64) -> Self {
        Self {
            samples: Vec::new(),
            fps,
        }
    }

    pub fn push(&mut self, sample: PixelSample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[PixelSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first_frame(&self) -> Option<u64> {
        self.samples.first().map(|s| s.frame)
    }

    pub fn last_frame(&self) -> Option<u64> {
        self.samples.last().map(|s| s.frame)
    }

    pub fn first_luma(&self) -> Option<f64> {
        self.samples.first().map(|s| s.luma)
    }

    pub fn average_luma(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().map(|s| s.luma).sum::<f64>() / self.samples.len() as f64
    }

    /// Frame count divided by fps.
    pub fn duration_secs(&self) -> f64 {
        if self.fps > 0.0 {
            self.samples.len() as f64 / self.fps
        } else {
            0.0
        }
    }

    /// Concatenates `other` after `self`.
    pub fn merge(mut self, other: LumaChunk) -> LumaChunk {
        self.samples.extend(other.samples);
        self
    }

    /// `"<avg luma> - <n> frames <s> seconds"`
    pub fn describe(&self) -> String {
        format!(
            "{} - {} frames {} seconds",
            format_float(self.average_luma()),
            self.len(),
            format_float(self.duration_secs())
        )
    }
}

/// Splits `samples` into chunks with the rolling-reference rule.
///
/// The first sample opens a chunk and sets the reference. A sample within
/// `tolerance` of the reference (inclusive) joins the current chunk;
/// otherwise it opens a new chunk and becomes the reference.
pub fn segment_luma_chunks(samples: Vec<PixelSample>, tolerance: f64, fps: f64) -> Vec<LumaChunk> {
    let tolerance = tolerance.abs();
    let mut chunks: Vec<LumaChunk> = Vec::new();
    let mut reference: Option<f64> = None;

    for sample in samples {
        if let (Some(r), Some(current)) = (reference, chunks.last_mut()) {
            if (sample.luma - r).abs() <= tolerance {
                current.push(sample);
                continue;
            }
        }
        reference = Some(sample.luma);
        let mut chunk = LumaChunk::new(fps);
        chunk.push(sample);
        chunks.push(chunk);
    }

    log::trace!("Segmented luma into {} chunk(s)", chunks.len());
    chunks
}

/// Merges runs of chunks shorter than `min_frames` into one chunk each.
/// A long chunk first flushes any staged short chunks, then passes through.
pub fn normalize_chunks(chunks: Vec<LumaChunk>, min_frames: usize) -> Vec<LumaChunk> {
    let mut normalized = Vec::with_capacity(chunks.len());
    let mut staged: Option<LumaChunk> = None;

    for chunk in chunks {
        if chunk.len() < min_frames {
            staged = Some(match staged.take() {
                Some(s) => s.merge(chunk),
                None => chunk,
            });
        } else {
            if let Some(s) = staged.take() {
                normalized.push(s);
            }
            normalized.push(chunk);
        }
    }
    if let Some(s) = staged {
        normalized.push(s);
    }
    normalized
}
