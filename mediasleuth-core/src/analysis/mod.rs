// ============================================================================
// mediasleuth-core/src/analysis/mod.rs
// ============================================================================
//
// ANALYSIS: Per-Clip Checks Built on the Media Scans
//
// KEY COMPONENTS:
// - luma / pixel_strip: one-pixel-per-frame proxy and its luma chunks
// - visual: slate, tail black and content bounds from the chunks
// - text_lines / slate_reader: OCR of the slate and key extraction
// - audio: OP48 and OP59 compliance
// - aspect: aspect ratio naming
//
// AI-ASSISTANT-INFO: Analysis stages used by the inspection pipeline

pub mod aspect;
pub mod audio;
pub mod luma;
pub mod pixel_strip;
pub mod slate_reader;
pub mod text_lines;
pub mod visual;

pub use aspect::{aspect_ratio, describe_aspect_ratio};
pub use audio::{AudioComplianceChecker, AudioStandard, ComplianceVerdict, SilenceLevels};
pub use luma::{LumaChunk, LumaMethod, PixelSample, normalize_chunks, segment_luma_chunks};
pub use pixel_strip::{PixelStrip, PixelStripAnalyzer};
pub use slate_reader::{SlateText, SlateTextReader};
pub use text_lines::{LineBox, TextBox, extract_keys, greatest_bounding_box, reconstruct_lines};
pub use visual::{ContentBounds, VisualFindings, evaluate_chunks};
