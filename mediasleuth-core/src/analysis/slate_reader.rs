// ============================================================================
// mediasleuth-core/src/analysis/slate_reader.rs
// ============================================================================
//
// SLATE TEXT READER: First Frame OCR
//
// The first frame of the clip is cropped by a fixed margin, run through a
// filter chain that makes slate text dark on light, and written to the
// scratch space. The OCR engine reads word boxes from it, the boxes are
// merged into lines and the configured keys are looked up in those lines.
//
// AI-ASSISTANT-INFO: Head frame extraction, OCR and slate key extraction

// ---- External crate imports ----
use ffmpeg_sidecar::command::FfmpegCommand;
use serde::Serialize;

// ---- Standard library imports ----
use std::path::{Path, PathBuf};

// ---- Internal crate imports ----
use crate::analysis::text_lines::{extract_keys, reconstruct_lines};
use crate::config::{FfmpegSettings, SlateReaderSettings};
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegSpawner, OcrEngine, run_to_completion};
use crate::temp_files::{HEAD_FRAME_DIR, ScratchSpace};

/// What was read from a slate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlateText {
    pub lines: Vec<String>,
    /// Every configured key, in configuration order, with its value if found
    pub values: Vec<(String, Option<String>)>,
}

impl SlateText {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }
}

/// The `crop=w:h:x:y` filter removing `margin` pixels from every edge.
pub fn crop_filter(width: u64, height: u64, margin: u32) -> CoreResult<String> {
    let margin = u64::from(margin);
    let inset = margin * 2;
    if inset >= width || inset >= height {
        return Err(CoreError::Config(format!(
            "edge crop of {margin}px leaves nothing of a {width}x{height} frame"
        )));
    }
    Ok(format!(
        "crop={}:{}:{}:{}",
        width - inset,
        height - inset,
        margin,
        margin
    ))
}

pub struct SlateTextReader<'a, S, O> {
    spawner: &'a S,
    ocr: &'a O,
    ffmpeg: &'a FfmpegSettings,
    settings: &'a SlateReaderSettings,
    scratch: &'a ScratchSpace,
}

impl<'a, S: FfmpegSpawner, O: OcrEngine> SlateTextReader<'a, S, O> {
    pub fn new(
        spawner: &'a S,
        ocr: &'a O,
        ffmpeg: &'a FfmpegSettings,
        settings: &'a SlateReaderSettings,
        scratch: &'a ScratchSpace,
    ) -> Self {
        Self {
            spawner,
            ocr,
            ffmpeg,
            settings,
            scratch,
        }
    }

    /// Writes the cropped, filtered first frame and returns its path.
    pub fn extract_head_frame(&self, input_path: &Path, resolution: (u64, u64)) -> CoreResult<PathBuf> {
        let crop = crop_filter(resolution.0, resolution.1, self.settings.edge_crop)?;
        let frame_path = self
            .scratch
            .artifact_path(HEAD_FRAME_DIR, &self.ffmpeg.proxy_filetype)?;

        let mut cmd = FfmpegCommand::new();
        cmd.args(["-ss", "0", "-y", "-loglevel", self.ffmpeg.log_level.as_str()]);
        cmd.input(input_path.to_string_lossy().as_ref());
        cmd.args(["-vf", &format!("{}, {}", crop, self.settings.filter)]);
        cmd.args(["-frames:v", "1"]);
        cmd.output(frame_path.to_string_lossy().as_ref());
        run_to_completion(self.spawner, cmd, "head frame")?;

        log::debug!("Head frame for OCR: {}", frame_path.display());
        Ok(frame_path)
    }

    /// Extracts the head frame, reads it and looks up the configured keys.
    pub fn read(&self, input_path: &Path, resolution: (u64, u64)) -> CoreResult<SlateText> {
        let frame_path = self.extract_head_frame(input_path, resolution)?;
        let words = self.ocr.recognize(&frame_path)?;
        let lines = reconstruct_lines(&words);
        for line in &lines {
            log::debug!("{}: slate line '{}'", input_path.display(), line);
        }
        let values = extract_keys(&lines, &self.settings.keys);
        Ok(SlateText { lines, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_filter() {
        assert_eq!(crop_filter(1920, 1080, 80).unwrap(), "crop=1760:920:80:80");
        assert_eq!(crop_filter(1920, 1080, 0).unwrap(), "crop=1920:1080:0:0");
        assert!(matches!(crop_filter(100, 100, 50), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_slate_text_lookup() {
        let text = SlateText {
            lines: vec!["key ABC".to_string()],
            values: vec![
                ("key".to_string(), Some("ABC".to_string())),
                ("date".to_string(), None),
            ],
        };
        assert_eq!(text.get("key"), Some("ABC"));
        assert_eq!(text.get("date"), None);
        assert_eq!(text.get("title"), None);
    }
}
