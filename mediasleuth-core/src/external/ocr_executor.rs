//! OCR integration for slate text.
//!
//! Runs `tesseract <image> stdout tsv` and turns the word rows of the TSV
//! report into [`TextBox`] values. A missing binary surfaces as
//! `CoreError::OcrUnavailable` so callers can tell it apart from a failed run.

use crate::analysis::text_lines::TextBox;
use crate::error::{CoreResult, command_failed_error, tool_start_error};
use crate::utils::log_command;
use std::path::Path;
use std::process::Command;

/// Trait for anything that can read word boxes from an image.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image_path: &Path) -> CoreResult<Vec<TextBox>>;
}

/// Production engine invoking the `tesseract` binary.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    program: String,
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self {
            program: "tesseract".to_string(),
        }
    }
}

impl TesseractEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image_path: &Path) -> CoreResult<Vec<TextBox>> {
        let mut cmd = Command::new(&self.program);
        cmd.arg(image_path).args(["stdout", "tsv"]);
        log_command(&cmd);

        let output = cmd
            .output()
            .map_err(|e| tool_start_error(&self.program, e))?;
        if !output.status.success() {
            return Err(command_failed_error(
                self.program.as_str(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let boxes = parse_tsv(&String::from_utf8_lossy(&output.stdout));
        log::debug!("OCR read {} word(s) from {}", boxes.len(), image_path.display());
        Ok(boxes)
    }
}

/// Parses tesseract's TSV report. Rows with empty text are dropped; the
/// column positions are taken from the header line.
pub fn parse_tsv(report: &str) -> Vec<TextBox> {
    let mut lines = report.lines();
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let columns: Vec<&str> = header.split('\t').map(str::trim).collect();
    let position = |name: &str| columns.iter().position(|c| *c == name);

    let (Some(left), Some(top), Some(width), Some(height), Some(text)) = (
        position("left"),
        position("top"),
        position("width"),
        position("height"),
        position("text"),
    ) else {
        log::warn!("OCR report header is missing expected columns: {}", header);
        return Vec::new();
    };

    lines
        .filter_map(|line| {
            let fields: Vec<&str> = line.split('\t').collect();
            let token = fields.get(text)?.trim();
            if token.is_empty() {
                return None;
            }
            let number = |idx: usize| fields.get(idx).and_then(|v| v.trim().parse::<i64>().ok());
            Some(TextBox::new(
                token,
                number(left)?,
                number(top)?,
                number(width)?,
                number(height)?,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    const REPORT: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t1760\t920\t-1\t
5\t1\t1\t1\t1\t1\t40\t10\t60\t5\t91.2\tkey
5\t1\t1\t1\t1\t2\t110\t12\t80\t5\t88.0\tABCD1234
5\t1\t1\t1\t1\t3\t200\t12\t20\t5\t10.0\t
";

    #[test]
    fn test_parse_tsv_skips_empty_tokens() {
        let boxes = parse_tsv(REPORT);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].text, "key");
        assert_eq!((boxes[1].bounds.x, boxes[1].bounds.y), (110, 12));
    }

    #[test]
    fn test_parse_tsv_without_header() {
        assert!(parse_tsv("").is_empty());
        assert!(parse_tsv("foo\tbar\n1\t2").is_empty());
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let engine = TesseractEngine::with_program("mediasleuth-no-such-tesseract");
        let err = engine.recognize(Path::new("frame.png")).unwrap_err();
        assert!(matches!(err, CoreError::OcrUnavailable(_)));
    }
}
