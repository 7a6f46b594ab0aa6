// ============================================================================
// mediasleuth-core/src/analysis/text_lines.rs
// ============================================================================
//
// LINE RECONSTRUCTION: Word Boxes to Text Lines
//
// OCR reports one box per word. Words that share a vertical span belong to
// the same printed line, so each word's box is widened to the greatest
// bounding box over every box it overlaps; the distinct results are the line
// boxes. Every word overlapping a line box is then joined into that line.
//
// Overlap is vertical only and inclusive: two boxes overlap when their
// `[y, y + h]` spans intersect. Line boxes are visited in position order so
// the output never depends on hash order.
//
// AI-ASSISTANT-INFO: OCR word boxes, line box merging and slate key matching

// ---- External crate imports ----
use regex::Regex;
use serde::Serialize;

// ---- Standard library imports ----
use std::collections::BTreeSet;

/// Axis-aligned rectangle in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LineBox {
    // field order gives the (y, x, w, h) sort used for line ordering
    pub y: i64,
    pub x: i64,
    pub w: i64,
    pub h: i64,
}

impl LineBox {
    pub fn new(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self { y, x, w, h }
    }

    /// Inclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        self.y + self.h
    }

    /// True when the vertical spans intersect.
    pub fn overlaps(&self, other: &LineBox) -> bool {
        self.y <= other.bottom() && other.y <= self.bottom()
    }
}

/// One OCR token and where it was read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TextBox {
    pub text: String,
    pub bounds: LineBox,
}

impl TextBox {
    pub fn new(text: impl Into<String>, x: i64, y: i64, w: i64, h: i64) -> Self {
        Self {
            text: text.into(),
            bounds: LineBox::new(x, y, w, h),
        }
    }
}

/// Minimum x and y with maximum w and h over `boxes`.
///
/// Note this is not a geometric union: widths and heights are taken as the
/// largest of the inputs, not extended to cover every right/bottom edge.
pub fn greatest_bounding_box<'a, I>(boxes: I) -> Option<LineBox>
where
    I: IntoIterator<Item = &'a LineBox>,
{
    boxes.into_iter().fold(None, |acc, b| {
        Some(match acc {
            None => *b,
            Some(a) => LineBox::new(a.x.min(b.x), a.y.min(b.y), a.w.max(b.w), a.h.max(b.h)),
        })
    })
}

/// Distinct line boxes for a set of word boxes, in position order.
pub fn line_boxes(words: &[TextBox]) -> Vec<LineBox> {
    let lines: BTreeSet<LineBox> = words
        .iter()
        .filter_map(|word| {
            greatest_bounding_box(
                words
                    .iter()
                    .map(|other| &other.bounds)
                    .filter(|other| word.bounds.overlaps(other)),
            )
        })
        .collect();
    lines.into_iter().collect()
}

/// Rebuilds the text lines of an OCR result.
///
/// Tokens are joined with a single space in OCR order. Identical lines are
/// kept once, first occurrence wins.
pub fn reconstruct_lines(words: &[TextBox]) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line_box in line_boxes(words) {
        let line = words
            .iter()
            .filter(|word| word.bounds.overlaps(&line_box))
            .map(|word| word.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        if !line.is_empty() && !lines.contains(&line) {
            lines.push(line);
        }
    }
    log::trace!("Reconstructed {} line(s) from {} word(s)", lines.len(), words.len());
    lines
}

/// Looks up `<key> <value>` in the reconstructed lines.
///
/// The first matching line wins and the value is trimmed. Keys that match no
/// line come back with `None` so callers can null the related property.
pub fn extract_keys<S: AsRef<str>>(lines: &[String], keys: &[S]) -> Vec<(String, Option<String>)> {
    keys.iter()
        .map(|key| {
            let key = key.as_ref();
            let value = Regex::new(&format!("{} (.+)", regex::escape(key)))
                .ok()
                .and_then(|pattern| {
                    lines.iter().find_map(|line| {
                        pattern
                            .captures(line)
                            .and_then(|caps| caps.get(1))
                            .map(|m| m.as_str().trim().to_string())
                    })
                });
            (key.to_string(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_symmetric() {
        let boxes = [
            LineBox::new(0, 10, 5, 5),
            LineBox::new(50, 12, 5, 5),
            LineBox::new(0, 15, 1, 0),
            LineBox::new(0, 16, 5, 5),
            LineBox::new(0, 100, 5, 5),
        ];
        for a in &boxes {
            for b in &boxes {
                assert_eq!(a.overlaps(b), b.overlaps(a), "{a:?} vs {b:?}");
            }
        }
        // inclusive bottom edge
        assert!(boxes[0].overlaps(&boxes[2]));
        assert!(!boxes[0].overlaps(&boxes[3]));
    }

    #[test]
    fn test_greatest_bounding_box() {
        let boxes = [LineBox::new(40, 12, 10, 4), LineBox::new(10, 20, 3, 9)];
        let merged = greatest_bounding_box(&boxes).unwrap();
        assert_eq!(merged, LineBox::new(10, 12, 10, 9));
        for b in &boxes {
            assert!(merged.x <= b.x && merged.y <= b.y);
            assert!(merged.w >= b.w && merged.h >= b.h);
        }
        assert_eq!(greatest_bounding_box(std::iter::empty::<&LineBox>()), None);
    }

    #[test]
    fn test_two_printed_lines() {
        let words = vec![
            TextBox::new("key", 10, 10, 30, 5),
            TextBox::new("ABC123", 50, 12, 60, 5),
            TextBox::new("date", 10, 100, 40, 5),
            TextBox::new("2024-01-01", 60, 100, 90, 5),
        ];
        let lines = reconstruct_lines(&words);
        assert_eq!(lines, vec!["key ABC123", "date 2024-01-01"]);
    }

    #[test]
    fn test_duplicate_lines_are_dropped() {
        let words = vec![
            TextBox::new("title", 0, 0, 10, 5),
            TextBox::new("title", 0, 0, 10, 5),
        ];
        assert_eq!(reconstruct_lines(&words), vec!["title title"]);
        assert!(reconstruct_lines(&[]).is_empty());
    }

    #[test]
    fn test_extract_keys() {
        let lines = vec![
            "key ABCD 1234 ".to_string(),
            "duration 30s".to_string(),
            "duration 60s".to_string(),
        ];
        let found = extract_keys(&lines, &["key", "duration", "aspect", "a.b"]);
        assert_eq!(
            found,
            vec![
                ("key".to_string(), Some("ABCD 1234".to_string())),
                ("duration".to_string(), Some("30s".to_string())),
                ("aspect".to_string(), None),
                ("a.b".to_string(), None),
            ]
        );
    }
}
