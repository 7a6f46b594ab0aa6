//! Slate, tail black and content bounds derived from luma chunks.
//!
//! A slate is an 8 second card followed by 2 seconds of black at the head
//! of the clip; tail black is a dark final chunk. Content runs from the
//! first chunk after the slate (or the first chunk) to the last chunk before
//! the tail black (or the last chunk). Every lookup is bounds-checked: when a
//! clip has too few chunks the affected value is `None`.

use serde::Serialize;

use crate::analysis::luma::LumaChunk;
use crate::config::SlateHeuristics;
use crate::media::timecode::Timecode;

/// Frame range of the programme content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContentBounds {
    pub start_frame: u64,
    pub end_frame: u64,
    pub duration_secs: f64,
    pub start_timecode: Option<Timecode>,
}

/// Everything the visual stage derives from the chunks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisualFindings {
    /// `None` when there are not enough chunks to decide
    pub slate: Option<bool>,
    /// Tail black duration in seconds
    pub black_at_tail: Option<f64>,
    pub content: Option<ContentBounds>,
}

/// Whether the first two chunks look like slate + black.
///
/// Durations are rounded to whole seconds with ties to even, so a 2.5 s
/// black gap still counts as 2 s.
pub fn detect_slate(chunks: &[LumaChunk], heuristics: &SlateHeuristics) -> Option<bool> {
    let (first, second) = (chunks.first()?, chunks.get(1)?);
    Some(
        first.duration_secs().round_ties_even() == heuristics.slate_seconds
            && second.duration_secs().round_ties_even() == heuristics.black_after_slate_seconds,
    )
}

/// Duration of the last chunk when its first sample is dark enough.
pub fn detect_tail_black(chunks: &[LumaChunk], heuristics: &SlateHeuristics) -> Option<f64> {
    let last = chunks.last()?;
    let luma = last.first_luma()?;
    (luma < heuristics.tail_black_luma).then(|| last.duration_secs())
}

/// Content bounds given the slate and tail decisions.
pub fn content_bounds(
    chunks: &[LumaChunk],
    has_slate: bool,
    has_tail_black: bool,
    fps: f64,
    start_timecode: Option<Timecode>,
) -> Option<ContentBounds> {
    let start_index = if has_slate { 2 } else { 0 };
    let end_index = if has_tail_black {
        chunks.len().checked_sub(2)?
    } else {
        chunks.len().checked_sub(1)?
    };
    if start_index > end_index || fps <= 0.0 {
        return None;
    }

    let start_frame = chunks.get(start_index)?.first_frame()?;
    let end_frame = chunks.get(end_index)?.last_frame()?;
    if start_frame > end_frame {
        return None;
    }

    Some(ContentBounds {
        start_frame,
        end_frame,
        duration_secs: (end_frame - start_frame + 1) as f64 / fps,
        start_timecode: start_timecode.map(|tc| tc.add_frames(start_frame)),
    })
}

/// Runs all three derivations.
pub fn evaluate_chunks(
    chunks: &[LumaChunk],
    fps: f64,
    start_timecode: Option<Timecode>,
    heuristics: &SlateHeuristics,
) -> VisualFindings {
    let slate = detect_slate(chunks, heuristics);
    let black_at_tail = detect_tail_black(chunks, heuristics);
    let content = content_bounds(
        chunks,
        slate.unwrap_or(false),
        black_at_tail.is_some(),
        fps,
        start_timecode,
    );
    VisualFindings {
        slate,
        black_at_tail,
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::luma::{PixelSample, segment_luma_chunks};

    fn heuristics() -> SlateHeuristics {
        SlateHeuristics {
            slate_seconds: 8.0,
            black_after_slate_seconds: 2.0,
            tail_black_luma: 5.0,
        }
    }

    fn chunks_for(runs: &[(f64, usize)], fps: f64) -> Vec<LumaChunk> {
        let mut samples = Vec::new();
        for &(luma, count) in runs {
            for _ in 0..count {
                let frame = samples.len() as u64;
                samples.push(PixelSample {
                    frame,
                    x: 0,
                    y: 0,
                    rgb: [0, 0, 0],
                    luma,
                });
            }
        }
        segment_luma_chunks(samples, 1.0, fps)
    }

    #[test]
    fn test_slate_clip() {
        let chunks = chunks_for(&[(200.0, 192), (0.0, 48), (128.0, 240)], 24.0);
        let start = Timecode::parse("01:00:00:00", 24.0).ok();
        let findings = evaluate_chunks(&chunks, 24.0, start, &heuristics());

        assert_eq!(findings.slate, Some(true));
        assert_eq!(findings.black_at_tail, None);
        let content = findings.content.unwrap();
        assert_eq!(content.start_frame, 240);
        assert_eq!(content.end_frame, 479);
        assert!((content.duration_secs - 10.0).abs() < 1e-9);
        assert_eq!(content.start_timecode.unwrap().to_string(), "01:00:10:00");
    }

    #[test]
    fn test_slate_durations_round_half_to_even() {
        let h = heuristics();

        // 60 frames of black at 24 fps is 2.5 s
        let chunks = chunks_for(&[(200.0, 192), (0.0, 60), (128.0, 240)], 24.0);
        assert_eq!(chunks[1].duration_secs(), 2.5);
        assert_eq!(detect_slate(&chunks, &h), Some(true));

        // 8.5 s card
        let chunks = chunks_for(&[(200.0, 204), (0.0, 48), (128.0, 240)], 24.0);
        assert_eq!(detect_slate(&chunks, &h), Some(true));

        // 3.5 s rounds up to 4
        let chunks = chunks_for(&[(200.0, 192), (0.0, 84), (128.0, 240)], 24.0);
        assert_eq!(detect_slate(&chunks, &h), Some(false));
    }

    #[test]
    fn test_tail_black_trims_content() {
        let chunks = chunks_for(&[(128.0, 100), (2.0, 24)], 24.0);
        let findings = evaluate_chunks(&chunks, 24.0, None, &heuristics());

        assert_eq!(findings.slate, Some(false));
        assert_eq!(findings.black_at_tail, Some(1.0));
        let content = findings.content.unwrap();
        assert_eq!((content.start_frame, content.end_frame), (0, 99));
        assert_eq!(content.start_timecode, None);
    }

    #[test]
    fn test_too_few_chunks_never_panics() {
        let h = heuristics();
        assert_eq!(evaluate_chunks(&[], 24.0, None, &h), VisualFindings::default());

        // single black chunk: tail black but nothing left for content
        let chunks = chunks_for(&[(0.0, 48)], 24.0);
        let findings = evaluate_chunks(&chunks, 24.0, None, &h);
        assert_eq!(findings.slate, None);
        assert_eq!(findings.black_at_tail, Some(2.0));
        assert_eq!(findings.content, None);

        // slate and tail black leave an inverted range
        let chunks = chunks_for(&[(200.0, 192), (0.0, 48), (100.0, 10), (1.0, 10)], 24.0);
        let findings = evaluate_chunks(&chunks, 24.0, None, &h);
        assert_eq!(findings.slate, Some(true));
        assert_eq!(findings.content.map(|c| c.start_frame), Some(240));

        let chunks = chunks_for(&[(200.0, 192), (0.0, 48), (1.0, 10)], 24.0);
        let findings = evaluate_chunks(&chunks, 24.0, None, &h);
        assert_eq!(findings.content, None);
    }
}
