// mediasleuth-core/tests/luma_chunk_tests.rs
//
// Properties of luma segmentation and chunk normalization over synthetic
// sample sequences.

use mediasleuth_core::analysis::{LumaChunk, LumaMethod, PixelSample, normalize_chunks, segment_luma_chunks};
use mediasleuth_core::analysis::visual::{detect_slate, detect_tail_black};
use mediasleuth_core::config::SlateHeuristics;

const FPS: f64 = 24.0;

fn gray_samples(values: &[u8]) -> Vec<PixelSample> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| PixelSample::new(i as u64, i as u32, 0, [v, v, v], LumaMethod::Rec709))
        .collect()
}

fn frames(chunks: &[LumaChunk]) -> Vec<u64> {
    chunks
        .iter()
        .flat_map(|c| c.samples().iter().map(|s| s.frame))
        .collect()
}

fn heuristics() -> SlateHeuristics {
    SlateHeuristics {
        slate_seconds: 8.0,
        black_after_slate_seconds: 2.0,
        tail_black_luma: 5.0,
    }
}

#[test]
fn test_chunks_partition_the_samples() {
    let values: Vec<u8> = (0..300u32).map(|i| ((i * 37) % 251) as u8).collect();
    for tolerance in [0.0, 1.0, 10.0, 80.0, 255.0] {
        let chunks = segment_luma_chunks(gray_samples(&values), tolerance, FPS);
        assert!(chunks.iter().all(|c| !c.is_empty()));
        let expected: Vec<u64> = (0..values.len() as u64).collect();
        assert_eq!(frames(&chunks), expected, "tolerance {tolerance}");
    }
}

#[test]
fn test_full_tolerance_gives_one_chunk() {
    let values: Vec<u8> = (0..=255).collect();
    let chunks = segment_luma_chunks(gray_samples(&values), 255.0, FPS);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].len(), 256);
}

#[test]
fn test_wider_tolerance_never_adds_chunks_on_ramps_and_steps() {
    let ramp: Vec<u8> = (0..200).collect();
    let steps: Vec<u8> = [10u8, 60, 120, 200]
        .iter()
        .flat_map(|&v| std::iter::repeat(v).take(30))
        .collect();

    for values in [ramp, steps] {
        let mut previous = usize::MAX;
        for tolerance in [0.0, 0.5, 1.0, 4.0, 25.0, 70.0, 255.0] {
            let count = segment_luma_chunks(gray_samples(&values), tolerance, FPS).len();
            assert!(count <= previous, "tolerance {tolerance}: {count} > {previous}");
            previous = count;
        }
    }
}

#[test]
fn test_slate_black_and_programme() {
    let mut values = vec![200u8; 192];
    values.extend(vec![0u8; 48]);
    values.extend(vec![128u8; 240]);
    values.extend(vec![2u8; 24]);

    let chunks = segment_luma_chunks(gray_samples(&values), 1.0, FPS);
    assert_eq!(chunks.len(), 4);
    assert_eq!(detect_slate(&chunks, &heuristics()), Some(true));
    assert_eq!(detect_tail_black(&chunks, &heuristics()), Some(1.0));
    assert!((chunks[2].duration_secs() - 10.0).abs() < 1e-9);
}

#[test]
fn test_normalize_merges_short_runs_only() {
    // a flicker of one-frame chunks between two long holds
    let mut values = vec![50u8; 48];
    values.extend([0u8, 100, 0, 100, 0]);
    values.extend(vec![180u8; 48]);

    let chunks = segment_luma_chunks(gray_samples(&values), 1.0, FPS);
    assert_eq!(chunks.len(), 7);

    let normalized = normalize_chunks(chunks.clone(), 24);
    assert_eq!(normalized.len(), 3);
    assert_eq!(normalized[1].len(), 5);
    assert_eq!(frames(&normalized), frames(&chunks));

    // nothing is short enough to merge
    assert_eq!(normalize_chunks(chunks.clone(), 1).len(), chunks.len());
}
