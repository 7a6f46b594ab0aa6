// mediasleuth-core/tests/pipeline_tests.rs
//
// End-to-end runs of the per-file stage graph against mocked ffmpeg,
// ffprobe and OCR. Volume scans run concurrently from the OP48 and OP59
// stages, so the windowed expectations ("-to") are registered before the
// whole-clip one ("volumedetect") and carry identical output.

use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use image::{Rgb, RgbImage};
use mediasleuth_core::analysis::TextBox;
use mediasleuth_core::external::mocks::{
    MockFfmpegSpawner, MockFfprobeExecutor, MockOcrEngine, RecordingSink, SinkEvent,
};
use mediasleuth_core::{
    COLUMNS, CoreError, InspectionConfig, InspectionConfigBuilder, InspectionTable, Inspector,
    MediaTools, StreamMetadata,
};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::tempdir;

const TILE: u32 = 32;

const METADATA_JSON: &str = r#"{
    "format": {"format_name": "mov,mp4,m4a,3gp,3g2,mj2", "duration": "20.000000"},
    "streams": [
        {
            "codec_type": "video",
            "codec_name": "prores",
            "width": 1920,
            "height": 1080,
            "avg_frame_rate": "24/1",
            "nb_frames": "480",
            "bit_rate": "147000000",
            "tags": {"timecode": "01:00:00:00"}
        },
        {
            "codec_type": "audio",
            "codec_name": "pcm_s24le",
            "sample_rate": "48000",
            "bit_rate": "2304000"
        }
    ]
}"#;

fn create_dummy_file(dir: &Path, name: &str) -> Result<PathBuf, std::io::Error> {
    let path = dir.join(name);
    File::create(&path)?;
    Ok(path)
}

fn log_line(line: &str) -> FfmpegEvent {
    FfmpegEvent::Log(LogLevel::Info, line.to_string())
}

fn volume_events(max_db: &str) -> Vec<FfmpegEvent> {
    vec![
        log_line("[Parsed_volumedetect_0 @ 0x600] n_samples: 1920000"),
        log_line("[Parsed_volumedetect_0 @ 0x600] mean_volume: -30.0 dB"),
        log_line(&format!("[Parsed_volumedetect_0 @ 0x600] max_volume: {max_db} dB")),
    ]
}

fn loudness_events(integrated: &str) -> Vec<FfmpegEvent> {
    vec![
        log_line("[Parsed_ebur128_0 @ 0x700] Summary:"),
        log_line("  Integrated loudness:"),
        log_line(&format!("    I:         {integrated} LUFS")),
        log_line("    Threshold: -34.0 LUFS"),
    ]
}

/// Eight seconds of slate, two of black, ten of programme at 24 fps.
fn slate_strip() -> RgbImage {
    let mut image = RgbImage::new(TILE, TILE);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let frame = x + y * TILE;
        let value = match frame {
            0..=191 => 200,
            192..=239 => 0,
            _ => 128,
        };
        *pixel = Rgb([value, value, value]);
    }
    image
}

fn slate_words() -> Vec<TextBox> {
    vec![
        TextBox::new("key", 100, 100, 40, 20),
        TextBox::new("ABCD1234", 160, 102, 120, 20),
        TextBox::new("date", 100, 200, 50, 20),
        TextBox::new("2024-03-01", 160, 200, 140, 20),
        TextBox::new("duration", 100, 300, 90, 20),
        TextBox::new("10s", 200, 301, 40, 20),
        TextBox::new("aspect", 100, 400, 70, 20),
        TextBox::new("16x9", 180, 400, 50, 20),
    ]
}

fn test_config(scratch: &Path) -> Result<InspectionConfig, CoreError> {
    InspectionConfigBuilder::new()
        .scratch_root(scratch)
        .worker_count(2)
        .tile_size(TILE)
        .build()
}

/// Registers every ffmpeg run of a slated, compliant clip.
fn expect_slated_clip(spawner: &MockFfmpegSpawner) {
    spawner.add_image_expectation(&format!("tile={TILE}x{TILE}"), slate_strip());
    spawner.add_success_expectation("crop=", Vec::new(), true);
    for _ in 0..4 {
        spawner.add_success_expectation("-to", volume_events("-60.0"), false);
    }
    spawner.add_success_expectation("volumedetect", volume_events("-12.0"), false);
    spawner.add_success_expectation("ebur128", loudness_events("-24.0"), false);
}

#[test]
fn test_slated_clip_is_fully_inspected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = create_dummy_file(dir.path(), "spot.mov")?;

    let spawner = MockFfmpegSpawner::new();
    expect_slated_clip(&spawner);
    let prober = MockFfprobeExecutor::new();
    prober.expect_metadata(&input, StreamMetadata::from_json(METADATA_JSON)?);
    let ocr = MockOcrEngine::with_boxes(slate_words());
    let sink = RecordingSink::new();

    let inspector = Inspector::new(
        test_config(&dir.path().join("scratch"))?,
        MediaTools::new(spawner.clone(), prober.clone(), ocr.clone()),
        Arc::new(sink.clone()),
    )?;
    let record = inspector.inspect(&input);
    let row = record.display_row();
    let cell = |column: &str| row.get(column).unwrap_or_default().to_string();

    assert_eq!(cell("filename"), "spot.mov");
    assert_eq!(cell("timecode_start"), "01:00:00:00");
    assert_eq!(cell("fps"), "24");
    assert_eq!(cell("framecount"), "480");
    assert_eq!(cell("resolution"), "1920x1080");
    assert_eq!(cell("aspect_ratio"), "16:9 - Widescreen video");
    assert_eq!(cell("video_codec"), "prores");
    assert_eq!(cell("audio_sample_rate"), "48000");
    assert_eq!(cell("full_duration"), "20.0 seconds");

    assert_eq!(cell("slate"), "Yes");
    assert_eq!(cell("black_at_tail"), "N/A");
    assert_eq!(cell("content_duration"), "10.0 seconds");
    assert_eq!(cell("content_start_timecode"), "01:00:10:00");
    assert_eq!(record.display(mediasleuth_core::PropertyKey::ContentStartFrame), "240");
    assert_eq!(record.display(mediasleuth_core::PropertyKey::ContentEndFrame), "479");

    assert_eq!(cell("slate_key_number"), "ABCD1234");
    assert_eq!(cell("slate_date"), "2024-03-01");
    assert_eq!(cell("slate_duration"), "10s");
    assert_eq!(cell("slate_aspect"), "16x9");
    assert_eq!(record.display(mediasleuth_core::PropertyKey::SlateTitle), "N/A");

    assert_eq!(cell("op48_audio"), "OP48");
    assert_eq!(cell("op59_audio"), "OP59");
    assert_eq!(cell("audio_peak"), "-12");

    assert!(row.cells.iter().all(|c| c != "loading..."));
    assert_eq!(spawner.pending_expectations(), 0);
    assert_eq!(spawner.get_received_calls().len(), 8);
    assert_eq!(prober.probed_paths(), vec![input.clone()]);
    assert_eq!(ocr.call_count(), 1);

    let rows = sink.rows_for(record.id());
    assert!(matches!(sink.events().first(), Some(SinkEvent::Placeholder(id, _)) if *id == record.id()));
    assert!(rows[0].cells[3..].iter().all(|c| c == "loading..."));
    assert_eq!(rows.last(), Some(&row));
    Ok(())
}

#[test]
fn test_unsupported_container_is_not_probed() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = create_dummy_file(dir.path(), "clip.txt")?;

    let spawner = MockFfmpegSpawner::new();
    let prober = MockFfprobeExecutor::new();
    let ocr = MockOcrEngine::with_boxes(slate_words());
    let table = Arc::new(InspectionTable::new());

    let inspector = Inspector::new(
        test_config(&dir.path().join("scratch"))?,
        MediaTools::new(spawner.clone(), prober.clone(), ocr.clone()),
        Arc::clone(&table),
    )?;
    let record = inspector.inspect(&input);
    let row = record.display_row();

    assert_eq!(row.get("filename"), Some("clip.txt"));
    assert!(row.cells[3..].iter().all(|c| c == "N/A"), "{:?}", row.cells);
    assert!(spawner.get_received_calls().is_empty());
    assert!(prober.probed_paths().is_empty());
    assert_eq!(ocr.call_count(), 0);
    assert_eq!(table.row(record.id()), Some(row));
    Ok(())
}

#[test]
fn test_probe_failure_nulls_every_property() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = create_dummy_file(dir.path(), "broken.mov")?;

    let spawner = MockFfmpegSpawner::new();
    let prober = MockFfprobeExecutor::new();
    prober.expect_failure(&input, "moov atom not found");
    let ocr = MockOcrEngine::with_boxes(Vec::new());

    let inspector = Inspector::new(
        test_config(&dir.path().join("scratch"))?,
        MediaTools::new(spawner.clone(), prober.clone(), ocr),
        Arc::new(RecordingSink::new()),
    )?;
    let record = inspector.inspect(&input);

    assert!(record.display_row().cells[3..].iter().all(|c| c == "N/A"));
    assert_eq!(prober.probed_paths().len(), 1);
    assert!(spawner.get_received_calls().is_empty());
    Ok(())
}

#[test]
fn test_missing_ocr_only_nulls_slate_text() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = create_dummy_file(dir.path(), "spot.mxf")?;

    let spawner = MockFfmpegSpawner::new();
    expect_slated_clip(&spawner);
    let prober = MockFfprobeExecutor::new();
    prober.expect_metadata(&input, StreamMetadata::from_json(METADATA_JSON)?);
    let ocr = MockOcrEngine::unavailable();

    let inspector = Inspector::new(
        test_config(&dir.path().join("scratch"))?,
        MediaTools::new(spawner.clone(), prober, ocr.clone()),
        Arc::new(RecordingSink::new()),
    )?;
    let record = inspector.inspect(&input);
    let row = record.display_row();

    for column in ["slate_key_number", "slate_date", "slate_aspect", "slate_duration"] {
        assert_eq!(row.get(column), Some("N/A"), "{column}");
    }
    assert_eq!(row.get("slate"), Some("Yes"));
    assert_eq!(row.get("op48_audio"), Some("OP48"));
    assert_eq!(row.get("op59_audio"), Some("OP59"));
    assert_eq!(ocr.call_count(), 1);
    assert_eq!(spawner.pending_expectations(), 0);
    Ok(())
}

#[test]
fn test_failed_pixel_strip_still_runs_audio_and_slate_text() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = create_dummy_file(dir.path(), "spot.mov")?;

    let spawner = MockFfmpegSpawner::new();
    spawner.add_exit_error_expectation(
        &format!("tile={TILE}x{TILE}"),
        vec![log_line("Invalid data found when processing input")],
        1,
    );
    spawner.add_success_expectation("crop=", Vec::new(), true);
    spawner.add_success_expectation("volumedetect", volume_events("-3.5"), false);
    let prober = MockFfprobeExecutor::new();
    prober.expect_metadata(&input, StreamMetadata::from_json(METADATA_JSON)?);
    let ocr = MockOcrEngine::with_boxes(slate_words());

    let inspector = Inspector::new(
        test_config(&dir.path().join("scratch"))?,
        MediaTools::new(spawner.clone(), prober, ocr),
        Arc::new(RecordingSink::new()),
    )?;
    let record = inspector.inspect(&input);
    let row = record.display_row();

    for column in ["slate", "black_at_tail", "content_duration", "content_start_timecode"] {
        assert_eq!(row.get(column), Some("N/A"), "{column}");
    }
    assert_eq!(row.get("slate_key_number"), Some("ABCD1234"));
    assert_eq!(row.get("audio_peak"), Some("-3.5"));
    assert_eq!(row.get("op48_audio"), Some("N/A"));
    assert_eq!(row.get("op59_audio"), Some("N/A"));
    assert_eq!(row.get("fps"), Some("24"));
    // no window scans and no loudness scan without content bounds
    assert_eq!(spawner.get_received_calls().len(), 3);
    assert_eq!(spawner.pending_expectations(), 0);
    Ok(())
}

#[test]
fn test_non_compliant_audio_lists_issues() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = create_dummy_file(dir.path(), "loud.mov")?;

    let spawner = MockFfmpegSpawner::new();
    spawner.add_image_expectation(&format!("tile={TILE}x{TILE}"), slate_strip());
    spawner.add_success_expectation("crop=", Vec::new(), true);
    for _ in 0..4 {
        spawner.add_success_expectation("-to", volume_events("-70.0"), false);
    }
    spawner.add_success_expectation("volumedetect", volume_events("-2.0"), false);
    spawner.add_success_expectation("ebur128", loudness_events("-16.2"), false);
    let prober = MockFfprobeExecutor::new();
    prober.expect_metadata(&input, StreamMetadata::from_json(METADATA_JSON)?);

    let inspector = Inspector::new(
        test_config(&dir.path().join("scratch"))?,
        MediaTools::new(spawner.clone(), prober, MockOcrEngine::with_boxes(Vec::new())),
        Arc::new(RecordingSink::new()),
    )?;
    let record = inspector.inspect(&input);
    let row = record.display_row();

    assert_eq!(row.get("op48_audio"), Some("Not OP48 - audio peaks above -9 dB"));
    assert_eq!(
        row.get("op59_audio"),
        Some("Not OP59 - loudness outside -24 ±1 LKFS bounds")
    );
    assert_eq!(row.get("audio_peak"), Some("-2"));
    // OCR read nothing, so every slate key is unmatched
    assert_eq!(row.get("slate_key_number"), Some("N/A"));
    Ok(())
}

#[test]
fn test_inspect_all_keeps_input_order() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let first = create_dummy_file(dir.path(), "notes.txt")?;
    let second = create_dummy_file(dir.path(), "broken.mov")?;
    let third = create_dummy_file(dir.path(), "readme.md")?;

    let prober = MockFfprobeExecutor::new();
    prober.expect_failure(&second, "Invalid data found when processing input");
    let table = Arc::new(InspectionTable::new());

    let inspector = Inspector::new(
        test_config(&dir.path().join("scratch"))?,
        MediaTools::new(
            MockFfmpegSpawner::new(),
            prober,
            MockOcrEngine::with_boxes(Vec::new()),
        ),
        Arc::clone(&table),
    )?;
    let records = inspector.inspect_all([&first, &second, &third]);

    let paths: Vec<&Path> = records.iter().map(|r| r.path()).collect();
    assert_eq!(paths, vec![first.as_path(), second.as_path(), third.as_path()]);
    assert_eq!(table.len(), 3);
    for record in &records {
        assert_eq!(table.row(record.id()), Some(record.display_row()));
    }
    assert_eq!(COLUMNS.len(), records[0].display_row().cells.len());
    Ok(())
}

#[test]
fn test_resubmitting_a_path_supersedes_its_row() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = create_dummy_file(dir.path(), "notes.txt")?;
    let table = Arc::new(InspectionTable::new());

    let inspector = Inspector::new(
        test_config(&dir.path().join("scratch"))?,
        MediaTools::new(
            MockFfmpegSpawner::new(),
            MockFfprobeExecutor::new(),
            MockOcrEngine::with_boxes(Vec::new()),
        ),
        Arc::clone(&table),
    )?;
    let old = inspector.submit(&input);
    inspector.wait_for_all();
    let new = inspector.submit(&input);
    inspector.wait_for_all();

    assert_ne!(old, new);
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].id, new);
    assert!(inspector.take_finished(old).is_some());
    assert!(inspector.take_finished(new).is_some());
    assert!(inspector.take_finished(new).is_none());
    Ok(())
}

#[test]
fn test_refresh_runs_a_new_record_for_the_same_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = create_dummy_file(dir.path(), "notes.txt")?;
    let table = Arc::new(InspectionTable::new());

    let inspector = Inspector::new(
        test_config(&dir.path().join("scratch"))?,
        MediaTools::new(
            MockFfmpegSpawner::new(),
            MockFfprobeExecutor::new(),
            MockOcrEngine::with_boxes(Vec::new()),
        ),
        Arc::clone(&table),
    )?;
    let first = inspector.inspect(&input);
    let id = inspector.refresh(&first);
    inspector.wait_for_all();

    assert_ne!(first.id(), id);
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].id, id);

    let drained = inspector.drain_finished();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].id(), id);
    assert_eq!(drained[0].path(), first.path());
    assert_eq!(drained[0].display_row(), first.display_row());
    assert!(inspector.drain_finished().is_empty());
    Ok(())
}
