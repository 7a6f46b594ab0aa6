// ============================================================================
// mediasleuth-core/src/pipeline/inspection.rs
// ============================================================================
//
// FILE INSPECTION: The Stages of One File
//
// A `FileInspection` owns one file's record and runs its stages in the order
// the `StageTracker` hands them out. Stages compute without holding the
// record lock and then apply their results in one locked update, which also
// publishes the new row snapshot. A stage that fails logs why and nulls the
// properties it owns; it never blocks a stage that does not depend on it.
//
// Stage ownership:
// - metadata: container and stream properties
// - visual analysis: slate, tail black, content bounds
// - slate text: slate_* properties
// - OP48: op48_audio and audio_peak
// - OP59: op59_audio
//
// AI-ASSISTANT-INFO: Per-file stage runners and snapshot publication

// ---- External crate imports ----
use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;

// ---- Standard library imports ----
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

// ---- Internal crate imports ----
use crate::analysis::{
    AudioComplianceChecker, PixelStripAnalyzer, SlateTextReader, VisualFindings,
    describe_aspect_ratio, evaluate_chunks,
};
use crate::config::InspectionConfig;
use crate::error::CoreError;
use crate::external::{FfmpegSpawner, FfprobeExecutor, MediaTools, OcrEngine};
use crate::media::{StreamMetadata, Timecode};
use crate::pipeline::sink::{DisplaySink, SinkUpdate};
use crate::pipeline::stages::{Stage, StageTracker};
use crate::record::{InspectionId, InspectionRecord, PropertyKey};
use crate::temp_files::ScratchSpace;

/// Start timecode used when the container carries none.
pub const DEFAULT_START_TIMECODE: &str = "00:00:00:00";

const METADATA_KEYS: &[PropertyKey] = &[
    PropertyKey::TimecodeStart,
    PropertyKey::Fps,
    PropertyKey::Resolution,
    PropertyKey::AspectRatio,
    PropertyKey::VideoBitrate,
    PropertyKey::VideoCodec,
    PropertyKey::AudioCodec,
    PropertyKey::AudioBitrate,
    PropertyKey::AudioSampleRate,
    PropertyKey::Framecount,
    PropertyKey::FullDuration,
];

const VISUAL_KEYS: &[PropertyKey] = &[
    PropertyKey::Slate,
    PropertyKey::BlackAtTail,
    PropertyKey::ContentStartFrame,
    PropertyKey::ContentEndFrame,
    PropertyKey::ContentDuration,
    PropertyKey::ContentStartTimecode,
];

const CONTENT_KEYS: &[PropertyKey] = &[
    PropertyKey::ContentStartFrame,
    PropertyKey::ContentEndFrame,
    PropertyKey::ContentDuration,
    PropertyKey::ContentStartTimecode,
];

const SLATE_TEXT_KEYS: &[PropertyKey] = &[
    PropertyKey::SlateKeyNumber,
    PropertyKey::SlateDate,
    PropertyKey::SlateDuration,
    PropertyKey::SlateAspect,
    PropertyKey::SlateAgency,
    PropertyKey::SlateClient,
    PropertyKey::SlateDirector,
    PropertyKey::SlateProduct,
    PropertyKey::SlateProductionco,
    PropertyKey::SlateTitle,
];

const OP48_KEYS: &[PropertyKey] = &[PropertyKey::Op48Audio, PropertyKey::AudioPeak];

const OP59_KEYS: &[PropertyKey] = &[PropertyKey::Op59Audio];

/// Properties a stage is responsible for.
pub fn stage_keys(stage: Stage) -> &'static [PropertyKey] {
    match stage {
        Stage::Metadata => METADATA_KEYS,
        Stage::VisualAnalysis => VISUAL_KEYS,
        Stage::SlateText => SLATE_TEXT_KEYS,
        Stage::Op48Audio => OP48_KEYS,
        Stage::Op59Audio => OP59_KEYS,
    }
}

/// What the later stages need from the metadata stage.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFacts {
    pub fps: Option<f64>,
    pub frame_count: Option<u64>,
    pub resolution: Option<(u64, u64)>,
    pub start_timecode: Option<Timecode>,
}

impl MediaFacts {
    pub fn from_metadata(metadata: &StreamMetadata) -> Self {
        let fps = metadata.fps();
        let start_text = metadata
            .start_timecode()
            .unwrap_or_else(|| DEFAULT_START_TIMECODE.to_string());
        let start_timecode = fps.and_then(|fps| match Timecode::parse(&start_text, fps) {
            Ok(tc) => Some(tc),
            Err(e) => {
                log::warn!("Ignoring start timecode: {}", e);
                None
            }
        });

        Self {
            fps,
            frame_count: metadata.frame_count(),
            resolution: metadata.resolution(),
            start_timecode,
        }
    }

    /// Clip duration from frame count and fps; the container duration is
    /// not trusted.
    pub fn full_duration(&self) -> Option<f64> {
        match (self.frame_count, self.fps) {
            (Some(frames), Some(fps)) if fps > 0.0 => Some(frames as f64 / fps),
            _ => None,
        }
    }
}

fn apply_metadata(record: &mut InspectionRecord, metadata: &StreamMetadata, facts: &MediaFacts) {
    let video = metadata.video_stream();
    let audio = metadata.audio_stream();

    record.set(
        PropertyKey::TimecodeStart,
        metadata
            .start_timecode()
            .unwrap_or_else(|| DEFAULT_START_TIMECODE.to_string()),
    );
    record.set_option(PropertyKey::Fps, facts.fps);
    record.set_option(PropertyKey::Resolution, metadata.resolution_string("x"));
    record.set_option(
        PropertyKey::AspectRatio,
        facts.resolution.and_then(|(w, h)| describe_aspect_ratio(w, h)),
    );
    record.set_option(PropertyKey::VideoBitrate, video.and_then(|v| v.bit_rate));
    record.set_option(PropertyKey::VideoCodec, video.and_then(|v| v.codec_name.clone()));
    record.set_option(PropertyKey::AudioCodec, audio.and_then(|a| a.codec_name.clone()));
    record.set_option(PropertyKey::AudioBitrate, audio.and_then(|a| a.bit_rate));
    record.set_option(PropertyKey::AudioSampleRate, audio.and_then(|a| a.sample_rate));
    record.set_option(PropertyKey::Framecount, facts.frame_count);
    record.set_option(PropertyKey::FullDuration, facts.full_duration());
}

fn apply_visual(record: &mut InspectionRecord, findings: &VisualFindings) {
    record.set_option(PropertyKey::Slate, findings.slate);
    record.set_option(PropertyKey::BlackAtTail, findings.black_at_tail);
    match &findings.content {
        Some(content) => {
            record.set(PropertyKey::ContentStartFrame, content.start_frame);
            record.set(PropertyKey::ContentEndFrame, content.end_frame);
            record.set(PropertyKey::ContentDuration, content.duration_secs);
            record.set_option(
                PropertyKey::ContentStartTimecode,
                content.start_timecode.map(|tc| tc.to_string()),
            );
        }
        None => record.set_null(CONTENT_KEYS),
    }
}

/// One file moving through the stage graph.
pub struct FileInspection<'a, S, P, O> {
    id: InspectionId,
    path: PathBuf,
    record: Mutex<InspectionRecord>,
    tools: &'a MediaTools<S, P, O>,
    config: &'a InspectionConfig,
    scratch: &'a ScratchSpace,
    sink: &'a dyn DisplaySink,
    facts: OnceCell<MediaFacts>,
    visual: OnceCell<VisualFindings>,
}

impl<'a, S, P, O> FileInspection<'a, S, P, O>
where
    S: FfmpegSpawner,
    P: FfprobeExecutor,
    O: OcrEngine,
{
    pub fn new(
        record: InspectionRecord,
        tools: &'a MediaTools<S, P, O>,
        config: &'a InspectionConfig,
        scratch: &'a ScratchSpace,
        sink: &'a dyn DisplaySink,
    ) -> Self {
        Self {
            id: record.id(),
            path: record.path().to_path_buf(),
            record: Mutex::new(record),
            tools,
            config,
            scratch,
            sink,
            facts: OnceCell::new(),
            visual: OnceCell::new(),
        }
    }

    pub fn id(&self) -> InspectionId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, InspectionRecord> {
        self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Shows the placeholder row for this inspection.
    pub fn announce(&self) {
        let row = self.lock().placeholder_row();
        self.sink.add_placeholder(self.id, row);
    }

    /// Applies `update` and publishes the resulting row.
    ///
    /// Publication happens under the record lock, so snapshots reach the
    /// sink in the order the record changed.
    fn apply<F: FnOnce(&mut InspectionRecord)>(&self, update: F) {
        let mut record = self.lock();
        update(&mut record);
        match self.sink.update_row(self.id, record.display_row()) {
            SinkUpdate::Applied => {}
            SinkUpdate::RowNotFound => {
                log::debug!("Row for inspection {} is gone, update dropped", self.id)
            }
            SinkUpdate::Stale => {
                log::debug!("Inspection {}: {}", self.id, CoreError::StaleResult)
            }
        }
    }

    /// Runs every stage and returns the final record.
    pub fn run(self) -> InspectionRecord {
        let mut tracker = StageTracker::new();

        loop {
            let wave = tracker.ready_stages();
            match wave.as_slice() {
                [] => break,
                [stage] => {
                    let stage = *stage;
                    let proceed = self.run_stage(stage);
                    tracker.complete(stage);
                    if !proceed {
                        tracker.skip_remaining();
                        self.skip_stages(&tracker);
                    }
                }
                stages => {
                    rayon::scope(|scope| {
                        for &stage in stages {
                            let this = &self;
                            scope.spawn(move |_| {
                                this.run_stage(stage);
                            });
                        }
                    });
                    for &stage in stages {
                        tracker.complete(stage);
                    }
                }
            }
            log::debug!("{}: {:?}", self.path.display(), tracker.phase());
        }

        self.record.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// Nulls what every skipped stage would have produced.
    fn skip_stages(&self, tracker: &StageTracker) {
        let skipped: Vec<PropertyKey> = Stage::ALL
            .into_iter()
            .filter(|stage| tracker.was_skipped(*stage))
            .flat_map(|stage| stage_keys(stage).iter().copied())
            .collect();
        if skipped.is_empty() {
            return;
        }
        log::debug!(
            "{}: skipping {} dependent properties",
            self.path.display(),
            skipped.len()
        );
        self.apply(|record| record.set_null(&skipped));
    }

    /// Runs one stage. Returns false when its dependents cannot run.
    fn run_stage(&self, stage: Stage) -> bool {
        log::debug!("{}: starting {} stage", self.path.display(), stage);
        let result = match stage {
            Stage::Metadata => self.metadata_stage(),
            Stage::VisualAnalysis => self.visual_stage().map(|()| true),
            Stage::SlateText => self.slate_text_stage().map(|()| true),
            Stage::Op48Audio => self.op48_stage().map(|()| true),
            Stage::Op59Audio => self.op59_stage().map(|()| true),
        };

        match result {
            Ok(proceed) => proceed,
            Err(e) => {
                match e.downcast_ref::<CoreError>() {
                    Some(CoreError::OcrUnavailable(reason)) => log::warn!(
                        "{}: OCR unavailable, not reading slate text ({})",
                        self.path.display(),
                        reason
                    ),
                    _ => log::warn!("{}: {} stage failed: {:#}", self.path.display(), stage, e),
                }
                self.apply(|record| record.set_null(stage_keys(stage)));
                stage != Stage::Metadata
            }
        }
    }

    fn metadata_stage(&self) -> Result<bool> {
        let extension = self.lock().extension().to_string();
        if !self.config.accepts_extension(&extension) {
            log::info!(
                "{}: {}",
                self.path.display(),
                CoreError::UnsupportedContainer(extension)
            );
            self.apply(|record| record.set_null(METADATA_KEYS));
            return Ok(false);
        }

        let metadata = self
            .tools
            .ffprobe
            .probe(&self.path)
            .with_context(|| format!("probing {}", self.path.display()))?;
        let facts = MediaFacts::from_metadata(&metadata);
        self.apply(|record| apply_metadata(record, &metadata, &facts));
        // set once per inspection; a second set cannot happen
        let _ = self.facts.set(facts);
        Ok(true)
    }

    fn facts(&self) -> Result<&MediaFacts> {
        self.facts
            .get()
            .ok_or_else(|| anyhow!("stream metadata unavailable"))
    }

    fn visual_stage(&self) -> Result<()> {
        let facts = self.facts()?;
        let fps = facts.fps.context("frame rate unavailable")?;
        let frame_count = facts.frame_count.context("frame count unavailable")?;

        let analyzer = PixelStripAnalyzer::new(
            &self.tools.ffmpeg,
            &self.config.ffmpeg,
            &self.config.pixel_strip,
            self.scratch,
        );
        let strip = analyzer
            .analyze(&self.path, fps, frame_count)
            .context("building pixel strip")?;
        log::debug!(
            "{}: {} luma chunk(s) in {}",
            self.path.display(),
            strip.chunks.len(),
            strip.image_path.display()
        );

        let findings = evaluate_chunks(&strip.chunks, fps, facts.start_timecode, &self.config.slate);
        self.apply(|record| apply_visual(record, &findings));
        let _ = self.visual.set(findings);
        Ok(())
    }

    fn slate_text_stage(&self) -> Result<()> {
        let resolution = self.facts()?.resolution.context("resolution unavailable")?;
        let reader = SlateTextReader::new(
            &self.tools.ffmpeg,
            &self.tools.ocr,
            &self.config.ffmpeg,
            &self.config.slate_reader,
            self.scratch,
        );
        let text = reader.read(&self.path, resolution)?;

        self.apply(|record| {
            for (key, value) in &text.values {
                match PropertyKey::for_slate_key(key) {
                    Some(property) => record.set_option(property, value.clone()),
                    None => log::debug!("Slate key '{}' has no property", key),
                }
            }
            let untouched: Vec<PropertyKey> = SLATE_TEXT_KEYS
                .iter()
                .copied()
                .filter(|key| record.property(*key).is_some_and(|p| p.is_unset()))
                .collect();
            record.set_null(&untouched);
        });
        Ok(())
    }

    fn op48_stage(&self) -> Result<()> {
        let checker = AudioComplianceChecker::new(&self.tools.ffmpeg, &self.config.audio);
        let clip = checker.scan_clip(&self.path).context("scanning clip volume")?;
        let peak = clip.max_volume_db();

        let verdict = match (self.visual.get().and_then(|v| v.content), self.facts()?.fps) {
            (Some(bounds), Some(fps)) => Some(checker.check_op48(&self.path, peak, &bounds, fps)?),
            _ => {
                log::warn!(
                    "{}: content bounds unavailable, OP48 not checked",
                    self.path.display()
                );
                None
            }
        };

        self.apply(|record| {
            record.set(PropertyKey::AudioPeak, peak);
            record.set_option(PropertyKey::Op48Audio, verdict.map(|v| v.to_string()));
        });
        Ok(())
    }

    fn op59_stage(&self) -> Result<()> {
        let bounds = self.visual.get().and_then(|v| v.content);
        let fps = self.facts()?.fps;
        let (Some(bounds), Some(fps)) = (bounds, fps) else {
            log::warn!(
                "{}: content bounds unavailable, OP59 not checked",
                self.path.display()
            );
            self.apply(|record| record.set_null(OP59_KEYS));
            return Ok(());
        };

        let checker = AudioComplianceChecker::new(&self.tools.ffmpeg, &self.config.audio);
        let verdict = checker.check_op59(&self.path, &bounds, fps)?;
        self.apply(|record| record.set(PropertyKey::Op59Audio, verdict.to_string()));
        Ok(())
    }
}

/// Runs a whole inspection of `record` and returns the final record.
pub fn run_inspection<S, P, O>(
    record: InspectionRecord,
    tools: &MediaTools<S, P, O>,
    config: &InspectionConfig,
    scratch: &ScratchSpace,
    sink: &dyn DisplaySink,
) -> InspectionRecord
where
    S: FfmpegSpawner,
    P: FfprobeExecutor,
    O: OcrEngine,
{
    let inspection = FileInspection::new(record, tools, config, scratch, sink);
    inspection.announce();
    inspection.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_derived_key_has_an_owner() {
        use crate::properties::PropertyKind;

        let owned: Vec<PropertyKey> = Stage::ALL
            .into_iter()
            .flat_map(|s| stage_keys(s).iter().copied())
            .collect();
        for key in PropertyKey::ALL {
            let path_derived = matches!(
                key,
                PropertyKey::Path | PropertyKey::Name | PropertyKey::FromFolder | PropertyKey::Extension
            );
            if path_derived || key.kind() == PropertyKind::NotImplemented {
                assert!(!owned.contains(key), "{key} should not be owned");
            } else {
                assert!(owned.contains(key), "{key} has no owning stage");
            }
        }
    }

    #[test]
    fn test_full_duration_uses_frames() {
        let facts = MediaFacts {
            fps: Some(25.0),
            frame_count: Some(750),
            resolution: None,
            start_timecode: None,
        };
        assert_eq!(facts.full_duration(), Some(30.0));
        let facts = MediaFacts { fps: None, ..facts };
        assert_eq!(facts.full_duration(), None);
    }
}
