// mediasleuth-core/src/external/mocks.rs
//
// --- Mocking Infrastructure (for testing) ---
//
// Test doubles for the process seams: ffmpeg, ffprobe, OCR and the display
// sink. All of them are Send + Sync so they can be handed to the inspection
// worker pool exactly like the production implementations.

use super::*;
use crate::analysis::text_lines::TextBox;
use crate::error::{CoreError, CoreResult};
use crate::media::metadata::StreamMetadata;
use crate::pipeline::sink::{DisplaySink, SinkUpdate};
use crate::record::{DisplayRow, InspectionId};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use image::RgbImage;
use std::collections::HashMap;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock implementation of FfmpegProcess.
#[derive(Clone)]
pub struct MockFfmpegProcess {
    /// Events to emit when handle_events is called.
    pub events_to_emit: Vec<FfmpegEvent>,
    /// Exit status to return when wait is called.
    pub exit_status: ExitStatus,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        for event in self.events_to_emit.clone() {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// What the mock writes at the command's output path (its last argument).
pub enum MockOutput {
    Nothing,
    EmptyFile,
    Image(RgbImage),
}

/// Represents an expected ffmpeg command call and its mock result.
pub struct MockFfmpegExpectation {
    pub arg_pattern: String,
    pub result: CoreResult<MockFfmpegProcess>,
    pub output: MockOutput,
}

/// Mock implementation of FfmpegSpawner supporting multiple expectations.
///
/// Each expectation is consumed by the first spawned command with an
/// argument containing its pattern. A command with no matching expectation
/// panics, which fails the test that issued it.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Arc<Mutex<Vec<MockFfmpegExpectation>>>,
    received_calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_expectation(
        &self,
        arg_pattern: &str,
        result: CoreResult<MockFfmpegProcess>,
        output: MockOutput,
    ) {
        lock(&self.expectations).push(MockFfmpegExpectation {
            arg_pattern: arg_pattern.to_string(),
            result,
            output,
        });
    }

    pub fn add_success_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        create_dummy_output: bool,
    ) {
        let process = MockFfmpegProcess {
            events_to_emit: events,
            exit_status: ExitStatus::from_raw(0),
        };
        let output = if create_dummy_output {
            MockOutput::EmptyFile
        } else {
            MockOutput::Nothing
        };
        self.add_expectation(arg_pattern, Ok(process), output);
    }

    /// Succeeds and writes `image` to the output path.
    pub fn add_image_expectation(&self, arg_pattern: &str, image: RgbImage) {
        let process = MockFfmpegProcess {
            events_to_emit: Vec::new(),
            exit_status: ExitStatus::from_raw(0),
        };
        self.add_expectation(arg_pattern, Ok(process), MockOutput::Image(image));
    }

    pub fn add_spawn_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.add_expectation(arg_pattern, Err(error), MockOutput::Nothing);
    }

    pub fn add_exit_error_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        exit_code: i32,
    ) {
        let process = MockFfmpegProcess {
            events_to_emit: events,
            exit_status: ExitStatus::from_raw(exit_code << 8),
        };
        self.add_expectation(arg_pattern, Ok(process), MockOutput::Nothing);
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        lock(&self.received_calls).clone()
    }

    /// Number of expectations not yet consumed.
    pub fn pending_expectations(&self) -> usize {
        lock(&self.expectations).len()
    }
}

fn write_mock_output(output: MockOutput, args: &[String]) {
    let Some(output_path) = args.last().map(PathBuf::from) else {
        log::warn!("MockFfmpegSpawner couldn't find output path in args.");
        return;
    };
    if let Some(parent) = output_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            log::error!("MockFfmpegSpawner failed to create parent dir {:?}: {}", parent, e);
        }
    }
    let result = match output {
        MockOutput::Nothing => return,
        MockOutput::EmptyFile => std::fs::File::create(&output_path).map(|_| ()).map_err(|e| e.to_string()),
        MockOutput::Image(image) => image.save(&output_path).map_err(|e| e.to_string()),
    };
    match result {
        Ok(()) => log::info!("MockFfmpegSpawner wrote output file: {:?}", output_path),
        Err(e) => log::error!("MockFfmpegSpawner failed to write {:?}: {}", output_path, e),
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        lock(&self.received_calls).push(args.clone());

        let expectation = {
            let mut expectations = lock(&self.expectations);
            let found = expectations
                .iter()
                .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));
            found.map(|index| expectations.remove(index))
        };

        let Some(expectation) = expectation else {
            log::error!("MockFfmpegSpawner: No expectation found for command args: {:?}", args);
            panic!("MockFfmpegSpawner: No expectation found for command args: {:?}", args);
        };
        log::info!(
            "MockFfmpegSpawner: Matched expectation with pattern '{}'",
            expectation.arg_pattern
        );

        match expectation.result {
            Ok(process) => {
                write_mock_output(expectation.output, &args);
                Ok(process)
            }
            Err(err) => {
                log::warn!(
                    "MockFfmpegSpawner simulating spawn error for pattern '{}': {:?}",
                    expectation.arg_pattern,
                    err
                );
                Err(err)
            }
        }
    }
}

/// Mock implementation of FfprobeExecutor keyed by input path.
#[derive(Clone, Default)]
pub struct MockFfprobeExecutor {
    results: Arc<Mutex<HashMap<PathBuf, Result<StreamMetadata, String>>>>,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockFfprobeExecutor {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn expect_metadata(&self, input_path: &Path, metadata: StreamMetadata) {
        lock(&self.results).insert(input_path.to_path_buf(), Ok(metadata));
    }

    /// Makes probing `input_path` fail with `CoreError::FfprobeParse(message)`.
    pub fn expect_failure(&self, input_path: &Path, message: &str) {
        lock(&self.results).insert(input_path.to_path_buf(), Err(message.to_string()));
    }

    pub fn probed_paths(&self) -> Vec<PathBuf> {
        lock(&self.calls).clone()
    }
}

impl FfprobeExecutor for MockFfprobeExecutor {
    fn probe(&self, input_path: &Path) -> CoreResult<StreamMetadata> {
        log::info!("MockFfprobeExecutor::probe called for: {}", input_path.display());
        lock(&self.calls).push(input_path.to_path_buf());
        match lock(&self.results).get(input_path) {
            Some(Ok(metadata)) => Ok(metadata.clone()),
            Some(Err(message)) => Err(CoreError::FfprobeParse(message.clone())),
            None => Err(CoreError::FfprobeParse(format!(
                "MockFfprobeExecutor: No expectation set for path {}",
                input_path.display()
            ))),
        }
    }
}

/// Mock OCR engine returning the same word boxes for every image.
#[derive(Clone, Default)]
pub struct MockOcrEngine {
    boxes: Arc<Mutex<Option<Vec<TextBox>>>>,
    calls: Arc<Mutex<usize>>,
}

impl MockOcrEngine {
    /// An engine that behaves as if the OCR binary were not installed.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn with_boxes(boxes: Vec<TextBox>) -> Self {
        Self {
            boxes: Arc::new(Mutex::new(Some(boxes))),
            calls: Arc::default(),
        }
    }

    pub fn call_count(&self) -> usize {
        *lock(&self.calls)
    }
}

impl OcrEngine for MockOcrEngine {
    fn recognize(&self, image_path: &Path) -> CoreResult<Vec<TextBox>> {
        *lock(&self.calls) += 1;
        match lock(&self.boxes).as_ref() {
            Some(boxes) => Ok(boxes.clone()),
            None => Err(CoreError::OcrUnavailable(format!(
                "mock OCR engine cannot read {}",
                image_path.display()
            ))),
        }
    }
}

/// One call received by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Placeholder(InspectionId, DisplayRow),
    Update(InspectionId, DisplayRow),
}

/// Display sink that records every call and accepts every update.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<SinkEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        lock(&self.events).clone()
    }

    /// Rows published for `id`, placeholder first.
    pub fn rows_for(&self, id: InspectionId) -> Vec<DisplayRow> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Placeholder(i, row) | SinkEvent::Update(i, row) if *i == id => {
                    Some(row.clone())
                }
                _ => None,
            })
            .collect()
    }
}

impl DisplaySink for RecordingSink {
    fn add_placeholder(&self, id: InspectionId, row: DisplayRow) {
        lock(&self.events).push(SinkEvent::Placeholder(id, row));
    }

    fn update_row(&self, id: InspectionId, row: DisplayRow) -> SinkUpdate {
        lock(&self.events).push(SinkEvent::Update(id, row));
        SinkUpdate::Applied
    }
}
