// ============================================================================
// mediasleuth-core/src/pipeline/inspector.rs
// ============================================================================
//
// INSPECTOR: Bounded Worker Pool for Many Files
//
// Files are inspected on a dedicated rayon pool sized by the configured
// worker count, so a bulk submission never runs more external processes
// than there are workers. Each file is one pool job; its fan-out stages are
// spawned into the same pool through `rayon::scope`.
//
// There is no cancellation. Refreshing a record starts a fresh run with a
// new id; the sink reports updates from the older run as stale.
//
// Finished records are held until the caller takes them with
// `take_finished` or `drain_finished`; `inspect_all` does this itself.
//
// AI-ASSISTANT-INFO: Worker pool, submission and completion tracking

// ---- External crate imports ----
use rayon::{ThreadPool, ThreadPoolBuilder};

// ---- Standard library imports ----
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

// ---- Internal crate imports ----
use crate::config::InspectionConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegSpawner, FfprobeExecutor, MediaTools, OcrEngine};
use crate::pipeline::inspection::{FileInspection, run_inspection};
use crate::pipeline::sink::DisplaySink;
use crate::record::{InspectionId, InspectionRecord};
use crate::temp_files::ScratchSpace;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Count of submitted inspections that have not finished.
#[derive(Default)]
struct Pending {
    count: Mutex<usize>,
    done: Condvar,
}

impl Pending {
    fn increment(&self) {
        *lock(&self.count) += 1;
    }

    fn decrement(&self) {
        let mut count = lock(&self.count);
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.done.notify_all();
        }
    }

    fn wait_for_zero(&self) {
        let mut count = lock(&self.count);
        while *count > 0 {
            count = self
                .done
                .wait(count)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// Runs inspections on a bounded pool and reports rows to a sink.
pub struct Inspector<S, P, O, K> {
    pool: ThreadPool,
    tools: Arc<MediaTools<S, P, O>>,
    config: Arc<InspectionConfig>,
    scratch: Arc<ScratchSpace>,
    sink: Arc<K>,
    pending: Arc<Pending>,
    finished: Arc<Mutex<HashMap<InspectionId, InspectionRecord>>>,
}

impl<S, P, O, K> Inspector<S, P, O, K>
where
    S: FfmpegSpawner + 'static,
    P: FfprobeExecutor + 'static,
    O: OcrEngine + 'static,
    K: DisplaySink + 'static,
{
    /// Validates `config` and starts a pool of `config.worker_count` workers.
    pub fn new(config: InspectionConfig, tools: MediaTools<S, P, O>, sink: Arc<K>) -> CoreResult<Self> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_count)
            .thread_name(|i| format!("mediasleuth-worker-{i}"))
            .build()
            .map_err(|e| CoreError::WorkerPool(e.to_string()))?;
        log::debug!("Inspection pool started with {} worker(s)", config.worker_count);

        Ok(Self {
            pool,
            scratch: Arc::new(ScratchSpace::new(config.scratch_root.clone())),
            tools: Arc::new(tools),
            config: Arc::new(config),
            sink,
            pending: Arc::default(),
            finished: Arc::default(),
        })
    }

    pub fn config(&self) -> &InspectionConfig {
        &self.config
    }

    pub fn scratch(&self) -> &ScratchSpace {
        &self.scratch
    }

    pub fn sink(&self) -> &Arc<K> {
        &self.sink
    }

    /// Queues `path` and returns the id of its new record.
    ///
    /// The placeholder row is shown before this returns. The final record
    /// stays with the inspector until taken with [`Self::take_finished`] or
    /// [`Self::drain_finished`].
    pub fn submit(&self, path: &Path) -> InspectionId {
        self.submit_record(InspectionRecord::new(path))
    }

    /// Re-runs the inspection of `record`'s file under a new id.
    ///
    /// The previous run is not cancelled; its remaining updates reach the
    /// sink as stale and are dropped.
    pub fn refresh(&self, record: &InspectionRecord) -> InspectionId {
        let fresh = record.refreshed();
        log::debug!("Refreshing inspection {} as {}", record.id(), fresh.id());
        self.submit_record(fresh)
    }

    fn submit_record(&self, record: InspectionRecord) -> InspectionId {
        let id = record.id();
        self.sink.add_placeholder(id, record.placeholder_row());
        self.pending.increment();
        log::debug!("Queued {} as inspection {}", record.path().display(), id);

        let tools = Arc::clone(&self.tools);
        let config = Arc::clone(&self.config);
        let scratch = Arc::clone(&self.scratch);
        let sink = Arc::clone(&self.sink);
        let pending = Arc::clone(&self.pending);
        let finished = Arc::clone(&self.finished);

        self.pool.spawn(move || {
            let record = FileRun {
                tools: &tools,
                config: &config,
                scratch: &scratch,
                sink: sink.as_ref(),
            }
            .run(record);
            lock(&finished).insert(id, record);
            pending.decrement();
        });
        id
    }

    /// Blocks until every submitted inspection has finished.
    pub fn wait_for_all(&self) {
        self.pending.wait_for_zero();
    }

    /// Removes and returns the final record of a finished inspection.
    pub fn take_finished(&self, id: InspectionId) -> Option<InspectionRecord> {
        lock(&self.finished).remove(&id)
    }

    /// Removes and returns every finished record, in no particular order.
    pub fn drain_finished(&self) -> Vec<InspectionRecord> {
        lock(&self.finished).drain().map(|(_, record)| record).collect()
    }

    /// Inspects every path and returns the final records in input order.
    pub fn inspect_all<I, T>(&self, paths: I) -> Vec<InspectionRecord>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<Path>,
    {
        let ids: Vec<InspectionId> = paths.into_iter().map(|p| self.submit(p.as_ref())).collect();
        self.wait_for_all();
        ids.into_iter().filter_map(|id| self.take_finished(id)).collect()
    }

    /// Inspects one file on the pool and waits for it.
    pub fn inspect(&self, path: &Path) -> InspectionRecord {
        let record = InspectionRecord::new(path);
        let run = FileRun {
            tools: &self.tools,
            config: &self.config,
            scratch: &self.scratch,
            sink: self.sink.as_ref(),
        };
        self.pool.install(|| run.run_announced(record))
    }
}

/// Borrowed view of everything one file run needs.
struct FileRun<'a, S, P, O> {
    tools: &'a MediaTools<S, P, O>,
    config: &'a InspectionConfig,
    scratch: &'a ScratchSpace,
    sink: &'a dyn DisplaySink,
}

impl<S, P, O> FileRun<'_, S, P, O>
where
    S: FfmpegSpawner,
    P: FfprobeExecutor,
    O: OcrEngine,
{
    /// Runs a record whose placeholder is already shown.
    fn run(&self, record: InspectionRecord) -> InspectionRecord {
        FileInspection::new(record, self.tools, self.config, self.scratch, self.sink).run()
    }

    fn run_announced(&self, record: InspectionRecord) -> InspectionRecord {
        run_inspection(record, self.tools, self.config, self.scratch, self.sink)
    }
}
