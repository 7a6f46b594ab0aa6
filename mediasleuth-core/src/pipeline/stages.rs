//! The per-file stage graph.
//!
//! Metadata runs first, the visual analysis after it, then the slate text,
//! OP48 and OP59 stages fan out. [`StageTracker`] is the explicit state
//! machine the runner drives: it hands out the stages whose prerequisites
//! are done, one wave at a time.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Stage {
    Metadata,
    VisualAnalysis,
    SlateText,
    Op48Audio,
    Op59Audio,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Metadata,
        Stage::VisualAnalysis,
        Stage::SlateText,
        Stage::Op48Audio,
        Stage::Op59Audio,
    ];

    /// Stages that must have returned before this one may start.
    pub fn prerequisites(self) -> &'static [Stage] {
        match self {
            Stage::Metadata => &[],
            Stage::VisualAnalysis => &[Stage::Metadata],
            Stage::SlateText | Stage::Op48Audio | Stage::Op59Audio => &[Stage::VisualAnalysis],
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Metadata => "metadata",
            Stage::VisualAnalysis => "visual analysis",
            Stage::SlateText => "slate text",
            Stage::Op48Audio => "OP48 audio",
            Stage::Op59Audio => "OP59 audio",
        };
        f.write_str(name)
    }
}

/// Coarse progress of one inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InspectionPhase {
    Queued,
    MetadataDone,
    VisualAnalysisDone,
    Complete,
}

/// Tracks which stages of one file have finished.
///
/// A skipped stage counts as finished: it never runs, and it never blocks
/// the stages after it from being reported complete.
#[derive(Debug, Clone, Default)]
pub struct StageTracker {
    finished: BTreeSet<Stage>,
    skipped: BTreeSet<Stage>,
}

impl StageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages not yet finished whose prerequisites all are.
    pub fn ready_stages(&self) -> Vec<Stage> {
        Stage::ALL
            .into_iter()
            .filter(|stage| !self.finished.contains(stage))
            .filter(|stage| stage.prerequisites().iter().all(|p| self.finished.contains(p)))
            .collect()
    }

    pub fn complete(&mut self, stage: Stage) {
        self.finished.insert(stage);
    }

    /// Marks every unfinished stage as skipped.
    pub fn skip_remaining(&mut self) {
        for stage in Stage::ALL {
            if self.finished.insert(stage) {
                self.skipped.insert(stage);
            }
        }
    }

    pub fn is_finished(&self, stage: Stage) -> bool {
        self.finished.contains(&stage)
    }

    pub fn was_skipped(&self, stage: Stage) -> bool {
        self.skipped.contains(&stage)
    }

    pub fn phase(&self) -> InspectionPhase {
        if Stage::ALL.iter().all(|s| self.finished.contains(s)) {
            InspectionPhase::Complete
        } else if self.finished.contains(&Stage::VisualAnalysis) {
            InspectionPhase::VisualAnalysisDone
        } else if self.finished.contains(&Stage::Metadata) {
            InspectionPhase::MetadataDone
        } else {
            InspectionPhase::Queued
        }
    }
}
