//! The inspection pipeline.
//!
//! - [`stages`]: the per-file stage graph and its tracker
//! - [`sink`]: the display sink seam and the in-memory row table
//! - [`inspection`]: the stage runners for one file
//! - [`inspector`]: the bounded pool running many files

pub mod inspection;
pub mod inspector;
pub mod sink;
pub mod stages;

pub use inspection::{FileInspection, MediaFacts, run_inspection, stage_keys};
pub use inspector::Inspector;
pub use sink::{DisplaySink, InspectionTable, NullDisplaySink, SinkUpdate, TableRow};
pub use stages::{InspectionPhase, Stage, StageTracker};
