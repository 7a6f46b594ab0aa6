//! Core library for media inspection using ffmpeg, ffprobe and tesseract.
//!
//! This crate inspects delivery media files: it reads stream metadata, builds
//! a one-pixel-per-frame proxy to find the slate, tail black and content
//! bounds, reads the slate text with OCR, and checks OP48/OP59 audio
//! compliance. Results land in a typed [`InspectionRecord`] whose rows are
//! pushed to a [`DisplaySink`] as each stage completes.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use mediasleuth_core::{InspectionConfig, InspectionTable, Inspector, SystemTools};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let config = InspectionConfig::default();
//! let table = Arc::new(InspectionTable::new());
//! let inspector = Inspector::new(config, SystemTools::system(), Arc::clone(&table)).unwrap();
//!
//! let records = inspector.inspect_all([Path::new("/deliveries/spot.mov")]);
//! for record in &records {
//!     println!("{:?}", record.display_row().cells);
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod media;
pub mod pipeline;
pub mod properties;
pub mod record;
pub mod temp_files;
pub mod units;
pub mod utils;

// Re-exports for public API
pub use config::{InspectionConfig, InspectionConfigBuilder};
pub use discovery::find_inspectable_files;
pub use error::{CoreError, CoreResult};
pub use external::{MediaTools, SystemTools, check_dependency};
pub use media::{StreamMetadata, Timecode};
pub use pipeline::{DisplaySink, InspectionTable, Inspector, NullDisplaySink, SinkUpdate, Stage};
pub use properties::{Property, PropertyKind, PropertyValue};
pub use record::{COLUMNS, DisplayRow, InspectionId, InspectionRecord, PropertyGroup, PropertyKey};
pub use temp_files::{PurgeSummary, ScratchSpace};
pub use units::{SmartDuration, TimeUnit, fit_string};
