//! File discovery module for finding media files to inspect.
//!
//! Scans the top level of a directory for files whose extension is one of
//! the configured containers (case-insensitive). Subdirectories are not
//! searched.

use crate::config::InspectionConfig;
use crate::error::{CoreError, CoreResult};

use std::path::{Path, PathBuf};

/// Finds media files eligible for inspection in the specified directory.
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - The discovered files, sorted by path
/// * `Err(CoreError::Io)` - If the directory cannot be read
/// * `Err(CoreError::NoFilesFound)` - If no file has an accepted extension
///
/// # Examples
///
/// ```rust,no_run
/// use mediasleuth_core::{InspectionConfig, find_inspectable_files};
/// use std::path::Path;
///
/// let config = InspectionConfig::default();
/// match find_inspectable_files(Path::new("/path/to/deliveries"), &config) {
///     Ok(files) => {
///         println!("Found {} media files:", files.len());
///         for file in files {
///             println!("  {}", file.display());
///         }
///     }
///     Err(e) => println!("Error finding media files: {}", e),
/// }
/// ```
pub fn find_inspectable_files(input_dir: &Path, config: &InspectionConfig) -> CoreResult<Vec<PathBuf>> {
    let read_dir = std::fs::read_dir(input_dir)?;
    let mut files: Vec<PathBuf> = read_dir
        .filter_map(|entry| {
            let path = entry.ok()?.path();

            if !path.is_file() {
                return None;
            }

            path.extension()
                .and_then(|ext| ext.to_str())
                .filter(|ext_str| config.accepts_extension(ext_str))
                .map(|_| path.clone())
        })
        .collect();

    if files.is_empty() {
        Err(CoreError::NoFilesFound)
    } else {
        files.sort();
        Ok(files)
    }
}
