//! Implementation of the 'inspect' subcommand.
//!
//! Expands the given paths into media files, runs them through the core
//! inspection pool and prints the final rows.

use crate::cli::InspectArgs;
use crate::output::{self, TerminalSink};

use mediasleuth_core::{
    CoreError, InspectionConfig, InspectionConfigBuilder, Inspector, SystemTools, check_dependency,
    find_inspectable_files,
};

use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// External binaries the pipeline shells out to, with their version flag.
const DEPENDENCIES: [(&str, &str); 3] = [
    ("ffmpeg", "-version"),
    ("ffprobe", "-version"),
    ("tesseract", "--version"),
];

/// Expands directories one level deep; files are kept as given.
///
/// A file with an unsupported extension is kept: its row simply ends up
/// "N/A". A directory without media files contributes nothing.
pub fn expand_inputs(inputs: &[PathBuf], config: &InspectionConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            match find_inspectable_files(input, config) {
                Ok(found) => {
                    debug!("{}: {} media file(s)", input.display(), found.len());
                    files.extend(found);
                }
                Err(CoreError::NoFilesFound) => {
                    warn!("No inspectable media files in {}", input.display())
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to read '{}'", input.display()));
                }
            }
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            bail!("Invalid input path '{}': no such file or directory", input.display());
        }
    }
    Ok(files)
}

/// Builds the inspection configuration from the CLI overrides.
pub fn build_config(args: &InspectArgs) -> Result<InspectionConfig> {
    let mut builder = InspectionConfigBuilder::new();
    if let Some(jobs) = args.jobs {
        builder = builder.worker_count(usize::from(jobs));
    }
    if let Some(root) = &args.scratch_root {
        builder = builder.scratch_root(root);
    }
    if let Some(tile) = args.tile_size {
        builder = builder.tile_size(tile);
    }
    builder.build().context("Invalid inspection settings")
}

/// Runs the inspect command.
pub fn run_inspect(args: InspectArgs) -> Result<()> {
    let start = Instant::now();
    let config = build_config(&args)?;
    let files = expand_inputs(&args.files, &config)?;
    if files.is_empty() {
        bail!("{}", CoreError::NoFilesFound);
    }

    for (binary, flag) in DEPENDENCIES {
        if let Err(e) = check_dependency(binary, flag) {
            warn!("{e}; properties that need it will be N/A");
        }
    }

    info!(
        "Inspecting {} file(s) with {} worker(s), scratch root {}",
        files.len(),
        config.worker_count,
        config.scratch_root.display()
    );

    let sink = Arc::new(TerminalSink::new(!args.json));
    let inspector = Inspector::new(config, SystemTools::system(), Arc::clone(&sink))
        .context("Failed to start the inspection pool")?;
    let records = inspector.inspect_all(&files);
    debug!(
        "Inspection of {} file(s) finished in {:.1}s",
        records.len(),
        start.elapsed().as_secs_f64()
    );

    if args.json {
        output::print_json(&records).context("Failed to serialize the records")?;
    } else {
        output::print_summary(&records);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_expand_inputs() -> Result<()> {
        let dir = tempdir()?;
        File::create(dir.path().join("b.mov"))?;
        File::create(dir.path().join("a.MXF"))?;
        File::create(dir.path().join("notes.txt"))?;
        let loose = dir.path().join("notes.txt");
        let empty = tempdir()?;

        let config = InspectionConfig::default();
        let files = expand_inputs(
            &[dir.path().to_path_buf(), loose.clone(), empty.path().to_path_buf()],
            &config,
        )?;
        assert_eq!(
            files,
            vec![dir.path().join("a.MXF"), dir.path().join("b.mov"), loose]
        );

        let missing = dir.path().join("missing.mov");
        assert!(expand_inputs(&[missing], &config).is_err());
        Ok(())
    }
}
