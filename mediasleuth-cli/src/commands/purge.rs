//! Implementation of the 'purge' subcommand.
//!
//! Intermediate images are never deleted per inspection; this command
//! reclaims the whole scratch root at once.

use crate::cli::PurgeArgs;

use mediasleuth_core::{InspectionConfig, PurgeSummary, ScratchSpace};

use anyhow::{Context, Result};
use log::info;

/// Deletes everything under the scratch root and reports what went.
pub fn run_purge(args: PurgeArgs) -> Result<PurgeSummary> {
    let root = args
        .scratch_root
        .unwrap_or_else(|| InspectionConfig::default().scratch_root);
    let scratch = ScratchSpace::new(root);

    let summary = scratch
        .purge()
        .with_context(|| format!("Failed to purge '{}'", scratch.root().display()))?;
    info!("Purge of {} complete", scratch.root().display());
    println!(
        "  ✓ Purged {} file(s), {} bytes from {}",
        summary.files_removed,
        summary.bytes_removed,
        scratch.root().display()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_purge_counts_files() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path().join("scratch");
        std::fs::create_dir_all(root.join("pixel_strip"))?;
        std::fs::write(root.join("pixel_strip").join("a.png"), [0u8; 10])?;

        let summary = run_purge(PurgeArgs {
            scratch_root: Some(root.clone()),
        })?;
        assert_eq!(summary.files_removed, 1);
        assert_eq!(summary.bytes_removed, 10);
        assert!(!root.exists());
        Ok(())
    }
}
