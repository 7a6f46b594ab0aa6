//! Scratch storage for intermediate artifacts.
//!
//! Pixel strips and head frames are written under one scratch root
//! (`<system temp>/mediasleuth` by default), each in its own sub-folder and
//! named with a fresh UUID so concurrent inspections never collide. Nothing
//! is deleted per inspection; [`ScratchSpace::purge`] reclaims everything.

use crate::error::CoreResult;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Sub-folder for pixel strip images.
pub const PIXEL_STRIP_DIR: &str = "pixel_strip";

/// Sub-folder for filtered head frames.
pub const HEAD_FRAME_DIR: &str = "head_frame";

/// Handle on the scratch root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchSpace {
    root: PathBuf,
}

/// What a purge removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeSummary {
    pub files_removed: usize,
    pub bytes_removed: u64,
}

impl ScratchSpace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns `<root>/<kind>/<uuid>.<extension>`, creating the folder.
    /// The file itself is not created.
    pub fn artifact_path(&self, kind: &str, extension: &str) -> CoreResult<PathBuf> {
        let dir = self.root.join(kind);
        std::fs::create_dir_all(&dir)?;
        let extension = extension.trim_start_matches('.');
        Ok(dir.join(format!("{}.{}", Uuid::new_v4(), extension)))
    }

    /// Deletes everything under the root. A missing root is an empty purge.
    pub fn purge(&self) -> CoreResult<PurgeSummary> {
        if !self.root.exists() {
            log::debug!("Scratch root {} does not exist, nothing to purge", self.root.display());
            return Ok(PurgeSummary::default());
        }

        let mut summary = PurgeSummary::default();
        tally(&self.root, &mut summary)?;
        std::fs::remove_dir_all(&self.root)?;
        log::info!(
            "Purged {} file(s), {} bytes from {}",
            summary.files_removed,
            summary.bytes_removed,
            self.root.display()
        );
        Ok(summary)
    }
}

fn tally(dir: &Path, summary: &mut PurgeSummary) -> CoreResult<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            tally(&entry.path(), summary)?;
        } else {
            summary.files_removed += 1;
            summary.bytes_removed += entry.metadata().map(|m| m.len()).unwrap_or(0);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_artifact_paths_are_unique() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let scratch = ScratchSpace::new(dir.path().join("mediasleuth"));

        let a = scratch.artifact_path(PIXEL_STRIP_DIR, "png")?;
        let b = scratch.artifact_path(PIXEL_STRIP_DIR, ".png")?;
        assert_ne!(a, b);
        assert_eq!(a.parent(), Some(scratch.root().join(PIXEL_STRIP_DIR).as_path()));
        assert_eq!(b.extension().and_then(|e| e.to_str()), Some("png"));
        assert!(a.parent().unwrap().is_dir());
        Ok(())
    }

    #[test]
    fn test_purge_removes_everything() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let scratch = ScratchSpace::new(dir.path().join("mediasleuth"));
        std::fs::write(scratch.artifact_path(PIXEL_STRIP_DIR, "png")?, b"1234")?;
        std::fs::write(scratch.artifact_path(HEAD_FRAME_DIR, "png")?, b"56")?;

        let summary = scratch.purge()?;
        assert_eq!(summary.files_removed, 2);
        assert_eq!(summary.bytes_removed, 6);
        assert!(!scratch.root().exists());

        assert_eq!(scratch.purge()?, PurgeSummary::default());
        Ok(())
    }
}
