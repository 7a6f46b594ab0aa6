// ============================================================================
// mediasleuth-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for InspectionConfig
//
// Fluent overrides on top of the environment-aware defaults. `build()`
// validates, so a built config is always usable by the pipeline.

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::InspectionConfig;
use crate::analysis::luma::LumaMethod;
use crate::error::CoreResult;

/// Builder for creating InspectionConfig instances.
#[derive(Debug, Clone, Default)]
pub struct InspectionConfigBuilder {
    config: InspectionConfig,
}

impl InspectionConfigBuilder {
    /// Starts from `InspectionConfig::default()`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.scratch_root = root.into();
        self
    }

    pub fn worker_count(mut self, count: usize) -> Self {
        self.config.worker_count = count;
        self
    }

    pub fn ffmpeg_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.ffmpeg.log_level = level.into();
        self
    }

    pub fn proxy_filetype(mut self, ext: impl Into<String>) -> Self {
        self.config.ffmpeg.proxy_filetype = ext.into();
        self
    }

    pub fn tile_size(mut self, size: u32) -> Self {
        self.config.pixel_strip.tile_size = size;
        self
    }

    /// Negative tolerances are taken as their absolute value.
    pub fn luma_tolerance(mut self, tolerance: f64) -> Self {
        self.config.pixel_strip.tolerance = tolerance.abs();
        self
    }

    pub fn luma_method(mut self, method: LumaMethod) -> Self {
        self.config.pixel_strip.luma_method = method;
        self
    }

    pub fn slate_seconds(mut self, slate: f64, black_after: f64) -> Self {
        self.config.slate.slate_seconds = slate;
        self.config.slate.black_after_slate_seconds = black_after;
        self
    }

    pub fn tail_black_luma(mut self, luma: f64) -> Self {
        self.config.slate.tail_black_luma = luma;
        self
    }

    pub fn edge_crop(mut self, margin: u32) -> Self {
        self.config.slate_reader.edge_crop = margin;
        self
    }

    pub fn slate_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.slate_reader.filter = filter.into();
        self
    }

    pub fn slate_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.slate_reader.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn guard_frames(mut self, frames: u32) -> Self {
        self.config.audio.guard_frames = frames;
        self
    }

    pub fn end_nudge_frames(mut self, frames: f64) -> Self {
        self.config.audio.end_nudge_frames = frames;
        self
    }

    pub fn containers<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.containers = extensions
            .into_iter()
            .map(|e| e.into().to_ascii_lowercase())
            .collect();
        self
    }

    /// Validates and returns the finished configuration.
    pub fn build(self) -> CoreResult<InspectionConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_builder_overrides() {
        let config = InspectionConfigBuilder::new()
            .worker_count(3)
            .luma_tolerance(-2.5)
            .slate_keys(["title"])
            .containers(["MXF"])
            .build()
            .unwrap();

        assert_eq!(config.worker_count, 3);
        assert_eq!(config.pixel_strip.tolerance, 2.5);
        assert_eq!(config.slate_reader.keys, vec!["title".to_string()]);
        assert!(config.accepts_extension("mxf"));
        assert!(!config.accepts_extension("mov"));
    }

    #[test]
    fn test_builder_rejects_zero_workers() {
        let result = InspectionConfigBuilder::new().worker_count(0).build();
        assert!(matches!(result, Err(CoreError::Config(_))));
    }
}
