// ============================================================================
// mediasleuth-core/src/analysis/pixel_strip.rs
// ============================================================================
//
// PIXEL STRIP: One Pixel per Frame Proxy Image
//
// ffmpeg scales every frame to a single pixel and tiles the pixels into one
// N×N image (`scale=1:1,tile=NxN`). Frame `i` lands at `(i mod N, i div N)`;
// tiles past the clip's frame count are padding and are ignored. The decoded
// pixels are then segmented into luma chunks.
//
// AI-ASSISTANT-INFO: Pixel strip generation, decoding and segmentation

// ---- External crate imports ----
use ffmpeg_sidecar::command::FfmpegCommand;
use image::RgbImage;

// ---- Standard library imports ----
use std::path::{Path, PathBuf};

// ---- Internal crate imports ----
use crate::analysis::luma::{
    LumaChunk, LumaMethod, PixelSample, normalize_chunks, segment_luma_chunks,
};
use crate::config::{FfmpegSettings, PixelStripSettings};
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegSpawner, FfprobeExecutor, run_to_completion};
use crate::temp_files::{PIXEL_STRIP_DIR, ScratchSpace};

/// Result of one pixel strip run.
#[derive(Debug, Clone)]
pub struct PixelStrip {
    pub image_path: PathBuf,
    pub fps: f64,
    pub frame_count: u64,
    pub chunks: Vec<LumaChunk>,
}

/// Reads frame-ordered samples out of a decoded strip image.
///
/// Only the top-left `tile_size`×`tile_size` area is read and pixels with a
/// frame index at or past `frame_count` are discarded.
pub fn samples_from_image(
    image: &RgbImage,
    tile_size: u32,
    frame_count: u64,
    method: LumaMethod,
) -> Vec<PixelSample> {
    let width = image.width().min(tile_size);
    let height = image.height().min(tile_size);
    let mut samples = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let frame = u64::from(x) + u64::from(y) * u64::from(tile_size);
            if frame >= frame_count {
                return samples;
            }
            let pixel = image.get_pixel(x, y);
            samples.push(PixelSample::new(frame, x, y, pixel.0, method));
        }
    }
    samples
}

/// Builds and segments pixel strips.
pub struct PixelStripAnalyzer<'a, S> {
    spawner: &'a S,
    ffmpeg: &'a FfmpegSettings,
    settings: &'a PixelStripSettings,
    scratch: &'a ScratchSpace,
}

impl<'a, S: FfmpegSpawner> PixelStripAnalyzer<'a, S> {
    pub fn new(
        spawner: &'a S,
        ffmpeg: &'a FfmpegSettings,
        settings: &'a PixelStripSettings,
        scratch: &'a ScratchSpace,
    ) -> Self {
        Self {
            spawner,
            ffmpeg,
            settings,
            scratch,
        }
    }

    /// Probes fps and frame count, then runs [`Self::analyze`].
    pub fn analyze_file<P: FfprobeExecutor>(
        &self,
        prober: &P,
        input_path: &Path,
    ) -> CoreResult<PixelStrip> {
        let metadata = prober.probe(input_path)?;
        let fps = metadata.fps().ok_or(CoreError::MissingField("fps"))?;
        let frame_count = metadata
            .frame_count()
            .ok_or(CoreError::MissingField("nb_frames"))?;
        self.analyze(input_path, fps, frame_count)
    }

    /// Generates the strip for a clip of known fps and frame count.
    pub fn analyze(&self, input_path: &Path, fps: f64, frame_count: u64) -> CoreResult<PixelStrip> {
        let tile = self.settings.tile_size;
        let capacity = u64::from(tile) * u64::from(tile);
        if frame_count > capacity {
            log::warn!(
                "{} has {} frames; the {}x{} strip only covers the first {}",
                input_path.display(),
                frame_count,
                tile,
                tile,
                capacity
            );
        }

        let image_path = self
            .scratch
            .artifact_path(PIXEL_STRIP_DIR, &self.ffmpeg.proxy_filetype)?;

        let mut cmd = FfmpegCommand::new();
        cmd.args(["-y", "-loglevel", self.ffmpeg.log_level.as_str()]);
        cmd.input(input_path.to_string_lossy().as_ref());
        cmd.args(["-frames:v", "1", "-vf", &format!("scale=1:1,tile={tile}x{tile}")]);
        cmd.output(image_path.to_string_lossy().as_ref());
        run_to_completion(self.spawner, cmd, "pixel strip")?;

        let image = image::open(&image_path)
            .map_err(|e| CoreError::ImageDecode {
                path: image_path.clone(),
                message: e.to_string(),
            })?
            .to_rgb8();

        let samples = samples_from_image(&image, tile, frame_count, self.settings.luma_method);
        let chunks = segment_luma_chunks(samples, self.settings.tolerance, fps);

        if log::log_enabled!(log::Level::Debug) {
            let normalized = normalize_chunks(chunks.clone(), self.settings.normalize_min_frames);
            for chunk in &normalized {
                log::debug!("{}: {}", input_path.display(), chunk.describe());
            }
        }

        Ok(PixelStrip {
            image_path,
            fps,
            frame_count,
            chunks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_samples_follow_tile_order() {
        let tile = 4;
        let mut image = RgbImage::new(tile, tile);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            let v = (x + y * tile) as u8 * 10;
            *pixel = Rgb([v, v, v]);
        }

        let samples = samples_from_image(&image, tile, 6, LumaMethod::Rec709);
        assert_eq!(samples.len(), 6);
        let frames: Vec<u64> = samples.iter().map(|s| s.frame).collect();
        assert_eq!(frames, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!((samples[5].x, samples[5].y), (1, 1));
        assert!((samples[5].luma - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_samples_clip_to_tile_size() {
        let image = RgbImage::new(8, 8);
        let samples = samples_from_image(&image, 2, 100, LumaMethod::Rec709);
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[3].frame, 3);
    }
}
