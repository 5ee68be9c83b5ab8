// imgbound/src/core/processor.rs
use super::{EncodedStream, ResizeConfig, ResizeError, Result, TargetFormat};
use crate::processors::{compute_target_size, Encoder, Loader, Resampler};
use std::path::Path;

/// Decodes an image, fits it into the configured bounding square and
/// re-encodes it. One instance can serve any number of calls.
pub struct ImageResizer {
    config: ResizeConfig,
    loader: Loader,
    resampler: Resampler,
    encoder: Encoder,
}

impl ImageResizer {
    pub fn new(config: ResizeConfig) -> Self {
        let resampler = Resampler::new(config.algorithm());
        let encoder = Encoder::new(config.quality()).with_png_optimization(config.optimize_png());

        Self {
            config,
            loader: Loader::new(),
            resampler,
            encoder,
        }
    }

    /// Shorthand for [`ResizeConfig::new`] followed by [`ImageResizer::new`].
    pub fn with_settings(max_dimension: u32, quality: u8) -> Result<Self> {
        Ok(Self::new(ResizeConfig::new(max_dimension, quality)?))
    }

    pub fn config(&self) -> &ResizeConfig {
        &self.config
    }

    /// Resizes the image at `input_path` and encodes it as `format`.
    ///
    /// Arguments are checked before any file is touched: a missing format or
    /// an empty path is an [`ResizeError::InvalidArgument`].
    pub fn resize<P, F>(&self, input_path: P, format: F) -> Result<EncodedStream>
    where
        P: AsRef<Path>,
        F: Into<Option<TargetFormat>>,
    {
        let input_path = input_path.as_ref();

        let format = format.into().ok_or_else(|| {
            ResizeError::InvalidArgument("An output format must be specified".to_string())
        })?;

        if input_path.as_os_str().is_empty() {
            return Err(ResizeError::InvalidArgument(
                "Input path is empty, nothing to resize".to_string(),
            ));
        }

        let image = self.loader.load(input_path)?;

        let (width, height) =
            compute_target_size(image.width(), image.height(), self.config.max_dimension());
        let resized = self.resampler.resample(&image, width, height);
        drop(image);

        let stream = self.encoder.encode(&resized, format)?;

        log::info!(
            "Resized {} to {}x{} {} ({} bytes)",
            input_path.display(),
            width,
            height,
            format,
            stream.len()
        );

        Ok(stream)
    }
}

impl Default for ImageResizer {
    fn default() -> Self {
        Self::new(ResizeConfig::default())
    }
}
