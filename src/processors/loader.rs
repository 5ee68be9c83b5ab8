// imgbound/src/processors/loader.rs
use crate::core::{ResizeError, Result};
use image::{DynamicImage, ImageError, ImageReader};
use std::path::Path;

#[derive(Clone, Default)]
pub struct Loader;

impl Loader {
    pub fn new() -> Self {
        Self
    }

    /// Decodes the file at `path`, guessing the source format from its contents.
    pub fn load(&self, path: &Path) -> Result<DynamicImage> {
        log::debug!("Loading image from: {}", path.display());

        let decode_err = |source: ImageError| ResizeError::Decode {
            path: path.to_path_buf(),
            source,
        };

        let image = ImageReader::open(path)
            .map_err(|e| decode_err(ImageError::IoError(e)))?
            .with_guessed_format()
            .map_err(|e| decode_err(ImageError::IoError(e)))?
            .decode()
            .map_err(decode_err)?;

        log::debug!(
            "Loaded image: {}x{} pixels, color: {:?}",
            image.width(),
            image.height(),
            image.color()
        );

        Ok(image)
    }
}
