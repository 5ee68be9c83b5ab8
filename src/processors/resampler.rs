// imgbound/src/processors/resampler.rs
use crate::core::ResizeAlgorithm;
use image::{imageops::FilterType, DynamicImage};

pub struct Resampler {
    algorithm: ResizeAlgorithm,
}

impl Resampler {
    pub fn new(algorithm: ResizeAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Produces a new `width` x `height` image. The destination is written
    /// outright from the filtered source; `image` itself is left untouched.
    pub fn resample(&self, image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        if width == image.width() && height == image.height() {
            log::debug!("Image dimensions unchanged, skipping resample");
            return image.clone();
        }

        log::debug!(
            "Resampling image from {}x{} to {}x{} ({:?})",
            image.width(),
            image.height(),
            width,
            height,
            self.algorithm
        );

        image.resize_exact(width, height, self.filter_type())
    }

    fn filter_type(&self) -> FilterType {
        match self.algorithm {
            ResizeAlgorithm::Nearest => FilterType::Nearest,
            ResizeAlgorithm::Bilinear => FilterType::Triangle,
            ResizeAlgorithm::Bicubic => FilterType::CatmullRom,
            ResizeAlgorithm::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new(ResizeAlgorithm::default())
    }
}
