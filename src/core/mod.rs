// imgbound/src/core/mod.rs
pub mod processor;

use std::fmt;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_MAX_DIMENSION: u32 = 1000;
pub const DEFAULT_QUALITY: u8 = 100;
/// Upper bound for `max_dimension`. A square at this size is already 10^10
/// pixels, so larger targets would only exhaust memory in the resampler.
pub const MAX_ALLOWED_DIMENSION: u32 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeAlgorithm {
    Nearest,
    Bilinear,
    #[default]
    Bicubic,
    Lanczos3,
}

/// Target encoding for a resized image.
///
/// Every variant can be named, but only those with an encoder compiled into
/// the `image` dependency can actually be produced; the rest fail with
/// [`ResizeError::UnsupportedFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    Tiff,
    Jpeg,
    Png,
    Bmp,
    Gif,
    WebP,
    Avif,
    Qoi,
}

impl TargetFormat {
    pub fn extension(self) -> &'static str {
        match self {
            TargetFormat::Tiff => "tiff",
            TargetFormat::Jpeg => "jpg",
            TargetFormat::Png => "png",
            TargetFormat::Bmp => "bmp",
            TargetFormat::Gif => "gif",
            TargetFormat::WebP => "webp",
            TargetFormat::Avif => "avif",
            TargetFormat::Qoi => "qoi",
        }
    }

    pub fn to_image_format(self) -> image::ImageFormat {
        match self {
            TargetFormat::Tiff => image::ImageFormat::Tiff,
            TargetFormat::Jpeg => image::ImageFormat::Jpeg,
            TargetFormat::Png => image::ImageFormat::Png,
            TargetFormat::Bmp => image::ImageFormat::Bmp,
            TargetFormat::Gif => image::ImageFormat::Gif,
            TargetFormat::WebP => image::ImageFormat::WebP,
            TargetFormat::Avif => image::ImageFormat::Avif,
            TargetFormat::Qoi => image::ImageFormat::Qoi,
        }
    }

    /// Whether the encoder makes use of the quality setting.
    pub fn is_lossy(self) -> bool {
        matches!(self, TargetFormat::Jpeg | TargetFormat::Avif)
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetFormat::Tiff => "TIFF",
            TargetFormat::Jpeg => "JPEG",
            TargetFormat::Png => "PNG",
            TargetFormat::Bmp => "BMP",
            TargetFormat::Gif => "GIF",
            TargetFormat::WebP => "WebP",
            TargetFormat::Avif => "AVIF",
            TargetFormat::Qoi => "QOI",
        };
        f.write_str(name)
    }
}

impl FromStr for TargetFormat {
    type Err = ResizeError;

    /// Accepts format names and file extensions, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "tif" | "tiff" => Ok(TargetFormat::Tiff),
            "jpg" | "jpeg" => Ok(TargetFormat::Jpeg),
            "png" => Ok(TargetFormat::Png),
            "bmp" => Ok(TargetFormat::Bmp),
            "gif" => Ok(TargetFormat::Gif),
            "webp" => Ok(TargetFormat::WebP),
            "avif" => Ok(TargetFormat::Avif),
            "qoi" => Ok(TargetFormat::Qoi),
            other => Err(ResizeError::UnsupportedFormat(format!(
                "Unknown image format: {}",
                other
            ))),
        }
    }
}

/// Settings shared by every resize call made through one resizer.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeConfig {
    max_dimension: u32,
    quality: u8,
    algorithm: ResizeAlgorithm,
    optimize_png: bool,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            quality: DEFAULT_QUALITY,
            algorithm: ResizeAlgorithm::default(),
            optimize_png: false,
        }
    }
}

impl ResizeConfig {
    pub fn new(max_dimension: u32, quality: u8) -> Result<Self> {
        let config = Self {
            max_dimension,
            quality,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_algorithm(mut self, algorithm: ResizeAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_png_optimization(mut self, optimize: bool) -> Self {
        self.optimize_png = optimize;
        self
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn algorithm(&self) -> ResizeAlgorithm {
        self.algorithm
    }

    pub fn optimize_png(&self) -> bool {
        self.optimize_png
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_dimension == 0 {
            return Err(ResizeError::InvalidArgument(
                "Maximum dimension must be at least 1 pixel".to_string(),
            ));
        }

        if self.max_dimension > MAX_ALLOWED_DIMENSION {
            return Err(ResizeError::InvalidArgument(format!(
                "Maximum dimension too large (max {} pixels)",
                MAX_ALLOWED_DIMENSION
            )));
        }

        if self.quality > 100 {
            return Err(ResizeError::InvalidArgument(
                "Quality must be between 0 and 100".to_string(),
            ));
        }

        Ok(())
    }
}

/// Encoded image bytes, positioned at the start for reading.
#[derive(Debug, Clone)]
pub struct EncodedStream {
    inner: Cursor<Vec<u8>>,
}

impl EncodedStream {
    pub(crate) fn from_cursor(mut cursor: Cursor<Vec<u8>>) -> Self {
        cursor.set_position(0);
        Self { inner: cursor }
    }

    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.get_ref().is_empty()
    }

    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.inner.get_ref()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

impl Read for EncodedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for EncodedStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Encoding error: {0}")]
    Encode(#[source] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Processing error: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, ResizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_values() {
        let config = ResizeConfig::default();
        assert_eq!(config.max_dimension(), 1000);
        assert_eq!(config.quality(), 100);
        assert_eq!(config.algorithm(), ResizeAlgorithm::Bicubic);
        assert!(!config.optimize_png());
    }

    #[test]
    fn config_rejects_zero_dimension() {
        assert!(matches!(
            ResizeConfig::new(0, 90),
            Err(ResizeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn config_rejects_quality_above_100() {
        assert!(matches!(
            ResizeConfig::new(500, 101),
            Err(ResizeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn config_rejects_dimension_above_limit() {
        assert!(ResizeConfig::new(MAX_ALLOWED_DIMENSION, 90).is_ok());
        assert!(matches!(
            ResizeConfig::new(MAX_ALLOWED_DIMENSION + 1, 90),
            Err(ResizeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn config_accepts_zero_quality() {
        let config = ResizeConfig::new(1, 0).unwrap();
        assert_eq!(config.quality(), 0);
    }

    #[test]
    fn target_format_parses_names_and_extensions() {
        assert_eq!("TIF".parse::<TargetFormat>().unwrap(), TargetFormat::Tiff);
        assert_eq!(".jpeg".parse::<TargetFormat>().unwrap(), TargetFormat::Jpeg);
        assert_eq!("WebP".parse::<TargetFormat>().unwrap(), TargetFormat::WebP);
        assert!(matches!(
            "xcf".parse::<TargetFormat>(),
            Err(ResizeError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn encoded_stream_starts_at_zero() {
        let mut cursor = Cursor::new(Vec::new());
        std::io::Write::write_all(&mut cursor, b"abc").unwrap();
        assert_eq!(cursor.position(), 3);

        let mut stream = EncodedStream::from_cursor(cursor);
        assert_eq!(stream.position(), 0);

        let mut out = Vec::new();
        stream.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"abc");
    }
}
