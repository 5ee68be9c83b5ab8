// imgbound/src/cli.rs
use crate::core::{ResizeAlgorithm, TargetFormat, DEFAULT_MAX_DIMENSION, DEFAULT_QUALITY};
use crate::processors::FailurePolicy;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "imgbound", version, about = "Fit images into a bounding box and re-encode them")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resize a single image
    Resize {
        /// Image to resize
        input: PathBuf,

        /// Output file (defaults to <stem>_resized.<ext> beside the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Longest side of the result, in pixels
        #[arg(short, long, default_value_t = DEFAULT_MAX_DIMENSION, value_parser = clap::value_parser!(u32).range(1..))]
        max_dimension: u32,

        /// Encoding quality (0-100, only used by lossy formats)
        #[arg(short, long, default_value_t = DEFAULT_QUALITY, value_parser = clap::value_parser!(u8).range(0..=100))]
        quality: u8,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Tiff)]
        format: Format,

        /// Resampling filter
        #[arg(short, long, value_enum, default_value_t = Algorithm::Bicubic)]
        algorithm: Algorithm,

        /// Run a lossless optimization pass over PNG output
        #[arg(long)]
        optimize_png: bool,
    },

    /// Resize every image in a directory
    Batch {
        /// Directory holding the source images
        input: PathBuf,

        /// Directory to write results into
        output: PathBuf,

        #[arg(short, long, default_value_t = DEFAULT_MAX_DIMENSION, value_parser = clap::value_parser!(u32).range(1..))]
        max_dimension: u32,

        #[arg(short, long, default_value_t = DEFAULT_QUALITY, value_parser = clap::value_parser!(u8).range(0..=100))]
        quality: u8,

        #[arg(short, long, value_enum, default_value_t = Format::Tiff)]
        format: Format,

        #[arg(short, long, value_enum, default_value_t = Algorithm::Bicubic)]
        algorithm: Algorithm,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Whether a failed file stops the batch or is skipped
        #[arg(long, value_enum, default_value_t = OnError::Abort)]
        on_error: OnError,

        /// Delete each source image after its output has been written
        #[arg(long)]
        delete_originals: bool,

        #[arg(long)]
        optimize_png: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos3,
}

impl From<Algorithm> for ResizeAlgorithm {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Nearest => ResizeAlgorithm::Nearest,
            Algorithm::Bilinear => ResizeAlgorithm::Bilinear,
            Algorithm::Bicubic => ResizeAlgorithm::Bicubic,
            Algorithm::Lanczos3 => ResizeAlgorithm::Lanczos3,
        }
    }
}

/// Output formats with an encoder in this build.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Tiff,
    Jpeg,
    Png,
    Bmp,
    Gif,
    /// Lossless WebP
    Webp,
}

impl From<Format> for TargetFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Tiff => TargetFormat::Tiff,
            Format::Jpeg => TargetFormat::Jpeg,
            Format::Png => TargetFormat::Png,
            Format::Bmp => TargetFormat::Bmp,
            Format::Gif => TargetFormat::Gif,
            Format::Webp => TargetFormat::WebP,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnError {
    Abort,
    Skip,
}

impl From<OnError> for FailurePolicy {
    fn from(on_error: OnError) -> Self {
        match on_error {
            OnError::Abort => FailurePolicy::Abort,
            OnError::Skip => FailurePolicy::Skip,
        }
    }
}
