pub mod cli;
mod core;
mod processors;
mod utils;

pub use crate::core::processor::ImageResizer;
pub use crate::core::{
    EncodedStream, ResizeAlgorithm, ResizeConfig, ResizeError, Result, TargetFormat,
    DEFAULT_MAX_DIMENSION, DEFAULT_QUALITY, MAX_ALLOWED_DIMENSION,
};
pub use processors::{
    compute_target_size, BatchProcessor, BatchReport, Encoder, FailurePolicy, Loader, Resampler,
};
pub use utils::{
    format_file_size, is_supported_format, output_path_for, sibling_output_path, unique_output_path,
};

pub mod prelude {
    pub use crate::{
        compute_target_size, BatchProcessor, FailurePolicy, ImageResizer, ResizeAlgorithm,
        ResizeConfig, TargetFormat,
    };
}

// Re-export commonly used types
pub use image::DynamicImage;
