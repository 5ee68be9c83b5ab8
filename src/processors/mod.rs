// imgbound/src/processors/mod.rs
mod batch;
mod dimensions;
mod encoder;
mod loader;
mod resampler;

pub use batch::{BatchProcessor, BatchReport, FailurePolicy};
pub use dimensions::compute_target_size;
pub use encoder::Encoder;
pub use loader::Loader;
pub use resampler::Resampler;
