use anyhow::{Context, Result};
use clap::Parser;
use imgbound::cli::{Algorithm, Cli, Commands, Format, OnError};
use imgbound::{
    format_file_size, sibling_output_path, BatchProcessor, ImageResizer, ResizeConfig, TargetFormat,
};
use log::LevelFilter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    match cli.command {
        Commands::Resize {
            input,
            output,
            max_dimension,
            quality,
            format,
            algorithm,
            optimize_png,
        } => process_resize(
            input,
            output,
            max_dimension,
            quality,
            format,
            algorithm,
            optimize_png,
        ),
        Commands::Batch {
            input,
            output,
            max_dimension,
            quality,
            format,
            algorithm,
            recursive,
            on_error,
            delete_originals,
            optimize_png,
        } => process_batch(
            input,
            output,
            build_config(max_dimension, quality, algorithm, optimize_png)?,
            format,
            recursive,
            on_error,
            delete_originals,
        ),
    }
}

fn build_config(
    max_dimension: u32,
    quality: u8,
    algorithm: Algorithm,
    optimize_png: bool,
) -> Result<ResizeConfig> {
    Ok(ResizeConfig::new(max_dimension, quality)?
        .with_algorithm(algorithm.into())
        .with_png_optimization(optimize_png))
}

fn process_resize(
    input: PathBuf,
    output: Option<PathBuf>,
    max_dimension: u32,
    quality: u8,
    format: Format,
    algorithm: Algorithm,
    optimize_png: bool,
) -> Result<()> {
    let format = TargetFormat::from(format);
    let output_path = output.unwrap_or_else(|| sibling_output_path(&input, "resized", format));

    let config = build_config(max_dimension, quality, algorithm, optimize_png)?;
    let resizer = ImageResizer::new(config);

    let mut stream = resizer
        .resize(&input, format)
        .with_context(|| format!("Failed to resize {}", input.display()))?;

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(&output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    let written = std::io::copy(&mut stream, &mut writer)?;
    writer.flush()?;

    println!(
        "Resized image saved to: {} ({})",
        output_path.display(),
        format_file_size(written)
    );

    Ok(())
}

fn process_batch(
    input: PathBuf,
    output: PathBuf,
    config: ResizeConfig,
    format: Format,
    recursive: bool,
    on_error: OnError,
    delete_originals: bool,
) -> Result<()> {
    let processor = BatchProcessor::new(ImageResizer::new(config), format.into())
        .with_policy(on_error.into())
        .with_recursion(recursive)
        .with_delete_originals(delete_originals)
        .with_progress(true);

    let report = processor
        .process_directory(&input, &output)
        .with_context(|| format!("Batch processing of {} failed", input.display()))?;

    println!(
        "Batch processing complete. Processed {} images to: {}",
        report.processed_count(),
        output.display()
    );

    if !report.failures.is_empty() {
        println!("Skipped {} images:", report.failures.len());
        for (path, reason) in &report.failures {
            println!("  {}: {}", path.display(), reason);
        }
    }

    if delete_originals {
        println!("Deleted {} original images", report.deleted_count);
        for (path, reason) in &report.delete_failures {
            println!("  could not delete {}: {}", path.display(), reason);
        }
    }

    Ok(())
}
