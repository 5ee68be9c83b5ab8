// imgbound/src/processors/batch.rs
use crate::core::processor::ImageResizer;
use crate::core::{ResizeError, Result, TargetFormat};
use crate::utils::{format_file_size, is_supported_format, unique_output_path};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What to do when one file in a batch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure and return its error.
    #[default]
    Abort,
    /// Record the failure and carry on with the next file.
    Skip,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, String)>,
    pub deleted_count: usize,
    pub delete_failures: Vec<(PathBuf, String)>,
    pub total_size_before: u64,
    pub total_size_after: u64,
}

impl BatchReport {
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    pub fn savings_percent(&self) -> f64 {
        if self.total_size_before == 0 {
            return 0.0;
        }

        let savings = (self.total_size_before as f64 - self.total_size_after as f64)
            / self.total_size_before as f64
            * 100.0;
        savings.clamp(0.0, 100.0)
    }
}

/// Runs an [`ImageResizer`] over many files, one after another, writing each
/// result into an output directory.
pub struct BatchProcessor {
    resizer: ImageResizer,
    format: TargetFormat,
    policy: FailurePolicy,
    recursive: bool,
    delete_originals: bool,
    show_progress: bool,
}

impl BatchProcessor {
    pub fn new(resizer: ImageResizer, format: TargetFormat) -> Self {
        Self {
            resizer,
            format,
            policy: FailurePolicy::default(),
            recursive: false,
            delete_originals: false,
            show_progress: false,
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_recursion(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Remove each source once the whole batch is done and its output exists.
    pub fn with_delete_originals(mut self, delete: bool) -> Self {
        self.delete_originals = delete;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn process_directory(&self, input_dir: &Path, output_dir: &Path) -> Result<BatchReport> {
        self.validate_paths(input_dir, output_dir)?;

        let image_paths = self.collect_image_paths(input_dir);

        if image_paths.is_empty() {
            log::warn!("No image files found in {}", input_dir.display());
            return Ok(BatchReport::default());
        }

        log::info!(
            "Processing {} images from {}",
            image_paths.len(),
            input_dir.display()
        );

        self.process_files(&image_paths, output_dir)
    }

    /// Processes `paths` in order. With [`FailurePolicy::Abort`] the first
    /// failure is returned and no originals are deleted.
    ///
    /// Output names are fixed before any file is written, so two sources that
    /// share a stem never write to the same file.
    pub fn process_files(&self, paths: &[PathBuf], output_dir: &Path) -> Result<BatchReport> {
        std::fs::create_dir_all(output_dir)?;
        let output_paths = self.plan_outputs(paths, output_dir)?;

        let pb = self.create_progress_bar(paths.len());
        let mut report = BatchReport::default();

        for (input_path, output_path) in paths.iter().zip(&output_paths) {
            pb.set_message(display_name(input_path));

            match self.process_one(input_path, output_path) {
                Ok((before, after)) => {
                    report.total_size_before += before;
                    report.total_size_after += after;
                    report.processed.push(input_path.clone());
                }
                Err(e) => match self.policy {
                    FailurePolicy::Abort => {
                        pb.abandon_with_message(format!("Failed on {}", input_path.display()));
                        log::error!("Aborting batch at {}: {}", input_path.display(), e);
                        return Err(e);
                    }
                    FailurePolicy::Skip => {
                        log::warn!("Skipping {}: {}", input_path.display(), e);
                        report.failures.push((input_path.clone(), e.to_string()));
                    }
                },
            }

            pb.inc(1);
        }

        if self.delete_originals {
            self.delete_processed(&mut report);
        }

        pb.finish_with_message(format!(
            "Processed {} images ({:.1}% size reduction)",
            report.processed_count(),
            report.savings_percent()
        ));

        log::info!(
            "Batch complete: {} processed, {} failed, {} deleted, {} -> {}",
            report.processed_count(),
            report.failures.len(),
            report.deleted_count,
            format_file_size(report.total_size_before),
            format_file_size(report.total_size_after)
        );

        Ok(report)
    }

    /// Picks one distinct output file per source. Fails if an output would
    /// land on one of the sources themselves.
    fn plan_outputs(&self, paths: &[PathBuf], output_dir: &Path) -> Result<Vec<PathBuf>> {
        let sources: HashSet<PathBuf> = paths
            .iter()
            .filter_map(|path| path.canonicalize().ok())
            .collect();

        let mut taken = HashSet::new();
        let mut outputs = Vec::with_capacity(paths.len());

        for input_path in paths {
            let output_path = unique_output_path(input_path, output_dir, self.format, &taken)?;

            if let Ok(resolved) = output_path.canonicalize() {
                if sources.contains(&resolved) {
                    return Err(ResizeError::InvalidArgument(format!(
                        "Output {} would overwrite a source image",
                        output_path.display()
                    )));
                }
            }

            if let Some(name) = output_path.file_name() {
                taken.insert(name.to_string_lossy().to_lowercase());
            }
            if output_path.file_stem() != input_path.file_stem() {
                log::warn!(
                    "{} shares its name with another source, writing {}",
                    input_path.display(),
                    output_path.display()
                );
            }
            outputs.push(output_path);
        }

        Ok(outputs)
    }

    fn process_one(&self, input_path: &Path, output_path: &Path) -> Result<(u64, u64)> {
        let mut stream = self.resizer.resize(input_path, self.format)?;
        let size_before = std::fs::metadata(input_path)?.len();

        let mut writer = BufWriter::new(File::create(output_path)?);
        let size_after = std::io::copy(&mut stream, &mut writer)?;
        writer.flush()?;

        log::debug!("Wrote {}", output_path.display());

        Ok((size_before, size_after))
    }

    /// Deletes every processed source. A failed delete is recorded and the
    /// rest still run, so the report always says which originals are gone.
    fn delete_processed(&self, report: &mut BatchReport) {
        for path in &report.processed {
            match std::fs::remove_file(path) {
                Ok(()) => {
                    report.deleted_count += 1;
                    log::debug!("Deleted original {}", path.display());
                }
                Err(e) => {
                    log::warn!("Could not delete {}: {}", path.display(), e);
                    report.delete_failures.push((path.clone(), e.to_string()));
                }
            }
        }
    }

    fn collect_image_paths(&self, input_dir: &Path) -> Vec<PathBuf> {
        let walker = if self.recursive {
            WalkDir::new(input_dir)
        } else {
            WalkDir::new(input_dir).max_depth(1)
        };

        let mut paths: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| is_supported_format(entry.path()))
            .map(|entry| entry.into_path())
            .collect();

        paths.sort();
        paths
    }

    fn create_progress_bar(&self, total: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb
    }

    pub fn validate_paths(&self, input_dir: &Path, output_dir: &Path) -> Result<()> {
        if !input_dir.exists() {
            return Err(ResizeError::InvalidArgument(format!(
                "Input directory does not exist: {}",
                input_dir.display()
            )));
        }

        if !input_dir.is_dir() {
            return Err(ResizeError::InvalidArgument(format!(
                "Input path is not a directory: {}",
                input_dir.display()
            )));
        }

        if output_dir.exists() && !output_dir.is_dir() {
            return Err(ResizeError::InvalidArgument(format!(
                "Output path exists but is not a directory: {}",
                output_dir.display()
            )));
        }

        std::fs::create_dir_all(output_dir)?;

        // Compare resolved paths so `d`, `./d` and symlinks to `d` all match.
        let input_resolved = input_dir.canonicalize()?;
        let output_resolved = output_dir.canonicalize()?;

        if input_resolved == output_resolved {
            return Err(ResizeError::InvalidArgument(
                "Input and output directories cannot be the same".to_string(),
            ));
        }

        if self.recursive && output_resolved.starts_with(&input_resolved) {
            return Err(ResizeError::InvalidArgument(format!(
                "Output directory {} is inside the input directory and would be scanned",
                output_dir.display()
            )));
        }

        Ok(())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
