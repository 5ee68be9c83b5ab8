// imgbound/src/utils/mod.rs
use crate::core::{ResizeError, Result, TargetFormat};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const INPUT_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp"];

/// Output file for `input_path` inside `output_dir`: same stem, extension of
/// the target format.
pub fn output_path_for(input_path: &Path, output_dir: &Path, format: TargetFormat) -> Result<PathBuf> {
    let stem = input_path.file_stem().ok_or_else(|| {
        ResizeError::InvalidArgument(format!("Invalid file name: {}", input_path.display()))
    })?;

    let mut file_name = stem.to_os_string();
    file_name.push(".");
    file_name.push(format.extension());
    Ok(output_dir.join(file_name))
}

/// Like [`output_path_for`], but adds `_1`, `_2`, ... to the stem until the
/// file name is not in `taken`. Names in `taken` are lowercase so that
/// case-insensitive filesystems cannot merge two outputs.
pub fn unique_output_path(
    input_path: &Path,
    output_dir: &Path,
    format: TargetFormat,
    taken: &HashSet<String>,
) -> Result<PathBuf> {
    let mut path = output_path_for(input_path, output_dir, format)?;
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut counter = 1;
    while is_taken(&path, taken) {
        path = output_dir.join(format!("{}_{}.{}", stem, counter, format.extension()));
        counter += 1;
    }

    Ok(path)
}

fn is_taken(path: &Path, taken: &HashSet<String>) -> bool {
    path.file_name()
        .map(|name| taken.contains(&name.to_string_lossy().to_lowercase()))
        .unwrap_or(false)
}

/// Default single-file output: `<stem>_<suffix>.<ext>` next to the input.
pub fn sibling_output_path(input_path: &Path, suffix: &str, format: TargetFormat) -> PathBuf {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");

    input_path.with_file_name(format!("{}_{}.{}", stem, suffix, format.extension()))
}

pub fn is_supported_format(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| INPUT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base = 1024_f64;
    let bytes_f64 = bytes as f64;
    let exponent = ((bytes_f64.log10() / base.log10()).floor() as usize).min(UNITS.len() - 1);
    let size = bytes_f64 / base.powi(exponent as i32);

    format!("{:.2} {}", size, UNITS[exponent])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_swaps_extension() {
        let out = output_path_for(Path::new("/in/photo.JPG"), Path::new("/out"), TargetFormat::Tiff).unwrap();
        assert_eq!(out, PathBuf::from("/out/photo.tiff"));
    }

    #[test]
    fn output_path_keeps_dotted_stems() {
        let out = output_path_for(Path::new("a.b.png"), Path::new("o"), TargetFormat::Jpeg).unwrap();
        assert_eq!(out, Path::new("o").join("a.b.jpg"));
    }

    #[test]
    fn unique_path_counts_past_taken_names() {
        let taken: HashSet<String> = ["photo.tiff", "photo_1.tiff"].iter().map(|s| s.to_string()).collect();
        let out = unique_output_path(Path::new("/in/Photo.png"), Path::new("/out"), TargetFormat::Tiff, &taken).unwrap();
        assert_eq!(out, PathBuf::from("/out/Photo_2.tiff"));

        let free = unique_output_path(Path::new("/in/other.png"), Path::new("/out"), TargetFormat::Tiff, &taken).unwrap();
        assert_eq!(free, PathBuf::from("/out/other.tiff"));
    }

    #[test]
    fn sibling_path_adds_suffix() {
        let out = sibling_output_path(Path::new("/pics/cat.png"), "resized", TargetFormat::Jpeg);
        assert_eq!(out, PathBuf::from("/pics/cat_resized.jpg"));
    }

    #[test]
    fn supported_extensions_are_case_insensitive() {
        assert!(is_supported_format(Path::new("x.TIF")));
        assert!(is_supported_format(Path::new("x.jpeg")));
        assert!(!is_supported_format(Path::new("notes.txt")));
        assert!(!is_supported_format(Path::new("noext")));
    }

    #[test]
    fn file_sizes_are_humanized() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512.00 B");
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.00 MB");
    }
}
