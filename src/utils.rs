/// Helpers shared by the pipeline and the batch runner.
use crate::constants::{PROGRESS_SPINNER_TEMPLATE, SUPPORTED_IMAGE_EXTENSIONS};
use crate::logger;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Check if a file path has one of the supported image extensions,
/// ignoring case.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext_lower = ext.to_lowercase();
            SUPPORTED_IMAGE_EXTENSIONS.contains(&ext_lower.as_str())
        })
        .unwrap_or(false)
}

/// Create a progress spinner with consistent styling.
///
/// Returns a hidden spinner in quiet mode.
pub fn create_progress_spinner(message: &str) -> ProgressBar {
    if logger::is_quiet() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template(PROGRESS_SPINNER_TEMPLATE) {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb
}

/// Runs `task` under a spinner and clears the spinner whether or not the
/// task succeeded.
pub fn with_spinner<T>(message: &str, task: impl FnOnce(&ProgressBar) -> T) -> T {
    let spinner = create_progress_spinner(message);
    let outcome = task(&spinner);
    spinner.finish_and_clear();
    outcome
}

/// Format file size in human-readable format
///
/// # Arguments
/// * `bytes` - Size in bytes
///
/// # Returns
/// * Size with one decimal place (e.g. "1.5 KB", "512.0 B"), or "0 B" for zero
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    format!("{:.1} {}", size, UNITS[unit_index])
}

/// Calculate compression ratio as a percentage
///
/// # Arguments
/// * `original_size` - Original file size in bytes
/// * `compressed_size` - Compressed file size in bytes
///
/// # Returns
/// * Percentage of bytes saved (negative when the output grew)
pub fn calculate_compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    (1.0 - compressed_size as f64 / original_size as f64) * 100.0
}

/// Progress after `index` of `total` files, in percent.
pub fn progress_percent(index: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    index as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("test.jpg")));
        assert!(is_image_file(Path::new("test.JPEG")));
        assert!(is_image_file(Path::new("test.png")));
        assert!(is_image_file(Path::new("test.webp")));
        assert!(is_image_file(Path::new("test.bmp")));
        assert!(is_image_file(Path::new("test.tiff")));
        assert!(is_image_file(Path::new("test.TiFf")));

        assert!(!is_image_file(Path::new("test.gif")));
        assert!(!is_image_file(Path::new("test.tif")));
        assert!(!is_image_file(Path::new("test.txt")));
        assert!(!is_image_file(Path::new("test")));
        assert!(!is_image_file(Path::new(".jpg")));
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512.0 B");
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1.0 GB");
    }

    #[test]
    fn test_format_file_size_caps_at_gb() {
        assert_eq!(format_file_size(2 * 1024 * 1024 * 1024 * 1024), "2048.0 GB");
    }

    #[test]
    fn test_calculate_compression_ratio() {
        assert!((calculate_compression_ratio(1000, 800) - 20.0).abs() < 1e-9);
        assert!((calculate_compression_ratio(1000, 1200) + 20.0).abs() < 1e-9);
        assert_eq!(calculate_compression_ratio(1000, 1000), 0.0);
        assert_eq!(calculate_compression_ratio(0, 500), 0.0);
    }

    #[test]
    fn test_with_spinner_clears_on_error() {
        let mut used = None;
        let outcome: Result<(), &str> = with_spinner("Working...", |spinner| {
            used = Some(spinner.clone());
            Err("decode failed")
        });

        assert_eq!(outcome, Err("decode failed"));
        assert!(used.unwrap().is_finished());
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(1, 4), 25.0);
        assert_eq!(progress_percent(4, 4), 100.0);
        assert_eq!(progress_percent(0, 0), 100.0);
    }
}
