use crate::constants::{
    DIMENSIONS_PREFIX, FOLDER_PREFIX, PROGRESS_PREFIX, SEPARATOR_WIDTH, SIZE_PREFIX,
};
use crate::error::{CompressionError, Result};
use crate::processing::{compress_one, CompressionRequest, CompressionResult};
use crate::stats::RunStatistics;
use crate::utils::{format_file_size, is_image_file, progress_percent};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// An input file selected for compression.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ImageFile {
    path: PathBuf,
}

impl ImageFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Lists the supported image files at `input`.
///
/// A file is returned on its own if its extension is supported. A
/// directory yields the supported files directly inside it, sorted by
/// path. Subdirectories are not searched.
pub fn collect_image_files(input: &Path) -> Result<Vec<ImageFile>> {
    if !input.exists() {
        return Err(CompressionError::PathNotFound(input.to_path_buf()));
    }

    if input.is_file() {
        let files = if is_image_file(input) {
            vec![ImageFile {
                path: input.to_path_buf(),
            }]
        } else {
            Vec::new()
        };
        return Ok(files);
    }

    let mut image_files = Vec::new();
    for entry in WalkDir::new(input).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                crate::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if path.is_file() && is_image_file(path) {
            image_files.push(ImageFile {
                path: path.to_path_buf(),
            });
        }
    }

    image_files.sort();
    Ok(image_files)
}

/// Output directory for a run: next to a single input file, or inside the
/// input directory.
pub fn output_dir_for(input: &Path, output_folder: &str) -> PathBuf {
    if input.is_file() {
        input
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(output_folder)
    } else {
        input.join(output_folder)
    }
}

fn report_file(result: &CompressionResult, name: &str) {
    crate::success!("{}", name);
    crate::info!(
        "   {} Dimensions: {}x{} → {}x{}",
        DIMENSIONS_PREFIX,
        result.original_dimensions.0,
        result.original_dimensions.1,
        result.new_dimensions.0,
        result.new_dimensions.1
    );
    crate::info!(
        "   {} Size: {} → {} (saved {:.1}%)",
        SIZE_PREFIX,
        format_file_size(result.original_size),
        format_file_size(result.compressed_size),
        result.compression_ratio()
    );
    if result.metadata_preserved {
        crate::verbose!("EXIF metadata copied to {:?}", result.output);
    }
}

/// Compresses every supported image at `request.input`, one at a time.
///
/// Per-file failures are reported and counted but never stop the batch.
///
/// # Returns
/// * `Ok(stats)` - Totals for the run, including failed files
/// * `Err(CompressionError::PathNotFound)` - If the input does not exist
/// * `Err(CompressionError::NoSupportedFiles)` - If nothing can be compressed
pub fn batch_compress(request: &CompressionRequest) -> Result<RunStatistics> {
    let start_time = Instant::now();

    let image_files = collect_image_files(&request.input)?;
    if image_files.is_empty() {
        return Err(CompressionError::NoSupportedFiles(request.input.clone()));
    }
    let total_files = image_files.len();

    let output_dir = output_dir_for(&request.input, &request.output_folder);
    fs::create_dir_all(&output_dir)
        .map_err(|_| CompressionError::DirectoryCreationFailed(output_dir.clone()))?;

    crate::info!("🔍 Found {} image files", total_files);
    crate::info!("{} Output directory: {}", FOLDER_PREFIX, output_dir.display());
    crate::info!(
        "⚙️  Settings: quality={}%, max size={}x{}, format={}",
        request.quality,
        request.max_width,
        request.max_height,
        request.format
    );
    if !request.format.params().honors_quality {
        crate::verbose!(
            "{} is lossless, quality only sets the optimization effort",
            request.format
        );
    }
    crate::info!("{}", "=".repeat(SEPARATOR_WIDTH));

    let stats = image_files
        .iter()
        .enumerate()
        .fold(RunStatistics::new(), |stats, (index, file)| {
            let name = file.name();
            let outcome = compress_one(file.path(), &output_dir, request);

            match &outcome {
                Ok(result) => report_file(result, &name),
                Err(e) => crate::error!("Failed to compress {}: {}", name, e),
            }
            crate::info!(
                "{} Progress: {:.1}% ({}/{})",
                PROGRESS_PREFIX,
                progress_percent(index + 1, total_files),
                index + 1,
                total_files
            );

            stats.merge(&outcome)
        });

    stats.print_summary(start_time.elapsed());
    Ok(stats)
}

/// Runs a batch and reports whether it succeeded as a whole.
///
/// Returns `false` only when the input is missing, holds no supported
/// files, or the output directory cannot be created. Individual file
/// failures still count as success.
pub fn run(request: &CompressionRequest) -> bool {
    match batch_compress(request) {
        Ok(_) => true,
        Err(e) => {
            crate::error!("{}", e);
            false
        }
    }
}
