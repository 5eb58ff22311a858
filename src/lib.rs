pub mod logger;

pub mod batch;
pub mod cli;
pub mod constants;
pub mod error;
pub mod formats;
pub mod metadata;
pub mod processing;
pub mod stats;
pub mod utils;

pub use batch::{batch_compress, collect_image_files, output_dir_for, run, ImageFile};
pub use error::{CompressionError, Result};
pub use formats::{EncodeParams, OutputFormat};
pub use processing::{
    compress_one, compute_target_size, encode_image, generate_output_path,
    load_image_with_metadata, normalize_color, resize_image, CompressionRequest,
    CompressionResult,
};
pub use stats::RunStatistics;
pub use utils::{calculate_compression_ratio, format_file_size, is_image_file};
