pub const DEFAULT_QUALITY: u8 = 85;
pub const MIN_QUALITY: u8 = 10;
pub const MAX_QUALITY: u8 = 100;

pub const DEFAULT_MAX_WIDTH: u32 = 2400;
pub const DEFAULT_MAX_HEIGHT: u32 = 1600;
pub const DEFAULT_OUTPUT_FOLDER: &str = "compressed";

/// Suffix appended to the file stem of every output file.
pub const OUTPUT_SUFFIX: &str = "_compressed";

/// Matched against the lowercased extension.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "webp"];

pub const ZOPFLI_ITERATIONS: u8 = 15;
pub const LIBDEFLATER_HIGH_LEVEL: u8 = 12;
pub const LIBDEFLATER_LOW_LEVEL: u8 = 8;
pub const OXIPNG_PRESET: u8 = 4;

pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
pub const SEPARATOR_WIDTH: usize = 60;

// Common output message prefixes
pub const SUCCESS_PREFIX: &str = "✅";
pub const PROGRESS_PREFIX: &str = "📊";
pub const DIMENSIONS_PREFIX: &str = "📏";
pub const SIZE_PREFIX: &str = "📦";
pub const FOLDER_PREFIX: &str = "📁";
