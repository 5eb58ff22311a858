use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("No supported image files found in: {0}")]
    NoSupportedFiles(PathBuf),

    #[error("Invalid quality value: {0}. Must be between 10 and 100")]
    InvalidQuality(i32),

    #[error("Invalid maximum size: {0}x{1}. Both sides must be at least 1")]
    InvalidMaxSize(u32, u32),

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("{format} encoder failed: {reason}")]
    EncoderFailed {
        format: &'static str,
        reason: String,
    },

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),

    #[error("Invalid file name: {0}")]
    InvalidFileName(PathBuf),
}

pub type Result<T> = std::result::Result<T, CompressionError>;
