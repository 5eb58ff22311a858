#![allow(dead_code)]

use image::{DynamicImage, Rgb, RgbImage};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Writes a real image with a simple gradient so encoders have work to do.
pub fn create_test_image(path: &Path, width: u32, height: u32) -> PathBuf {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    DynamicImage::ImageRgb8(img).save(path).unwrap();
    path.to_path_buf()
}

/// A file with an image extension that no decoder accepts.
pub fn create_corrupt_image(path: &Path) -> PathBuf {
    File::create(path)
        .unwrap()
        .write_all(b"fake jpg data")
        .unwrap();
    path.to_path_buf()
}

pub fn create_text_file(path: &Path) -> PathBuf {
    File::create(path)
        .unwrap()
        .write_all(b"not an image")
        .unwrap();
    path.to_path_buf()
}

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

pub fn output_files(output_dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(output_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
