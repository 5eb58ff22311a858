use crate::constants::{
    DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH, DEFAULT_OUTPUT_FOLDER, DEFAULT_QUALITY,
    LIBDEFLATER_HIGH_LEVEL, LIBDEFLATER_LOW_LEVEL, MAX_QUALITY, MIN_QUALITY, OUTPUT_SUFFIX,
    OXIPNG_PRESET, ZOPFLI_ITERATIONS,
};
use crate::error::{CompressionError, Result};
use crate::formats::OutputFormat;
use crate::metadata;
use crate::utils::{calculate_compression_ratio, with_spinner};
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, GenericImageView, ImageDecoder, ImageReader};
use jpeg_encoder::{ColorType as JpegColorType, Encoder as JpegEncoder};
use oxipng::{Deflaters, Options};
use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::num::NonZeroU8;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use webp::Encoder as WebpEncoder;

/// Everything a run needs to know, validated up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionRequest {
    pub input: PathBuf,
    pub quality: u8,
    pub max_width: u32,
    pub max_height: u32,
    pub format: OutputFormat,
    pub output_folder: String,
}

impl CompressionRequest {
    pub fn new(
        input: impl Into<PathBuf>,
        quality: Option<i32>,
        max_size: Option<(u32, u32)>,
        format: Option<OutputFormat>,
        output_folder: Option<String>,
    ) -> Result<Self> {
        let quality = validate_quality(quality.unwrap_or(DEFAULT_QUALITY as i32))?;
        let (max_width, max_height) = max_size.unwrap_or((DEFAULT_MAX_WIDTH, DEFAULT_MAX_HEIGHT));
        if max_width == 0 || max_height == 0 {
            return Err(CompressionError::InvalidMaxSize(max_width, max_height));
        }

        Ok(Self {
            input: input.into(),
            quality,
            max_width,
            max_height,
            format: format.unwrap_or_default(),
            output_folder: output_folder.unwrap_or_else(|| DEFAULT_OUTPUT_FOLDER.to_string()),
        })
    }
}

/// Checks that `quality` lies in `MIN_QUALITY..=MAX_QUALITY`.
pub fn validate_quality(quality: i32) -> Result<u8> {
    u8::try_from(quality)
        .ok()
        .filter(|q| (MIN_QUALITY..=MAX_QUALITY).contains(q))
        .ok_or(CompressionError::InvalidQuality(quality))
}

/// Outcome of compressing one file, used for reporting only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub original_size: u64,
    pub compressed_size: u64,
    pub original_dimensions: (u32, u32),
    pub new_dimensions: (u32, u32),
    pub metadata_preserved: bool,
}

impl CompressionResult {
    pub fn compression_ratio(&self) -> f64 {
        calculate_compression_ratio(self.original_size, self.compressed_size)
    }
}

/// A decoded image together with what was read from disk alongside it.
pub struct LoadedImage {
    pub image: DynamicImage,
    /// Raw EXIF block, if the decoder found one
    pub exif: Option<Vec<u8>>,
    pub file_size: u64,
}

/// Computes the size an image must be scaled to so it fits in
/// `max_width` x `max_height`.
///
/// Images that already fit are returned unchanged. Otherwise both axes are
/// scaled by the same factor and truncated, so the result never exceeds
/// either bound. A side that would truncate to zero is kept at one pixel.
pub fn compute_target_size(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let width_ratio = max_width as f64 / width as f64;
    let height_ratio = max_height as f64 / height as f64;
    let ratio = width_ratio.min(height_ratio);

    let new_width = ((width as f64 * ratio) as u32).max(1);
    let new_height = ((height as f64 * ratio) as u32).max(1);

    (new_width, new_height)
}

/// Loads an image file and returns it along with its EXIF block and size.
///
/// # Returns
/// * `Err(CompressionError::Io)` - If the file cannot be opened
/// * `Err(CompressionError::Decode)` - If the content is not a readable image
pub fn load_image_with_metadata(input_path: &Path) -> Result<LoadedImage> {
    let file_size = fs::metadata(input_path)?.len();

    let reader = ImageReader::open(input_path)?.with_guessed_format()?;
    let mut decoder = reader.into_decoder().map_err(CompressionError::Decode)?;

    let exif = decoder
        .exif_metadata()
        .ok()
        .flatten()
        .filter(|exif| !exif.is_empty());

    let image = DynamicImage::from_decoder(decoder).map_err(CompressionError::Decode)?;

    Ok(LoadedImage {
        image,
        exif,
        file_size,
    })
}

/// Drops the alpha channel, whatever the target format.
pub fn normalize_color(img: DynamicImage) -> DynamicImage {
    if img.color().has_alpha() {
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    }
}

pub fn resize_image(img: DynamicImage, (width, height): (u32, u32)) -> DynamicImage {
    if img.dimensions() == (width, height) {
        return img;
    }
    img.resize_exact(width, height, FilterType::Lanczos3)
}

/// Output file for `input_path`: `<stem>_compressed.<ext>` inside `output_dir`.
pub fn generate_output_path(
    input_path: &Path,
    output_dir: &Path,
    format: OutputFormat,
) -> Result<PathBuf> {
    let file_stem = input_path
        .file_stem()
        .ok_or_else(|| CompressionError::InvalidFileName(input_path.to_path_buf()))?;

    let output_filename = format!(
        "{}{}.{}",
        file_stem.to_string_lossy(),
        OUTPUT_SUFFIX,
        format.extension()
    );
    Ok(output_dir.join(output_filename))
}

/// Encodes `img` in `format`.
///
/// `quality` drives the lossy encoders. For PNG it only selects how hard
/// oxipng works, since the pixels are stored losslessly.
pub fn encode_image(img: &DynamicImage, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
    let params = format.params();
    let img = prepare_for_encoder(img, format);

    match format {
        OutputFormat::Jpeg => encode_jpeg(&img, quality, params.supports_optimize),
        OutputFormat::Png => {
            let png = encode_png(&img)?;
            if params.supports_optimize {
                optimize_png(&png, quality)
            } else {
                Ok(png)
            }
        }
        OutputFormat::WebP => encode_webp(&img, quality),
    }
}

/// Converts `img` to a color type the encoder for `format` accepts.
fn prepare_for_encoder(img: &DynamicImage, format: OutputFormat) -> Cow<'_, DynamicImage> {
    let native = match format {
        OutputFormat::Jpeg => matches!(img.color(), ColorType::L8 | ColorType::Rgb8),
        OutputFormat::Png => !matches!(img.color(), ColorType::Rgb32F | ColorType::Rgba32F),
        OutputFormat::WebP => matches!(img.color(), ColorType::Rgb8 | ColorType::Rgba8),
    };

    if native {
        Cow::Borrowed(img)
    } else if img.color().has_alpha() && format.params().supports_alpha {
        Cow::Owned(DynamicImage::ImageRgba8(img.to_rgba8()))
    } else {
        Cow::Owned(DynamicImage::ImageRgb8(img.to_rgb8()))
    }
}

fn encoder_failed(format: OutputFormat, reason: impl ToString) -> CompressionError {
    CompressionError::EncoderFailed {
        format: format.name(),
        reason: reason.to_string(),
    }
}

/// Baseline JPEG; `optimize` computes Huffman tables for this image
/// instead of using the standard ones.
fn encode_jpeg(img: &DynamicImage, quality: u8, optimize: bool) -> Result<Vec<u8>> {
    let (width, height) = img.dimensions();
    let (width, height) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(encoder_failed(
                OutputFormat::Jpeg,
                format!("{}x{} exceeds the 65535 pixel limit", width, height),
            ))
        }
    };

    let (pixels, color_type) = match img {
        DynamicImage::ImageLuma8(gray) => (gray.as_raw().as_slice(), JpegColorType::Luma),
        DynamicImage::ImageRgb8(rgb) => (rgb.as_raw().as_slice(), JpegColorType::Rgb),
        other => {
            return Err(encoder_failed(
                OutputFormat::Jpeg,
                format!("unsupported color type {:?}", other.color()),
            ))
        }
    };

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new(&mut buf, quality);
    encoder.set_optimized_huffman_tables(optimize);
    encoder
        .encode(pixels, width, height, color_type)
        .map_err(|e| encoder_failed(OutputFormat::Jpeg, e))?;
    Ok(buf)
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_with_encoder(PngEncoder::new(&mut buf))
        .map_err(CompressionError::Encode)?;
    Ok(buf)
}

/// Lossy WebP at `quality` (0-100 on libwebp's scale).
fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let (width, height) = img.dimensions();
    let encoder = match img {
        DynamicImage::ImageRgb8(rgb) => WebpEncoder::from_rgb(rgb.as_raw(), width, height),
        DynamicImage::ImageRgba8(rgba) => WebpEncoder::from_rgba(rgba.as_raw(), width, height),
        other => {
            return Err(encoder_failed(
                OutputFormat::WebP,
                format!("unsupported color type {:?}", other.color()),
            ))
        }
    };

    let encoded = encoder
        .encode_simple(false, f32::from(quality))
        .map_err(|e| encoder_failed(OutputFormat::WebP, format!("{:?}", e)))?;
    Ok(encoded.to_vec())
}

fn png_deflater(quality: u8) -> Deflaters {
    let high = Deflaters::Libdeflater {
        compression: LIBDEFLATER_HIGH_LEVEL,
    };

    if quality >= 90 {
        NonZeroU8::new(ZOPFLI_ITERATIONS)
            .map(|iterations| Deflaters::Zopfli { iterations })
            .unwrap_or(high)
    } else if quality >= 70 {
        high
    } else {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_LOW_LEVEL,
        }
    }
}

/// Lossless oxipng pass; `quality` only picks the deflate effort.
fn optimize_png(data: &[u8], quality: u8) -> Result<Vec<u8>> {
    let mut options = Options::from_preset(OXIPNG_PRESET);
    options.deflate = png_deflater(quality);

    oxipng::optimize_from_memory(data, &options)
        .map_err(|e| CompressionError::PngOptimization(e.to_string()))
}

/// Copies the source EXIF block into an encoded JPEG.
///
/// Returns `None` when there is nothing to copy, the target is not JPEG,
/// or the block could not be embedded.
pub fn preserve_metadata(encoded: &[u8], exif: Option<&[u8]>, format: OutputFormat) -> Option<Vec<u8>> {
    if format != OutputFormat::Jpeg {
        return None;
    }
    metadata::embed_exif(encoded, exif?)
}

/// Writes `bytes` to a temporary file next to `output_path` and renames it
/// into place, replacing any previous output.
fn write_output(output_path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = output_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))?;
    }
    temp.persist(output_path).map_err(|e| e.error)?;
    Ok(())
}

/// Runs the full pipeline for one file and writes the result into
/// `output_dir`, overwriting any previous output of the same name.
pub fn compress_one(
    input_path: &Path,
    output_dir: &Path,
    request: &CompressionRequest,
) -> Result<CompressionResult> {
    let name = input_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    with_spinner(&format!("Compressing {}...", name), |spinner| -> Result<CompressionResult> {
        let LoadedImage {
            image,
            exif,
            file_size: original_size,
        } = load_image_with_metadata(input_path)?;

        let original_dimensions = image.dimensions();
        crate::verbose!(
            "{}: {}x{} {:?}, exif: {}",
            name,
            original_dimensions.0,
            original_dimensions.1,
            image.color(),
            exif.is_some()
        );

        let image = normalize_color(image);
        let new_dimensions = compute_target_size(
            original_dimensions.0,
            original_dimensions.1,
            request.max_width,
            request.max_height,
        );
        let image = resize_image(image, new_dimensions);

        let output_path = generate_output_path(input_path, output_dir, request.format)?;

        spinner.set_message(format!("Encoding {} as {}...", name, request.format));
        let encoded = encode_image(&image, request.format, request.quality)?;

        let (bytes, metadata_preserved) =
            match preserve_metadata(&encoded, exif.as_deref(), request.format) {
                Some(with_exif) => (with_exif, true),
                None => (encoded, false),
            };

        write_output(&output_path, &bytes)?;
        let compressed_size = fs::metadata(&output_path)?.len();

        Ok(CompressionResult {
            input: input_path.to_path_buf(),
            output: output_path,
            original_size,
            compressed_size,
            original_dimensions,
            new_dimensions,
            metadata_preserved,
        })
    })
}
