/// Output format handling
///
/// Each output format carries a small table of encode parameters that the
/// encoder and the run report read instead of matching on format names.
use clap::ValueEnum;
use std::fmt;

/// Supported output image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// JPEG format with lossy compression
    #[default]
    #[value(name = "JPEG")]
    Jpeg,
    /// PNG format with lossless compression
    #[value(name = "PNG")]
    Png,
    /// WebP format with lossy compression
    #[value(name = "WEBP")]
    WebP,
}

/// Encode parameters associated with an [`OutputFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeParams {
    /// Extension of the output file, without the leading dot
    pub extension: &'static str,
    pub supports_alpha: bool,
    /// Whether the encoder spends extra effort on a smaller file with the
    /// same pixels (optimized Huffman tables, oxipng)
    pub supports_optimize: bool,
    /// Whether the quality setting changes the encoded pixels. Formats that
    /// ignore it only use quality to pick the optimization effort.
    pub honors_quality: bool,
}

const JPEG_PARAMS: EncodeParams = EncodeParams {
    extension: "jpg",
    supports_alpha: false,
    supports_optimize: true,
    honors_quality: true,
};

const PNG_PARAMS: EncodeParams = EncodeParams {
    extension: "png",
    supports_alpha: true,
    supports_optimize: true,
    honors_quality: false,
};

const WEBP_PARAMS: EncodeParams = EncodeParams {
    extension: "webp",
    supports_alpha: true,
    supports_optimize: false,
    honors_quality: true,
};

impl OutputFormat {
    pub fn params(&self) -> &'static EncodeParams {
        match self {
            OutputFormat::Jpeg => &JPEG_PARAMS,
            OutputFormat::Png => &PNG_PARAMS,
            OutputFormat::WebP => &WEBP_PARAMS,
        }
    }

    /// Upper-case name, as accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::WebP => "WEBP",
        }
    }

    /// Returns the file extension for this format
    pub fn extension(&self) -> &'static str {
        self.params().extension
    }

    /// Get all supported formats as a vector
    pub fn all_formats() -> Vec<OutputFormat> {
        vec![OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::WebP]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_extension() {
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::WebP.extension(), "webp");
    }

    #[test]
    fn test_extension_is_lowercased_name_except_jpeg() {
        for format in OutputFormat::all_formats() {
            if format == OutputFormat::Jpeg {
                continue;
            }
            assert_eq!(format.extension(), format.to_string().to_lowercase());
        }
    }

    #[test]
    fn test_encode_params() {
        assert!(!OutputFormat::Jpeg.params().supports_alpha);
        assert!(OutputFormat::Jpeg.params().honors_quality);
        assert!(OutputFormat::Jpeg.params().supports_optimize);
        assert!(OutputFormat::Png.params().supports_optimize);
        assert!(!OutputFormat::Png.params().honors_quality);
        assert!(OutputFormat::WebP.params().honors_quality);
        assert!(!OutputFormat::WebP.params().supports_optimize);
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(format!("{}", OutputFormat::Jpeg), "JPEG");
        assert_eq!(format!("{}", OutputFormat::Png), "PNG");
        assert_eq!(format!("{}", OutputFormat::WebP), "WEBP");
    }

    #[test]
    fn test_default_is_jpeg() {
        assert_eq!(OutputFormat::default(), OutputFormat::Jpeg);
    }
}
