use crate::constants::{DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH, DEFAULT_OUTPUT_FOLDER, DEFAULT_QUALITY};
use crate::error::Result;
use crate::formats::OutputFormat;
use crate::processing::CompressionRequest;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Named quality and size shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Sharing on the web
    Web,
    /// Archival backups
    Storage,
    /// Balanced setting for Fujifilm X-T3 shots
    Fuji,
}

impl Preset {
    pub fn quality(&self) -> i32 {
        match self {
            Preset::Web => 75,
            Preset::Storage => 90,
            Preset::Fuji => 85,
        }
    }

    pub fn max_size(&self) -> (u32, u32) {
        match self {
            Preset::Web => (1920, 1280),
            Preset::Storage => (3840, 2560),
            Preset::Fuji => (2400, 1600),
        }
    }

    pub fn banner(&self) -> &'static str {
        match self {
            Preset::Web => "🌐 Using web sharing preset",
            Preset::Storage => "💾 Using storage backup preset",
            Preset::Fuji => "📷 Using Fuji X-T3 balanced preset",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "photo-compress",
    about = "Batch-compress photos into a sibling output folder",
    long_about = "photo-compress resizes every supported photo at a path to fit within a maximum size, \
                  re-encodes it at the chosen quality and format, and reports how much space was saved. \
                  Supported inputs: jpg, jpeg, png, bmp, tiff, webp (any case).",
    version,
    args_override_self = true,
    after_help = "EXAMPLES:\n  \
    photo-compress /path/to/photos                  # default settings\n  \
    photo-compress /path/to/photos -q 90            # quality 90%\n  \
    photo-compress /path/to/photos -s 1920 1080     # maximum size\n  \
    photo-compress /path/to/photos -o my_compressed # output folder name\n  \
    photo-compress photo.jpg -q 75                  # single file"
)]
pub struct Args {
    #[arg(help = "Photo file or folder to compress")]
    pub path: PathBuf,

    #[arg(
        short = 'q',
        long,
        default_value_t = DEFAULT_QUALITY as i32,
        allow_negative_numbers = true,
        help = "Compression quality (10-100, default: 85)"
    )]
    pub quality: i32,

    #[arg(
        short = 's',
        long,
        num_args = 2,
        action = ArgAction::Set,
        value_names = ["WIDTH", "HEIGHT"],
        default_values_t = [DEFAULT_MAX_WIDTH, DEFAULT_MAX_HEIGHT],
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Maximum size (default: 2400 1600)",
        long_help = "Resize photos to fit within WIDTH x HEIGHT while preserving aspect ratio. \
                     Photos that already fit are not resized."
    )]
    pub size: Vec<u32>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        ignore_case = true,
        default_value_t = OutputFormat::Jpeg,
        help = "Output format"
    )]
    pub format: OutputFormat,

    #[arg(
        short = 'o',
        long,
        default_value = DEFAULT_OUTPUT_FOLDER,
        help = "Output folder name (default: compressed)"
    )]
    pub output: String,

    #[arg(long, help = "Web sharing preset (quality 75%, 1920x1280)")]
    pub web: bool,

    #[arg(long, help = "Storage backup preset (quality 90%, 3840x2560)")]
    pub storage: bool,

    #[arg(long, help = "Fuji X-T3 balanced preset (quality 85%, 2400x1600)")]
    pub fuji: bool,

    #[arg(short = 'v', long, help = "Print detailed per-file information")]
    pub verbose: bool,

    #[arg(long, conflicts_with = "verbose", help = "Only print errors")]
    pub quiet: bool,
}

impl Args {
    /// The first preset flag set, checked in the order web, storage, fuji.
    pub fn preset(&self) -> Option<Preset> {
        [
            (self.web, Preset::Web),
            (self.storage, Preset::Storage),
            (self.fuji, Preset::Fuji),
        ]
        .into_iter()
        .find_map(|(set, preset)| set.then_some(preset))
    }

    /// Quality and maximum size after applying any preset.
    pub fn effective_settings(&self) -> (i32, (u32, u32)) {
        match self.preset() {
            Some(preset) => (preset.quality(), preset.max_size()),
            None => {
                let width = self.size.first().copied().unwrap_or(DEFAULT_MAX_WIDTH);
                let height = self.size.get(1).copied().unwrap_or(DEFAULT_MAX_HEIGHT);
                (self.quality, (width, height))
            }
        }
    }

    /// Builds a validated request, rejecting out-of-range quality.
    pub fn to_request(&self) -> Result<CompressionRequest> {
        let (quality, max_size) = self.effective_settings();
        CompressionRequest::new(
            self.path.clone(),
            Some(quality),
            Some(max_size),
            Some(self.format),
            Some(self.output.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompressionError;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["photo-compress"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["photos"]);
        let request = args.to_request().unwrap();
        assert_eq!(request.quality, 85);
        assert_eq!((request.max_width, request.max_height), (2400, 1600));
        assert_eq!(request.format, OutputFormat::Jpeg);
        assert_eq!(request.output_folder, "compressed");
        assert_eq!(args.preset(), None);
    }

    #[test]
    fn test_explicit_options() {
        let args = parse(&["photos", "-q", "60", "-s", "1024", "768", "-f", "webp", "-o", "out"]);
        let request = args.to_request().unwrap();
        assert_eq!(request.quality, 60);
        assert_eq!((request.max_width, request.max_height), (1024, 768));
        assert_eq!(request.format, OutputFormat::WebP);
        assert_eq!(request.output_folder, "out");
    }

    #[test]
    fn test_format_choices() {
        assert_eq!(parse(&["p", "-f", "PNG"]).format, OutputFormat::Png);
        assert_eq!(parse(&["p", "--format", "WEBP"]).format, OutputFormat::WebP);
        assert!(Args::try_parse_from(["photo-compress", "p", "-f", "GIF"]).is_err());
    }

    #[test]
    fn test_preset_overrides_quality_and_size() {
        let args = parse(&["photos", "-q", "30", "-s", "100", "100", "--web"]);
        let request = args.to_request().unwrap();
        assert_eq!(request.quality, 75);
        assert_eq!((request.max_width, request.max_height), (1920, 1280));
    }

    #[test]
    fn test_preset_precedence() {
        assert_eq!(parse(&["p", "--fuji", "--storage"]).preset(), Some(Preset::Storage));
        assert_eq!(parse(&["p", "--fuji", "--web"]).preset(), Some(Preset::Web));
        assert_eq!(
            parse(&["p", "--web", "--storage", "--fuji"]).preset(),
            Some(Preset::Web)
        );
        assert_eq!(parse(&["p", "--fuji"]).preset(), Some(Preset::Fuji));
    }

    #[test]
    fn test_preset_fixes_invalid_quality() {
        let args = parse(&["photos", "-q", "5", "--storage"]);
        assert_eq!(args.to_request().unwrap().quality, 90);
    }

    #[test]
    fn test_invalid_quality() {
        for quality in ["5", "150", "-3"] {
            let args = parse(&["photos", "-q", quality]);
            assert!(matches!(
                args.to_request(),
                Err(CompressionError::InvalidQuality(_))
            ));
        }
    }

    #[test]
    fn test_size_requires_two_positive_values() {
        assert!(Args::try_parse_from(["photo-compress", "p", "-s", "100"]).is_err());
        assert!(Args::try_parse_from(["photo-compress", "p", "-s", "0", "100"]).is_err());
    }

    #[test]
    fn test_repeated_options_keep_last_value() {
        let args = parse(&["p", "-s", "100", "200", "-s", "300", "400", "-q", "50", "-q", "60"]);
        assert_eq!(args.size, vec![300, 400]);
        assert_eq!(args.quality, 60);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["photo-compress", "p", "--quiet", "-v"]).is_err());
    }
}
