// Command line interface module
// Handles parsing of command line arguments and stdin input

use crate::image_buffer::Filter;
use crate::image_loader::{Codec, OutputFormat, DEFAULT_JPEG_QUALITY};
use anyhow::{bail, Result};
use clap::Parser;
use std::io::{self, Read};
use std::path::PathBuf;

/// ofview - A minimal image viewer with darker/lighter/threshold filters
#[derive(Parser, Debug)]
#[command(name = "ofview")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the image file (can also be provided via stdin pipe)
    #[arg(value_name = "IMAGE")]
    pub image_path: Option<PathBuf>,

    /// Filter to apply; repeat to chain filters in order
    #[arg(short, long = "filter", value_enum)]
    pub filters: Vec<Filter>,

    /// Where to write the filtered image
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format (jpg or png)
    #[arg(long, default_value = "jpg")]
    pub format: OutputFormat,

    /// JPEG quality (1 - 100)
    #[arg(short, long, default_value_t = DEFAULT_JPEG_QUALITY, value_parser = parse_quality)]
    pub quality: u8,
}

/// Parsed arguments with resolved image source
#[derive(Debug)]
pub struct ParsedArgs {
    pub image_path: Option<PathBuf>,
    pub image_data: Option<Vec<u8>>,
    pub filters: Vec<Filter>,
    pub output: Option<PathBuf>,
    pub codec: Codec,
}

/// Parse quality value and ensure it's within valid range
fn parse_quality(s: &str) -> Result<u8, String> {
    let quality: u8 = s.parse().map_err(|_| "Invalid quality value")?;
    if !(1..=100).contains(&quality) {
        return Err("Quality must be between 1 and 100".to_string());
    }
    Ok(quality)
}

/// Check if stdin has data available (is a pipe)
fn stdin_has_data() -> bool {
    !atty::is(atty::Stream::Stdin)
}

/// Read image data from stdin
fn read_stdin() -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    io::stdin().read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Parse command line arguments and handle stdin input
pub fn parse_args() -> Result<ParsedArgs> {
    resolve(Args::parse())
}

fn resolve(args: Args) -> Result<ParsedArgs> {
    // A file path wins over stdin so the tool still works under pipelines
    let (image_path, image_data) = if let Some(path) = args.image_path {
        (Some(path), None)
    } else if stdin_has_data() {
        let data = read_stdin()?;
        if data.is_empty() {
            bail!("No data received from stdin");
        }
        (None, Some(data))
    } else {
        bail!("No image provided. Please provide an image path or pipe image data to stdin.\n\
               Usage: ofview <IMAGE> [OPTIONS]\n\
               Or:    cat image.png | ofview [OPTIONS]");
    };

    Ok(ParsedArgs {
        image_path,
        image_data,
        filters: args.filters,
        output: args.output,
        codec: Codec::new(args.format).with_jpeg_quality(args.quality),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_keep_command_line_order() {
        let args = Args::try_parse_from([
            "ofview", "in.png", "-f", "lighter", "--filter", "threshold", "-f", "darker",
        ])
        .unwrap();
        assert_eq!(
            args.filters,
            vec![Filter::Lighter, Filter::Threshold, Filter::Darker]
        );
    }

    #[test]
    fn defaults_to_jpeg_output() {
        let parsed = resolve(Args::try_parse_from(["ofview", "in.png"]).unwrap()).unwrap();
        assert_eq!(parsed.image_path, Some(PathBuf::from("in.png")));
        assert!(parsed.image_data.is_none());
        assert_eq!(parsed.codec, Codec::default());
        assert!(parsed.output.is_none());
    }

    #[test]
    fn png_format_and_quality() {
        let args =
            Args::try_parse_from(["ofview", "in.jpg", "--format", "png", "-q", "90", "-o", "x"])
                .unwrap();
        assert_eq!(args.format, OutputFormat::Png);
        assert_eq!(args.quality, 90);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Args::try_parse_from(["ofview", "in.png", "-q", "0"]).is_err());
        assert!(Args::try_parse_from(["ofview", "in.png", "--format", "gif"]).is_err());
        assert!(Args::try_parse_from(["ofview", "in.png", "-f", "blur"]).is_err());
    }
}
