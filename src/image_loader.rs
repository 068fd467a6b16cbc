// Image loading module
// Decodes JPEG/PNG files into image buffers and encodes them back to disk

use crate::error::{DecodeError, EncodeError};
use crate::image_buffer::ImageBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageError, ImageFormat};
use log::debug;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

/// Default JPEG quality, matching the `image` crate's own default
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Format used when writing images to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Preferred file extension for this format
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match format_from_extension(s) {
            Some(ImageFormat::Jpeg) => Ok(OutputFormat::Jpeg),
            Some(ImageFormat::Png) => Ok(OutputFormat::Png),
            _ => Err(format!("unsupported output format: {s} (expected jpg or png)")),
        }
    }
}

/// Encoder settings for [`save`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    /// Format written by [`Codec::save`]
    pub format: OutputFormat,
    /// JPEG quality (1-100), ignored for PNG
    pub jpeg_quality: u8,
}

impl Default for Codec {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl Codec {
    /// Codec for `format` with the default JPEG quality
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Set the JPEG quality, clamped to 1-100
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Encode `image` in the configured format and write it to `path`.
    ///
    /// The image is only read; on failure it stays exactly as it was. Encoding
    /// finishes in memory before `path` is touched, so an encoder error never
    /// clobbers an existing file.
    pub fn save(&self, image: &ImageBuffer, path: impl AsRef<Path>) -> Result<(), EncodeError> {
        let path = path.as_ref();
        let mut encoded = Vec::new();
        self.encode(image, &mut encoded)?;
        fs::write(path, &encoded).map_err(|source| EncodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            "Saved {}x{} image as {} to {} ({} bytes)",
            image.width(),
            image.height(),
            self.format,
            path.display(),
            encoded.len()
        );
        Ok(())
    }

    /// Encode `image` into any writer
    pub fn encode<W: Write>(&self, image: &ImageBuffer, writer: W) -> Result<(), EncodeError> {
        let (width, height) = image.dimensions();
        let result = match self.format {
            OutputFormat::Jpeg => JpegEncoder::new_with_quality(writer, self.jpeg_quality)
                .write_image(image.as_raw(), width, height, ExtendedColorType::Rgb8),
            OutputFormat::Png => PngEncoder::new(writer).write_image(
                image.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            ),
        };
        result.map_err(|e| match e {
            ImageError::IoError(source) => EncodeError::Write(source),
            other => EncodeError::Encode(other),
        })
    }
}

/// Load a JPEG or PNG file from disk
pub fn load(path: impl AsRef<Path>) -> Result<ImageBuffer, DecodeError> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = load_from_bytes(&data)?;

    debug!(
        "Decoded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Load an image from raw bytes, auto-detecting the format
pub fn load_from_bytes(data: &[u8]) -> Result<ImageBuffer, DecodeError> {
    if data.is_empty() {
        return Err(DecodeError::Empty);
    }

    // Sniff the content rather than trusting a file extension
    let format = image::guess_format(data).map_err(|_| DecodeError::UnrecognizedFormat)?;
    if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
        return Err(DecodeError::UnsupportedFormat(format));
    }

    let img = image::load_from_memory_with_format(data, format).map_err(DecodeError::Corrupt)?;

    // Alpha is discarded, the buffer is RGB only
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(ImageBuffer::from_raw(width, height, rgb.into_raw())?)
}

/// Save with the default codec (JPEG, quality 75)
pub fn save(image: &ImageBuffer, path: impl AsRef<Path>) -> Result<(), EncodeError> {
    Codec::default().save(image, path)
}

/// Get the appropriate image format from file extension
pub fn format_from_extension(ext: &str) -> Option<ImageFormat> {
    match ext.to_lowercase().as_str() {
        "png" => Some(ImageFormat::Png),
        "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample() -> ImageBuffer {
        let data = (0..4 * 3 * 3).map(|i| (i * 7) as u8).collect();
        ImageBuffer::from_raw(4, 3, data).unwrap()
    }

    #[test]
    fn png_encode_decode_is_exact() {
        let img = sample();
        let mut buf = Vec::new();
        Codec::new(OutputFormat::Png).encode(&img, &mut buf).unwrap();

        let decoded = load_from_bytes(&buf).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn jpeg_encode_decode_keeps_dimensions() {
        let img = sample();
        let mut buf = Vec::new();
        Codec::default().encode(&img, &mut buf).unwrap();
        assert_eq!(image::guess_format(&buf).unwrap(), ImageFormat::Jpeg);

        let decoded = load_from_bytes(&buf).unwrap();
        assert_eq!(decoded.dimensions(), (4, 3));
    }

    #[test]
    fn png_alpha_is_dropped() {
        let rgba = image::RgbaImage::from_raw(1, 1, vec![100, 50, 200, 0]).unwrap();
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(rgba)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();

        let decoded = load_from_bytes(&buf).unwrap();
        assert_eq!(decoded.pixel(0, 0), Some([100, 50, 200]));
    }

    #[test]
    fn empty_and_garbage_bytes_fail() {
        assert!(matches!(load_from_bytes(&[]), Err(DecodeError::Empty)));
        assert!(matches!(
            load_from_bytes(b"definitely not an image"),
            Err(DecodeError::UnrecognizedFormat)
        ));
    }

    #[test]
    fn truncated_png_is_corrupt() {
        let mut buf = Vec::new();
        Codec::new(OutputFormat::Png)
            .encode(&sample(), &mut buf)
            .unwrap();
        buf.truncate(buf.len() / 2);
        assert!(matches!(load_from_bytes(&buf), Err(DecodeError::Corrupt(_))));
    }

    #[test]
    fn other_formats_are_rejected() {
        let rgb = image::RgbImage::from_raw(1, 1, vec![1, 2, 3]).unwrap();
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(rgb)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Bmp)
            .unwrap();
        assert!(matches!(
            load_from_bytes(&buf),
            Err(DecodeError::UnsupportedFormat(ImageFormat::Bmp))
        ));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writer_failures_are_io_errors() {
        for format in [OutputFormat::Png, OutputFormat::Jpeg] {
            let err = Codec::new(format).encode(&sample(), BrokenPipe).unwrap_err();
            assert!(matches!(err, EncodeError::Write(_)), "{format}: {err:?}");
        }
    }

    #[test]
    fn output_format_parsing() {
        assert_eq!("JPEG".parse::<OutputFormat>(), Ok(OutputFormat::Jpeg));
        assert_eq!("png".parse::<OutputFormat>(), Ok(OutputFormat::Png));
        assert!("gif".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default().extension(), "jpg");
    }

    #[test]
    fn jpeg_quality_is_clamped() {
        assert_eq!(Codec::default().with_jpeg_quality(0).jpeg_quality, 1);
        assert_eq!(Codec::default().with_jpeg_quality(200).jpeg_quality, 100);
    }
}
