// Error types module
// Failure signals for the codec boundary and buffer construction

use std::path::PathBuf;

use image::ImageFormat;
use thiserror::Error;

/// Failure to turn a byte stream into an [`ImageBuffer`](crate::ImageBuffer).
///
/// Every low-level cause collapses into this one type; no partial buffer is
/// ever produced alongside it.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read image file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no image data provided")]
    Empty,

    #[error("not a recognized image file format")]
    UnrecognizedFormat,

    #[error("unsupported image format: {0:?} (only JPEG and PNG can be opened)")]
    UnsupportedFormat(ImageFormat),

    #[error("failed to decode image: {0}")]
    Corrupt(#[source] image::ImageError),

    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Failure to write an [`ImageBuffer`](crate::ImageBuffer) to disk.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("no image loaded")]
    NoImage,

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write encoded image: {0}")]
    Write(#[source] std::io::Error),

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Raw pixel data that cannot form a valid buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("image dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    #[error("image dimensions too large: {width}x{height}")]
    TooLarge { width: u32, height: u32 },

    #[error("pixel data length mismatch: need {needed} bytes, got {actual}")]
    LengthMismatch { needed: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_name_the_path() {
        let err = DecodeError::Io {
            path: PathBuf::from("missing.png"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("missing.png"));
    }

    #[test]
    fn buffer_errors_convert_into_decode_errors() {
        let err: DecodeError = BufferError::ZeroDimension {
            width: 0,
            height: 4,
        }
        .into();
        assert_eq!(err.to_string(), "image dimensions must be positive, got 0x4");
    }
}
