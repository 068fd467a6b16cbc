// ofview library
// RGB image buffer with per-pixel filters and a JPEG/PNG codec boundary

pub mod app;
pub mod cli;
pub mod error;
pub mod image_buffer;
pub mod image_loader;

pub use error::{BufferError, DecodeError, EncodeError};
pub use image_buffer::{Filter, ImageBuffer};
pub use image_loader::{load, load_from_bytes, save, Codec, OutputFormat};
