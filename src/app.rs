// Application state module
// Headless viewer controller: the current image plus the labels a UI shows for it

use crate::error::{DecodeError, EncodeError};
use crate::image_buffer::{Filter, ImageBuffer};
use crate::image_loader::Codec;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Version string shown in the status bar and About box
pub const VERSION: &str = "Version 1.0";

const NO_FILE: &str = "No file displayed.";
const NO_IMAGE: &str = "No image loaded.";
const LOAD_ERROR: &str = "The file was not in a recognized image file format.";

/// Main application state
///
/// Holds at most one exclusively-owned image. Every operation updates the
/// status line; redrawing after a change is up to whoever renders the image.
#[derive(Debug)]
pub struct AppState {
    image: Option<ImageBuffer>,
    filename: Option<PathBuf>,
    status: String,
    codec: Codec,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Codec::default())
    }
}

impl AppState {
    /// Create a new application state with nothing loaded
    pub fn new(codec: Codec) -> Self {
        Self {
            image: None,
            filename: None,
            status: VERSION.to_string(),
            codec,
        }
    }

    /// The currently shown image, if any
    pub fn image(&self) -> Option<&ImageBuffer> {
        self.image.as_ref()
    }

    /// Path the current image was opened from
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Text for the status bar
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Encoder settings used by [`AppState::save`]
    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// Text for the filename label
    pub fn filename_label(&self) -> String {
        match &self.filename {
            Some(path) => format!("File: {}", path.display()),
            None => NO_FILE.to_string(),
        }
    }

    /// Open an image file, replacing whatever was shown before.
    ///
    /// A failed open leaves no image loaded.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<(), DecodeError> {
        let path = path.as_ref();
        match crate::image_loader::load(path) {
            Ok(image) => {
                info!(
                    "Image loaded: {} ({}x{} pixels)",
                    path.display(),
                    image.width(),
                    image.height()
                );
                self.image = Some(image);
                self.filename = Some(path.to_path_buf());
                self.status = "File loaded.".to_string();
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
                self.image = None;
                self.filename = None;
                self.status = LOAD_ERROR.to_string();
                Err(e)
            }
        }
    }

    /// Show an already-decoded image, e.g. one read from stdin
    pub fn show(&mut self, image: ImageBuffer, filename: Option<PathBuf>) {
        self.image = Some(image);
        self.filename = filename;
        self.status = "File loaded.".to_string();
    }

    /// Close the currently loaded image
    pub fn close(&mut self) {
        self.image = None;
        self.filename = None;
        self.status = "Image closed.".to_string();
        info!("Image closed");
    }

    /// Apply a filter to the current image. Returns `false` when nothing is loaded.
    pub fn apply(&mut self, filter: Filter) -> bool {
        match self.image.as_mut() {
            Some(image) => {
                image.apply(filter);
                self.status = format!("Applied: {filter}");
                info!("Applied filter: {filter}");
                true
            }
            None => {
                self.status = NO_IMAGE.to_string();
                false
            }
        }
    }

    /// Write the current image with the configured codec.
    ///
    /// Failures are reported rather than swallowed; the loaded image is
    /// untouched either way.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), EncodeError> {
        let path = path.as_ref();
        let Some(image) = self.image.as_ref() else {
            self.status = NO_IMAGE.to_string();
            return Err(EncodeError::NoImage);
        };

        match self.codec.save(image, path) {
            Ok(()) => {
                info!("Image saved to {}", path.display());
                self.status = "File saved.".to_string();
                Ok(())
            }
            Err(e) => {
                warn!("Failed to save {}: {}", path.display(), e);
                self.status = "Save failed.".to_string();
                Err(e)
            }
        }
    }

    /// Text for the "About" box
    pub fn about(&self) -> String {
        format!("ImageViewer\n{VERSION}")
    }
}
