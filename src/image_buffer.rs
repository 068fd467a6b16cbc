// Image buffer module
// In-memory RGB pixel grid and the per-pixel filters applied to it

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::error::BufferError;

/// Channel shift applied by [`ImageBuffer::darker`] and [`ImageBuffer::lighter`]
pub const FILTER_STEP: u8 = 10;

/// Brightness below this value becomes black under [`ImageBuffer::threshold`]
pub const THRESHOLD_MIDPOINT: u8 = 127;

/// Bytes per pixel in the raw buffer (R, G, B)
const CHANNELS: usize = 3;

/// Fixed-size RGB image owned by exactly one caller.
///
/// Pixels are stored row-major as `[r, g, b]` triples. Width and height are
/// always positive and never change after construction; filters only rewrite
/// channel values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    rgb_data: Vec<u8>,
}

impl ImageBuffer {
    /// Create a black image of the given size
    pub fn new(width: u32, height: u32) -> Result<Self, BufferError> {
        let needed = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            rgb_data: vec![0; needed],
        })
    }

    /// Wrap raw row-major RGB8 data of known dimensions
    pub fn from_raw(width: u32, height: u32, rgb_data: Vec<u8>) -> Result<Self, BufferError> {
        let needed = byte_len(width, height)?;
        if rgb_data.len() != needed {
            return Err(BufferError::LengthMismatch {
                needed,
                actual: rgb_data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgb_data,
        })
    }

    /// Build an image from a list of pixels in row-major order
    pub fn from_pixels(width: u32, height: u32, pixels: &[[u8; 3]]) -> Result<Self, BufferError> {
        let rgb_data = pixels.iter().flatten().copied().collect();
        Self::from_raw(width, height, rgb_data)
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGB8 bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        &self.rgb_data
    }

    /// Iterate over pixels in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.rgb_data
            .chunks_exact(CHANNELS)
            .map(|px| [px[0], px[1], px[2]])
    }

    /// Read one pixel, `None` when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        let idx = self.index(x, y)?;
        let px = &self.rgb_data[idx..idx + CHANNELS];
        Some([px[0], px[1], px[2]])
    }

    /// Overwrite one pixel. Returns `false` (and changes nothing) when out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: [u8; 3]) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.rgb_data[idx..idx + CHANNELS].copy_from_slice(&value);
                true
            }
            None => false,
        }
    }

    /// Subtract [`FILTER_STEP`] from every channel, saturating at 0
    pub fn darker(&mut self) {
        for channel in self.rgb_data.iter_mut() {
            *channel = channel.saturating_sub(FILTER_STEP);
        }
    }

    /// Add [`FILTER_STEP`] to every channel, saturating at 255
    pub fn lighter(&mut self) {
        for channel in self.rgb_data.iter_mut() {
            *channel = channel.saturating_add(FILTER_STEP);
        }
    }

    /// Reduce the image to pure black and white.
    ///
    /// Pixels whose average brightness is below [`THRESHOLD_MIDPOINT`] turn
    /// black, all others white. Applying it a second time changes nothing.
    pub fn threshold(&mut self) {
        for px in self.rgb_data.chunks_exact_mut(CHANNELS) {
            let value = if brightness([px[0], px[1], px[2]]) < THRESHOLD_MIDPOINT {
                0
            } else {
                255
            };
            px.fill(value);
        }
    }

    /// Run a single filter in place
    pub fn apply(&mut self, filter: Filter) {
        match filter {
            Filter::Darker => self.darker(),
            Filter::Lighter => self.lighter(),
            Filter::Threshold => self.threshold(),
        }
    }

    /// Convert to opaque BGRA8 for display surfaces.
    ///
    /// Wayland shm buffers expect ARGB8888, which is BGRA in little-endian
    /// byte order.
    pub fn to_bgra8(&self) -> Vec<u8> {
        let mut bgra = Vec::with_capacity(self.rgb_data.len() / CHANNELS * 4);
        for px in self.rgb_data.chunks_exact(CHANNELS) {
            bgra.extend_from_slice(&[px[2], px[1], px[0], 255]);
        }
        bgra
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * CHANNELS)
    }
}

/// Integer average of the three channels
pub fn brightness(px: [u8; 3]) -> u8 {
    ((px[0] as u16 + px[1] as u16 + px[2] as u16) / 3) as u8
}

fn byte_len(width: u32, height: u32) -> Result<usize, BufferError> {
    if width == 0 || height == 0 {
        return Err(BufferError::ZeroDimension { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(CHANNELS))
        .ok_or(BufferError::TooLarge { width, height })
}

/// The per-pixel filters a viewer can apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Filter {
    Darker,
    Lighter,
    Threshold,
}

impl Filter {
    /// Every filter, in menu order
    pub const ALL: [Filter; 3] = [Filter::Darker, Filter::Lighter, Filter::Threshold];

    /// Lowercase name used in status messages and on the command line
    pub fn name(self) -> &'static str {
        match self {
            Filter::Darker => "darker",
            Filter::Lighter => "lighter",
            Filter::Threshold => "threshold",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "darker" => Ok(Filter::Darker),
            "lighter" => Ok(Filter::Lighter),
            "threshold" => Ok(Filter::Threshold),
            other => Err(format!("unknown filter: {other}")),
        }
    }
}
