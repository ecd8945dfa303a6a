// THEORY:
// The `Raster` is the fundamental unit of the dataset pipeline. It is a "dumb"
// data container for one single-channel 8-bit image: an explicit width and
// height plus a flat, row-major pixel buffer where pixel `(row, col)` lives at
// `row * width + col`.
//
// Key architectural principles:
// 1.  **Checked Construction**: The only way to build a `Raster` from raw bytes
//     is `Raster::new`, which rejects any buffer whose length is not exactly
//     `width * height`. Every other module can rely on that invariant without
//     re-checking it.
// 2.  **Immutable Once Built**: There are no pixel setters. Transforms (centering,
//     averaging) always allocate a fresh `Raster`; a decoded record is never
//     modified after the decoder hands it out.
// 3.  **Bridge to the Codec World**: A `Raster` converts to and from
//     `image::GrayImage`, the standard in-memory raster the bitmap codec consumes.
//     Both directions are fallible; a length mismatch is reported, never patched.

use crate::error::{IdxError, Result};
use image::GrayImage;

/// A rectangular single-channel 8-bit pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// The width of the raster in pixels (IDX `cols`).
    width: u32,
    /// The height of the raster in pixels (IDX `rows`).
    height: u32,
    /// Row-major pixel values. 0 is background, 255 is foreground.
    pixels: Vec<u8>,
}

impl Raster {
    /// Wraps `pixels` as a `width x height` raster.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(IdxError::BufferLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A zero-filled raster.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`, the order used throughout error reporting.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// The pixel at `(row, col)`, or `None` outside the raster.
    pub fn get(&self, row: u32, col: u32) -> Option<u8> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.pixels
            .get(row as usize * self.width as usize + col as usize)
            .copied()
    }

    /// One row of pixels.
    pub fn row(&self, row: u32) -> Option<&[u8]> {
        if row >= self.height {
            return None;
        }
        let start = row as usize * self.width as usize;
        self.pixels.get(start..start + self.width as usize)
    }

    /// Iterates the rows top to bottom. A zero-width raster yields `height` empty rows.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.height).filter_map(move |r| self.row(r))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Builds a raster from a row-major buffer that the caller guarantees has
    /// `width * height` bytes.
    pub(crate) fn from_parts(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }
}

impl TryFrom<&Raster> for GrayImage {
    type Error = IdxError;

    fn try_from(raster: &Raster) -> Result<Self> {
        let expected = raster.width as usize * raster.height as usize;
        GrayImage::from_raw(raster.width, raster.height, raster.pixels.clone()).ok_or(
            IdxError::BufferLength {
                expected,
                actual: raster.pixels.len(),
            },
        )
    }
}

impl TryFrom<GrayImage> for Raster {
    type Error = IdxError;

    fn try_from(image: GrayImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Raster::new(width, height, image.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: u32, height: u32) -> Raster {
        let pixels = (0..width * height).map(|v| v as u8).collect();
        Raster::new(width, height, pixels).expect("ramp buffer has the right length")
    }

    #[test]
    fn rejects_buffer_of_wrong_length() {
        let err = Raster::new(3, 2, vec![0; 5]).unwrap_err();
        assert!(matches!(
            err,
            IdxError::BufferLength {
                expected: 6,
                actual: 5
            }
        ));
    }

    #[test]
    fn pixel_addressing_is_row_major() {
        let raster = ramp(4, 3);
        assert_eq!(raster.get(0, 0), Some(0));
        assert_eq!(raster.get(1, 0), Some(4));
        assert_eq!(raster.get(2, 3), Some(11));
        assert_eq!(raster.get(3, 0), None);
        assert_eq!(raster.get(0, 4), None);
        assert_eq!(raster.row(1), Some(&[4u8, 5, 6, 7][..]));
        assert_eq!(raster.rows().count(), 3);
    }

    #[test]
    fn blank_is_zero_filled() {
        let raster = Raster::blank(5, 2);
        assert_eq!(raster.len(), 10);
        assert!(raster.as_bytes().iter().all(|&p| p == 0));
    }

    #[test]
    fn gray_image_conversion_keeps_layout() {
        let raster = ramp(3, 2);
        let image = GrayImage::try_from(&raster).expect("length invariant holds");
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 1).0, [5]);

        let back = Raster::try_from(image).expect("same dimensions");
        assert_eq!(back, raster);
    }

    #[test]
    fn conversion_rejects_broken_length_instead_of_blanking() {
        // Built directly; the public constructors cannot produce this.
        let broken = Raster {
            width: 4,
            height: 4,
            pixels: vec![7; 3],
        };
        let err = GrayImage::try_from(&broken).unwrap_err();
        assert!(matches!(
            err,
            IdxError::BufferLength {
                expected: 16,
                actual: 3
            }
        ));
    }
}
