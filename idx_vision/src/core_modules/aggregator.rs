// THEORY:
// The aggregator reduces a set of records to one summary value.
//
// Key architectural principles:
// 1.  **Sum, Then Divide**: Pixel values are summed into a `u64` accumulator per
//     position and divided once at the end with truncating integer division. A
//     running average would truncate at every step and drift downwards.
// 2.  **Fresh State Per Call**: Accumulators are local to each call, so
//     independent aggregations can run concurrently without coordination.
// 3.  **Truncation Is Exact**: The label mean is truncated to hundredths with
//     integer arithmetic (`sum * 100 / count`), so values such as 1.33 or 0.29
//     never get pulled across a digit boundary by binary floating point.

use crate::core_modules::raster::Raster;
use crate::error::{IdxError, Result};
use log::{debug, warn};
use std::fmt;

const ACCUMULATE_CHUNK: usize = 64;

/// Checks that `imgs` is non-empty and uniformly sized, returning `(width, height)`.
pub fn common_dimensions(imgs: &[Raster]) -> Result<(u32, u32)> {
    let first = imgs.first().ok_or(IdxError::EmptyInput)?;
    let expected = first.dimensions();
    for (index, img) in imgs.iter().enumerate().skip(1) {
        if img.dimensions() != expected {
            return Err(IdxError::DimensionMismatch {
                index,
                expected,
                found: img.dimensions(),
            });
        }
    }
    Ok(expected)
}

/// Adds every raster's pixels into `sums`. All rasters must already be
/// `sums.len()` pixels long.
pub fn accumulate(imgs: &[Raster], sums: &mut [u64]) {
    for img in imgs {
        // Chunked to keep the inner loop vectorizable.
        for (acc, px) in sums
            .chunks_mut(ACCUMULATE_CHUNK)
            .zip(img.as_bytes().chunks(ACCUMULATE_CHUNK))
        {
            for (a, &p) in acc.iter_mut().zip(px) {
                *a += u64::from(p);
            }
        }
    }
}

/// Divides accumulated sums by `count` and packs the result as a raster.
pub(crate) fn finish(width: u32, height: u32, sums: &[u64], count: u64) -> Raster {
    let pixels = sums.iter().map(|&s| (s / count) as u8).collect();
    Raster::from_parts(width, height, pixels)
}

/// Element-wise truncating mean of equally sized rasters.
pub fn average_images(imgs: &[Raster]) -> Result<Raster> {
    let (width, height) = common_dimensions(imgs)?;
    let mut sums = vec![0u64; width as usize * height as usize];
    accumulate(imgs, &mut sums);
    debug!("averaged {} rasters of {width}x{height}", imgs.len());
    Ok(finish(width, height, &sums, imgs.len() as u64))
}

/// Mean of a label set. `Display` renders it `%05.2f`-style but truncated, so
/// 1.6666.. prints as `01.66`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelAverage {
    pub sum: u64,
    pub count: u64,
}

impl LabelAverage {
    pub fn mean(&self) -> f64 {
        self.sum as f64 / self.count as f64
    }

    /// The mean in hundredths, truncated toward zero.
    pub fn truncated_hundredths(&self) -> u64 {
        self.sum * 100 / self.count
    }
}

impl fmt::Display for LabelAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Width 5 only holds means below 100; larger values widen the output.
        let hundredths = self.truncated_hundredths();
        write!(f, "{:02}.{:02}", hundredths / 100, hundredths % 100)
    }
}

/// Sums `lbls` into a wide accumulator. Values above 9 are accepted but logged.
pub fn average_labels(lbls: &[u8]) -> Result<LabelAverage> {
    if lbls.is_empty() {
        return Err(IdxError::EmptyInput);
    }
    let out_of_range = lbls.iter().filter(|&&l| l > 9).count();
    if out_of_range > 0 {
        warn!("{out_of_range} of {} labels are outside 0..=9", lbls.len());
    }
    let sum = lbls.iter().map(|&l| u64::from(l)).sum();
    Ok(LabelAverage {
        sum,
        count: lbls.len() as u64,
    })
}
