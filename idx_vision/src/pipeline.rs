// THEORY:
// The `pipeline` module is the top-level API of the crate. It takes a decoded
// dataset (images plus index-aligned labels) and produces the full answer set
// in one call: the first image, the mean of the first few images, the truncated
// mean of the first few labels, and the centered versions used for bitmaps.
// Writing those answers to disk is left to the driver.

use crate::core_modules::aggregator::{LabelAverage, average_images, average_labels};
use crate::core_modules::canvas::center_all;
use crate::error::{IdxError, Result};
use log::info;

// Re-export key data structures for the public API.
pub use crate::core_modules::raster::Raster;

/// Configuration for the DatasetPipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Height of the canvas that samples are centered on.
    pub canvas_rows: u32,
    /// Width of the canvas that samples are centered on.
    pub canvas_cols: u32,
    /// How many leading records feed the averages and the bitmap batch.
    pub sample_count: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            canvas_rows: 32,
            canvas_cols: 32,
            sample_count: 10,
        }
    }
}

/// Images and labels decoded from one pair of IDX files. Index `i` of both
/// describes the same example.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    images: Vec<Raster>,
    labels: Vec<u8>,
}

impl Dataset {
    pub fn new(images: Vec<Raster>, labels: Vec<u8>) -> Result<Self> {
        if images.len() != labels.len() {
            return Err(IdxError::RecordCountMismatch {
                images: images.len(),
                labels: labels.len(),
            });
        }
        Ok(Self { images, labels })
    }

    pub fn images(&self) -> &[Raster] {
        &self.images
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Everything the driver writes out for one dataset.
#[derive(Debug, Clone)]
pub struct Report {
    /// Number of records the sample-based answers were computed over.
    pub sample_count: usize,
    pub first_image: Raster,
    pub sample_average: Raster,
    pub label_average: LabelAverage,
    pub first_centered: Raster,
    pub samples: Vec<Raster>,
    pub centered_samples: Vec<Raster>,
}

/// The main, top-level struct for the dataset pipeline.
pub struct DatasetPipeline {
    config: PipelineConfig,
}

impl DatasetPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Builds the answer set from the first `sample_count` records, clamped to
    /// what the dataset holds.
    pub fn generate_report(&self, dataset: &Dataset) -> Result<Report> {
        let n = self.config.sample_count.min(dataset.len());
        let samples = &dataset.images()[..n];
        let first_image = samples.first().cloned().ok_or(IdxError::EmptyInput)?;

        let sample_average = average_images(samples)?;
        let label_average = average_labels(&dataset.labels()[..n])?;
        let centered_samples =
            center_all(samples, self.config.canvas_rows, self.config.canvas_cols)?;
        let first_centered = centered_samples
            .first()
            .cloned()
            .ok_or(IdxError::EmptyInput)?;

        info!(
            "report over {n} of {} records: label mean {label_average}",
            dataset.len()
        );
        Ok(Report {
            sample_count: n,
            first_image,
            sample_average,
            label_average,
            first_centered,
            samples: samples.to_vec(),
            centered_samples,
        })
    }
}
