// THEORY:
// Decoding one IDX file is inherently sequential, but separate files share
// nothing, so they are decoded on tokio's blocking pool side by side. The
// pixel-sum pass of the aggregator is data-parallel as well: the input set is
// split into one slice per worker, each worker sums its slice into a private
// accumulator, and the partial sums are reduced before the single division.
// The result is bit-identical to the sequential `average_images`.

use crate::core_modules::aggregator::{accumulate, common_dimensions, finish};
use crate::core_modules::idx_header::IdxKind;
use crate::core_modules::idx_images::read_images_file;
use crate::core_modules::idx_labels::read_labels_file;
use crate::core_modules::raster::Raster;
use crate::error::{IdxError, Result};
use crate::pipeline::Dataset;
use futures::future::{try_join, try_join_all};
use log::debug;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of partitions the aggregate pass is split into.
    pub workers: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().max(1),
        }
    }
}

/// One IDX file to decode.
#[derive(Debug, Clone)]
pub struct IdxSource {
    pub kind: IdxKind,
    pub path: PathBuf,
}

impl IdxSource {
    pub fn images<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            kind: IdxKind::Images,
            path: path.into(),
        }
    }

    pub fn labels<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            kind: IdxKind::Labels,
            path: path.into(),
        }
    }
}

/// The decoded content of an `IdxSource`.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Images(Vec<Raster>),
    Labels(Vec<u8>),
}

async fn run_blocking<T, F>(job: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| IdxError::Task(e.to_string()))?
}

/// Decodes an image file and its label file concurrently and pairs them.
pub async fn load_dataset<P, Q>(images_path: P, labels_path: Q) -> Result<Dataset>
where
    P: Into<PathBuf>,
    Q: Into<PathBuf>,
{
    let images_path = images_path.into();
    let labels_path = labels_path.into();
    let (images, labels) = try_join(
        run_blocking(move || read_images_file(images_path)),
        run_blocking(move || read_labels_file(labels_path)),
    )
    .await?;
    Dataset::new(images, labels)
}

/// Decodes every source concurrently. Results keep the order of `sources`;
/// the first failure fails the whole call.
pub async fn load_files(sources: Vec<IdxSource>) -> Result<Vec<Decoded>> {
    let jobs = sources.into_iter().map(|source| {
        run_blocking(move || match source.kind {
            IdxKind::Images => read_images_file(&source.path).map(Decoded::Images),
            IdxKind::Labels => read_labels_file(&source.path).map(Decoded::Labels),
        })
    });
    try_join_all(jobs).await
}

/// Partitioned version of `average_images`.
pub async fn average_images_parallel(imgs: Arc<[Raster]>, config: &LoaderConfig) -> Result<Raster> {
    let (width, height) = common_dimensions(&imgs)?;
    let len = width as usize * height as usize;
    let total = imgs.len();
    let workers = config.workers.clamp(1, total);
    let per_worker = total.div_ceil(workers);

    let partials = (0..workers).map(|w| {
        let imgs = Arc::clone(&imgs);
        let start = (w * per_worker).min(total);
        let end = (start + per_worker).min(total);
        run_blocking(move || {
            let mut sums = vec![0u64; len];
            accumulate(&imgs[start..end], &mut sums);
            Ok(sums)
        })
    });
    let partials = try_join_all(partials).await?;

    let mut sums = vec![0u64; len];
    for partial in partials {
        for (acc, part) in sums.iter_mut().zip(partial) {
            *acc += part;
        }
    }
    debug!("averaged {total} rasters across {workers} workers");
    Ok(finish(width, height, &sums, total as u64))
}
