// THEORY:
// Every failure the decoder and its transforms can produce is one variant of
// `IdxError`. Each is raised synchronously where the violation is detected and
// aborts the enclosing operation; nothing here is retried and no partial result
// is ever handed back alongside an error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdxError {
    /// The header could not be read in full.
    #[error("malformed IDX header: {0}")]
    Format(String),

    /// The container kind does not match what the caller asked for.
    #[error("IDX magic mismatch: expected {expected:#010x}, found {found:#010x}")]
    MagicMismatch { expected: u32, found: u32 },

    /// Fewer pixel or label bytes than the header declared.
    #[error("truncated record {record}: expected {expected} bytes, {available} available")]
    TruncatedRecord {
        record: usize,
        expected: usize,
        available: usize,
    },

    /// An aggregate input raster differs in size from the first one.
    #[error("raster {index} is {found:?} (width, height), expected {expected:?}")]
    DimensionMismatch {
        index: usize,
        expected: (u32, u32),
        found: (u32, u32),
    },

    /// Centering target smaller than the source in at least one dimension.
    /// Both pairs are `(width, height)`.
    #[error("canvas {canvas:?} is smaller than source {raster:?}")]
    Size {
        raster: (u32, u32),
        canvas: (u32, u32),
    },

    #[error("aggregate over zero elements")]
    EmptyInput,

    #[error("pixel buffer holds {actual} bytes, dimensions require {expected}")]
    BufferLength { expected: usize, actual: usize },

    #[error("{images} images paired with {labels} labels")]
    RecordCountMismatch { images: usize, labels: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bitmap codec error: {0}")]
    Bitmap(#[from] image::ImageError),

    #[error("background task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, IdxError>;
