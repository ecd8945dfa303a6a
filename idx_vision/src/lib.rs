// THEORY:
// This file is the main entry point for the `idx_vision` library crate.
// It exposes the decoder and transforms as `core_modules`, the one-call answer
// set as `pipeline`, and concurrent file decoding as `parallel_pipeline`.
// Drivers such as `idx_tester` own argument parsing and file naming; everything
// here works on readers, writers, and in-memory rasters.

pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use core_modules::raster::Raster;
pub use error::{IdxError, Result};
