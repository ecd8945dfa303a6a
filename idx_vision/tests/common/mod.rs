#![allow(dead_code)]

use idx_vision::core_modules::idx_header::{IMAGE_MAGIC, LABEL_MAGIC};
use std::path::PathBuf;

/// Builds an IDX image file whose pixel at `(record, row, col)` is
/// `(record * 31 + row * 7 + col) % 256`.
pub fn synthetic_images(count: u32, rows: u32, cols: u32) -> Vec<u8> {
    let mut bytes: Vec<u8> = [IMAGE_MAGIC, count, rows, cols]
        .iter()
        .flat_map(|f| f.to_be_bytes())
        .collect();
    for record in 0..count {
        for row in 0..rows {
            for col in 0..cols {
                bytes.push(((record * 31 + row * 7 + col) % 256) as u8);
            }
        }
    }
    bytes
}

pub fn synthetic_labels(labels: &[u8]) -> Vec<u8> {
    let mut bytes: Vec<u8> = [LABEL_MAGIC, labels.len() as u32]
        .iter()
        .flat_map(|f| f.to_be_bytes())
        .collect();
    bytes.extend_from_slice(labels);
    bytes
}

/// A per-test scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("idx_vision_it_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("scratch dir");
    dir
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
