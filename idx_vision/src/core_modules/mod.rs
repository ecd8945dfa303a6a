pub mod aggregator;
pub mod byte_reader;
pub mod canvas;
pub mod hex_dump;
pub mod idx_header;
pub mod idx_images;
pub mod idx_labels;
pub mod raster;
pub mod utils;
