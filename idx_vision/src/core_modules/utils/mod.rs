pub mod bitmap_helper;
