// Bitmap output is delegated to the `image` crate's BMP codec. This module only
// hands it a `Raster` as an 8-bit grayscale buffer; the header layout is the
// codec's business.

use crate::core_modules::raster::Raster;
use crate::error::Result;
use image::ImageEncoder;
use image::codecs::bmp::BmpEncoder;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Encodes `raster` as a grayscale BMP into `writer`.
pub fn encode_bmp<W: Write>(writer: &mut W, raster: &Raster) -> Result<()> {
    let encoder = BmpEncoder::new(writer);
    encoder.write_image(
        raster.as_bytes(),
        raster.width(),
        raster.height(),
        image::ExtendedColorType::L8,
    )?;
    Ok(())
}

pub fn save_bmp<P: AsRef<Path>>(path: P, raster: &Raster) -> Result<()> {
    let output = File::create(path)?;
    let mut writer = BufWriter::new(output);
    encode_bmp(&mut writer, raster)?;
    writer.flush()?;
    Ok(())
}
