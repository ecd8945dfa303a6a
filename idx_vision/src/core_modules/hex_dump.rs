// Text answers: a raster as a grid of `%02X ` tokens, one line per row, and a
// label mean as a single truncated `%05.2f` line.

use crate::core_modules::aggregator::{average_images, average_labels};
use crate::core_modules::raster::Raster;
use crate::error::Result;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes `height` lines of `width` uppercase hex tokens, each followed by a space.
pub fn write_hex_grid<W: Write>(sink: &mut W, raster: &Raster) -> io::Result<()> {
    for row in raster.rows() {
        for px in row {
            write!(sink, "{px:02X} ")?;
        }
        writeln!(sink)?;
    }
    Ok(())
}

pub fn to_hex_grid(raster: &Raster) -> String {
    let mut out = Vec::with_capacity(raster.len() * 3 + raster.height() as usize);
    // Writing into a Vec cannot fail.
    let _ = write_hex_grid(&mut out, raster);
    String::from_utf8_lossy(&out).into_owned()
}

fn create<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}

fn close(mut writer: BufWriter<File>) -> Result<()> {
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

pub fn write_grid_file<P: AsRef<Path>>(path: P, raster: &Raster) -> Result<()> {
    let mut writer = create(path)?;
    write_hex_grid(&mut writer, raster)?;
    close(writer)
}

/// Averages `imgs` and writes the mean raster as a hex grid. The average of a
/// single image is that image.
pub fn write_average_grid<P: AsRef<Path>>(path: P, imgs: &[Raster]) -> Result<()> {
    let average = average_images(imgs)?;
    write_grid_file(path, &average)
}

/// Writes the truncated label mean followed by a newline.
pub fn write_label_average<W: Write>(sink: &mut W, lbls: &[u8]) -> Result<()> {
    let average = average_labels(lbls)?;
    writeln!(sink, "{average}")?;
    Ok(())
}

pub fn write_label_average_file<P: AsRef<Path>>(path: P, lbls: &[u8]) -> Result<()> {
    // Validate before creating the file so a failure leaves nothing behind.
    let average = average_labels(lbls)?;
    let mut writer = create(path)?;
    writeln!(writer, "{average}")?;
    close(writer)
}
