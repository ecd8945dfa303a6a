// THEORY:
// The canvas transform places a raster in the middle of a larger zero-filled
// raster. The slack in each dimension is split with integer division, so when
// it is odd the extra row/column of padding lands on the bottom/right. The
// transform only ever grows: a target smaller than the source is a `Size`
// error, never a crop.

use crate::core_modules::raster::Raster;
use crate::error::{IdxError, Result};
use log::debug;

/// Offsets `(row_offset, col_offset)` of `src` inside a `target_rows x target_cols`
/// canvas, or a `Size` error if the canvas is too small.
pub fn center_offsets(src: &Raster, target_rows: u32, target_cols: u32) -> Result<(u32, u32)> {
    if target_rows < src.height() || target_cols < src.width() {
        return Err(IdxError::Size {
            raster: src.dimensions(),
            canvas: (target_cols, target_rows),
        });
    }
    Ok((
        (target_rows - src.height()) / 2,
        (target_cols - src.width()) / 2,
    ))
}

/// Returns a new `target_cols x target_rows` raster with `src` centered and the
/// border set to 0. `src` is not modified.
pub fn center(src: &Raster, target_rows: u32, target_cols: u32) -> Result<Raster> {
    let (row_offset, col_offset) = center_offsets(src, target_rows, target_cols)?;

    let canvas_width = target_cols as usize;
    let mut pixels = vec![0u8; canvas_width * target_rows as usize];
    for (i, src_row) in src.rows().enumerate() {
        let start = (i + row_offset as usize) * canvas_width + col_offset as usize;
        pixels[start..start + src_row.len()].copy_from_slice(src_row);
    }

    debug!(
        "centered {:?} on {target_cols}x{target_rows} at offset ({row_offset}, {col_offset})",
        src.dimensions()
    );
    Ok(Raster::from_parts(target_cols, target_rows, pixels))
}

/// Centers every raster on the same canvas. Fails on the first raster that
/// does not fit and returns nothing else.
pub fn center_all(srcs: &[Raster], target_rows: u32, target_cols: u32) -> Result<Vec<Raster>> {
    srcs.iter()
        .map(|src| center(src, target_rows, target_cols))
        .collect()
}
