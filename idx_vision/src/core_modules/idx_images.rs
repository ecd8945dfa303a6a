// THEORY:
// Image records carry no delimiter: each is exactly `rows * cols` bytes laid
// back to back after the header. The decoder consumes them strictly in order,
// and any short read aborts the whole call. The caller either gets every record
// the header promised or an error, never a partial dataset.

use crate::core_modules::idx_header::{IdxKind, read_header};
use crate::core_modules::raster::Raster;
use crate::error::{IdxError, Result};
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

// Upper bounds on up-front allocation so a corrupt header cannot reserve
// gigabytes before the bytes it promises have arrived.
const MAX_PREALLOCATED_RECORDS: usize = 1 << 16;
const MAX_PREALLOCATED_RECORD_BYTES: usize = 1 << 16;

/// Decodes an IDX image stream positioned at offset 0 into rasters in file order.
pub fn decode_images<R: Read>(reader: &mut R) -> Result<Vec<Raster>> {
    let header = read_header(reader, IdxKind::Images)?;
    let rows = header.rows.unwrap_or_default();
    let cols = header.cols.unwrap_or_default();
    let record_size = header.record_size()?;
    let payload_len = header.payload_len()?;
    let count = header.record_count as usize;
    debug!("expecting {payload_len} pixel bytes after the header");

    let mut images = Vec::with_capacity(count.min(MAX_PREALLOCATED_RECORDS));
    for record in 0..count {
        // Grows only as bytes arrive, so a lying header fails on the short read
        // instead of on the allocation.
        let mut pixels = Vec::with_capacity(record_size.min(MAX_PREALLOCATED_RECORD_BYTES));
        let read = reader
            .by_ref()
            .take(record_size as u64)
            .read_to_end(&mut pixels);
        if read.is_err() || pixels.len() < record_size {
            return Err(IdxError::TruncatedRecord {
                record,
                expected: record_size,
                available: pixels.len(),
            });
        }
        images.push(Raster::from_parts(cols, rows, pixels));
    }

    debug!("decoded {} images of {cols}x{rows}", images.len());
    Ok(images)
}

/// Opens `path` and decodes it as an IDX image file. The handle is released on
/// every exit path.
pub fn read_images_file<P: AsRef<Path>>(path: P) -> Result<Vec<Raster>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let images = decode_images(&mut BufReader::new(file))?;
    info!("{}: {} images", path.display(), images.len());
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::idx_header::{IMAGE_MAGIC, LABEL_MAGIC};
    use std::io::Cursor;

    fn image_file(count: u32, rows: u32, cols: u32, pixels: &[u8]) -> Vec<u8> {
        let mut bytes: Vec<u8> = [IMAGE_MAGIC, count, rows, cols]
            .iter()
            .flat_map(|f| f.to_be_bytes())
            .collect();
        bytes.extend_from_slice(pixels);
        bytes
    }

    #[test]
    fn decodes_records_in_file_order() {
        let pixels: Vec<u8> = (0..12).collect();
        let bytes = image_file(2, 2, 3, &pixels);

        let images = decode_images(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].dimensions(), (3, 2));
        assert_eq!(images[0].as_bytes(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(images[1].as_bytes(), &[6, 7, 8, 9, 10, 11]);
        assert_eq!(images[1].get(1, 0), Some(9));
    }

    #[test]
    fn trailing_bytes_are_left_unread() {
        let bytes = image_file(1, 1, 2, &[7, 8, 9]);
        let mut cursor = Cursor::new(bytes);
        let images = decode_images(&mut cursor).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(cursor.position(), 18);
    }

    #[test]
    fn short_record_fails_the_whole_decode() {
        let bytes = image_file(2, 2, 2, &[1, 2, 3, 4, 5, 6, 7]);
        let err = decode_images(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(
            err,
            IdxError::TruncatedRecord {
                record: 1,
                expected: 4,
                available: 3
            }
        ));
    }

    #[test]
    fn label_file_is_rejected() {
        let bytes: Vec<u8> = [LABEL_MAGIC, 1].iter().flat_map(|f| f.to_be_bytes()).collect();
        let err = decode_images(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, IdxError::MagicMismatch { .. }));
    }

    #[test]
    fn huge_declared_dimensions_fail_without_allocating() {
        let bytes = image_file(1, 0xFFFF, 0xFFFF, &[1, 2, 3]);
        let err = decode_images(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(
            err,
            IdxError::TruncatedRecord {
                record: 0,
                expected: 0xFFFE_0001,
                available: 3
            }
        ));

        if usize::BITS == 64 {
            let bytes = image_file(1, u32::MAX, u32::MAX, &[]);
            let err = decode_images(&mut Cursor::new(bytes)).unwrap_err();
            assert!(matches!(
                err,
                IdxError::TruncatedRecord {
                    record: 0,
                    available: 0,
                    ..
                }
            ));
        }
    }

    #[test]
    fn unaddressable_payload_is_a_format_error() {
        let bytes = image_file(u32::MAX, u32::MAX, u32::MAX, &[]);
        let err = decode_images(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, IdxError::Format(_)));
    }

    #[test]
    fn zero_records_is_an_empty_dataset() {
        let bytes = image_file(0, 28, 28, &[]);
        assert!(decode_images(&mut Cursor::new(bytes)).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("idx_vision_no_such_file-idx3-ubyte");
        let err = read_images_file(path).unwrap_err();
        assert!(matches!(err, IdxError::Io(_)));
    }
}
