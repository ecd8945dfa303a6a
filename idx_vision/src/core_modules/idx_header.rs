// THEORY:
// An IDX file opens with a fixed header of 32-bit big-endian fields: the magic
// number, the record count, and for image files the row and column counts.
// There is no per-record framing after it, so the header alone decides how the
// rest of the stream is sliced.
//
// Offset  Field        Images        Labels
// 0       magic        0x00000803    0x00000801
// 4       count        n             n
// 8       rows         r             -
// 12      cols         c             -
// 16 / 8  records      n * r * c     n bytes

use crate::core_modules::byte_reader::read_be_u32;
use crate::error::{IdxError, Result};
use log::debug;
use std::io::Read;

pub const IMAGE_MAGIC: u32 = 0x0000_0803;
pub const LABEL_MAGIC: u32 = 0x0000_0801;

/// The two container kinds this crate decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdxKind {
    Images,
    Labels,
}

impl IdxKind {
    pub const fn magic(self) -> u32 {
        match self {
            Self::Images => IMAGE_MAGIC,
            Self::Labels => LABEL_MAGIC,
        }
    }

    /// Header length in bytes.
    pub const fn header_len(self) -> usize {
        match self {
            Self::Images => 16,
            Self::Labels => 8,
        }
    }
}

/// The decoded header. `rows`/`cols` are only present for image files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdxHeader {
    pub kind: IdxKind,
    pub magic: u32,
    pub record_count: u32,
    pub rows: Option<u32>,
    pub cols: Option<u32>,
}

impl IdxHeader {
    /// Bytes per record: `rows * cols` for images, 1 for labels. A product
    /// that does not fit in `usize` is a `Format` error.
    pub fn record_size(&self) -> Result<usize> {
        match (self.rows, self.cols) {
            (Some(rows), Some(cols)) => (rows as usize).checked_mul(cols as usize).ok_or_else(|| {
                IdxError::Format(format!("record size {rows}x{cols} overflows"))
            }),
            _ => Ok(1),
        }
    }

    /// Bytes that must follow the header for the file to be complete.
    pub fn payload_len(&self) -> Result<usize> {
        (self.record_count as usize)
            .checked_mul(self.record_size()?)
            .ok_or_else(|| {
                IdxError::Format(format!(
                    "payload of {} records overflows",
                    self.record_count
                ))
            })
    }
}

fn header_field<R: Read>(reader: &mut R, field: &str) -> Result<u32> {
    read_be_u32(reader).map_err(|e| IdxError::Format(format!("reading {field}: {e}")))
}

/// Reads and validates the header for `kind`, leaving `reader` at the first record.
pub fn read_header<R: Read>(reader: &mut R, kind: IdxKind) -> Result<IdxHeader> {
    let magic = header_field(reader, "magic number")?;
    if magic != kind.magic() {
        return Err(IdxError::MagicMismatch {
            expected: kind.magic(),
            found: magic,
        });
    }
    let record_count = header_field(reader, "record count")?;

    let (rows, cols) = match kind {
        IdxKind::Images => {
            let rows = header_field(reader, "row count")?;
            let cols = header_field(reader, "column count")?;
            (Some(rows), Some(cols))
        }
        IdxKind::Labels => (None, None),
    };

    let header = IdxHeader {
        kind,
        magic,
        record_count,
        rows,
        cols,
    };
    debug!("IDX header: {header:?}");
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn be_fields(fields: &[u32]) -> Vec<u8> {
        fields.iter().flat_map(|f| f.to_be_bytes()).collect()
    }

    #[test]
    fn reads_image_header_and_stops_at_first_record() {
        let mut bytes = be_fields(&[IMAGE_MAGIC, 60000, 28, 28]);
        bytes.push(0xAB);
        let mut cursor = Cursor::new(bytes);

        let header = read_header(&mut cursor, IdxKind::Images).unwrap();
        assert_eq!(header.record_count, 60000);
        assert_eq!(header.rows, Some(28));
        assert_eq!(header.cols, Some(28));
        assert_eq!(header.record_size().unwrap(), 784);
        assert_eq!(header.payload_len().unwrap(), 60000 * 784);
        assert_eq!(cursor.position(), 16);
    }

    #[test]
    fn label_header_has_no_dimensions() {
        let mut cursor = Cursor::new(be_fields(&[LABEL_MAGIC, 10]));
        let header = read_header(&mut cursor, IdxKind::Labels).unwrap();
        assert_eq!(header.rows, None);
        assert_eq!(header.record_size().unwrap(), 1);
        assert_eq!(header.payload_len().unwrap(), 10);
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn wrong_kind_is_a_magic_mismatch() {
        let mut cursor = Cursor::new(be_fields(&[LABEL_MAGIC, 10]));
        let err = read_header(&mut cursor, IdxKind::Images).unwrap_err();
        assert!(matches!(
            err,
            IdxError::MagicMismatch {
                expected: IMAGE_MAGIC,
                found: LABEL_MAGIC
            }
        ));
    }

    #[test]
    fn oversized_payload_is_a_format_error() {
        let header = IdxHeader {
            kind: IdxKind::Images,
            magic: IMAGE_MAGIC,
            record_count: u32::MAX,
            rows: Some(u32::MAX),
            cols: Some(u32::MAX),
        };
        // rows * cols fits a 64-bit usize, times the count does not.
        if usize::BITS == 64 {
            assert!(header.record_size().is_ok());
        }
        assert!(matches!(header.payload_len(), Err(IdxError::Format(_))));
    }

    #[test]
    fn short_header_is_a_format_error() {
        for len in 0..16 {
            let bytes = be_fields(&[IMAGE_MAGIC, 1, 2, 2]);
            let mut cursor = Cursor::new(bytes[..len].to_vec());
            let err = read_header(&mut cursor, IdxKind::Images).unwrap_err();
            assert!(matches!(err, IdxError::Format(_)), "len {len}: {err}");
        }
    }
}
