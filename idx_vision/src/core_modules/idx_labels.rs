use crate::core_modules::byte_reader::read_block;
use crate::core_modules::idx_header::{IdxKind, read_header};
use crate::error::{IdxError, Result};
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

// Labels are read in bounded blocks; the bound only caps memory reserved ahead
// of the data actually arriving.
const LABEL_BLOCK: usize = 1 << 16;

/// Decodes an IDX label stream positioned at offset 0. One byte per record,
/// returned in file order.
pub fn decode_labels<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let header = read_header(reader, IdxKind::Labels)?;
    let count = header.record_count as usize;

    let mut labels = Vec::with_capacity(count.min(LABEL_BLOCK));
    let mut block = vec![0u8; count.min(LABEL_BLOCK)];
    while labels.len() < count {
        let want = (count - labels.len()).min(LABEL_BLOCK);
        let buf = &mut block[..want];
        if let Err(available) = read_block(reader, buf) {
            return Err(IdxError::TruncatedRecord {
                record: labels.len() + available,
                expected: 1,
                available: 0,
            });
        }
        labels.extend_from_slice(buf);
    }

    debug!("decoded {} labels", labels.len());
    Ok(labels)
}

/// Opens `path` and decodes it as an IDX label file.
pub fn read_labels_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let labels = decode_labels(&mut BufReader::new(file))?;
    info!("{}: {} labels", path.display(), labels.len());
    Ok(labels)
}
