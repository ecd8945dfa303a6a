// Fixed-width numeric framing. IDX stores every multi-byte field MSB first, so
// all integer reads go through `read_be_uint` and never depend on host order.

use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, Read};

/// Reads `width` bytes (1..=8) and interprets them as a big-endian unsigned integer.
pub fn read_be_uint<R: Read>(reader: &mut R, width: usize) -> io::Result<u64> {
    if width == 0 || width > 8 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unsupported integer width {width}"),
        ));
    }
    reader.read_uint::<BigEndian>(width)
}

pub fn read_be_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    // A 4-byte read always fits in u32.
    read_be_uint(reader, 4).map(|v| v as u32)
}

/// Fills `buf` completely, returning how many bytes were actually available if
/// the stream ran dry first. Interrupted reads are resumed.
pub fn read_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => return Err(filled),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => return Err(filled),
        }
    }
    Ok(())
}
