//! Gzip detection and stream wrapping.
//!
//! Project files may be stored plain or gzip-compressed. Readers accept
//! both by sniffing the two magic bytes; the project writer always
//! compresses. Constant and option files are never compressed.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use crate::error::{Result, StoreError};

/// Gzip magic (`1F 8B`) read as a little-endian `u16`.
pub const GZIP_MAGIC: u16 = 0x8B1F;

/// Whether `bytes` starts with the gzip magic.
pub fn is_compressed_bytes(bytes: &[u8]) -> bool {
    match bytes {
        [b0, b1, ..] => u16::from(*b0) | (u16::from(*b1) << 8) == GZIP_MAGIC,
        _ => false,
    }
}

/// Whether the file at `path` starts with the gzip magic.
///
/// A file that cannot be opened or holds fewer than two bytes is reported
/// as not compressed; the caller's subsequent open surfaces the real error.
pub fn is_compressed(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    let mut magic = [0u8; 2];
    file.read_exact(&mut magic).is_ok() && is_compressed_bytes(&magic)
}

/// Open `path` for reading, decompressing when it is gzip.
pub fn open_reader(path: &Path) -> Result<Box<dyn Read>> {
    let compressed = is_compressed(path);
    let file = File::open(path).map_err(|e| StoreError::open(path, e))?;
    let reader = BufReader::new(file);
    if compressed {
        tracing::debug!(path = %path.display(), "reading gzip stream");
        Ok(Box::new(BufReader::new(GzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

/// Wrap an in-memory buffer, decompressing when it is gzip.
pub fn slice_reader(bytes: &[u8]) -> Box<dyn Read + '_> {
    if is_compressed_bytes(bytes) {
        Box::new(BufReader::new(GzDecoder::new(bytes)))
    } else {
        Box::new(bytes)
    }
}

/// Gzip `bytes` at `level`.
pub fn compress(bytes: &[u8], level: Compression) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len() / 4), level);
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}
