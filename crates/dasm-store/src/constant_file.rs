//! Single-column constant files.
//!
//! Layout: the string `"CST"`, an `i32` format version (1), an `i32` row
//! count, then one nullable string per row. These files are never
//! compressed.

use std::io::{Read, Write};

use dasm_model::{COLS, Constant, ROWS};

use crate::error::{Result, StoreError};
use crate::wire::{ReadWireExt, WriteWireExt};

/// Identification string at the start of a constant file.
pub const CONSTANT_HEADER: &str = "CST";

/// Only format version of constant files.
pub const CONSTANT_FORMAT_VERSION: i32 = 1;

/// Write one name column of `constant`.
pub fn write_column<W: Write>(writer: &mut W, constant: &Constant, column: usize) -> Result<()> {
    check_column(column)?;
    writer.write_string(CONSTANT_HEADER)?;
    writer.write_int(CONSTANT_FORMAT_VERSION)?;
    writer.write_length(ROWS, "constant rows")?;
    for value in constant.column(column)? {
        writer.write_nullable_string(value.as_deref())?;
    }
    writer.flush()?;
    Ok(())
}

/// Replace one name column of `constant` with the column in `reader`.
///
/// The column is read in full before anything is replaced, so `constant`
/// is untouched on error.
pub fn read_column<R: Read>(reader: &mut R, constant: &mut Constant, column: usize) -> Result<()> {
    check_column(column)?;

    let header = reader.read_string()?;
    if header != CONSTANT_HEADER {
        return Err(StoreError::BadHeader {
            expected: CONSTANT_HEADER,
            found: header,
        });
    }

    let version = reader.read_int()?;
    if version != CONSTANT_FORMAT_VERSION {
        return Err(StoreError::UnsupportedVersion {
            format: "constant",
            found: version,
            max_supported: CONSTANT_FORMAT_VERSION,
        });
    }

    let count = reader.read_int()?;
    if usize::try_from(count).ok() != Some(ROWS) {
        return Err(StoreError::ConstantCountMismatch {
            expected: ROWS,
            found: count,
        });
    }

    let mut values = Vec::with_capacity(ROWS);
    for _ in 0..ROWS {
        values.push(reader.read_nullable_string()?);
    }
    constant.replace_column(column, values)?;
    Ok(())
}

fn check_column(column: usize) -> Result<()> {
    if column >= COLS {
        return Err(StoreError::ColumnOutOfRange { column });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_round_trip() {
        let mut source = Constant::new();
        source.set(4, 0, Some("ZP".into())).unwrap();
        source.set(4, 0xd020, Some("BORDER".into())).unwrap();
        source.set(5, 1, Some("OTHER".into())).unwrap();

        let mut buf: Vec<u8> = Vec::new();
        write_column(&mut buf, &source, 4).unwrap();
        assert_eq!(&buf[..5], &[0x00, 0x03, b'C', b'S', b'T']);

        let mut target = Constant::new();
        target.set(7, 9, Some("STALE".into())).unwrap();
        read_column(&mut buf.as_slice(), &mut target, 7).unwrap();
        assert_eq!(target.get(7, 0), Some("ZP"));
        assert_eq!(target.get(7, 0xd020), Some("BORDER"));
        assert_eq!(target.get(7, 9), None);
        assert_eq!(target.name_count(), 2);
    }

    #[test]
    fn test_empty_column_writes_every_row() {
        let mut buf: Vec<u8> = Vec::new();
        write_column(&mut buf, &Constant::new(), 0).unwrap();
        assert_eq!(buf.len(), 5 + 4 + 4 + ROWS);
        assert!(buf[13..].iter().all(|&flag| flag == 0));
    }

    #[test]
    fn test_bad_header() {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_string("XXX").unwrap();
        buf.write_int(1).unwrap();
        let err = read_column(&mut buf.as_slice(), &mut Constant::new(), 0).unwrap_err();
        assert!(matches!(err, StoreError::BadHeader { ref found, .. } if found == "XXX"));
    }

    #[test]
    fn test_unsupported_version() {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_string(CONSTANT_HEADER).unwrap();
        buf.write_int(2).unwrap();
        let err = read_column(&mut buf.as_slice(), &mut Constant::new(), 0).unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedVersion { found: 2, .. }));
    }

    #[test]
    fn test_count_mismatch_leaves_column() {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_string(CONSTANT_HEADER).unwrap();
        buf.write_int(1).unwrap();
        buf.write_int(256).unwrap();
        let mut target = Constant::new();
        target.set(0, 3, Some("KEEP".into())).unwrap();
        let err = read_column(&mut buf.as_slice(), &mut target, 0).unwrap_err();
        assert!(matches!(
            err,
            StoreError::ConstantCountMismatch { found: 256, .. }
        ));
        assert_eq!(target.get(0, 3), Some("KEEP"));
    }

    #[test]
    fn test_truncated_column_leaves_target() {
        let mut buf: Vec<u8> = Vec::new();
        write_column(&mut buf, &Constant::new(), 0).unwrap();
        buf.truncate(buf.len() - 10);
        let mut target = Constant::new();
        target.set(0, 3, Some("KEEP".into())).unwrap();
        assert!(matches!(
            read_column(&mut buf.as_slice(), &mut target, 0),
            Err(StoreError::Truncated)
        ));
        assert_eq!(target.get(0, 3), Some("KEEP"));
    }

    #[test]
    fn test_column_out_of_range() {
        let mut buf: Vec<u8> = Vec::new();
        assert!(matches!(
            write_column(&mut buf, &Constant::new(), COLS),
            Err(StoreError::ColumnOutOfRange { column: 20 })
        ));
    }
}
