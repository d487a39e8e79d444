//! Option records.
//!
//! An option file is a flat sequence of fields with no header and no
//! version tag; only the record type knows its layout. The store never
//! inspects the fields. It reads them into a copy of the caller's record
//! and commits the copy once the whole file was consumed, so a file
//! written by a different build leaves the record unchanged.

use std::io::{Read, Write};

use crate::error::{Result, StoreError};

/// A settings record persisted as ordered primitive fields.
///
/// Implementations read and write their fields with
/// [`ReadWireExt`](crate::ReadWireExt) and [`WriteWireExt`](crate::WriteWireExt),
/// in the same order both ways.
pub trait OptionRecord {
    /// Overwrite `self` with fields read from `reader`.
    fn read_fields(&mut self, reader: &mut dyn Read) -> Result<()>;

    /// Write every field of `self` to `writer`.
    fn write_fields(&self, writer: &mut dyn Write) -> Result<()>;
}

/// Read `target` from `reader`, committing only on full success.
///
/// Bytes left after the last field are an error: they mean the file was
/// written with a different field layout.
pub fn read_options<T, R>(reader: &mut R, target: &mut T) -> Result<()>
where
    T: OptionRecord + Clone,
    R: Read,
{
    let mut staged = target.clone();
    staged.read_fields(&mut *reader)?;
    let mut probe = [0u8; 1];
    if reader.read(&mut probe)? != 0 {
        return Err(StoreError::TrailingBytes);
    }
    *target = staged;
    Ok(())
}

/// Encode `record`.
pub fn write_options<T: OptionRecord + ?Sized>(record: &T) -> Result<Vec<u8>> {
    let mut buf: Vec<u8> = Vec::new();
    record.write_fields(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::wire::{ReadWireExt, WriteWireExt};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) struct ListingOptions {
        pub(crate) lowercase: bool,
        pub(crate) bytes_per_line: i32,
        pub(crate) label_prefix: Option<String>,
    }

    impl Default for ListingOptions {
        fn default() -> Self {
            Self {
                lowercase: false,
                bytes_per_line: 8,
                label_prefix: None,
            }
        }
    }

    impl OptionRecord for ListingOptions {
        fn read_fields(&mut self, reader: &mut dyn Read) -> Result<()> {
            self.lowercase = reader.read_bool()?;
            self.bytes_per_line = reader.read_int()?;
            self.label_prefix = reader.read_nullable_string()?;
            Ok(())
        }

        fn write_fields(&self, writer: &mut dyn Write) -> Result<()> {
            writer.write_bool(self.lowercase)?;
            writer.write_int(self.bytes_per_line)?;
            writer.write_nullable_string(self.label_prefix.as_deref())
        }
    }

    #[test]
    fn test_round_trip() {
        let options = ListingOptions {
            lowercase: true,
            bytes_per_line: 16,
            label_prefix: Some("L".into()),
        };
        let bytes = write_options(&options).unwrap();
        let mut loaded = ListingOptions::default();
        read_options(&mut bytes.as_slice(), &mut loaded).unwrap();
        assert_eq!(loaded, options);
    }

    #[test]
    fn test_short_file_leaves_record() {
        let mut loaded = ListingOptions::default();
        let err = read_options(&mut [1u8, 0, 0].as_slice(), &mut loaded).unwrap_err();
        assert!(matches!(err, StoreError::Truncated));
        assert_eq!(loaded, ListingOptions::default());
    }

    #[test]
    fn test_trailing_bytes_leave_record() {
        let mut bytes = write_options(&ListingOptions {
            lowercase: true,
            ..Default::default()
        })
        .unwrap();
        bytes.push(0);
        let mut loaded = ListingOptions::default();
        let err = read_options(&mut bytes.as_slice(), &mut loaded).unwrap_err();
        assert!(matches!(err, StoreError::TrailingBytes));
        assert!(!loaded.lowercase);
    }
}
