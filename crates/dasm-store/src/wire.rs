//! Primitive codec shared by every file format.
//!
//! All multi-byte integers are big-endian. Short strings carry a `u16`
//! byte-length prefix followed by modified UTF-8; long strings escape to an
//! `i32` length when the short form would overflow. Enums are persisted by
//! symbolic name.
//!
//! Both traits are blanket-implemented, so any `Read`/`Write` (including
//! `&mut dyn Read`) gets the methods once the trait is in scope.

use std::io::{self, Read, Write};
use std::str::FromStr;

use byteorder::BigEndian;
use dasm_model::ModelError;

use crate::error::{Result, StoreError};
use crate::mutf8;

/// Largest encoded short string.
pub const MAX_STRING_LEN: usize = u16::MAX as usize;

/// Upper bound on up-front allocation for a length read from the stream.
const PREALLOC_LIMIT: usize = 1 << 20;

/// Reading half of the primitive codec.
pub trait ReadWireExt: Read {
    fn read_bool(&mut self) -> Result<bool> {
        Ok(byteorder::ReadBytesExt::read_u8(self)? != 0)
    }

    fn read_byte(&mut self) -> Result<u8> {
        Ok(byteorder::ReadBytesExt::read_u8(self)?)
    }

    fn read_int(&mut self) -> Result<i32> {
        Ok(byteorder::ReadBytesExt::read_i32::<BigEndian>(self)?)
    }

    /// A 16-bit character code.
    fn read_char(&mut self) -> Result<u16> {
        Ok(byteorder::ReadBytesExt::read_u16::<BigEndian>(self)?)
    }

    /// An `i32` length or count that must not be negative.
    fn read_length(&mut self, field: &'static str) -> Result<usize> {
        let len = self.read_int()?;
        usize::try_from(len).map_err(|_| StoreError::NegativeLength { field, len })
    }

    fn read_string(&mut self) -> Result<String> {
        let len = usize::from(self.read_char()?);
        let bytes = self.read_vec(len)?;
        mutf8::decode(&bytes)
    }

    /// A presence flag followed by the string when present.
    fn read_nullable_string(&mut self) -> Result<Option<String>> {
        if self.read_bool()? {
            Ok(Some(self.read_string()?))
        } else {
            Ok(None)
        }
    }

    /// A string that may exceed the short-string limit.
    fn read_long_string(&mut self) -> Result<String> {
        if !self.read_bool()? {
            return self.read_string();
        }
        let len = self.read_length("long string")?;
        let bytes = self.read_vec(len)?;
        String::from_utf8(bytes).map_err(|_| StoreError::InvalidString {
            reason: "long string is not valid UTF-8",
        })
    }

    /// An enum variant persisted by name.
    fn read_name<T>(&mut self) -> Result<T>
    where
        T: FromStr<Err = ModelError>,
    {
        Ok(self.read_string()?.parse()?)
    }

    /// An `i32` length followed by that many raw bytes.
    fn read_byte_array(&mut self, field: &'static str) -> Result<Vec<u8>> {
        let len = self.read_length(field)?;
        self.read_vec(len)
    }

    /// Exactly `len` bytes.
    ///
    /// Allocation grows with the data actually read, so a corrupt length
    /// fails with [`StoreError::Truncated`] instead of a huge allocation.
    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        let read = io::Read::take(&mut *self, len as u64).read_to_end(&mut buf)?;
        if read < len {
            return Err(StoreError::Truncated);
        }
        Ok(buf)
    }

    /// Discard exactly `len` bytes.
    fn skip_exact(&mut self, len: u64) -> Result<()> {
        let skipped = io::copy(&mut io::Read::take(&mut *self, len), &mut io::sink())?;
        if skipped < len {
            return Err(StoreError::Truncated);
        }
        Ok(())
    }

    fn skip_string(&mut self) -> Result<()> {
        let len = self.read_char()?;
        self.skip_exact(u64::from(len))
    }

    /// Skip a nullable string, returning whether it was present.
    fn skip_nullable_string(&mut self) -> Result<bool> {
        let present = self.read_bool()?;
        if present {
            self.skip_string()?;
        }
        Ok(present)
    }

    fn skip_byte_array(&mut self, field: &'static str) -> Result<()> {
        let len = self.read_length(field)?;
        self.skip_exact(len as u64)
    }
}

impl<R: Read + ?Sized> ReadWireExt for R {}

/// Writing half of the primitive codec.
pub trait WriteWireExt: Write {
    fn write_bool(&mut self, value: bool) -> Result<()> {
        Ok(byteorder::WriteBytesExt::write_u8(self, u8::from(value))?)
    }

    fn write_byte(&mut self, value: u8) -> Result<()> {
        Ok(byteorder::WriteBytesExt::write_u8(self, value)?)
    }

    fn write_int(&mut self, value: i32) -> Result<()> {
        Ok(byteorder::WriteBytesExt::write_i32::<BigEndian>(self, value)?)
    }

    fn write_char(&mut self, value: u16) -> Result<()> {
        Ok(byteorder::WriteBytesExt::write_u16::<BigEndian>(self, value)?)
    }

    /// A length or count as `i32`.
    fn write_length(&mut self, len: usize, field: &'static str) -> Result<()> {
        let value = i32::try_from(len).map_err(|_| StoreError::LengthOverflow { field, len })?;
        self.write_int(value)
    }

    fn write_string(&mut self, text: &str) -> Result<()> {
        let bytes = mutf8::encode(text);
        if bytes.len() > MAX_STRING_LEN {
            return Err(StoreError::StringTooLong { len: bytes.len() });
        }
        self.write_char(bytes.len() as u16)?;
        Ok(self.write_all(&bytes)?)
    }

    fn write_nullable_string(&mut self, text: Option<&str>) -> Result<()> {
        match text {
            Some(text) => {
                self.write_bool(true)?;
                self.write_string(text)
            }
            None => self.write_bool(false),
        }
    }

    /// Short form when it fits, otherwise flag + `i32` length + UTF-8.
    fn write_long_string(&mut self, text: &str) -> Result<()> {
        if mutf8::encoded_len(text) <= MAX_STRING_LEN {
            self.write_bool(false)?;
            return self.write_string(text);
        }
        self.write_bool(true)?;
        self.write_length(text.len(), "long string")?;
        Ok(self.write_all(text.as_bytes())?)
    }

    /// An enum variant's symbolic name.
    fn write_name(&mut self, name: &str) -> Result<()> {
        self.write_string(name)
    }

    fn write_byte_array(&mut self, bytes: &[u8], field: &'static str) -> Result<()> {
        self.write_length(bytes.len(), field)?;
        Ok(self.write_all(bytes)?)
    }
}

impl<W: Write + ?Sized> WriteWireExt for W {}

#[cfg(test)]
mod tests {
    use super::*;
    use dasm_model::DataType;

    #[test]
    fn test_string_layout() {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_string("PRG").unwrap();
        assert_eq!(buf, [0x00, 0x03, b'P', b'R', b'G']);
    }

    #[test]
    fn test_null_and_empty_are_distinct() {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_nullable_string(None).unwrap();
        buf.write_nullable_string(Some("")).unwrap();
        assert_eq!(buf, [0x00, 0x01, 0x00, 0x00]);

        let mut reader = buf.as_slice();
        assert_eq!(reader.read_nullable_string().unwrap(), None);
        assert_eq!(reader.read_nullable_string().unwrap(), Some(String::new()));
    }

    #[test]
    fn test_long_string_threshold() {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_long_string(&"x".repeat(MAX_STRING_LEN)).unwrap();
        assert_eq!(buf[0], 0);
        assert_eq!(buf.len(), 1 + 2 + MAX_STRING_LEN);

        let mut buf: Vec<u8> = Vec::new();
        buf.write_long_string(&"x".repeat(MAX_STRING_LEN + 1)).unwrap();
        assert_eq!(buf[0], 1);
        assert_eq!(&buf[1..5], &[0x00, 0x01, 0x00, 0x00]);
        assert_eq!(buf.as_slice().read_long_string().unwrap().len(), MAX_STRING_LEN + 1);
    }

    #[test]
    fn test_short_string_rejects_overflow() {
        let mut buf: Vec<u8> = Vec::new();
        let err = buf.write_string(&"x".repeat(MAX_STRING_LEN + 1)).unwrap_err();
        assert!(matches!(err, StoreError::StringTooLong { len } if len == MAX_STRING_LEN + 1));
    }

    #[test]
    fn test_big_endian_ints() {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_int(0x0801).unwrap();
        buf.write_char(u16::from(b'A')).unwrap();
        assert_eq!(buf, [0x00, 0x00, 0x08, 0x01, 0x00, 0x41]);
    }

    #[test]
    fn test_ints_match_byteorder_layout() {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_int(-2).unwrap();
        buf.write_char(0xBEEF).unwrap();
        let mut reader = buf.as_slice();
        assert_eq!(
            byteorder::ReadBytesExt::read_i32::<BigEndian>(&mut reader).unwrap(),
            -2
        );
        assert_eq!(reader.read_char().unwrap(), 0xBEEF);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_name() {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_name(DataType::Word.as_str()).unwrap();
        buf.write_name("WORDY").unwrap();
        let mut reader = buf.as_slice();
        assert_eq!(reader.read_name::<DataType>().unwrap(), DataType::Word);
        assert!(matches!(
            reader.read_name::<DataType>(),
            Err(StoreError::UnknownEnumName { .. })
        ));
    }

    #[test]
    fn test_truncated_reads() {
        let mut reader: &[u8] = &[0x00, 0x05, b'a'];
        assert!(matches!(reader.read_string(), Err(StoreError::Truncated)));

        let mut reader: &[u8] = &[0x7F, 0xFF, 0xFF, 0xFF];
        assert!(matches!(reader.read_byte_array("input bytes"), Err(StoreError::Truncated)));

        let mut reader: &[u8] = &[0x00, 0x03, b'a'];
        assert!(matches!(reader.skip_string(), Err(StoreError::Truncated)));
    }

    #[test]
    fn test_negative_length() {
        let mut reader: &[u8] = &[0xFF, 0xFF, 0xFF, 0xFF];
        assert!(matches!(
            reader.read_byte_array("input bytes"),
            Err(StoreError::NegativeLength { len: -1, .. })
        ));
    }

    #[test]
    fn test_skip_nullable_string() {
        let mut buf: Vec<u8> = Vec::new();
        buf.write_nullable_string(Some("label")).unwrap();
        buf.write_nullable_string(None).unwrap();
        buf.write_int(7).unwrap();
        let mut reader = buf.as_slice();
        assert!(reader.skip_nullable_string().unwrap());
        assert!(!reader.skip_nullable_string().unwrap());
        assert_eq!(reader.read_int().unwrap(), 7);
    }
}
