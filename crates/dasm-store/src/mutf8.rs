//! Modified UTF-8, the string encoding of project files.
//!
//! Identical to UTF-8 except that NUL is written as the two-byte sequence
//! `C0 80` and characters outside the Basic Multilingual Plane are written
//! as a surrogate pair of three-byte sequences. Decoding is lenient: raw
//! `00` bytes and four-byte sequences written by other tools are accepted.

use std::borrow::Cow;

use crate::error::{Result, StoreError};

/// Encode `text`, borrowing when it is already valid modified UTF-8.
pub fn encode(text: &str) -> Cow<'_, [u8]> {
    if !needs_escaping(text) {
        return Cow::Borrowed(text.as_bytes());
    }

    let mut out = Vec::with_capacity(encoded_len(text));
    for ch in text.chars() {
        match ch {
            '\0' => out.extend_from_slice(&[0xC0, 0x80]),
            ch if u32::from(ch) > 0xFFFF => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    push_three_byte(&mut out, *unit);
                }
            }
            ch => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    Cow::Owned(out)
}

/// Length of `text` once encoded, without encoding it.
pub fn encoded_len(text: &str) -> usize {
    text.bytes().fold(0, |len, byte| match byte {
        0 => len + 2,
        0xF0..=0xF7 => len + 3,
        _ => len + 1,
    })
}

/// Decode modified UTF-8 bytes.
pub fn decode(bytes: &[u8]) -> Result<String> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.to_owned());
    }

    let mut out = String::with_capacity(bytes.len());
    let mut pos = 0;
    while pos < bytes.len() {
        let (code, width) = next_code_point(bytes, pos)?;
        pos += width;
        let ch = match code {
            0xD800..=0xDBFF => {
                if pos >= bytes.len() {
                    return Err(invalid("unpaired high surrogate"));
                }
                let (low, width) = next_code_point(bytes, pos)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(invalid("unpaired high surrogate"));
                }
                pos += width;
                char::from_u32(0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00))
            }
            0xDC00..=0xDFFF => return Err(invalid("unpaired low surrogate")),
            code => char::from_u32(code),
        };
        out.push(ch.ok_or_else(|| invalid("code point out of range"))?);
    }
    Ok(out)
}

fn needs_escaping(text: &str) -> bool {
    text.bytes().any(|byte| byte == 0 || byte >= 0xF0)
}

fn push_three_byte(out: &mut Vec<u8>, unit: u16) {
    out.push(0xE0 | (unit >> 12) as u8);
    out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
    out.push(0x80 | (unit & 0x3F) as u8);
}

/// Decode one sequence starting at `pos`, returning its value and width.
///
/// Surrogate halves are returned as-is for the caller to pair.
fn next_code_point(bytes: &[u8], pos: usize) -> Result<(u32, usize)> {
    let lead = bytes[pos];
    let width = match lead {
        0x00..=0x7F => return Ok((u32::from(lead), 1)),
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return Err(invalid("malformed lead byte")),
    };
    let tail = bytes
        .get(pos + 1..pos + width)
        .ok_or_else(|| invalid("truncated multi-byte sequence"))?;

    let mut code = u32::from(lead) & (0x7F >> width);
    for &byte in tail {
        if byte & 0xC0 != 0x80 {
            return Err(invalid("malformed continuation byte"));
        }
        code = (code << 6) | u32::from(byte & 0x3F);
    }
    Ok((code, width))
}

fn invalid(reason: &'static str) -> StoreError {
    StoreError::InvalidString { reason }
}
