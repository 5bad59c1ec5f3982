//! Reads and writes individual `(type, size, value)` field records.
//!
//! A field record is a 4-byte big-endian header — 16-bit type, 16-bit size — followed by `size`
//! value bytes. This module is the leaf of the crate: [`crate::builder`] and [`crate::parser`]
//! are both built on [`parse_field`] and [`write_field_header`].

use scroll::{Pread, Pwrite, BE};

use crate::error::{Error, Result};

/// Size of a field record's header, in bytes.
pub const FIELD_HEADER_SIZE: usize = 4;

/// The protocol's maximum value size for a single field (fits in the wire's 16-bit size).
pub const MAX_FIELD_VALUE_SIZE: usize = u16::MAX as usize;

/// A single parsed field record: its type, declared size, and a borrow of its value bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    /// The 16-bit field-type short code.
    pub field_type: u16,
    /// The declared value size in bytes.
    pub size: u16,
    /// The value bytes, borrowed from the certificate slice.
    pub value: &'a [u8],
    /// Offset of this record's header within the certificate.
    pub offset: usize,
}

impl<'a> Field<'a> {
    /// Offset of the byte immediately following this record.
    pub fn next_offset(&self) -> usize {
        self.offset + FIELD_HEADER_SIZE + self.size as usize
    }
}

/// Parses the field record at `offset` in `cert`.
///
/// Returns the parsed [`Field`] and the offset of the next record. Fails with
/// [`Error::InvalidArg`] if `cert` is empty or `offset + 4 > cert.len()`, and with
/// [`Error::InvalidFieldSize`] if the declared size would read past the end of `cert`.
pub fn parse_field<'a>(cert: &'a [u8], offset: usize) -> Result<(Field<'a>, usize)> {
    if cert.is_empty() {
        return Err(Error::InvalidArg("certificate slice is empty"));
    }
    let header_end = match offset.checked_add(FIELD_HEADER_SIZE) {
        Some(end) if end <= cert.len() => end,
        _ => {
            return Err(Error::InvalidArg(
                "offset does not leave room for a field header",
            ))
        }
    };
    let _ = header_end;

    let mut header_offset = offset;
    let field_type: u16 = cert.gread_with(&mut header_offset, BE)?;
    let size: u16 = cert.gread_with(&mut header_offset, BE)?;
    debug_assert_eq!(header_offset, offset + FIELD_HEADER_SIZE);

    let value_start = header_offset;
    let value_end = value_start
        .checked_add(size as usize)
        .ok_or(Error::InvalidFieldSize(offset, size, cert.len()))?;
    if value_end > cert.len() {
        return Err(Error::InvalidFieldSize(offset, size, cert.len()));
    }

    let field = Field {
        field_type,
        size,
        value: &cert[value_start..value_end],
        offset,
    };
    Ok((field, value_end))
}

/// Writes a field record's 4-byte big-endian header at `offset` into `buf`.
///
/// The caller is responsible for having bounds-checked `buf` beforehand; this function trusts
/// that `offset + 4 <= buf.len()`.
pub fn write_field_header(buf: &mut [u8], offset: usize, field_type: u16, size: u16) -> Result<()> {
    let mut cursor = offset;
    buf.gwrite_with(field_type, &mut cursor, BE)?;
    buf.gwrite_with(size, &mut cursor, BE)?;
    Ok(())
}
