// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MessagePack cursor for reading wire primitives from a byte slice.
//!
//! The cursor starts at an arbitrary offset inside a larger buffer and
//! tracks how many bytes it has consumed, so callers can report an exact
//! read size back to whoever owns the outer cursor.

use byteorder::{BigEndian, ByteOrder};

use super::marker;
use crate::core::{CodecError, Result};

/// Check whether the byte at `offset` is the nil marker.
///
/// Returns `false` when `offset` is past the end of `bytes`.
#[inline]
pub fn is_nil(bytes: &[u8], offset: usize) -> bool {
    bytes.get(offset) == Some(&marker::NIL)
}

/// Cursor over MessagePack-encoded data.
///
/// # Example
///
/// ```
/// use fieldpack::encoding::msgpack::MsgPackCursor;
///
/// let data = [0xff, 0x82, 0xa1, b'a'];
/// let mut cursor = MsgPackCursor::at(&data, 1);
/// assert_eq!(cursor.read_map_header().unwrap(), 2);
/// assert_eq!(cursor.read_str().unwrap(), "a");
/// assert_eq!(cursor.consumed(), 3);
/// ```
pub struct MsgPackCursor<'a> {
    /// The whole data buffer
    data: &'a [u8],
    /// Current read position
    offset: usize,
    /// Position the cursor was created at
    start: usize,
}

impl<'a> MsgPackCursor<'a> {
    /// Create a cursor reading from `offset`.
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            offset,
            start: offset,
        }
    }

    /// Current read position.
    #[inline]
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Bytes consumed since the cursor was created.
    #[inline]
    pub fn consumed(&self) -> usize {
        self.offset - self.start
    }

    /// Remaining bytes available to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    /// Check if at end of buffer.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Hand the buffer to a nested reader at the current position.
    ///
    /// The closure returns a value and how many bytes it consumed; the
    /// cursor advances by exactly that amount.
    pub fn read_with<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&'a [u8], usize) -> Result<(T, usize)>,
    {
        let (value, read) = f(self.data, self.offset)?;
        self.ensure(read)?;
        self.offset += read;
        Ok(value)
    }

    fn ensure(&self, len: usize) -> Result<()> {
        if len > self.remaining() {
            return Err(CodecError::buffer_too_short(
                len,
                self.remaining(),
                self.offset as u64,
            ));
        }
        Ok(())
    }

    /// Look at the next marker without consuming it.
    pub fn peek_marker(&self) -> Result<u8> {
        self.data
            .get(self.offset)
            .copied()
            .ok_or_else(|| CodecError::buffer_too_short(1, 0, self.offset as u64))
    }

    /// Check whether the next byte is the nil marker.
    pub fn peek_nil(&self) -> bool {
        is_nil(self.data, self.offset)
    }

    /// Read `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.ensure(len)?;
        let slice = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        let value = self.peek_marker()?;
        self.offset += 1;
        Ok(value)
    }

    /// Read a big-endian u16.
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.read_bytes(2)?))
    }

    /// Read a big-endian u32.
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u32(self.read_bytes(4)?))
    }

    /// Read a big-endian u64.
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(BigEndian::read_u64(self.read_bytes(8)?))
    }

    /// Read a signed byte.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read a big-endian i16.
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(BigEndian::read_i16(self.read_bytes(2)?))
    }

    /// Read a big-endian i32.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.read_bytes(4)?))
    }

    /// Read a big-endian i64.
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(BigEndian::read_i64(self.read_bytes(8)?))
    }

    /// Read a big-endian f32.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(BigEndian::read_f32(self.read_bytes(4)?))
    }

    /// Read a big-endian f64.
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(BigEndian::read_f64(self.read_bytes(8)?))
    }

    /// Consume a nil marker.
    pub fn read_nil(&mut self) -> Result<()> {
        let position = self.offset;
        match self.read_u8()? {
            marker::NIL => Ok(()),
            other => Err(CodecError::invalid_marker(other, position, "nil")),
        }
    }

    /// Read a map header and return the number of key/value pairs.
    pub fn read_map_header(&mut self) -> Result<u32> {
        let position = self.offset;
        let m = self.read_u8()?;
        match m {
            m if marker::is_fixmap(m) => Ok((m & 0x0f) as u32),
            marker::MAP16 => Ok(self.read_u16()? as u32),
            marker::MAP32 => self.read_u32(),
            other => Err(CodecError::invalid_marker(other, position, "map header")),
        }
    }

    /// Read an array header and return the element count.
    pub fn read_array_header(&mut self) -> Result<u32> {
        let position = self.offset;
        let m = self.read_u8()?;
        match m {
            m if marker::is_fixarray(m) => Ok((m & 0x0f) as u32),
            marker::ARRAY16 => Ok(self.read_u16()? as u32),
            marker::ARRAY32 => self.read_u32(),
            other => Err(CodecError::invalid_marker(other, position, "array header")),
        }
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_str(&mut self) -> Result<String> {
        let position = self.offset;
        let m = self.read_u8()?;
        let len = match m {
            m if marker::is_fixstr(m) => (m & 0x1f) as usize,
            marker::STR8 => self.read_u8()? as usize,
            marker::STR16 => self.read_u16()? as usize,
            marker::STR32 => self.read_u32()? as usize,
            other => return Err(CodecError::invalid_marker(other, position, "string")),
        };
        self.read_utf8(len)
    }

    /// Read `len` bytes as a UTF-8 string (the header is already consumed).
    pub fn read_utf8(&mut self, len: usize) -> Result<String> {
        let payload_pos = self.offset;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| CodecError::invalid_utf8(payload_pos))
    }

    /// Read a length-prefixed binary blob.
    pub fn read_bin(&mut self) -> Result<&'a [u8]> {
        let position = self.offset;
        let m = self.read_u8()?;
        let len = match m {
            marker::BIN8 => self.read_u8()? as usize,
            marker::BIN16 => self.read_u16()? as usize,
            marker::BIN32 => self.read_u32()? as usize,
            other => return Err(CodecError::invalid_marker(other, position, "binary")),
        };
        self.read_bytes(len)
    }

    /// Read an extension header, returning `(type_code, payload_len)`.
    pub fn read_ext_header(&mut self) -> Result<(i8, usize)> {
        let position = self.offset;
        let m = self.read_u8()?;
        let len = match m {
            marker::FIXEXT1 => 1,
            marker::FIXEXT2 => 2,
            marker::FIXEXT4 => 4,
            marker::FIXEXT8 => 8,
            marker::FIXEXT16 => 16,
            marker::EXT8 => self.read_u8()? as usize,
            marker::EXT16 => self.read_u16()? as usize,
            marker::EXT32 => self.read_u32()? as usize,
            other => return Err(CodecError::invalid_marker(other, position, "ext")),
        };
        let type_code = self.read_i8()?;
        Ok((type_code, len))
    }
}
