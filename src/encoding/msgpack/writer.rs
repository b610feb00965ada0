// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MessagePack writer for emitting wire primitives at a buffer offset.
//!
//! The writer mirrors the offset-based contract used by formatters: it writes
//! starting at a given offset into a shared `Vec<u8>`, growing the buffer as
//! needed, and every call reports the exact number of bytes it produced.

use byteorder::{BigEndian, ByteOrder};

use super::marker;
use crate::core::{CodecError, Result};

/// Writer positioned at an offset within a shared output buffer.
///
/// # Example
///
/// ```
/// use fieldpack::encoding::msgpack::MsgPackWriter;
///
/// let mut bytes = Vec::new();
/// let mut writer = MsgPackWriter::at(&mut bytes, 0);
/// writer.write_map_header(1).unwrap();
/// writer.write_str("Code").unwrap();
/// writer.write_int(7).unwrap();
/// assert_eq!(writer.written(), 7);
/// assert_eq!(bytes, [0x81, 0xa4, b'C', b'o', b'd', b'e', 0x07]);
/// ```
pub struct MsgPackWriter<'a> {
    /// Shared output buffer
    buffer: &'a mut Vec<u8>,
    /// Current write position
    offset: usize,
    /// Position the writer was created at
    start: usize,
}

impl<'a> MsgPackWriter<'a> {
    /// Create a writer that starts writing at `offset`.
    ///
    /// Bytes already present past `offset` are overwritten; the buffer grows
    /// when writes extend past its end.
    pub fn at(buffer: &'a mut Vec<u8>, offset: usize) -> Self {
        Self {
            buffer,
            offset,
            start: offset,
        }
    }

    /// Current write position.
    #[inline]
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Bytes written since the writer was created.
    #[inline]
    pub fn written(&self) -> usize {
        self.offset - self.start
    }

    /// Hand the buffer to a nested writer at the current position.
    ///
    /// The closure returns how many bytes it wrote; the writer advances by
    /// exactly that amount.
    pub fn append_with<F>(&mut self, f: F) -> Result<usize>
    where
        F: FnOnce(&mut Vec<u8>, usize) -> Result<usize>,
    {
        let written = f(self.buffer, self.offset)?;
        self.offset += written;
        Ok(written)
    }

    /// Write raw bytes.
    pub fn write_raw(&mut self, data: &[u8]) -> Result<usize> {
        let end = self.offset + data.len();
        if self.buffer.len() < end {
            self.buffer.resize(end, 0);
        }
        self.buffer[self.offset..end].copy_from_slice(data);
        self.offset = end;
        Ok(data.len())
    }

    /// Write the nil marker.
    pub fn write_nil(&mut self) -> Result<usize> {
        self.write_raw(&[marker::NIL])
    }

    /// Write a boolean.
    pub fn write_bool(&mut self, value: bool) -> Result<usize> {
        self.write_raw(&[if value { marker::TRUE } else { marker::FALSE }])
    }

    /// Write an unsigned integer in its most compact form.
    pub fn write_uint(&mut self, value: u64) -> Result<usize> {
        let mut buf = [0u8; 9];
        let len = if value <= marker::POSITIVE_FIXINT_MAX as u64 {
            buf[0] = value as u8;
            1
        } else if value <= u8::MAX as u64 {
            buf[0] = marker::UINT8;
            buf[1] = value as u8;
            2
        } else if value <= u16::MAX as u64 {
            buf[0] = marker::UINT16;
            BigEndian::write_u16(&mut buf[1..3], value as u16);
            3
        } else if value <= u32::MAX as u64 {
            buf[0] = marker::UINT32;
            BigEndian::write_u32(&mut buf[1..5], value as u32);
            5
        } else {
            buf[0] = marker::UINT64;
            BigEndian::write_u64(&mut buf[1..9], value);
            9
        };
        self.write_raw(&buf[..len])
    }

    /// Write a signed integer in its most compact form.
    ///
    /// Non-negative values use the unsigned encodings.
    pub fn write_int(&mut self, value: i64) -> Result<usize> {
        if value >= 0 {
            return self.write_uint(value as u64);
        }
        let mut buf = [0u8; 9];
        let len = if value >= -32 {
            buf[0] = value as i8 as u8;
            1
        } else if value >= i8::MIN as i64 {
            buf[0] = marker::INT8;
            buf[1] = value as i8 as u8;
            2
        } else if value >= i16::MIN as i64 {
            buf[0] = marker::INT16;
            BigEndian::write_i16(&mut buf[1..3], value as i16);
            3
        } else if value >= i32::MIN as i64 {
            buf[0] = marker::INT32;
            BigEndian::write_i32(&mut buf[1..5], value as i32);
            5
        } else {
            buf[0] = marker::INT64;
            BigEndian::write_i64(&mut buf[1..9], value);
            9
        };
        self.write_raw(&buf[..len])
    }

    /// Write a 32-bit float.
    pub fn write_f32(&mut self, value: f32) -> Result<usize> {
        let mut buf = [marker::FLOAT32, 0, 0, 0, 0];
        BigEndian::write_f32(&mut buf[1..], value);
        self.write_raw(&buf)
    }

    /// Write a 64-bit float.
    pub fn write_f64(&mut self, value: f64) -> Result<usize> {
        let mut buf = [marker::FLOAT64, 0, 0, 0, 0, 0, 0, 0, 0];
        BigEndian::write_f64(&mut buf[1..], value);
        self.write_raw(&buf)
    }

    /// Write a length-prefixed UTF-8 string.
    pub fn write_str(&mut self, value: &str) -> Result<usize> {
        let len = value.len();
        let header = if len <= marker::FIXSTR_MAX_LEN {
            self.write_raw(&[marker::FIXSTR_PREFIX | len as u8])?
        } else if len <= u8::MAX as usize {
            self.write_raw(&[marker::STR8, len as u8])?
        } else {
            self.write_sized_header(marker::STR16, marker::STR32, len, "string")?
        };
        Ok(header + self.write_raw(value.as_bytes())?)
    }

    /// Write a length-prefixed binary blob.
    pub fn write_bin(&mut self, value: &[u8]) -> Result<usize> {
        let len = value.len();
        let header = if len <= u8::MAX as usize {
            self.write_raw(&[marker::BIN8, len as u8])?
        } else {
            self.write_sized_header(marker::BIN16, marker::BIN32, len, "binary")?
        };
        Ok(header + self.write_raw(value)?)
    }

    /// Write an array header for `len` elements.
    pub fn write_array_header(&mut self, len: u32) -> Result<usize> {
        if len <= marker::FIXARRAY_MAX_LEN {
            self.write_raw(&[marker::FIXARRAY_PREFIX | len as u8])
        } else {
            self.write_sized_header(marker::ARRAY16, marker::ARRAY32, len as usize, "array")
        }
    }

    /// Write a map header for `len` key/value pairs.
    pub fn write_map_header(&mut self, len: u32) -> Result<usize> {
        if len <= marker::FIXMAP_MAX_LEN {
            self.write_raw(&[marker::FIXMAP_PREFIX | len as u8])
        } else {
            self.write_sized_header(marker::MAP16, marker::MAP32, len as usize, "map")
        }
    }

    /// Write an extension header for a payload of `len` bytes.
    pub fn write_ext_header(&mut self, type_code: i8, len: usize) -> Result<usize> {
        let fixed = match len {
            1 => Some(marker::FIXEXT1),
            2 => Some(marker::FIXEXT2),
            4 => Some(marker::FIXEXT4),
            8 => Some(marker::FIXEXT8),
            16 => Some(marker::FIXEXT16),
            _ => None,
        };
        let header = if let Some(m) = fixed {
            self.write_raw(&[m])?
        } else if len <= u8::MAX as usize {
            self.write_raw(&[marker::EXT8, len as u8])?
        } else {
            self.write_sized_header(marker::EXT16, marker::EXT32, len, "ext")?
        };
        Ok(header + self.write_raw(&[type_code as u8])?)
    }

    /// Write a 16- or 32-bit length header, picking the smaller form.
    fn write_sized_header(
        &mut self,
        marker16: u8,
        marker32: u8,
        len: usize,
        what: &str,
    ) -> Result<usize> {
        if len <= u16::MAX as usize {
            let mut buf = [marker16, 0, 0];
            BigEndian::write_u16(&mut buf[1..], len as u16);
            self.write_raw(&buf)
        } else {
            let len32 = u32::try_from(len)
                .map_err(|_| CodecError::unsupported(format!("{what} of {len} bytes")))?;
            let mut buf = [marker32, 0, 0, 0, 0];
            BigEndian::write_u32(&mut buf[1..], len32);
            self.write_raw(&buf)
        }
    }
}
