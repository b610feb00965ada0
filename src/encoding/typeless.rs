// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Nested value relay: a formatter for dynamically typed [`Value`]s.
//!
//! Field bag entries are not typed per entry. Every value goes through this
//! formatter, which picks the MessagePack form from the value itself and
//! reads back whatever form it finds on the wire.
//!
//! Nested field-bag objects are written as extension type
//! [`OBJECT_EXT_TYPE`]: the payload is the type name as a string followed by
//! a binary map frame of the object's fields.

use tracing::trace;

use super::formatter::{Formatter, FormatterResolver};
use super::msgpack::{is_nil, marker, MsgPackCursor, MsgPackWriter};
use crate::bridge::frame;
use crate::core::{CodecError, Result, Value};

/// Extension type code for nested field-bag objects.
pub const OBJECT_EXT_TYPE: i8 = 100;

/// Default nesting limit for containers and objects.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Formatter for [`Value`], used to relay every field bag entry.
#[derive(Debug, Clone, Copy)]
pub struct TypelessFormatter {
    max_depth: usize,
}

impl Default for TypelessFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl TypelessFormatter {
    /// Create a relay that rejects values nested deeper than `max_depth`.
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// Configured nesting limit.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            return Err(CodecError::depth_exceeded(self.max_depth));
        }
        Ok(())
    }

    /// Encode `value` at `offset`, returning bytes written.
    pub fn write_value(&self, bytes: &mut Vec<u8>, offset: usize, value: &Value) -> Result<usize> {
        self.write_at(bytes, offset, value, 0)
    }

    /// Decode one value at `offset`, returning it and the bytes consumed.
    pub fn read_value(&self, bytes: &[u8], offset: usize) -> Result<(Value, usize)> {
        self.read_at(bytes, offset, 0)
    }

    fn write_at(
        &self,
        bytes: &mut Vec<u8>,
        offset: usize,
        value: &Value,
        depth: usize,
    ) -> Result<usize> {
        self.check_depth(depth)?;
        let mut writer = MsgPackWriter::at(bytes, offset);
        match value {
            Value::Nil => writer.write_nil()?,
            Value::Bool(v) => writer.write_bool(*v)?,
            Value::Int(v) => writer.write_int(*v)?,
            Value::UInt(v) => writer.write_uint(*v)?,
            Value::Float32(v) => writer.write_f32(*v)?,
            Value::Float64(v) => writer.write_f64(*v)?,
            Value::String(s) => writer.write_str(s)?,
            Value::Binary(b) => writer.write_bin(b)?,
            Value::Array(items) => {
                writer.write_array_header(container_len(items.len(), "array")?)?;
                for item in items {
                    writer.append_with(|buf, off| self.write_at(buf, off, item, depth + 1))?;
                }
                writer.written()
            }
            Value::Map(entries) => {
                writer.write_map_header(container_len(entries.len(), "map")?)?;
                for (key, item) in entries {
                    writer.append_with(|buf, off| self.write_at(buf, off, key, depth + 1))?;
                    writer.append_with(|buf, off| self.write_at(buf, off, item, depth + 1))?;
                }
                writer.written()
            }
            Value::Ext(code, data) => {
                writer.write_ext_header(*code, data.len())?;
                writer.write_raw(data)?;
                writer.written()
            }
            Value::Object(bag) => {
                let mut payload = Vec::new();
                let mut inner = MsgPackWriter::at(&mut payload, 0);
                inner.write_str(bag.type_name())?;
                inner.append_with(|buf, off| {
                    frame::write_frame(buf, off, bag, |buf, off, v| {
                        self.write_at(buf, off, v, depth + 1)
                    })
                })?;
                writer.write_ext_header(OBJECT_EXT_TYPE, payload.len())?;
                writer.write_raw(&payload)?;
                writer.written()
            }
        };
        Ok(writer.written())
    }

    fn read_at(&self, bytes: &[u8], offset: usize, depth: usize) -> Result<(Value, usize)> {
        self.check_depth(depth)?;
        let mut cursor = MsgPackCursor::at(bytes, offset);
        let m = cursor.peek_marker()?;
        let value = match m {
            0x00..=marker::POSITIVE_FIXINT_MAX => {
                cursor.read_u8()?;
                Value::Int(m as i64)
            }
            marker::NEGATIVE_FIXINT_MIN..=0xff => {
                cursor.read_u8()?;
                Value::Int(m as i8 as i64)
            }
            m if marker::is_fixmap(m) || m == marker::MAP16 || m == marker::MAP32 => {
                let count = cursor.read_map_header()? as usize;
                let mut entries = Vec::with_capacity(count.min(cursor.remaining()));
                for _ in 0..count {
                    let key = cursor.read_with(|b, o| self.read_at(b, o, depth + 1))?;
                    let item = cursor.read_with(|b, o| self.read_at(b, o, depth + 1))?;
                    entries.push((key, item));
                }
                Value::Map(entries)
            }
            m if marker::is_fixarray(m) || m == marker::ARRAY16 || m == marker::ARRAY32 => {
                let count = cursor.read_array_header()? as usize;
                let mut items = Vec::with_capacity(count.min(cursor.remaining()));
                for _ in 0..count {
                    items.push(cursor.read_with(|b, o| self.read_at(b, o, depth + 1))?);
                }
                Value::Array(items)
            }
            m if marker::is_fixstr(m)
                || m == marker::STR8
                || m == marker::STR16
                || m == marker::STR32 =>
            {
                Value::String(cursor.read_str()?)
            }
            marker::NIL => {
                cursor.read_nil()?;
                Value::Nil
            }
            marker::FALSE | marker::TRUE => {
                cursor.read_u8()?;
                Value::Bool(m == marker::TRUE)
            }
            marker::BIN8 | marker::BIN16 | marker::BIN32 => Value::Binary(cursor.read_bin()?.to_vec()),
            marker::FLOAT32 => {
                cursor.read_u8()?;
                Value::Float32(cursor.read_f32()?)
            }
            marker::FLOAT64 => {
                cursor.read_u8()?;
                Value::Float64(cursor.read_f64()?)
            }
            marker::UINT8 => {
                cursor.read_u8()?;
                Value::Int(cursor.read_u8()? as i64)
            }
            marker::UINT16 => {
                cursor.read_u8()?;
                Value::Int(cursor.read_u16()? as i64)
            }
            marker::UINT32 => {
                cursor.read_u8()?;
                Value::Int(cursor.read_u32()? as i64)
            }
            marker::UINT64 => {
                cursor.read_u8()?;
                Value::from(cursor.read_u64()?)
            }
            marker::INT8 => {
                cursor.read_u8()?;
                Value::Int(cursor.read_i8()? as i64)
            }
            marker::INT16 => {
                cursor.read_u8()?;
                Value::Int(cursor.read_i16()? as i64)
            }
            marker::INT32 => {
                cursor.read_u8()?;
                Value::Int(cursor.read_i32()? as i64)
            }
            marker::INT64 => {
                cursor.read_u8()?;
                Value::Int(cursor.read_i64()?)
            }
            marker::FIXEXT1
            | marker::FIXEXT2
            | marker::FIXEXT4
            | marker::FIXEXT8
            | marker::FIXEXT16
            | marker::EXT8
            | marker::EXT16
            | marker::EXT32 => {
                let (code, len) = cursor.read_ext_header()?;
                let payload_pos = cursor.position();
                let payload = cursor.read_bytes(len)?;
                if code == OBJECT_EXT_TYPE {
                    self.read_object(payload, payload_pos, depth)?
                } else {
                    Value::Ext(code, payload.to_vec())
                }
            }
            other => {
                return Err(CodecError::invalid_marker(other, offset, "value"));
            }
        };
        Ok((value, cursor.consumed()))
    }

    /// Decode an object extension payload: type name, then a map frame.
    fn read_object(&self, payload: &[u8], payload_pos: usize, depth: usize) -> Result<Value> {
        let mut cursor = MsgPackCursor::at(payload, 0);
        let type_name = cursor.read_str()?;
        let bag = cursor.read_with(|b, o| {
            frame::read_frame(b, o, &type_name, |b, o| self.read_at(b, o, depth + 1))
        })?;
        if let Some(&trailing) = payload.get(cursor.position()) {
            return Err(CodecError::invalid_marker(
                trailing,
                payload_pos + cursor.position(),
                "end of object extension",
            ));
        }
        trace!(type_name = %bag.type_name(), fields = bag.len(), "decoded nested object");
        Ok(Value::Object(bag))
    }
}

fn container_len(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| CodecError::unsupported(format!("{what} of {len} entries")))
}

impl Formatter<Value> for TypelessFormatter {
    fn serialize(
        &self,
        bytes: &mut Vec<u8>,
        offset: usize,
        value: Option<&Value>,
        _resolver: &dyn FormatterResolver,
    ) -> Result<usize> {
        match value {
            Some(v) => self.write_at(bytes, offset, v, 0),
            None => MsgPackWriter::at(bytes, offset).write_nil(),
        }
    }

    fn deserialize(
        &self,
        bytes: &[u8],
        offset: usize,
        _resolver: &dyn FormatterResolver,
    ) -> Result<(Option<Value>, usize)> {
        if is_nil(bytes, offset) {
            return Ok((None, 1));
        }
        let (value, read) = self.read_at(bytes, offset, 0)?;
        Ok((Some(value), read))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FieldBag;

    fn round_trip(value: &Value) -> (Value, Vec<u8>) {
        let relay = TypelessFormatter::default();
        let mut bytes = Vec::new();
        let written = relay.write_value(&mut bytes, 0, value).unwrap();
        assert_eq!(written, bytes.len());
        let (decoded, read) = relay.read_value(&bytes, 0).unwrap();
        assert_eq!(read, bytes.len());
        (decoded, bytes)
    }

    #[test]
    fn test_scalars_survive() {
        for value in [
            Value::Nil,
            Value::Bool(true),
            Value::Int(7),
            Value::Int(-200),
            Value::Int(i64::MIN),
            Value::UInt(u64::MAX),
            Value::Float32(1.5),
            Value::Float64(-0.25),
            Value::from("boom"),
            Value::Binary(vec![0, 1, 2]),
            Value::Ext(3, vec![9; 5]),
        ] {
            assert_eq!(round_trip(&value).0, value);
        }
    }

    #[test]
    fn test_compact_int_encoding() {
        assert_eq!(round_trip(&Value::Int(7)).1, vec![0x07]);
        assert_eq!(round_trip(&Value::Int(200)).1, vec![0xcc, 200]);
    }

    #[test]
    fn test_containers() {
        let value = Value::Map(vec![
            (Value::from("list"), Value::Array(vec![Value::Int(1), Value::Nil])),
            (Value::Int(2), Value::Bool(false)),
        ]);
        assert_eq!(round_trip(&value).0, value);
    }

    #[test]
    fn test_nested_object_uses_ext_100() {
        let mut inner = FieldBag::new("app::Inner");
        inner.add_value("Message", "inner");
        let (decoded, bytes) = round_trip(&Value::Object(inner.clone()));
        assert_eq!(bytes[0], marker::EXT8);
        assert_eq!(bytes[2], OBJECT_EXT_TYPE as u8);
        assert_eq!(decoded, Value::Object(inner));
    }

    #[test]
    fn test_small_uint_decodes_normalized() {
        let value = Value::UInt(5);
        assert_eq!(round_trip(&value).0, value.normalized());
    }

    #[test]
    fn test_trailing_bytes_in_object_ext_rejected() {
        // ext8, 4 payload bytes: type name "T", empty map, one stray byte
        let wire = [0xc7, 0x04, OBJECT_EXT_TYPE as u8, 0xa1, b'T', 0x80, 0x01];
        let relay = TypelessFormatter::default();
        let err = relay.read_value(&wire, 0).unwrap_err();
        assert_eq!(
            err,
            CodecError::invalid_marker(0x01, 6, "end of object extension")
        );
        assert!(err.is_malformed_data());
    }

    #[test]
    fn test_depth_limit() {
        let mut value = Value::Int(0);
        for _ in 0..4 {
            value = Value::Array(vec![value]);
        }
        let relay = TypelessFormatter::new(2);
        let mut bytes = Vec::new();
        let err = relay.write_value(&mut bytes, 0, &value).unwrap_err();
        assert_eq!(err, CodecError::depth_exceeded(2));

        let wire = [0x91, 0x91, 0x91, 0x91, 0x00];
        let err = relay.read_value(&wire, 0).unwrap_err();
        assert_eq!(err, CodecError::depth_exceeded(2));
    }

    #[test]
    fn test_reserved_marker_rejected() {
        let relay = TypelessFormatter::default();
        let err = relay.read_value(&[0xc1], 0).unwrap_err();
        assert_eq!(err, CodecError::invalid_marker(0xc1, 0, "value"));
    }

    #[test]
    fn test_truncated_array_fails() {
        let relay = TypelessFormatter::default();
        let err = relay.read_value(&[0x92, 0x01], 0).unwrap_err();
        assert!(err.is_malformed_data());
    }
}
