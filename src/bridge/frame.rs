// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Binary map frame: a field bag on the wire.
//!
//! A frame is a map header carrying the entry count N followed by N pairs
//! of (string key, encoded value). Values are written and read by the
//! caller-supplied relay; the frame only sequences key, value, advance.

use crate::core::{CodecError, FieldBag, Result, Value};
use crate::encoding::msgpack::{MsgPackCursor, MsgPackWriter};

/// Write `bag` as a map frame at `offset`.
///
/// `write_value` encodes one entry value at the given offset and returns
/// the bytes it wrote. The frame is staged in a scratch buffer and copied
/// into `bytes` only once every entry has encoded, so a failed write leaves
/// `bytes` untouched.
///
/// # Returns
///
/// Total bytes written, header included.
pub fn write_frame<F>(
    bytes: &mut Vec<u8>,
    offset: usize,
    bag: &FieldBag,
    mut write_value: F,
) -> Result<usize>
where
    F: FnMut(&mut Vec<u8>, usize, &Value) -> Result<usize>,
{
    let count = u32::try_from(bag.len())
        .map_err(|_| CodecError::unsupported(format!("field bag of {} entries", bag.len())))?;

    let mut staged = Vec::new();
    let mut writer = MsgPackWriter::at(&mut staged, 0);
    writer.write_map_header(count)?;
    for entry in bag {
        writer.write_str(&entry.name)?;
        writer.append_with(|buf, off| write_value(buf, off, &entry.value))?;
    }
    MsgPackWriter::at(bytes, offset).write_raw(&staged)
}

/// Read a map frame at `offset` into a fresh bag for `type_name`.
///
/// Exactly the number of pairs announced by the header is read; anything
/// after the last pair is left untouched.
///
/// # Returns
///
/// The bag and the total bytes consumed.
pub fn read_frame<F>(
    bytes: &[u8],
    offset: usize,
    type_name: &str,
    mut read_value: F,
) -> Result<(FieldBag, usize)>
where
    F: FnMut(&[u8], usize) -> Result<(Value, usize)>,
{
    let mut cursor = MsgPackCursor::at(bytes, offset);
    let count = cursor.read_map_header()? as usize;

    // The header is untrusted; do not reserve more than the input could hold.
    let mut bag = FieldBag::with_capacity(type_name, count.min(cursor.remaining()));
    for _ in 0..count {
        let key = cursor.read_str()?;
        let value = cursor.read_with(|b, o| read_value(b, o))?;
        bag.add_value(key, value);
    }
    Ok((bag, cursor.consumed()))
}
