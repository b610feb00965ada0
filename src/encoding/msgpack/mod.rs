// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MessagePack wire primitives.
//!
//! Nil markers, map/array headers, length-prefixed strings and binaries,
//! compact integers, floats, and extension headers. Multi-byte fields are
//! big-endian.

pub mod cursor;
pub mod marker;
pub mod writer;

pub use cursor::{is_nil, MsgPackCursor};
pub use writer::MsgPackWriter;
