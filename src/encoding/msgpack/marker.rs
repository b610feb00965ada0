// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MessagePack marker bytes.

pub const NIL: u8 = 0xc0;
pub const FALSE: u8 = 0xc2;
pub const TRUE: u8 = 0xc3;

pub const BIN8: u8 = 0xc4;
pub const BIN16: u8 = 0xc5;
pub const BIN32: u8 = 0xc6;

pub const EXT8: u8 = 0xc7;
pub const EXT16: u8 = 0xc8;
pub const EXT32: u8 = 0xc9;

pub const FLOAT32: u8 = 0xca;
pub const FLOAT64: u8 = 0xcb;

pub const UINT8: u8 = 0xcc;
pub const UINT16: u8 = 0xcd;
pub const UINT32: u8 = 0xce;
pub const UINT64: u8 = 0xcf;

pub const INT8: u8 = 0xd0;
pub const INT16: u8 = 0xd1;
pub const INT32: u8 = 0xd2;
pub const INT64: u8 = 0xd3;

pub const FIXEXT1: u8 = 0xd4;
pub const FIXEXT2: u8 = 0xd5;
pub const FIXEXT4: u8 = 0xd6;
pub const FIXEXT8: u8 = 0xd7;
pub const FIXEXT16: u8 = 0xd8;

pub const STR8: u8 = 0xd9;
pub const STR16: u8 = 0xda;
pub const STR32: u8 = 0xdb;

pub const ARRAY16: u8 = 0xdc;
pub const ARRAY32: u8 = 0xdd;

pub const MAP16: u8 = 0xde;
pub const MAP32: u8 = 0xdf;

/// Largest value stored directly in a positive fixint marker.
pub const POSITIVE_FIXINT_MAX: u8 = 0x7f;

pub const FIXMAP_PREFIX: u8 = 0x80;
pub const FIXMAP_MAX_LEN: u32 = 15;

pub const FIXARRAY_PREFIX: u8 = 0x90;
pub const FIXARRAY_MAX_LEN: u32 = 15;

pub const FIXSTR_PREFIX: u8 = 0xa0;
pub const FIXSTR_MAX_LEN: usize = 31;

/// First negative fixint marker (-32).
pub const NEGATIVE_FIXINT_MIN: u8 = 0xe0;

/// Check if the marker is a fixmap (`0x80..=0x8f`).
#[inline]
pub const fn is_fixmap(marker: u8) -> bool {
    marker & 0xf0 == FIXMAP_PREFIX
}

/// Check if the marker is a fixarray (`0x90..=0x9f`).
#[inline]
pub const fn is_fixarray(marker: u8) -> bool {
    marker & 0xf0 == FIXARRAY_PREFIX
}

/// Check if the marker is a fixstr (`0xa0..=0xbf`).
#[inline]
pub const fn is_fixstr(marker: u8) -> bool {
    marker & 0xe0 == FIXSTR_PREFIX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_families() {
        assert!(is_fixmap(0x80));
        assert!(is_fixmap(0x8f));
        assert!(!is_fixmap(0x90));
        assert!(is_fixarray(0x9f));
        assert!(is_fixstr(0xa0));
        assert!(is_fixstr(0xbf));
        assert!(!is_fixstr(NIL));
    }
}
