// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire format tests: the MessagePack forms chosen for frames and values.

mod common;

use common::{fixstr, serializer, ChainedError};
use fieldpack::encoding::{DynamicBagFormatter, OBJECT_EXT_TYPE};
use fieldpack::{CodecError, FieldBag, MessagePackSerializer, Value};
use pretty_assertions::assert_eq;

/// Encode a one-entry bag and return the bytes of the entry value.
fn value_bytes(value: Value) -> Vec<u8> {
    let mut bag = FieldBag::new(DynamicBagFormatter::UNTYPED);
    bag.add_value("v", value.clone());
    let serializer = MessagePackSerializer::default();
    let bytes = serializer.serialize(Some(&bag)).unwrap();

    let header = [vec![0x81], fixstr("v")].concat();
    assert_eq!(&bytes[..header.len()], &header[..]);

    let decoded = serializer.deserialize::<FieldBag>(&bytes).unwrap().unwrap();
    assert_eq!(decoded.get("v"), Some(&value));
    bytes[header.len()..].to_vec()
}

#[test]
fn test_integer_forms() {
    assert_eq!(value_bytes(Value::Int(0)), vec![0x00]);
    assert_eq!(value_bytes(Value::Int(127)), vec![0x7f]);
    assert_eq!(value_bytes(Value::Int(200)), vec![0xcc, 0xc8]);
    assert_eq!(value_bytes(Value::Int(70_000)), vec![0xce, 0x00, 0x01, 0x11, 0x70]);
    assert_eq!(value_bytes(Value::Int(-1)), vec![0xff]);
    assert_eq!(value_bytes(Value::Int(-33)), vec![0xd0, 0xdf]);
    assert_eq!(value_bytes(Value::Int(i64::MIN))[0], 0xd3);
    assert_eq!(value_bytes(Value::UInt(u64::MAX))[0], 0xcf);
}

#[test]
fn test_float_forms() {
    assert_eq!(value_bytes(Value::Float32(1.5)), vec![0xca, 0x3f, 0xc0, 0x00, 0x00]);
    assert_eq!(value_bytes(Value::Float64(1.5))[0], 0xcb);
}

#[test]
fn test_string_and_binary_forms() {
    assert_eq!(value_bytes(Value::from("")), vec![0xa0]);
    let long = "x".repeat(40);
    assert_eq!(&value_bytes(Value::from(long.as_str()))[..2], &[0xd9, 40]);
    assert_eq!(value_bytes(Value::Binary(vec![1, 2])), vec![0xc4, 0x02, 0x01, 0x02]);
    assert_eq!(value_bytes(Value::Nil), vec![0xc0]);
    assert_eq!(value_bytes(Value::Bool(true)), vec![0xc3]);
}

#[test]
fn test_foreign_ext_is_preserved() {
    assert_eq!(value_bytes(Value::Ext(5, vec![9; 4])), vec![0xd6, 0x05, 9, 9, 9, 9]);
}

#[test]
fn test_map16_header_for_sixteen_entries() {
    let mut bag = FieldBag::new(DynamicBagFormatter::UNTYPED);
    for i in 0..16 {
        bag.add_value(format!("f{i}"), i);
    }
    let serializer = MessagePackSerializer::default();
    let bytes = serializer.serialize(Some(&bag)).unwrap();
    assert_eq!(&bytes[..3], &[0xde, 0x00, 0x10]);

    let decoded = serializer.deserialize::<FieldBag>(&bytes).unwrap().unwrap();
    assert_eq!(decoded.len(), 16);
    assert_eq!(decoded.names().last(), Some("f15"));
}

#[test]
fn test_inner_error_travels_as_object_ext() {
    let serializer = serializer();
    let error = ChainedError {
        message: "outer".to_string(),
        data: Vec::new(),
        inner: Some(Box::new(ChainedError {
            message: "inner".to_string(),
            data: Vec::new(),
            inner: None,
        })),
    };
    let bytes = serializer.serialize(Some(&error)).unwrap();

    // Read it back untyped to look at the nested entry.
    let bag = serializer.deserialize::<FieldBag>(&bytes).unwrap().unwrap();
    assert_eq!(
        bag.names().collect::<Vec<_>>(),
        vec!["Message", "Data", "InnerException"]
    );
    let inner = bag.get("InnerException").and_then(Value::as_object).unwrap();
    assert_eq!(inner.type_name(), "app::ChainedError");
    assert_eq!(inner.get("InnerException"), Some(&Value::Nil));

    // ext8: marker, payload length, type code
    let marker_pos = bytes.iter().position(|&b| b == 0xc7).unwrap();
    assert_eq!(bytes[marker_pos + 2], OBJECT_EXT_TYPE as u8);
}

#[test]
fn test_frame_with_non_string_key_is_rejected() {
    let serializer = MessagePackSerializer::default();
    let err = serializer
        .deserialize::<FieldBag>(&[0x81, 0x01, 0x02])
        .unwrap_err();
    assert_eq!(err, CodecError::invalid_marker(0x01, 1, "string"));
}

#[test]
fn test_non_map_frame_is_rejected() {
    let serializer = MessagePackSerializer::default();
    let err = serializer.deserialize::<FieldBag>(&[0x91, 0x01]).unwrap_err();
    assert!(err.is_malformed_data());
}

#[test]
fn test_oversized_count_fails_cleanly() {
    // map32 announcing 2^32-1 entries, followed by nothing.
    let serializer = MessagePackSerializer::default();
    let err = serializer
        .deserialize::<FieldBag>(&[0xdf, 0xff, 0xff, 0xff, 0xff])
        .unwrap_err();
    assert!(err.is_malformed_data());
}
