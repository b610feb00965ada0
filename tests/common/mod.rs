// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use fieldpack::bridge::{FieldBagResolver, StreamingContext, TypeKind};
use fieldpack::{
    FieldBag, FieldBagSerializable, FromFieldBag, MessagePackSerializer, Result, SerializerConfig,
};

// ============================================================================
// Sample Types
// ============================================================================

/// Error with a message and a numeric code.
#[derive(Debug, Clone, PartialEq)]
pub struct CodedError {
    pub message: String,
    pub code: i64,
}

impl CodedError {
    pub fn boom() -> Self {
        Self {
            message: "boom".to_string(),
            code: 7,
        }
    }
}

impl FieldBagSerializable for CodedError {
    const KIND: TypeKind = TypeKind::Error;

    fn type_name() -> &'static str {
        "app::CodedError"
    }

    fn get_object_data(&self, bag: &mut FieldBag, _: &StreamingContext) -> Result<()> {
        bag.add_value("Message", self.message.as_str());
        bag.add_value("Code", self.code);
        Ok(())
    }
}

impl FromFieldBag for CodedError {
    fn from_field_bag(bag: FieldBag, _: &StreamingContext) -> Result<Self> {
        Ok(Self {
            message: bag.get_string("Message")?,
            code: bag.get_i64("Code")?,
        })
    }
}

/// Error carrying an optional inner error of the same type.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainedError {
    pub message: String,
    pub data: Vec<u8>,
    pub inner: Option<Box<ChainedError>>,
}

impl FieldBagSerializable for ChainedError {
    const KIND: TypeKind = TypeKind::Error;

    fn type_name() -> &'static str {
        "app::ChainedError"
    }

    fn get_object_data(&self, bag: &mut FieldBag, ctx: &StreamingContext) -> Result<()> {
        bag.add_value("Message", self.message.as_str());
        bag.add_value("Data", self.data.clone());
        bag.add_object("InnerException", self.inner.as_deref(), ctx)
    }
}

impl FromFieldBag for ChainedError {
    fn from_field_bag(bag: FieldBag, ctx: &StreamingContext) -> Result<Self> {
        Ok(Self {
            message: bag.get_string("Message")?,
            data: bag.get_value("Data")?,
            inner: bag
                .get_object::<ChainedError>("InnerException", ctx)?
                .map(Box::new),
        })
    }
}

/// Error type without a reconstruction initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyError {
    pub reason: String,
}

impl FieldBagSerializable for LegacyError {
    const KIND: TypeKind = TypeKind::Error;

    fn type_name() -> &'static str {
        "app::LegacyError"
    }

    fn get_object_data(&self, bag: &mut FieldBag, _: &StreamingContext) -> Result<()> {
        bag.add_value("Reason", self.reason.as_str());
        Ok(())
    }
}

/// Plain data type, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl FieldBagSerializable for Point {
    fn type_name() -> &'static str {
        "app::Point"
    }

    fn get_object_data(&self, bag: &mut FieldBag, _: &StreamingContext) -> Result<()> {
        bag.add_value("X", self.x);
        bag.add_value("Y", self.y);
        Ok(())
    }
}

impl FromFieldBag for Point {
    fn from_field_bag(bag: FieldBag, _: &StreamingContext) -> Result<Self> {
        Ok(Self {
            x: bag.get_value("X")?,
            y: bag.get_value("Y")?,
        })
    }
}

// ============================================================================
// Serializer Setup
// ============================================================================

/// Serializer with every sample type registered under `config`.
pub fn serializer_with(config: &SerializerConfig) -> (Arc<FieldBagResolver>, MessagePackSerializer) {
    let field_bags = Arc::new(FieldBagResolver::from_config(config));
    field_bags.register_reconstructible::<CodedError>();
    field_bags.register_reconstructible::<ChainedError>();
    field_bags.register::<LegacyError>();
    field_bags.register_reconstructible::<Point>();
    let serializer = MessagePackSerializer::with_field_bags(field_bags.clone(), config);
    (field_bags, serializer)
}

/// Serializer with every sample type registered and default settings.
pub fn serializer() -> MessagePackSerializer {
    serializer_with(&SerializerConfig::default()).1
}

/// Bytes of a MessagePack fixstr.
pub fn fixstr(s: &str) -> Vec<u8> {
    assert!(s.len() < 32);
    let mut out = vec![0xa0 | s.len() as u8];
    out.extend_from_slice(s.as_bytes());
    out
}
