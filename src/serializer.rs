// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Host-facing serializer.
//!
//! [`MessagePackSerializer`] looks up the formatter for a static type in its
//! resolver chain and runs it over a byte buffer.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use fieldpack::bridge::{FieldBagResolver, FieldBagSerializable, FromFieldBag, StreamingContext, TypeKind};
//! use fieldpack::{FieldBag, MessagePackSerializer, Result, SerializerConfig};
//!
//! #[derive(Debug, PartialEq)]
//! struct Boom {
//!     message: String,
//! }
//!
//! impl FieldBagSerializable for Boom {
//!     const KIND: TypeKind = TypeKind::Error;
//!
//!     fn get_object_data(&self, bag: &mut FieldBag, _: &StreamingContext) -> Result<()> {
//!         bag.add_value("Message", self.message.as_str());
//!         Ok(())
//!     }
//! }
//!
//! impl FromFieldBag for Boom {
//!     fn from_field_bag(bag: FieldBag, _: &StreamingContext) -> Result<Self> {
//!         Ok(Boom { message: bag.get_string("Message")? })
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let config = SerializerConfig::default();
//! let field_bags = Arc::new(FieldBagResolver::from_config(&config));
//! field_bags.register_reconstructible::<Boom>();
//!
//! let serializer = MessagePackSerializer::with_field_bags(field_bags, &config);
//! let boom = Boom { message: "boom".into() };
//! let bytes = serializer.serialize(Some(&boom))?;
//! assert_eq!(serializer.deserialize::<Boom>(&bytes)?, Some(boom));
//! # Ok(())
//! # }
//! ```

use std::any::type_name;
use std::sync::Arc;

use tracing::trace;

use crate::bridge::FieldBagResolver;
use crate::config::SerializerConfig;
use crate::core::{CodecError, Result};
use crate::encoding::{
    default_resolver, BuiltinResolver, CompositeResolver, Formatter, FormatterResolver,
    TypelessFormatter,
};

/// Serializes values of any type the resolver chain knows.
#[derive(Clone)]
pub struct MessagePackSerializer {
    resolver: Arc<dyn FormatterResolver>,
    initial_capacity: usize,
}

impl Default for MessagePackSerializer {
    /// Serializer over the process-wide default chain.
    fn default() -> Self {
        Self::new(default_resolver())
    }
}

impl MessagePackSerializer {
    pub fn new(resolver: Arc<dyn FormatterResolver>) -> Self {
        Self {
            resolver,
            initial_capacity: SerializerConfig::default().initial_capacity,
        }
    }

    /// Build a fresh chain from `config`: a new [`FieldBagResolver`], then
    /// the built-in formatters.
    ///
    /// Types must be registered on the returned serializer's field-bag
    /// resolver; use [`with_field_bags`](Self::with_field_bags) to keep a
    /// handle to it.
    pub fn from_config(config: &SerializerConfig) -> Self {
        Self::with_field_bags(Arc::new(FieldBagResolver::from_config(config)), config)
    }

    /// Build the chain `[field_bags, builtin]` with settings from `config`.
    pub fn with_field_bags(field_bags: Arc<FieldBagResolver>, config: &SerializerConfig) -> Self {
        let relay = TypelessFormatter::new(config.max_depth);
        let field_bags: Arc<dyn FormatterResolver> = field_bags;
        let builtin: Arc<dyn FormatterResolver> = Arc::new(BuiltinResolver::with_relay(relay));
        let chain = CompositeResolver::with(vec![field_bags, builtin]);
        Self::new(Arc::new(chain)).with_initial_capacity(config.initial_capacity)
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn resolver(&self) -> &Arc<dyn FormatterResolver> {
        &self.resolver
    }

    /// Find the formatter for `T`.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::FormatterNotFound` if no resolver handles `T`.
    pub fn formatter<T: 'static>(&self) -> Result<Arc<dyn Formatter<T>>> {
        self.resolver
            .get_formatter::<T>()
            .ok_or_else(|| CodecError::formatter_not_found(type_name::<T>()))
    }

    /// Encode `value` into a new buffer.
    pub fn serialize<T: 'static>(&self, value: Option<&T>) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.initial_capacity);
        let written = self.serialize_into(&mut bytes, 0, value)?;
        bytes.truncate(written);
        Ok(bytes)
    }

    /// Encode `value` into `bytes` at `offset`, returning the bytes written.
    pub fn serialize_into<T: 'static>(
        &self,
        bytes: &mut Vec<u8>,
        offset: usize,
        value: Option<&T>,
    ) -> Result<usize> {
        let formatter = self.formatter::<T>()?;
        let written = formatter.serialize(bytes, offset, value, self.resolver.as_ref())?;
        trace!(type_name = type_name::<T>(), offset, bytes = written, "serialized");
        Ok(written)
    }

    /// Decode one `T` from the start of `bytes`.
    pub fn deserialize<T: 'static>(&self, bytes: &[u8]) -> Result<Option<T>> {
        self.deserialize_at(bytes, 0).map(|(value, _)| value)
    }

    /// Decode one `T` at `offset`, returning it and the bytes consumed.
    pub fn deserialize_at<T: 'static>(
        &self,
        bytes: &[u8],
        offset: usize,
    ) -> Result<(Option<T>, usize)> {
        let formatter = self.formatter::<T>()?;
        let (value, read) = formatter.deserialize(bytes, offset, self.resolver.as_ref())?;
        trace!(type_name = type_name::<T>(), offset, bytes = read, "deserialized");
        Ok((value, read))
    }

    /// Decode back-to-back `T` values until `bytes` is exhausted.
    pub fn deserialize_all<T: 'static>(&self, bytes: &[u8]) -> Result<Vec<Option<T>>> {
        let formatter = self.formatter::<T>()?;
        let mut values = Vec::new();
        let mut offset = 0;
        while offset < bytes.len() {
            let (value, read) = formatter.deserialize(bytes, offset, self.resolver.as_ref())?;
            if read == 0 {
                return Err(CodecError::Other(format!(
                    "formatter for '{}' consumed no bytes at offset {offset}",
                    type_name::<T>()
                )));
            }
            values.push(value);
            offset += read;
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;

    #[test]
    fn test_primitive_round_trip() {
        let serializer = MessagePackSerializer::default();
        let bytes = serializer.serialize(Some(&"boom".to_string())).unwrap();
        assert_eq!(bytes, vec![0xa4, b'b', b'o', b'o', b'm']);
        assert_eq!(
            serializer.deserialize::<String>(&bytes).unwrap().as_deref(),
            Some("boom")
        );
    }

    #[test]
    fn test_none_round_trip() {
        let serializer = MessagePackSerializer::default();
        let bytes = serializer.serialize::<i64>(None).unwrap();
        assert_eq!(bytes, vec![0xc0]);
        assert_eq!(serializer.deserialize_at::<i64>(&bytes, 0).unwrap(), (None, 1));
    }

    #[test]
    fn test_missing_formatter() {
        struct Unknown;
        let serializer = MessagePackSerializer::from_config(&SerializerConfig::default());
        let err = serializer.serialize(Some(&Unknown)).unwrap_err();
        assert!(matches!(err, CodecError::FormatterNotFound { .. }));
    }

    #[test]
    fn test_serialize_into_offset() {
        let serializer = MessagePackSerializer::default();
        let mut bytes = vec![0xff, 0xff];
        let written = serializer.serialize_into(&mut bytes, 2, Some(&7i64)).unwrap();
        assert_eq!(written, 1);
        assert_eq!(bytes, vec![0xff, 0xff, 0x07]);
    }

    #[test]
    fn test_deserialize_all() {
        let serializer = MessagePackSerializer::default();
        let mut bytes = Vec::new();
        let mut offset = 0;
        for value in [Some(Value::Int(1)), None, Some(Value::from("x"))] {
            offset += serializer
                .serialize_into(&mut bytes, offset, value.as_ref())
                .unwrap();
        }
        let values = serializer.deserialize_all::<Value>(&bytes).unwrap();
        assert_eq!(values, vec![Some(Value::Int(1)), None, Some(Value::from("x"))]);
    }

    #[test]
    fn test_config_depth_applies() {
        let config = SerializerConfig {
            max_depth: 1,
            ..SerializerConfig::default()
        };
        let serializer = MessagePackSerializer::from_config(&config);
        let nested = Value::Array(vec![Value::Array(vec![Value::Array(vec![])])]);
        let err = serializer.serialize(Some(&nested)).unwrap_err();
        assert_eq!(err, CodecError::depth_exceeded(1));
    }
}
