// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Binary bridge codec: field-bag types to and from map frames.

use std::sync::Arc;

use tracing::trace;

use super::contract::{extract_fields, FieldBagSerializable, FromFieldBag, StreamingContext};
use super::frame;
use crate::core::{CodecError, FieldBag, Result, Value};
use crate::encoding::msgpack::{is_nil, MsgPackWriter};
use crate::encoding::{Formatter, FormatterResolver, TypelessFormatter};

/// Reconstruction initializer bound into a formatter.
pub type Reconstructor<T> = fn(FieldBag, &StreamingContext) -> Result<T>;

/// Formatter for a type following the field-bag contract.
///
/// Entry values go through the `Value` formatter of the resolver passed to
/// each call, so a chain can swap the relay. The built-in
/// [`TypelessFormatter`] is used when the chain has none.
pub struct FieldBagFormatter<T> {
    reconstruct: Option<Reconstructor<T>>,
    fallback_relay: TypelessFormatter,
}

impl<T: FieldBagSerializable> FieldBagFormatter<T> {
    /// Formatter that encodes `T` but cannot decode it.
    pub fn encode_only() -> Self {
        Self {
            reconstruct: None,
            fallback_relay: TypelessFormatter::default(),
        }
    }

    /// Formatter bound to `T`'s reconstruction initializer.
    pub fn reconstructible() -> Self
    where
        T: FromFieldBag,
    {
        Self {
            reconstruct: Some(T::from_field_bag),
            fallback_relay: TypelessFormatter::default(),
        }
    }

    /// Use `relay` when the resolver chain has no `Value` formatter.
    pub fn with_fallback_relay(mut self, relay: TypelessFormatter) -> Self {
        self.fallback_relay = relay;
        self
    }

    pub fn is_reconstructible(&self) -> bool {
        self.reconstruct.is_some()
    }

    fn relay(&self, resolver: &dyn FormatterResolver) -> Arc<dyn Formatter<Value>> {
        resolver
            .get_formatter::<Value>()
            .unwrap_or_else(|| Arc::new(self.fallback_relay))
    }
}

impl<T: FieldBagSerializable> Formatter<T> for FieldBagFormatter<T> {
    fn serialize(
        &self,
        bytes: &mut Vec<u8>,
        offset: usize,
        value: Option<&T>,
        resolver: &dyn FormatterResolver,
    ) -> Result<usize> {
        let Some(value) = value else {
            return MsgPackWriter::at(bytes, offset).write_nil();
        };

        let bag = extract_fields(value, &StreamingContext::default())?;
        let relay = self.relay(resolver);
        let written = frame::write_frame(bytes, offset, &bag, |buf, off, v| {
            relay.serialize(buf, off, Some(v), resolver)
        })?;

        trace!(
            type_name = T::type_name(),
            fields = bag.len(),
            bytes = written,
            "encoded field bag"
        );
        Ok(written)
    }

    fn deserialize(
        &self,
        bytes: &[u8],
        offset: usize,
        resolver: &dyn FormatterResolver,
    ) -> Result<(Option<T>, usize)> {
        if is_nil(bytes, offset) {
            return Ok((None, 1));
        }

        let relay = self.relay(resolver);
        let (bag, read) = frame::read_frame(bytes, offset, T::type_name(), |b, o| {
            let (value, n) = relay.deserialize(b, o, resolver)?;
            Ok((value.unwrap_or(Value::Nil), n))
        })?;

        trace!(
            type_name = T::type_name(),
            fields = bag.len(),
            bytes = read,
            "decoded field bag"
        );

        let reconstruct = self
            .reconstruct
            .ok_or_else(|| CodecError::not_reconstructible(T::type_name()))?;
        let instance = reconstruct(bag, &StreamingContext::default())?;
        Ok((Some(instance), read))
    }
}
