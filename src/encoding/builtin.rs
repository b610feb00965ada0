// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Formatters for primitive Rust types and dynamic values.

use std::any::TypeId;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use super::formatter::{erase, ErasedFormatter, Formatter, FormatterResolver};
use super::msgpack::{is_nil, MsgPackWriter};
use super::typeless::TypelessFormatter;
use crate::core::{CodecError, FieldBag, FromValue, Result, Value};

/// Formatter for a primitive `T`, converted through [`Value`].
pub struct PrimitiveFormatter<T> {
    relay: TypelessFormatter,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PrimitiveFormatter<T> {
    pub fn new(relay: TypelessFormatter) -> Self {
        Self {
            relay,
            _marker: PhantomData,
        }
    }
}

impl<T> Formatter<T> for PrimitiveFormatter<T>
where
    T: FromValue + Clone + Into<Value>,
{
    fn serialize(
        &self,
        bytes: &mut Vec<u8>,
        offset: usize,
        value: Option<&T>,
        _resolver: &dyn FormatterResolver,
    ) -> Result<usize> {
        match value {
            Some(v) => self.relay.write_value(bytes, offset, &v.clone().into()),
            None => MsgPackWriter::at(bytes, offset).write_nil(),
        }
    }

    fn deserialize(
        &self,
        bytes: &[u8],
        offset: usize,
        _resolver: &dyn FormatterResolver,
    ) -> Result<(Option<T>, usize)> {
        if is_nil(bytes, offset) {
            return Ok((None, 1));
        }
        let (value, read) = self.relay.read_value(bytes, offset)?;
        let actual = value.type_name();
        let typed = T::from_value(value)
            .map_err(|_| CodecError::type_mismatch("<root>", T::EXPECTED, actual))?;
        Ok((Some(typed), read))
    }
}

/// Formatter for a [`FieldBag`] whose type is only known at runtime.
///
/// Writes the bag as a map frame. Decoded bags are named
/// [`DynamicBagFormatter::UNTYPED`], since a frame carries no type name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicBagFormatter {
    relay: TypelessFormatter,
}

impl DynamicBagFormatter {
    /// Type name given to decoded bags.
    pub const UNTYPED: &'static str = "<untyped>";

    pub fn new(relay: TypelessFormatter) -> Self {
        Self { relay }
    }
}

impl Formatter<FieldBag> for DynamicBagFormatter {
    fn serialize(
        &self,
        bytes: &mut Vec<u8>,
        offset: usize,
        value: Option<&FieldBag>,
        _resolver: &dyn FormatterResolver,
    ) -> Result<usize> {
        match value {
            Some(bag) => crate::bridge::frame::write_frame(bytes, offset, bag, |b, o, v| {
                self.relay.write_value(b, o, v)
            }),
            None => MsgPackWriter::at(bytes, offset).write_nil(),
        }
    }

    fn deserialize(
        &self,
        bytes: &[u8],
        offset: usize,
        _resolver: &dyn FormatterResolver,
    ) -> Result<(Option<FieldBag>, usize)> {
        if is_nil(bytes, offset) {
            return Ok((None, 1));
        }
        let (bag, read) = crate::bridge::frame::read_frame(bytes, offset, Self::UNTYPED, |b, o| {
            self.relay.read_value(b, o)
        })?;
        Ok((Some(bag), read))
    }
}

/// Resolver for `Value`, `FieldBag` and primitive types.
///
/// Handles `bool`, `i32`, `i64`, `u32`, `u64`, `f32`, `f64`, `String` and
/// `Vec<u8>`. Every formatter shares one relay, so they all apply the same
/// nesting limit.
pub struct BuiltinResolver {
    relay: TypelessFormatter,
    formatters: HashMap<TypeId, ErasedFormatter>,
}

impl Default for BuiltinResolver {
    fn default() -> Self {
        Self::with_relay(TypelessFormatter::default())
    }
}

impl BuiltinResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver whose formatters use `relay`.
    pub fn with_relay(relay: TypelessFormatter) -> Self {
        let mut resolver = Self {
            relay,
            formatters: HashMap::new(),
        };
        resolver.insert::<Value>(Arc::new(relay));
        resolver.insert::<FieldBag>(Arc::new(DynamicBagFormatter::new(relay)));
        resolver.insert_primitive::<bool>();
        resolver.insert_primitive::<i32>();
        resolver.insert_primitive::<i64>();
        resolver.insert_primitive::<u32>();
        resolver.insert_primitive::<u64>();
        resolver.insert_primitive::<f32>();
        resolver.insert_primitive::<f64>();
        resolver.insert_primitive::<String>();
        resolver.insert_primitive::<Vec<u8>>();
        resolver
    }

    /// The shared relay.
    pub fn relay(&self) -> TypelessFormatter {
        self.relay
    }

    fn insert<T: 'static>(&mut self, formatter: Arc<dyn Formatter<T>>) {
        self.formatters.insert(TypeId::of::<T>(), erase(formatter));
    }

    fn insert_primitive<T>(&mut self)
    where
        T: FromValue + Clone + Into<Value> + 'static,
    {
        self.insert::<T>(Arc::new(PrimitiveFormatter::<T>::new(self.relay)));
    }
}

impl FormatterResolver for BuiltinResolver {
    fn get_formatter_dyn(&self, type_id: TypeId) -> Option<ErasedFormatter> {
        self.formatters.get(&type_id).cloned()
    }

    fn name(&self) -> &str {
        "builtin"
    }
}
