// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Fieldpack
//!
//! MessagePack bridge for types that expose their state as a named-field bag.
//!
//! A type implements [`FieldBagSerializable`] to present its fields as an
//! ordered `(name, value)` list, and [`FromFieldBag`] to be rebuilt from
//! one. Fieldpack writes that list as a MessagePack map of string keys to
//! recursively encoded values, and reads it back into a fresh instance
//! through the type's initializer.
//!
//! ## Architecture
//!
//! - `core/` - errors, the dynamic [`Value`] and the [`FieldBag`]
//! - `encoding/` - MessagePack primitives, the value relay, formatter
//!   contracts and resolver chains
//! - `bridge/` - the field-bag contract, map frames, the bridge codec and
//!   the cached formatter selection
//! - `serializer` - [`MessagePackSerializer`], the host-facing entry point
//! - `config` - [`SerializerConfig`], loaded from TOML
//!
//! ## Example
//!
//! ```rust
//! # fn main() -> fieldpack::Result<()> {
//! use std::sync::Arc;
//! use fieldpack::bridge::{FieldBagResolver, StreamingContext, TypeKind};
//! use fieldpack::{FieldBag, FieldBagSerializable, FromFieldBag, MessagePackSerializer, SerializerConfig};
//!
//! #[derive(Debug, PartialEq)]
//! struct Boom {
//!     message: String,
//!     code: i64,
//! }
//!
//! impl FieldBagSerializable for Boom {
//!     const KIND: TypeKind = TypeKind::Error;
//!
//!     fn get_object_data(&self, bag: &mut FieldBag, _: &StreamingContext) -> fieldpack::Result<()> {
//!         bag.add_value("Message", self.message.as_str());
//!         bag.add_value("Code", self.code);
//!         Ok(())
//!     }
//! }
//!
//! impl FromFieldBag for Boom {
//!     fn from_field_bag(bag: FieldBag, _: &StreamingContext) -> fieldpack::Result<Self> {
//!         Ok(Boom {
//!             message: bag.get_string("Message")?,
//!             code: bag.get_i64("Code")?,
//!         })
//!     }
//! }
//!
//! let config = SerializerConfig::default();
//! let field_bags = Arc::new(FieldBagResolver::from_config(&config));
//! field_bags.register_reconstructible::<Boom>();
//! let serializer = MessagePackSerializer::with_field_bags(field_bags, &config);
//!
//! let boom = Boom { message: "boom".into(), code: 7 };
//! let bytes = serializer.serialize(Some(&boom))?;
//! assert_eq!(bytes[0], 0x82);
//! assert_eq!(serializer.deserialize::<Boom>(&bytes)?, Some(boom));
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use crate::core::{CodecError, FieldBag, FieldEntry, FromValue, Result, Value};

// Wire format and formatter resolution
pub mod encoding;

// Field-bag bridge
pub mod bridge;

pub use bridge::{FieldBagResolver, FieldBagSerializable, FromFieldBag};

pub mod config;
pub mod serializer;

pub use config::{ConfigError, SerializerConfig};
pub use serializer::MessagePackSerializer;
