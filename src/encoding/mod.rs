// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MessagePack encoding and formatter resolution.
//!
//! - [`msgpack`] - wire primitives (markers, headers, scalars)
//! - [`typeless`] - relay for dynamically typed [`Value`](crate::Value)s
//! - [`formatter`] - formatter and resolver contracts
//! - [`builtin`] - formatters for primitive types
//! - [`registry`] - resolver chain

pub mod builtin;
pub mod formatter;
pub mod msgpack;
pub mod registry;
pub mod typeless;

pub use builtin::{BuiltinResolver, DynamicBagFormatter, PrimitiveFormatter};
pub use formatter::{erase, ErasedFormatter, Formatter, FormatterResolver};
pub use registry::{default_resolver, CompositeResolver};
pub use typeless::{TypelessFormatter, DEFAULT_MAX_DEPTH, OBJECT_EXT_TYPE};
