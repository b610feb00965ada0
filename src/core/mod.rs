// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout fieldpack.
//!
//! This module provides the foundational types for the library:
//! - [`CodecError`] - Error handling
//! - [`Value`] - Dynamic value held by bag entries
//! - [`FieldBag`] - Ordered `(name, value)` state of one object

pub mod error;
pub mod field_bag;
pub mod value;

pub use error::{CodecError, Result};
pub use field_bag::{FieldBag, FieldEntry};
pub use value::{FromValue, Value};
