// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Field-bag bridge: contract, map frame, codec and formatter selection.
//!
//! ## Architecture
//!
//! - **[`contract`]** - how a type exposes its fields and is rebuilt from them
//! - **[`frame`]** - a field bag as a MessagePack map on the wire
//! - **[`formatter`]** - [`FieldBagFormatter`], the per-type codec
//! - **[`resolver`]** - [`FieldBagResolver`], the cached per-type selection

pub mod contract;
pub mod formatter;
pub mod frame;
pub mod resolver;

pub use contract::{
    construct, extract_fields, FieldBagSerializable, FromFieldBag, StreamingContext,
    TypeDescriptor, TypeKind,
};
pub use formatter::{FieldBagFormatter, Reconstructor};
pub use resolver::{EligibilityPolicy, EligibilityPredicate, FieldBagResolver};
