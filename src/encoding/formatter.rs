// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Formatter and resolver contracts.
//!
//! ## Architecture
//!
//! - **[`Formatter<T>`]** - encodes/decodes one static type at a buffer offset
//! - **[`FormatterResolver`]** - answers "is there a formatter for `T`?"
//! - **Erasure** - resolvers are object-safe; they hand out formatters as
//!   [`ErasedFormatter`] and the typed lookup on `dyn FormatterResolver`
//!   downcasts back to `Arc<dyn Formatter<T>>`
//!
//! ## Example
//!
//! ```
//! use fieldpack::encoding::{BuiltinResolver, FormatterResolver};
//!
//! let resolver = BuiltinResolver::new();
//! let resolver: &dyn FormatterResolver = &resolver;
//! let formatter = resolver.get_formatter::<String>().expect("builtin");
//!
//! let mut bytes = Vec::new();
//! let written = formatter
//!     .serialize(&mut bytes, 0, Some(&"hi".to_string()), resolver)
//!     .unwrap();
//! assert_eq!(written, 3);
//! ```

use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::core::Result;

// =============================================================================
// Formatter Trait
// =============================================================================

/// Encoder/decoder for values of a single static type.
///
/// Formatters work on a shared buffer at an explicit offset and report
/// exact byte counts, so a caller can chain several formatters over one
/// buffer with a single cursor.
pub trait Formatter<T>: Send + Sync {
    /// Encode `value` into `bytes` starting at `offset`.
    ///
    /// `None` is the absent instance and is written as the nil marker.
    ///
    /// # Returns
    ///
    /// The number of bytes written.
    fn serialize(
        &self,
        bytes: &mut Vec<u8>,
        offset: usize,
        value: Option<&T>,
        resolver: &dyn FormatterResolver,
    ) -> Result<usize>;

    /// Decode a value from `bytes` starting at `offset`.
    ///
    /// # Returns
    ///
    /// The decoded value (`None` for the nil marker) and the number of
    /// bytes consumed.
    fn deserialize(
        &self,
        bytes: &[u8],
        offset: usize,
        resolver: &dyn FormatterResolver,
    ) -> Result<(Option<T>, usize)>;
}

// =============================================================================
// Resolver Trait
// =============================================================================

/// Type-erased formatter handle.
///
/// Always holds an `Arc<dyn Formatter<T>>` for the `T` it was resolved for.
pub type ErasedFormatter = Arc<dyn Any + Send + Sync>;

/// Erase a typed formatter so it can travel through a resolver.
pub fn erase<T: 'static>(formatter: Arc<dyn Formatter<T>>) -> ErasedFormatter {
    Arc::new(formatter)
}

/// Lookup of formatters by static type.
///
/// Returning `None` is not an error: it tells a resolver chain to try the
/// next resolver.
pub trait FormatterResolver: Send + Sync {
    /// Find a formatter for the type identified by `type_id`.
    ///
    /// Implementations must only return a handle produced by
    /// [`erase`] for that same type.
    fn get_formatter_dyn(&self, type_id: TypeId) -> Option<ErasedFormatter>;

    /// Short name for diagnostics.
    fn name(&self) -> &str;
}

impl<'r> dyn FormatterResolver + 'r {
    /// Typed lookup of a formatter for `T`.
    pub fn get_formatter<T: 'static>(&self) -> Option<Arc<dyn Formatter<T>>> {
        let erased = self.get_formatter_dyn(TypeId::of::<T>())?;
        erased.downcast_ref::<Arc<dyn Formatter<T>>>().cloned()
    }
}
