// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The field-bag contract: how a type exposes and rebuilds its state.
//!
//! A type opts in by implementing [`FieldBagSerializable`] (the extractor
//! side). Implementing [`FromFieldBag`] as well gives it a reconstruction
//! initializer; without it the type can be encoded but decoding it fails
//! with [`CodecError::NotReconstructible`].
//!
//! # Example
//!
//! ```
//! use fieldpack::bridge::{FieldBagSerializable, FromFieldBag, StreamingContext, TypeKind};
//! use fieldpack::{FieldBag, Result};
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
//!     fn get_object_data(&self, bag: &mut FieldBag, _: &StreamingContext) -> Result<()> {
//!         bag.add_value("Message", self.message.as_str());
//!         bag.add_value("Code", self.code);
//!         Ok(())
//!     }
//! }
//!
//! impl FromFieldBag for Boom {
//!     fn from_field_bag(bag: FieldBag, _: &StreamingContext) -> Result<Self> {
//!         Ok(Boom {
//!             message: bag.get_string("Message")?,
//!             code: bag.get_i64("Code")?,
//!         })
//!     }
//! }
//! ```

use std::any::TypeId;

use crate::core::{CodecError, FieldBag, Result, Value};

/// Context placeholder passed to both sides of the contract.
///
/// Carries no data today; it exists so the contract keeps its
/// two-argument shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamingContext {
    _private: (),
}

/// Broad classification used by eligibility predicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Ordinary data type
    #[default]
    Plain,
    /// Error-like type (an error or something standing in for one)
    Error,
}

/// A type that can present its state as a field bag.
pub trait FieldBagSerializable: 'static {
    /// Classification seen by eligibility predicates.
    const KIND: TypeKind = TypeKind::Plain;

    /// Name recorded in bags built for or from this type.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Append this instance's fields to `bag`, in wire order.
    fn get_object_data(&self, bag: &mut FieldBag, context: &StreamingContext) -> Result<()>;
}

/// The reconstruction initializer: build an instance from a decoded bag.
pub trait FromFieldBag: FieldBagSerializable + Sized {
    /// Rebuild an instance. Errors propagate to the deserialize caller.
    fn from_field_bag(bag: FieldBag, context: &StreamingContext) -> Result<Self>;
}

/// Static facts about a registered type, as seen by eligibility predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Rust type identity
    pub type_id: TypeId,
    /// Name used in bags and errors
    pub type_name: &'static str,
    /// Classification
    pub kind: TypeKind,
    /// Whether a reconstruction initializer is registered
    pub reconstructible: bool,
}

impl TypeDescriptor {
    /// Describe `T`.
    pub fn of<T: FieldBagSerializable>(reconstructible: bool) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: T::type_name(),
            kind: T::KIND,
            reconstructible,
        }
    }

    /// Check if the type is classified as an error.
    pub fn is_error_like(&self) -> bool {
        self.kind == TypeKind::Error
    }
}

/// Extract the field bag of `value`.
pub fn extract_fields<T: FieldBagSerializable>(
    value: &T,
    context: &StreamingContext,
) -> Result<FieldBag> {
    let mut bag = FieldBag::new(T::type_name());
    value.get_object_data(&mut bag, context)?;
    Ok(bag)
}

/// Build a `T` from a bag through its reconstruction initializer.
pub fn construct<T: FromFieldBag>(bag: FieldBag, context: &StreamingContext) -> Result<T> {
    T::from_field_bag(bag, context)
}

impl FieldBag {
    /// Append a nested field-bag object, or nil for `None`.
    pub fn add_object<T: FieldBagSerializable>(
        &mut self,
        name: impl Into<String>,
        value: Option<&T>,
        context: &StreamingContext,
    ) -> Result<()> {
        let value = match value {
            Some(inner) => Value::Object(extract_fields(inner, context)?),
            None => Value::Nil,
        };
        self.add_value(name, value);
        Ok(())
    }

    /// Rebuild a nested object stored under `name`.
    ///
    /// Nil yields `Ok(None)`. The nested bag's recorded type name is not
    /// checked against `T`, so a field may hold any compatible type.
    pub fn get_object<T: FromFieldBag>(
        &self,
        name: &str,
        context: &StreamingContext,
    ) -> Result<Option<T>> {
        match self.get(name) {
            None => Err(CodecError::missing_field(self.type_name(), name)),
            Some(Value::Nil) => Ok(None),
            Some(Value::Object(bag)) => construct(bag.clone(), context).map(Some),
            Some(other) => Err(CodecError::type_mismatch(name, "object", other.type_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Inner {
        reason: String,
    }

    impl FieldBagSerializable for Inner {
        fn type_name() -> &'static str {
            "test::Inner"
        }

        fn get_object_data(&self, bag: &mut FieldBag, _: &StreamingContext) -> Result<()> {
            bag.add_value("Reason", self.reason.as_str());
            Ok(())
        }
    }

    impl FromFieldBag for Inner {
        fn from_field_bag(bag: FieldBag, _: &StreamingContext) -> Result<Self> {
            Ok(Inner {
                reason: bag.get_string("Reason")?,
            })
        }
    }

    #[test]
    fn test_extract_and_construct() {
        let ctx = StreamingContext::default();
        let bag = extract_fields(&Inner { reason: "disk".into() }, &ctx).unwrap();
        assert_eq!(bag.type_name(), "test::Inner");
        assert_eq!(bag.get_string("Reason").unwrap(), "disk");

        let rebuilt: Inner = construct(bag, &ctx).unwrap();
        assert_eq!(rebuilt.reason, "disk");
    }

    #[test]
    fn test_nested_object_helpers() {
        let ctx = StreamingContext::default();
        let mut outer = FieldBag::new("Outer");
        outer
            .add_object("Inner", Some(&Inner { reason: "x".into() }), &ctx)
            .unwrap();
        outer.add_object::<Inner>("Missing", None, &ctx).unwrap();

        let inner: Option<Inner> = outer.get_object("Inner", &ctx).unwrap();
        assert_eq!(inner, Some(Inner { reason: "x".into() }));
        assert_eq!(outer.get_object::<Inner>("Missing", &ctx).unwrap(), None);
        assert!(outer.get_object::<Inner>("Absent", &ctx).is_err());
    }

    #[test]
    fn test_descriptor() {
        let descriptor = TypeDescriptor::of::<Inner>(true);
        assert_eq!(descriptor.type_name, "test::Inner");
        assert_eq!(descriptor.kind, TypeKind::Plain);
        assert!(!descriptor.is_error_like());
        assert!(descriptor.reconstructible);
    }
}
