// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Formatter selection tests: eligibility, caching and resolver chains.

mod common;

use std::sync::Arc;

use common::{serializer_with, CodedError, LegacyError, Point};
use fieldpack::bridge::{EligibilityPolicy, FieldBagResolver, TypeKind};
use fieldpack::encoding::{BuiltinResolver, CompositeResolver, FormatterResolver};
use fieldpack::{CodecError, MessagePackSerializer, SerializerConfig};

#[test]
fn test_eligible_type_resolves_to_same_instance() {
    let (field_bags, serializer) = serializer_with(&SerializerConfig::default());

    let first = serializer.formatter::<CodedError>().unwrap();
    let second = serializer.formatter::<CodedError>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let direct = field_bags.resolve::<CodedError>().unwrap();
    assert!(Arc::ptr_eq(&first, &direct));
}

#[test]
fn test_ineligible_type_falls_through_chain() {
    let (field_bags, serializer) = serializer_with(&SerializerConfig::default());

    // Registered, but the default policy only accepts error-like types.
    assert!(field_bags.is_registered::<Point>());
    assert!(field_bags.resolve::<Point>().is_none());
    assert!(field_bags.resolve::<Point>().is_none());

    let err = serializer.serialize(Some(&Point { x: 1.0, y: 2.0 })).unwrap_err();
    assert!(matches!(err, CodecError::FormatterNotFound { .. }));
}

#[test]
fn test_all_registered_policy_accepts_plain_types() {
    let config = SerializerConfig {
        eligibility: EligibilityPolicy::AllRegistered,
        ..SerializerConfig::default()
    };
    let (_, serializer) = serializer_with(&config);

    let point = Point { x: 1.5, y: -2.0 };
    let bytes = serializer.serialize(Some(&point)).unwrap();
    assert_eq!(serializer.deserialize::<Point>(&bytes).unwrap(), Some(point));
}

#[test]
fn test_custom_predicate() {
    let field_bags = Arc::new(FieldBagResolver::with_predicate(|d| {
        d.kind == TypeKind::Error && d.reconstructible
    }));
    field_bags.register_reconstructible::<CodedError>();
    field_bags.register::<LegacyError>();

    assert!(field_bags.resolve::<CodedError>().is_some());
    assert!(field_bags.resolve::<LegacyError>().is_none());
}

#[test]
fn test_registration_after_lookup_takes_effect() {
    let field_bags = Arc::new(FieldBagResolver::new());
    let serializer =
        MessagePackSerializer::with_field_bags(field_bags.clone(), &SerializerConfig::default());

    assert!(serializer.formatter::<CodedError>().is_err());
    field_bags.register_reconstructible::<CodedError>();
    assert!(serializer.formatter::<CodedError>().is_ok());
}

#[test]
fn test_encode_only_registration_is_reported() {
    let (field_bags, _) = serializer_with(&SerializerConfig::default());
    let descriptor = field_bags.descriptor::<LegacyError>().unwrap();
    assert_eq!(descriptor.type_name, "app::LegacyError");
    assert!(descriptor.is_error_like());
    assert!(!descriptor.reconstructible);
}

#[test]
fn test_builtin_types_bypass_field_bags() {
    let (_, serializer) = serializer_with(&SerializerConfig::default());
    let bytes = serializer.serialize(Some(&42i64)).unwrap();
    assert_eq!(bytes, vec![42]);
    assert_eq!(serializer.deserialize::<i64>(&bytes).unwrap(), Some(42));
}

#[test]
fn test_field_bags_can_shadow_builtin_chain_order() {
    let field_bags = Arc::new(FieldBagResolver::with_policy(EligibilityPolicy::AllRegistered));
    field_bags.register_reconstructible::<Point>();

    let builtin: Arc<dyn FormatterResolver> = Arc::new(BuiltinResolver::new());
    let chain = CompositeResolver::with(vec![builtin]);
    let resolver: &dyn FormatterResolver = &chain;
    assert!(resolver.get_formatter::<Point>().is_none());

    chain.push_front(field_bags);
    let resolver: &dyn FormatterResolver = &chain;
    assert!(resolver.get_formatter::<Point>().is_some());
    assert_eq!(chain.resolver_names(), vec!["field-bag", "builtin"]);
}

#[test]
fn test_global_instance_is_shared() {
    struct GlobalOnly;

    impl fieldpack::FieldBagSerializable for GlobalOnly {
        const KIND: TypeKind = TypeKind::Error;

        fn get_object_data(
            &self,
            bag: &mut fieldpack::FieldBag,
            _: &fieldpack::bridge::StreamingContext,
        ) -> fieldpack::Result<()> {
            bag.add_value("Message", "global");
            Ok(())
        }
    }

    FieldBagResolver::instance().register::<GlobalOnly>();
    assert!(FieldBagResolver::instance().is_registered::<GlobalOnly>());

    let bytes = MessagePackSerializer::default()
        .serialize(Some(&GlobalOnly))
        .unwrap();
    assert_eq!(bytes[0], 0x81);
}

#[test]
fn test_concurrent_first_lookup() {
    use std::thread;

    let (field_bags, _) = serializer_with(&SerializerConfig::default());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let field_bags = field_bags.clone();
            thread::spawn(move || field_bags.resolve::<CodedError>().unwrap())
        })
        .collect();

    let found: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for formatter in &found {
        assert!(Arc::ptr_eq(&found[0], formatter));
    }
}
