// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Formatter selection for field-bag types.
//!
//! [`FieldBagResolver`] answers, once per type, whether the bridge codec
//! applies. Types opt in by registration; an eligibility predicate then
//! decides which registered types the resolver hands out. Both positive and
//! negative decisions are cached, so repeated lookups for a type return the
//! same formatter instance.
//!
//! # Example
//!
//! ```
//! use fieldpack::bridge::{FieldBagResolver, FieldBagSerializable, StreamingContext, TypeKind};
//! use fieldpack::{FieldBag, Result};
//!
//! struct Timeout;
//!
//! impl FieldBagSerializable for Timeout {
//!     const KIND: TypeKind = TypeKind::Error;
//!
//!     fn get_object_data(&self, bag: &mut FieldBag, _: &StreamingContext) -> Result<()> {
//!         bag.add_value("Message", "timed out");
//!         Ok(())
//!     }
//! }
//!
//! let resolver = FieldBagResolver::new();
//! assert!(resolver.resolve::<Timeout>().is_none());
//! resolver.register::<Timeout>();
//! assert!(resolver.resolve::<Timeout>().is_some());
//! ```

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use serde::Deserialize;
use tracing::{debug, warn};

use super::contract::{FieldBagSerializable, FromFieldBag, TypeDescriptor};
use super::formatter::FieldBagFormatter;
use crate::config::SerializerConfig;
use crate::encoding::{erase, ErasedFormatter, Formatter, FormatterResolver, TypelessFormatter};

/// Decides whether a registered type is handled by the bridge codec.
pub type EligibilityPredicate = Arc<dyn Fn(&TypeDescriptor) -> bool + Send + Sync>;

/// Named eligibility predicates, selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EligibilityPolicy {
    /// Only error-like types
    #[default]
    Errors,
    /// Every registered type
    AllRegistered,
}

impl EligibilityPolicy {
    /// Predicate implementing this policy.
    pub fn predicate(self) -> EligibilityPredicate {
        match self {
            EligibilityPolicy::Errors => Arc::new(|d: &TypeDescriptor| d.is_error_like()),
            EligibilityPolicy::AllRegistered => Arc::new(|_: &TypeDescriptor| true),
        }
    }
}

/// A registered type and how to build its formatter.
struct Registration {
    descriptor: TypeDescriptor,
    build: fn(TypelessFormatter) -> ErasedFormatter,
}

fn build_encode_only<T: FieldBagSerializable>(relay: TypelessFormatter) -> ErasedFormatter {
    let formatter: Arc<dyn Formatter<T>> =
        Arc::new(FieldBagFormatter::<T>::encode_only().with_fallback_relay(relay));
    erase(formatter)
}

fn build_reconstructible<T: FromFieldBag>(relay: TypelessFormatter) -> ErasedFormatter {
    let formatter: Arc<dyn Formatter<T>> =
        Arc::new(FieldBagFormatter::<T>::reconstructible().with_fallback_relay(relay));
    erase(formatter)
}

/// Resolver handing out [`FieldBagFormatter`]s for registered, eligible types.
pub struct FieldBagResolver {
    registrations: RwLock<HashMap<TypeId, Registration>>,
    cache: RwLock<HashMap<TypeId, Option<ErasedFormatter>>>,
    predicate: EligibilityPredicate,
    relay: TypelessFormatter,
}

impl Default for FieldBagResolver {
    fn default() -> Self {
        Self::with_policy(EligibilityPolicy::default())
    }
}

impl FieldBagResolver {
    /// Create a resolver that accepts error-like types.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: EligibilityPolicy) -> Self {
        Self::from_predicate(policy.predicate())
    }

    /// Create a resolver with a custom eligibility predicate.
    pub fn with_predicate<P>(predicate: P) -> Self
    where
        P: Fn(&TypeDescriptor) -> bool + Send + Sync + 'static,
    {
        Self::from_predicate(Arc::new(predicate))
    }

    fn from_predicate(predicate: EligibilityPredicate) -> Self {
        Self {
            registrations: RwLock::new(HashMap::new()),
            cache: RwLock::new(HashMap::new()),
            predicate,
            relay: TypelessFormatter::default(),
        }
    }

    /// Create a resolver with the policy and nesting limit from `config`.
    pub fn from_config(config: &SerializerConfig) -> Self {
        Self::with_policy(config.eligibility).with_relay(TypelessFormatter::new(config.max_depth))
    }

    /// Relay used by built formatters when the chain has no `Value` formatter.
    pub fn with_relay(mut self, relay: TypelessFormatter) -> Self {
        self.relay = relay;
        self
    }

    /// Process-wide resolver with the default policy.
    pub fn instance() -> Arc<FieldBagResolver> {
        static INSTANCE: OnceLock<Arc<FieldBagResolver>> = OnceLock::new();
        INSTANCE
            .get_or_init(|| Arc::new(FieldBagResolver::new()))
            .clone()
    }

    /// Register `T` for encoding only.
    ///
    /// Registering `T` again the same way is a no-op and keeps the cached
    /// formatter. Switching between encode-only and reconstructible replaces
    /// the registration and the next lookup binds a new formatter.
    pub fn register<T: FieldBagSerializable>(&self) {
        self.insert(Registration {
            descriptor: TypeDescriptor::of::<T>(false),
            build: build_encode_only::<T>,
        });
    }

    /// Register `T` with its reconstruction initializer.
    ///
    /// Same re-registration rules as [`register`](Self::register).
    pub fn register_reconstructible<T: FromFieldBag>(&self) {
        self.insert(Registration {
            descriptor: TypeDescriptor::of::<T>(true),
            build: build_reconstructible::<T>,
        });
    }

    fn insert(&self, registration: Registration) {
        let descriptor = registration.descriptor;
        let previous = self
            .registrations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(descriptor.type_id, registration);

        match previous {
            // Same descriptor means the same formatter; keep the cached one.
            Some(previous) if previous.descriptor == descriptor => {
                debug!(type_name = descriptor.type_name, "type already registered");
                return;
            }
            Some(_) => {
                warn!(type_name = descriptor.type_name, "type registered twice; replacing");
            }
            None => {
                debug!(
                    type_name = descriptor.type_name,
                    kind = ?descriptor.kind,
                    reconstructible = descriptor.reconstructible,
                    "registered field-bag type"
                );
            }
        }

        // Only this type's decision can have changed.
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&descriptor.type_id);
    }

    /// Check if `T` has been registered (eligible or not).
    pub fn is_registered<T: 'static>(&self) -> bool {
        self.registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<T>())
    }

    /// Descriptor recorded for `T`, if registered.
    pub fn descriptor<T: 'static>(&self) -> Option<TypeDescriptor> {
        self.registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<T>())
            .map(|r| r.descriptor)
    }

    /// Typed lookup of the bridge formatter for `T`.
    pub fn resolve<T: 'static>(&self) -> Option<Arc<dyn Formatter<T>>> {
        self.lookup(TypeId::of::<T>())?
            .downcast_ref::<Arc<dyn Formatter<T>>>()
            .cloned()
    }

    /// Number of cached decisions, positive and negative.
    pub fn cached_len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn lookup(&self, type_id: TypeId) -> Option<ErasedFormatter> {
        if let Some(decision) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
        {
            return decision.clone();
        }

        let decision = self.select(type_id);
        // A concurrent caller may have stored first; keep that value.
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_insert(decision)
            .clone()
    }

    fn select(&self, type_id: TypeId) -> Option<ErasedFormatter> {
        let registrations = self
            .registrations
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let registration = registrations.get(&type_id)?;
        let descriptor = &registration.descriptor;

        if !(self.predicate)(descriptor) {
            warn!(
                type_name = descriptor.type_name,
                kind = ?descriptor.kind,
                "registered type rejected by eligibility predicate"
            );
            return None;
        }

        debug!(
            type_name = descriptor.type_name,
            reconstructible = descriptor.reconstructible,
            "selected field-bag formatter"
        );
        Some((registration.build)(self.relay))
    }
}

impl FormatterResolver for FieldBagResolver {
    fn get_formatter_dyn(&self, type_id: TypeId) -> Option<ErasedFormatter> {
        self.lookup(type_id)
    }

    fn name(&self) -> &str {
        "field-bag"
    }
}
