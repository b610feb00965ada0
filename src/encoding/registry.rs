// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Resolver chain for formatter selection.
//!
//! A [`CompositeResolver`] asks its resolvers in order and returns the first
//! formatter found. A resolver that does not handle a type answers `None`
//! and the chain moves on.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use fieldpack::bridge::FieldBagResolver;
//! use fieldpack::encoding::{BuiltinResolver, CompositeResolver, FormatterResolver};
//!
//! let chain = CompositeResolver::new();
//! chain.push(Arc::new(FieldBagResolver::new()));
//! chain.push(Arc::new(BuiltinResolver::new()));
//!
//! let resolver: &dyn FormatterResolver = &chain;
//! assert!(resolver.get_formatter::<String>().is_some());
//! assert_eq!(chain.resolver_names(), vec!["field-bag", "builtin"]);
//! ```

use std::any::TypeId;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use super::builtin::BuiltinResolver;
use super::formatter::{ErasedFormatter, FormatterResolver};
use crate::bridge::FieldBagResolver;

/// Ordered chain of resolvers; the first hit wins.
#[derive(Default)]
pub struct CompositeResolver {
    resolvers: RwLock<Vec<Arc<dyn FormatterResolver>>>,
}

impl CompositeResolver {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chain from resolvers in lookup order.
    pub fn with(resolvers: Vec<Arc<dyn FormatterResolver>>) -> Self {
        Self {
            resolvers: RwLock::new(resolvers),
        }
    }

    /// Append a resolver at the end of the chain.
    pub fn push(&self, resolver: Arc<dyn FormatterResolver>) {
        self.resolvers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(resolver);
    }

    /// Insert a resolver ahead of all others.
    pub fn push_front(&self, resolver: Arc<dyn FormatterResolver>) {
        self.resolvers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(0, resolver);
    }

    /// Names of the chained resolvers, in lookup order.
    pub fn resolver_names(&self) -> Vec<String> {
        self.resolvers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|r| r.name().to_string())
            .collect()
    }

    /// Get the number of chained resolvers.
    pub fn count(&self) -> usize {
        self.resolvers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl FormatterResolver for CompositeResolver {
    fn get_formatter_dyn(&self, type_id: TypeId) -> Option<ErasedFormatter> {
        let resolvers = self
            .resolvers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        resolvers.iter().find_map(|r| r.get_formatter_dyn(type_id))
    }

    fn name(&self) -> &str {
        "composite"
    }
}

static DEFAULT_RESOLVER: OnceLock<Arc<CompositeResolver>> = OnceLock::new();

fn init_default_resolver() -> Arc<CompositeResolver> {
    let field_bags: Arc<dyn FormatterResolver> = FieldBagResolver::instance();
    let builtin: Arc<dyn FormatterResolver> = Arc::new(BuiltinResolver::new());
    Arc::new(CompositeResolver::with(vec![field_bags, builtin]))
}

/// Get the process-wide default chain.
///
/// Field-bag types come from [`FieldBagResolver::instance`], everything
/// else from [`BuiltinResolver`].
pub fn default_resolver() -> Arc<CompositeResolver> {
    DEFAULT_RESOLVER.get_or_init(init_default_resolver).clone()
}
