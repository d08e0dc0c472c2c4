//! Maps uri schemes to the resolver factories that answer for them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::ResolverFactory;

/// The set of resolver factories the channel-construction path can pick
/// from, keyed by scheme.
///
/// Passed explicitly wherever it is needed rather than living in process
/// globals, so each test can own an isolated instance. Registration is
/// expected to happen once, during startup, strictly before the first dial
/// against a registered scheme; that ordering is the caller's to uphold.
#[derive(Default)]
pub struct ResolverRegistry {
    factories: Mutex<HashMap<String, Arc<dyn ResolverFactory>>>,
}

impl ResolverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under its scheme.
    ///
    /// Registering a second factory for the same scheme replaces the first.
    pub fn register(&self, factory: impl ResolverFactory + 'static) {
        self.factories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(factory.scheme().to_string(), Arc::new(factory));
    }

    /// Look up the factory registered for `scheme`.
    pub fn lookup(&self, scheme: &str) -> Option<Arc<dyn ResolverFactory>> {
        self.factories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(scheme)
            .cloned()
    }
}
