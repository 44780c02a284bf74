// Thu Oct 15 2026 - Alex

use crate::error::Result;
use crate::memory::{Address, BackingStore, PagedMemory, Resolver};
use crate::registry::TypeRegistry;
use crate::types::TypeDesc;
use crate::view::View;
use std::sync::Arc;

#[derive(Clone)]
enum Source {
    Live(Arc<dyn BackingStore>),
    Simulated(Arc<PagedMemory>),
}

/// Binds a registry to one backing store and inflates views over it.
#[derive(Clone)]
pub struct ViewFactory {
    source: Source,
    registry: Arc<TypeRegistry>,
}

impl ViewFactory {
    /// Uses the global registry.
    pub fn new(store: Arc<dyn BackingStore>) -> Self {
        Self::with_registry(store, TypeRegistry::global())
    }

    pub fn with_registry(store: Arc<dyn BackingStore>, registry: Arc<TypeRegistry>) -> Self {
        Self {
            source: Source::Live(store),
            registry,
        }
    }

    pub fn simulated(memory: Arc<PagedMemory>, registry: Arc<TypeRegistry>) -> Self {
        Self {
            source: Source::Simulated(memory),
            registry,
        }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn resolver_at(&self, address: Address) -> Resolver {
        match &self.source {
            Source::Live(store) => Resolver::live(Arc::clone(store), address),
            Source::Simulated(memory) => Resolver::simulated(Arc::clone(memory), address),
        }
    }

    pub fn inflate(&self, desc: &TypeDesc, address: Address) -> Result<View> {
        self.inflate_at(desc, self.resolver_at(address))
    }

    pub fn inflate_at(&self, desc: &TypeDesc, resolver: Resolver) -> Result<View> {
        self.registry.inflate(desc, resolver)
    }
}
