// Thu Oct 15 2026 - Alex

use crate::config::Config;
use crate::error::Result;
use crate::registry::handlers::{self, HandlerKey, InstanceHandler, TypeHandler};
use crate::registry::{Inflater, Resolution, TypeRegistry};
use crate::structure::RecordId;
use crate::types::{FieldDesc, FieldKind, Nominal, TypeDesc, TypeKind};
use ahash::AHashMap;
use std::sync::Arc;

/// Collects handlers before a registry is built. Handlers under one key run
/// in registration order and the first `Some` wins; a plugin that must beat
/// a default registers a mapping or a `HandlerKey::Record` handler.
pub struct RegistryBuilder {
    pub(crate) config: Config,
    pub(crate) type_handlers: AHashMap<HandlerKey, Vec<TypeHandler>>,
    pub(crate) instance_handlers: AHashMap<FieldKind, Vec<InstanceHandler>>,
    pub(crate) mapping: AHashMap<Nominal, Inflater>,
}

impl RegistryBuilder {
    /// A builder with the default handler for every type kind.
    pub fn new() -> Self {
        Self::empty()
            .register_type_handler(HandlerKey::Kind(TypeKind::Primitive), handlers::primitive)
            .register_type_handler(HandlerKey::Kind(TypeKind::CString), handlers::cstring)
            .register_type_handler(HandlerKey::Kind(TypeKind::Record), handlers::record)
            .register_instance_handler(FieldKind::Pointer, handlers::pointer)
            .register_instance_handler(FieldKind::Array, handlers::array)
            .register_instance_handler(FieldKind::Enum, handlers::enumeration)
            .register_instance_handler(FieldKind::Offset, handlers::offset)
    }

    /// A builder with no handlers at all.
    pub fn empty() -> Self {
        Self {
            config: Config::default(),
            type_handlers: AHashMap::new(),
            instance_handlers: AHashMap::new(),
            mapping: AHashMap::new(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn register_type_handler<F>(mut self, key: HandlerKey, handler: F) -> Self
    where
        F: Fn(&mut Resolution<'_>, &TypeDesc) -> Result<Option<Inflater>> + Send + Sync + 'static,
    {
        self.type_handlers
            .entry(key)
            .or_default()
            .push(Arc::new(handler));
        self
    }

    pub fn register_instance_handler<F>(mut self, kind: FieldKind, handler: F) -> Self
    where
        F: Fn(&mut Resolution<'_>, &FieldDesc, Option<RecordId>) -> Result<Option<Inflater>>
            + Send
            + Sync
            + 'static,
    {
        self.instance_handlers
            .entry(kind)
            .or_default()
            .push(Arc::new(handler));
        self
    }

    /// Pre-seeds the memo table; the mapping wins over every handler.
    pub fn register_mapping(mut self, nominal: Nominal, inflater: Inflater) -> Self {
        self.mapping.insert(nominal, inflater);
        self
    }

    pub fn build(self) -> Arc<TypeRegistry> {
        Arc::new(TypeRegistry::from_builder(self))
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
