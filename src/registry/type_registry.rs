// Thu Oct 15 2026 - Alex

use crate::config::Config;
use crate::error::{Error, Result};
use crate::memory::{Address, PagedMemory, Resolver};
use crate::registry::handlers::{HandlerKey, InstanceHandler, TypeHandler};
use crate::registry::{Inflater, RegistryBuilder, Resolution};
use crate::structure::{RecordDecl, RecordId, RecordLayout, RecordShape, RecordType};
use crate::types::{FieldDesc, FieldKind, Nominal, TypeDesc, TypeKind, Value};
use crate::view::{Obj, View};
use ahash::AHashMap;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::sync::Arc;

static GLOBAL: OnceCell<Arc<TypeRegistry>> = OnceCell::new();

/// Maps type descriptors to inflaters and owns the record arena.
///
/// Everything in here is append-only: records, memoised inflaters and
/// handlers are added but never removed.
pub struct TypeRegistry {
    config: Config,
    records: RwLock<Vec<Arc<RecordType>>>,
    names: RwLock<AHashMap<String, RecordId>>,
    mapping: RwLock<AHashMap<Nominal, Inflater>>,
    type_handlers: RwLock<AHashMap<HandlerKey, Vec<TypeHandler>>>,
    instance_handlers: RwLock<AHashMap<FieldKind, Vec<InstanceHandler>>>,
}

impl TypeRegistry {
    pub fn new() -> Arc<Self> {
        RegistryBuilder::new().build()
    }

    pub fn with_config(config: Config) -> Arc<Self> {
        RegistryBuilder::new().with_config(config).build()
    }

    pub(crate) fn from_builder(builder: RegistryBuilder) -> Self {
        Self {
            config: builder.config,
            records: RwLock::new(Vec::new()),
            names: RwLock::new(AHashMap::new()),
            mapping: RwLock::new(builder.mapping),
            type_handlers: RwLock::new(builder.type_handlers),
            instance_handlers: RwLock::new(builder.instance_handlers),
        }
    }

    /// The process-wide registry, built with the default handlers on first
    /// use unless `install_global` ran before.
    pub fn global() -> Arc<Self> {
        Arc::clone(GLOBAL.get_or_init(|| RegistryBuilder::new().build()))
    }

    pub fn install_global(builder: RegistryBuilder) -> Result<Arc<Self>> {
        let registry = builder.build();
        GLOBAL.set(Arc::clone(&registry)).map_err(|_| {
            Error::UnsupportedOperation("the global type registry is already initialised".to_string())
        })?;
        Ok(registry)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn register_type_handler<F>(&self, key: HandlerKey, handler: F)
    where
        F: Fn(&mut Resolution<'_>, &TypeDesc) -> Result<Option<Inflater>> + Send + Sync + 'static,
    {
        self.type_handlers
            .write()
            .entry(key)
            .or_default()
            .push(Arc::new(handler));
    }

    pub fn register_instance_handler<F>(&self, kind: FieldKind, handler: F)
    where
        F: Fn(&mut Resolution<'_>, &FieldDesc, Option<RecordId>) -> Result<Option<Inflater>>
            + Send
            + Sync
            + 'static,
    {
        self.instance_handlers
            .write()
            .entry(kind)
            .or_default()
            .push(Arc::new(handler));
    }

    pub(crate) fn type_handlers(&self, key: HandlerKey) -> Vec<TypeHandler> {
        self.type_handlers.read().get(&key).cloned().unwrap_or_default()
    }

    pub(crate) fn instance_handlers(&self, kind: FieldKind) -> Vec<InstanceHandler> {
        self.instance_handlers.read().get(&kind).cloned().unwrap_or_default()
    }

    pub(crate) fn memoized(&self, nominal: &Nominal) -> Option<Inflater> {
        self.mapping.read().get(nominal).cloned()
    }

    /// Stores `inflater` unless another resolution got there first; either
    /// way returns the stored one.
    pub(crate) fn memoize(&self, nominal: Nominal, inflater: Inflater) -> Inflater {
        self.mapping.write().entry(nominal).or_insert(inflater).clone()
    }

    pub fn is_resolved(&self, nominal: &Nominal) -> bool {
        self.mapping.read().contains_key(nominal)
    }

    /// Most-derived first, ending with the generic kind key.
    pub(crate) fn handler_chain(&self, nominal: Nominal) -> Result<Vec<HandlerKey>> {
        let keys = match nominal {
            Nominal::Primitive(_) => vec![HandlerKey::Kind(TypeKind::Primitive)],
            Nominal::CString => vec![HandlerKey::Kind(TypeKind::CString)],
            Nominal::Record(id) => self
                .record_chain(id)?
                .iter()
                .rev()
                .map(|record| HandlerKey::Record(record.id()))
                .chain(std::iter::once(HandlerKey::Kind(TypeKind::Record)))
                .collect(),
        };
        Ok(keys)
    }

    pub(crate) fn describe(&self, desc: &TypeDesc) -> String {
        match desc {
            TypeDesc::Record(id) => match self.record(*id) {
                Ok(record) => record.name().to_string(),
                Err(_) => id.to_string(),
            },
            TypeDesc::Primitive(ty) => ty.to_string(),
            TypeDesc::Resolved(inflater) => inflater.name(),
            other => other.kind().to_string(),
        }
    }

    pub fn reserve_record(&self, name: &str) -> Result<RecordId> {
        let mut names = self.names.write();
        if names.contains_key(name) {
            return Err(Error::InvalidFieldConfig(format!("record {} is already declared", name)));
        }
        let mut records = self.records.write();
        let id = RecordId::from_index(records.len())?;
        records.push(Arc::new(RecordType::reserved(id, name.to_string())));
        names.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn define_record(&self, id: RecordId, shape: RecordShape) -> Result<()> {
        if let Some(base) = shape.base() {
            self.record(base)?;
        }
        self.record(id)?.define(shape)
    }

    pub fn declare_record(&self, decl: RecordDecl) -> Result<RecordId> {
        if let Some(base) = decl.shape.base() {
            self.record(base)?;
        }
        let id = self.reserve_record(&decl.name)?;
        self.define_record(id, decl.shape)?;
        Ok(id)
    }

    pub fn record(&self, id: RecordId) -> Result<Arc<RecordType>> {
        self.records
            .read()
            .get(id.index())
            .cloned()
            .ok_or_else(|| Error::NoInflaterFound(id.to_string()))
    }

    pub fn record_by_name(&self, name: &str) -> Option<RecordId> {
        self.names.read().get(name).copied()
    }

    pub fn records(&self) -> Vec<Arc<RecordType>> {
        self.records.read().clone()
    }

    /// `id` and its bases, most basal first.
    pub fn record_chain(&self, id: RecordId) -> Result<Vec<Arc<RecordType>>> {
        let mut chain: Vec<Arc<RecordType>> = Vec::new();
        let mut next = Some(id);
        while let Some(current) = next {
            if chain.iter().any(|record| record.id() == current) {
                let name = self.record(id)?.name().to_string();
                return Err(Error::InvalidFieldConfig(format!("{} inherits from itself", name)));
            }
            let record = self.record(current)?;
            next = record.shape()?.base();
            chain.push(record);
        }
        chain.reverse();
        Ok(chain)
    }

    pub fn inflater_for(&self, desc: &TypeDesc, owner: Option<RecordId>) -> Result<Inflater> {
        Resolution::new(self).resolve(desc, owner)
    }

    /// The layout is computed once per record and shared afterwards.
    pub fn record_layout(&self, id: RecordId) -> Result<Arc<RecordLayout>> {
        match self.inflater_for(&TypeDesc::Record(id), None)? {
            Inflater::Record(layout) => Ok(layout),
            other => Err(Error::TypeMismatch(format!(
                "{} resolved to {}, not a record",
                id,
                other.name()
            ))),
        }
    }

    pub fn size_of(&self, desc: &TypeDesc) -> Result<usize> {
        let inflater = self.inflater_for(desc, None)?;
        inflater
            .size()
            .ok_or_else(|| Error::InvalidFieldConfig(format!("{} has no fixed size", inflater.name())))
    }

    pub fn inflate(self: &Arc<Self>, desc: &TypeDesc, resolver: Resolver) -> Result<View> {
        self.inflater_for(desc, None)?.inflate(self, resolver)
    }

    /// Inflates `desc` over a private copy of `blob` at address 0 and
    /// freezes the result.
    pub fn from_bytes(self: &Arc<Self>, desc: &TypeDesc, blob: &[u8]) -> Result<View> {
        let inflater = self.inflater_for(desc, None)?;
        let expected = inflater
            .size()
            .ok_or_else(|| Error::InvalidFieldConfig(format!("{} has no fixed size", inflater.name())))?;
        if blob.len() != expected {
            return Err(Error::SizeMismatch {
                record: inflater.name(),
                expected,
                actual: blob.len(),
            });
        }
        let memory = Arc::new(PagedMemory::from_bytes(Address::zero(), blob));
        let mut view = inflater.inflate(self, Resolver::simulated(memory, Address::zero()))?;
        view.freeze()?;
        Ok(view)
    }

    /// A zeroed record over fresh simulated memory with `values` assigned to
    /// the named members.
    pub fn build_record<'v, I>(self: &Arc<Self>, id: RecordId, values: I) -> Result<View>
    where
        I: IntoIterator<Item = (&'v str, Value)>,
    {
        let view = self.inflate(&TypeDesc::Record(id), Resolver::offline())?;
        for (name, value) in values {
            view.member(name)?.set(&value)?;
        }
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::BufferMemory;
    use crate::registry::ViewFactory;
    use crate::structure::RecordBuilder;
    use crate::types::{
        array_of, enum_of, offset, opaque_ptr, ptr_to, ptr_to_self, EnumMapping, PrimitiveType,
    };

    fn node(registry: &TypeRegistry) -> RecordId {
        registry
            .declare_record(
                RecordBuilder::new("node")
                    .member("a", PrimitiveType::I32)
                    .member("b", PrimitiveType::I64)
                    .member("c", ptr_to_self())
                    .build(),
            )
            .unwrap()
    }

    fn node_bytes(a: i32, b: i64, next: u64) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(20);
        bytes.extend(a.to_le_bytes());
        bytes.extend(b.to_le_bytes());
        bytes.extend(next.to_le_bytes());
        bytes
    }

    #[test]
    fn test_node_from_bytes() {
        let registry = TypeRegistry::new();
        let id = node(&registry);
        let blob = node_bytes(1337, 13371337, 20);
        let view = registry.from_bytes(&TypeDesc::Record(id), &blob).unwrap();

        assert_eq!(view.member("a").unwrap().get().unwrap(), Value::Int(1337));
        assert_eq!(view.member("b").unwrap().get().unwrap(), Value::Int(13371337));
        assert_eq!(view.member("c").unwrap().get().unwrap(), Value::Pointer(20));
        assert_eq!(view.to_bytes().unwrap(), blob);
        assert!(view.member("a").unwrap().is_frozen());
    }

    #[test]
    fn test_node_pointer_follows_into_second_record() {
        let registry = TypeRegistry::new();
        let id = node(&registry);
        let mut blob = node_bytes(1337, 13371337, 20);
        blob.extend(node_bytes(7, 8, 0));

        let factory = ViewFactory::with_registry(Arc::new(BufferMemory::new(blob)), Arc::clone(&registry));
        let first = factory.inflate(&TypeDesc::Record(id), Address::zero()).unwrap();
        let next = first
            .member("c")
            .unwrap()
            .as_pointer()
            .unwrap()
            .unwrap(None)
            .unwrap()
            .into_view()
            .unwrap();
        assert_eq!(next.address(), Address::new(20));
        assert_eq!(next.member("a").unwrap().get().unwrap(), Value::Int(7));
        assert_eq!(next.member("b").unwrap().get().unwrap(), Value::Int(8));
    }

    #[test]
    fn test_linked_chain() {
        let registry = TypeRegistry::new();
        let id = node(&registry);
        let links = 6u64;
        let mut blob = Vec::new();
        for i in 0..=links {
            let next = if i == links { 0 } else { (i + 1) * 20 };
            blob.extend(node_bytes(i as i32 * 10, -(i as i64), next));
        }

        let factory = ViewFactory::with_registry(Arc::new(BufferMemory::new(blob)), Arc::clone(&registry));
        let mut current = factory.inflate(&TypeDesc::Record(id), Address::zero()).unwrap();
        for i in 1..=links {
            current = current
                .member("c")
                .unwrap()
                .as_pointer()
                .unwrap()
                .unwrap(None)
                .unwrap()
                .into_view()
                .unwrap();
            assert_eq!(current.member("a").unwrap().get().unwrap(), Value::Int(i as i64 * 10));
            assert_eq!(current.member("b").unwrap().get().unwrap(), Value::Int(-(i as i64)));
        }
        assert_eq!(current.member("c").unwrap().get().unwrap(), Value::Pointer(0));
    }

    #[test]
    fn test_inflater_is_memoised() {
        let registry = TypeRegistry::new();
        let id = node(&registry);
        assert!(!registry.is_resolved(&Nominal::Record(id)));
        let first = registry.record_layout(id).unwrap();
        let second = registry.record_layout(id).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(registry.is_resolved(&Nominal::Record(id)));

        let inflater = registry.inflater_for(&TypeDesc::Record(id), None).unwrap();
        let again = registry
            .inflater_for(&TypeDesc::Resolved(inflater.clone()), None)
            .unwrap();
        match (inflater, again) {
            (Inflater::Record(a), Inflater::Record(b)) => assert!(Arc::ptr_eq(&a, &b)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_no_handler() {
        let registry = RegistryBuilder::empty().build();
        assert!(matches!(
            registry.inflater_for(&TypeDesc::Primitive(PrimitiveType::U8), None),
            Err(Error::NoInflaterFound(_))
        ));
        assert!(matches!(
            registry.inflater_for(&opaque_ptr(), None),
            Err(Error::NoInflaterFound(_))
        ));
    }

    #[test]
    fn test_self_pointer_outside_record() {
        let registry = TypeRegistry::new();
        assert!(matches!(
            registry.inflater_for(&ptr_to_self(), None),
            Err(Error::InvalidFieldConfig(_))
        ));
    }

    #[test]
    fn test_record_handler_overrides_derived() {
        let registry = TypeRegistry::new();
        let base = registry
            .declare_record(RecordBuilder::new("base").member("x", PrimitiveType::U32).build())
            .unwrap();
        let derived = registry
            .declare_record(RecordBuilder::new("derived").base(base).member("y", PrimitiveType::U8).build())
            .unwrap();
        let plain = registry
            .declare_record(RecordBuilder::new("plain").member("z", PrimitiveType::U8).build())
            .unwrap();

        registry.register_type_handler(HandlerKey::Record(base), |_, _| {
            Ok(Some(Inflater::Primitive {
                ty: PrimitiveType::U16,
                endianness: Default::default(),
            }))
        });

        assert_eq!(registry.size_of(&TypeDesc::Record(derived)).unwrap(), 2);
        assert_eq!(registry.size_of(&TypeDesc::Record(plain)).unwrap(), 1);
    }

    #[test]
    fn test_first_registered_handler_wins() {
        let registry = RegistryBuilder::empty()
            .register_type_handler(HandlerKey::Kind(TypeKind::Primitive), |_, _| {
                Ok(Some(Inflater::Primitive {
                    ty: PrimitiveType::U8,
                    endianness: Default::default(),
                }))
            })
            .register_type_handler(HandlerKey::Kind(TypeKind::Primitive), |_, _| {
                Ok(Some(Inflater::Primitive {
                    ty: PrimitiveType::U64,
                    endianness: Default::default(),
                }))
            })
            .build();
        assert_eq!(registry.size_of(&TypeDesc::Primitive(PrimitiveType::I32)).unwrap(), 1);
    }

    #[test]
    fn test_later_handler_behind_default() {
        let registry = RegistryBuilder::new()
            .register_type_handler(HandlerKey::Kind(TypeKind::Primitive), |_, _| {
                Ok(Some(Inflater::Primitive {
                    ty: PrimitiveType::U64,
                    endianness: Default::default(),
                }))
            })
            .build();
        assert_eq!(registry.size_of(&TypeDesc::Primitive(PrimitiveType::Bool)).unwrap(), 1);
    }

    #[test]
    fn test_mapping_overrides_handlers() {
        let registry = RegistryBuilder::new()
            .register_mapping(
                Nominal::Primitive(PrimitiveType::Bool),
                Inflater::Primitive {
                    ty: PrimitiveType::U32,
                    endianness: Default::default(),
                },
            )
            .build();
        assert_eq!(registry.size_of(&TypeDesc::Primitive(PrimitiveType::Bool)).unwrap(), 4);
        assert_eq!(registry.size_of(&TypeDesc::Primitive(PrimitiveType::U16)).unwrap(), 2);
    }

    #[test]
    fn test_first_instance_handler_wins() {
        let registry = RegistryBuilder::empty()
            .register_instance_handler(FieldKind::Pointer, |_, _, _| {
                Ok(Some(Inflater::Primitive {
                    ty: PrimitiveType::U16,
                    endianness: Default::default(),
                }))
            })
            .register_instance_handler(FieldKind::Pointer, |_, _, _| {
                Ok(Some(Inflater::Primitive {
                    ty: PrimitiveType::U64,
                    endianness: Default::default(),
                }))
            })
            .build();
        assert_eq!(registry.size_of(&opaque_ptr()).unwrap(), 2);
    }

    #[test]
    fn test_instance_handler_falls_through() {
        let registry = RegistryBuilder::empty()
            .register_instance_handler(FieldKind::Pointer, |_, _, _| Ok(None))
            .register_instance_handler(FieldKind::Pointer, |_, _, _| {
                Ok(Some(Inflater::Primitive {
                    ty: PrimitiveType::U32,
                    endianness: Default::default(),
                }))
            })
            .build();
        assert_eq!(registry.size_of(&opaque_ptr()).unwrap(), 4);
    }

    #[test]
    fn test_oversized_array_size() {
        let registry = TypeRegistry::new();
        assert!(matches!(
            registry.size_of(&array_of(PrimitiveType::U64, usize::MAX / 4)),
            Err(Error::InvalidFieldConfig(_))
        ));
    }

    #[test]
    fn test_from_bytes_size_mismatch() {
        let registry = TypeRegistry::new();
        let id = node(&registry);
        match registry.from_bytes(&TypeDesc::Record(id), &[0; 19]) {
            Err(Error::SizeMismatch { record, expected, actual }) => {
                assert_eq!(record, "node");
                assert_eq!(expected, 20);
                assert_eq!(actual, 19);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_round_trip_with_padding() {
        let registry = TypeRegistry::new();
        let id = registry
            .declare_record(
                RecordBuilder::new("padded")
                    .member("a", PrimitiveType::U8)
                    .member("b", offset(8, PrimitiveType::U32))
                    .member("c", array_of(PrimitiveType::I16, 2))
                    .build(),
            )
            .unwrap();
        let blob: Vec<u8> = (1..=16u8).collect();
        let view = registry.from_bytes(&TypeDesc::Record(id), &blob).unwrap();
        assert_eq!(view.to_bytes().unwrap(), blob);
        assert_eq!(view.member("b").unwrap().get().unwrap(), Value::UInt(u32::from_le_bytes([9, 10, 11, 12]) as u64));
    }

    #[test]
    fn test_frozen_record() {
        let registry = TypeRegistry::new();
        let id = node(&registry);
        let store = Arc::new(BufferMemory::new(node_bytes(1, 2, 0)));
        let factory = ViewFactory::with_registry(store.clone(), Arc::clone(&registry));
        let mut view = factory.inflate(&TypeDesc::Record(id), Address::zero()).unwrap();
        view.freeze().unwrap();

        use crate::memory::MemoryWriter;
        store.write_bytes(Address::zero(), &99i32.to_le_bytes()).unwrap();

        let a = view.member("a").unwrap();
        assert_eq!(a.get().unwrap(), Value::Int(1));
        assert!(matches!(a.set(&Value::Int(5)), Err(Error::FrozenWrite)));
        assert_eq!(a.diff().unwrap(), (Value::Int(1), Value::Int(99)));
        assert_eq!(view.to_bytes().unwrap(), node_bytes(1, 2, 0));

        view.reset().unwrap();
        assert_eq!(a.read_value().unwrap(), Value::Int(1));
    }

    #[test]
    fn test_member_named_size() {
        let registry = TypeRegistry::new();
        let id = registry
            .declare_record(RecordBuilder::new("sized").member("size", PrimitiveType::U16).build())
            .unwrap();
        let view = registry.build_record(id, [("size", Value::UInt(3))]).unwrap();
        assert_eq!(view.size().unwrap(), 2);
        assert_eq!(view.member("size").unwrap().get().unwrap(), Value::UInt(3));
        assert!(matches!(view.member("missing"), Err(Error::UnknownMember(_))));
    }

    #[test]
    fn test_build_record() {
        let registry = TypeRegistry::new();
        let mapping = EnumMapping::new().with("IDLE", 0).with("BUSY", 1);
        let id = registry
            .declare_record(
                RecordBuilder::new("task")
                    .member("state", enum_of(mapping, 4).unwrap())
                    .member("ticks", PrimitiveType::U64)
                    .build(),
            )
            .unwrap();
        let view = registry
            .build_record(id, [("state", Value::tagged("BUSY")), ("ticks", Value::UInt(40))])
            .unwrap();
        assert_eq!(view.member("state").unwrap().get().unwrap().tag(), Some("BUSY"));
        let mut expected = 1i32.to_le_bytes().to_vec();
        expected.extend(40u64.to_le_bytes());
        assert_eq!(view.to_bytes().unwrap(), expected);
        assert_eq!(view.to_string(), "task {\n    state: BUSY,\n    ticks: 40,\n}");
    }

    #[test]
    fn test_partial_failure_aborts_record() {
        let registry = TypeRegistry::new();
        let id = registry
            .declare_record(
                RecordBuilder::new("broken")
                    .member("ok", PrimitiveType::U8)
                    .member("text", ptr_to(TypeDesc::CString))
                    .member("worse", offset(0, PrimitiveType::U8))
                    .build(),
            )
            .unwrap();
        assert!(registry.inflate(&TypeDesc::Record(id), Resolver::offline()).is_err());
        assert!(!registry.is_resolved(&Nominal::Record(id)));
    }

    #[test]
    fn test_mutually_referencing_records() {
        let registry = TypeRegistry::new();
        let parent = registry.reserve_record("parent").unwrap();
        let child = registry
            .declare_record(
                RecordBuilder::new("child")
                    .member("up", ptr_to(parent))
                    .member("value", PrimitiveType::I32)
                    .build(),
            )
            .unwrap();
        registry
            .define_record(parent, RecordBuilder::new("parent").member("first", ptr_to(child)).shape())
            .unwrap();
        assert_eq!(registry.size_of(&TypeDesc::Record(parent)).unwrap(), 8);
        assert_eq!(registry.size_of(&TypeDesc::Record(child)).unwrap(), 12);
        assert_eq!(registry.record_by_name("child"), Some(child));
    }

    #[test]
    fn test_duplicate_record_name() {
        let registry = TypeRegistry::new();
        registry.reserve_record("dup").unwrap();
        assert!(matches!(registry.reserve_record("dup"), Err(Error::InvalidFieldConfig(_))));
    }

    #[test]
    fn test_undefined_record() {
        let registry = TypeRegistry::new();
        let id = registry.reserve_record("later").unwrap();
        assert!(matches!(registry.record_layout(id), Err(Error::NoInflaterFound(_))));
    }

    #[test]
    fn test_big_endian_registry() {
        let registry = TypeRegistry::with_config(Config::new().with_endianness(crate::types::Endianness::Big));
        let view = registry
            .from_bytes(&TypeDesc::Primitive(PrimitiveType::U16), &[0x12, 0x34])
            .unwrap();
        assert_eq!(view.get().unwrap(), Value::UInt(0x1234));
    }

    #[test]
    fn test_global_registry() {
        let first = TypeRegistry::global();
        assert!(Arc::ptr_eq(&first, &TypeRegistry::global()));
        assert!(TypeRegistry::install_global(RegistryBuilder::new()).is_err());
    }
}
