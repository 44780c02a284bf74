// Wed Oct 14 2026 - Alex

use crate::error::{Error, Result};
use crate::memory::{Address, Resolver};
use crate::registry::{PointerTarget, TypeRegistry};
use crate::types::{Endianness, PrimitiveType, TypeDesc, Value, POINTER_SIZE};
use crate::view::{Obj, PrimitiveView, Snapshot, View};
use std::sync::Arc;

/// What dereferencing a pointer produced.
#[derive(Debug, Clone)]
pub enum Unwrapped {
    View(View),
    Bytes(Vec<u8>),
}

impl Unwrapped {
    pub fn into_view(self) -> Option<View> {
        match self {
            Self::View(view) => Some(view),
            Self::Bytes(_) => None,
        }
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Self::View(_) => None,
            Self::Bytes(bytes) => Some(bytes),
        }
    }
}

/// A pointer-sized integer that can be dereferenced into a view of its
/// target. Record targets are resolved through the registry only when the
/// pointer is followed.
#[derive(Clone)]
pub struct PointerView {
    backing: PrimitiveView,
    target: PointerTarget,
    registry: Arc<TypeRegistry>,
    snapshot: Option<Snapshot>,
}

impl PointerView {
    pub fn new(
        resolver: Resolver,
        target: PointerTarget,
        endianness: Endianness,
        registry: Arc<TypeRegistry>,
    ) -> Self {
        Self {
            backing: PrimitiveView::new(resolver, PrimitiveType::U64, endianness),
            target,
            registry,
            snapshot: None,
        }
    }

    pub fn target(&self) -> &PointerTarget {
        &self.target
    }

    pub fn target_name(&self) -> String {
        self.target.name()
    }

    pub fn target_address(&self) -> Result<Address> {
        match self.get()? {
            Value::Pointer(raw) => Ok(Address::new(raw)),
            other => Err(Error::TypeMismatch(format!("pointer snapshot holds {}", other))),
        }
    }

    /// Follows the pointer. Opaque pointers yield `length` raw bytes (one by
    /// default); typed pointers yield a view and reject a length.
    pub fn unwrap(&self, length: Option<usize>) -> Result<Unwrapped> {
        let resolver = self.resolver().absolute_from_own(self.target_address()?);
        match &self.target {
            PointerTarget::Opaque => Ok(Unwrapped::Bytes(resolver.resolve(length.unwrap_or(1))?)),
            _ if length.is_some() => Err(Error::UnsupportedOperation(format!(
                "cannot unwrap {} with an explicit length",
                self.type_name()
            ))),
            PointerTarget::Record { id, .. } => {
                let inflater = self.registry.inflater_for(&TypeDesc::Record(*id), None)?;
                Ok(Unwrapped::View(inflater.inflate(&self.registry, resolver)?))
            }
            PointerTarget::Inflater(inflater) => {
                Ok(Unwrapped::View(inflater.inflate(&self.registry, resolver)?))
            }
        }
    }

    /// Like `unwrap`, but an unreadable target yields `None`.
    pub fn try_unwrap(&self, length: Option<usize>) -> Result<Option<Unwrapped>> {
        let address = self.target_address()?;
        let probe = match length {
            Some(len) => len,
            None => self.target_size()?.unwrap_or(1),
        };
        if let Err(err) = self.resolver().absolute_from_own(address).resolve(probe) {
            if err.is_out_of_bounds() {
                log::warn!("{} points outside the store", self);
                return Ok(None);
            }
            return Err(err);
        }
        self.unwrap(length).map(Some)
    }

    fn target_size(&self) -> Result<Option<usize>> {
        match &self.target {
            PointerTarget::Opaque => Ok(None),
            PointerTarget::Record { id, .. } => Ok(Some(self.registry.record_layout(*id)?.size())),
            PointerTarget::Inflater(inflater) => Ok(inflater.size()),
        }
    }
}

impl Obj for PointerView {
    fn resolver(&self) -> &Resolver {
        self.backing.resolver()
    }

    fn size(&self) -> Result<usize> {
        Ok(POINTER_SIZE)
    }

    fn type_name(&self) -> String {
        format!("*{}", self.target_name())
    }

    fn read_value(&self) -> Result<Value> {
        let raw = self
            .backing
            .read_value()?
            .as_u64()
            .ok_or_else(|| Error::TypeMismatch("pointer backing is not an integer".to_string()))?;
        Ok(Value::Pointer(raw))
    }

    fn write_value(&self, value: &Value) -> Result<()> {
        let raw = value
            .as_u64()
            .ok_or_else(|| Error::TypeMismatch(format!("pointer cannot hold {}", value)))?;
        self.backing.write_value(&Value::UInt(raw))
    }

    fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    fn snapshot_mut(&mut self) -> &mut Option<Snapshot> {
        &mut self.snapshot
    }

    fn to_str(&self, _indent: usize) -> Result<String> {
        Ok(format!("{}@{}", self.target_name(), self.target_address()?))
    }
}

impl std::fmt::Debug for PointerView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerView")
            .field("resolver", self.resolver())
            .field("target", &self.target_name())
            .field("frozen", &self.is_frozen())
            .finish()
    }
}

impl std::fmt::Display for PointerView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_str(0) {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "{}@?", self.target_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{BufferMemory, MemoryWriter};
    use crate::types::{ptr_to, PrimitiveType};

    fn store() -> Arc<BufferMemory> {
        let mut bytes = vec![0u8; 32];
        bytes[0..8].copy_from_slice(&16u64.to_le_bytes());
        bytes[16..20].copy_from_slice(&42i32.to_le_bytes());
        Arc::new(BufferMemory::new(bytes))
    }

    fn pointer(registry: &Arc<TypeRegistry>, desc: &TypeDesc, store: Arc<BufferMemory>) -> PointerView {
        let view = registry
            .inflate(desc, Resolver::live(store, Address::zero()))
            .unwrap();
        match view {
            View::Pointer(pointer) => pointer,
            other => panic!("expected a pointer, got {:?}", other),
        }
    }

    #[test]
    fn test_typed_unwrap() {
        let registry = TypeRegistry::new();
        let view = pointer(&registry, &ptr_to(PrimitiveType::I32), store());
        assert_eq!(view.get().unwrap(), Value::Pointer(16));
        let target = view.unwrap(None).unwrap().into_view().unwrap();
        assert_eq!(target.get().unwrap(), Value::Int(42));
        assert_eq!(target.address(), Address::new(16));
        assert_eq!(view.to_string(), "i32@0x10");
    }

    #[test]
    fn test_typed_unwrap_rejects_length() {
        let registry = TypeRegistry::new();
        let view = pointer(&registry, &ptr_to(PrimitiveType::I32), store());
        assert!(matches!(view.unwrap(Some(4)), Err(Error::UnsupportedOperation(_))));
    }

    #[test]
    fn test_opaque_unwrap() {
        let registry = TypeRegistry::new();
        let view = pointer(&registry, &crate::types::opaque_ptr(), store());
        let bytes = view.unwrap(Some(4)).unwrap().into_bytes().unwrap();
        assert_eq!(bytes, 42i32.to_le_bytes().to_vec());
        assert_eq!(view.unwrap(None).unwrap().into_bytes().unwrap(), vec![42]);
        assert_eq!(view.to_string(), "ptr@0x10");
    }

    #[test]
    fn test_try_unwrap_dangling() {
        let registry = TypeRegistry::new();
        let memory = store();
        memory.write_bytes(Address::zero(), &0xdead_0000u64.to_le_bytes()).unwrap();
        let view = pointer(&registry, &ptr_to(PrimitiveType::I64), memory);
        assert!(view.try_unwrap(None).unwrap().is_none());
        assert!(view.unwrap(None).unwrap().into_view().unwrap().get().is_err());
    }

    #[test]
    fn test_try_unwrap_valid() {
        let registry = TypeRegistry::new();
        let view = pointer(&registry, &ptr_to(PrimitiveType::I32), store());
        let target = view.try_unwrap(None).unwrap().unwrap().into_view().unwrap();
        assert_eq!(target.get().unwrap(), Value::Int(42));
    }

    #[test]
    fn test_set_retargets() {
        let registry = TypeRegistry::new();
        let memory = store();
        let view = pointer(&registry, &ptr_to(PrimitiveType::U8), memory.clone());
        view.set(&Value::Pointer(17)).unwrap();
        assert_eq!(view.unwrap(None).unwrap().into_view().unwrap().get().unwrap(), Value::UInt(0));
        assert_eq!(memory.snapshot()[0], 17);
    }
}
