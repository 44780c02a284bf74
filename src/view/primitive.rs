// Wed Oct 14 2026 - Alex

use crate::error::Result;
use crate::memory::Resolver;
use crate::types::{Endianness, PrimitiveType, Value};
use crate::view::{Obj, Snapshot};

#[derive(Debug, Clone)]
pub struct PrimitiveView {
    resolver: Resolver,
    ty: PrimitiveType,
    endianness: Endianness,
    snapshot: Option<Snapshot>,
}

impl PrimitiveView {
    pub fn new(resolver: Resolver, ty: PrimitiveType, endianness: Endianness) -> Self {
        Self {
            resolver,
            ty,
            endianness,
            snapshot: None,
        }
    }

    pub fn primitive(&self) -> PrimitiveType {
        self.ty
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }
}

impl Obj for PrimitiveView {
    fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    fn size(&self) -> Result<usize> {
        Ok(self.ty.size())
    }

    fn type_name(&self) -> String {
        self.ty.to_string()
    }

    fn read_value(&self) -> Result<Value> {
        let bytes = self.resolver.resolve(self.ty.size())?;
        Ok(self.ty.decode(&bytes, self.endianness))
    }

    fn write_value(&self, value: &Value) -> Result<()> {
        let bytes = self.ty.encode(value, self.endianness)?;
        self.resolver.modify(self.ty.size(), &bytes)
    }

    fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    fn snapshot_mut(&mut self) -> &mut Option<Snapshot> {
        &mut self.snapshot
    }
}
