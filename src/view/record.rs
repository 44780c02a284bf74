// Wed Oct 14 2026 - Alex

use crate::error::{Error, Result};
use crate::memory::Resolver;
use crate::registry::TypeRegistry;
use crate::structure::RecordLayout;
use crate::types::Value;
use crate::view::{Obj, Snapshot, View};
use indexmap::IndexMap;
use std::sync::Arc;

/// A record instance: one child view per member, anchored at the member's
/// offset from this view's resolver.
#[derive(Debug, Clone)]
pub struct RecordView {
    resolver: Resolver,
    layout: Arc<RecordLayout>,
    members: IndexMap<String, View>,
    snapshot: Option<Snapshot>,
}

impl RecordView {
    pub fn new(resolver: Resolver, layout: Arc<RecordLayout>, registry: &Arc<TypeRegistry>) -> Result<Self> {
        let mut members = IndexMap::with_capacity(layout.len());
        for member in layout.members() {
            let child = resolver.relative_from_own(member.offset);
            members.insert(member.name.clone(), member.inflater.inflate(registry, child)?);
        }
        Ok(Self {
            resolver,
            layout,
            members,
            snapshot: None,
        })
    }

    pub fn layout(&self) -> &Arc<RecordLayout> {
        &self.layout
    }

    pub fn name(&self) -> &str {
        self.layout.name()
    }

    pub fn member(&self, name: &str) -> Result<&View> {
        self.members
            .get(name)
            .ok_or_else(|| Error::UnknownMember(format!("{}.{}", self.name(), name)))
    }

    pub fn member_mut(&mut self, name: &str) -> Result<&mut View> {
        let record = self.layout.name().to_string();
        self.members
            .get_mut(name)
            .ok_or_else(|| Error::UnknownMember(format!("{}.{}", record, name)))
    }

    pub fn members(&self) -> impl Iterator<Item = (&str, &View)> {
        self.members.iter().map(|(name, view)| (name.as_str(), view))
    }

    fn frozen_value(&self) -> Result<Value> {
        let mut fields = IndexMap::with_capacity(self.members.len());
        for (name, view) in &self.members {
            fields.insert(name.clone(), view.get()?);
        }
        Ok(Value::Record(fields))
    }

    /// Member bytes in layout order with the padding between them read live.
    fn assemble(&self, frozen: bool) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.layout.size());
        let mut cursor = 0u64;
        for member in self.layout.members() {
            if member.offset > cursor {
                let gap = (member.offset - cursor) as usize;
                bytes.extend(self.resolver.relative_from_own(cursor).resolve(gap)?);
            }
            let view = self.member(&member.name)?;
            if frozen {
                bytes.extend(view.to_bytes()?);
            } else {
                bytes.extend(view.read_raw()?);
            }
            cursor = member.offset + member.size as u64;
        }
        Ok(bytes)
    }
}

impl Obj for RecordView {
    fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    fn size(&self) -> Result<usize> {
        Ok(self.layout.size())
    }

    fn type_name(&self) -> String {
        self.layout.name().to_string()
    }

    fn read_value(&self) -> Result<Value> {
        let mut fields = IndexMap::with_capacity(self.members.len());
        for (name, view) in &self.members {
            fields.insert(name.clone(), view.read_value()?);
        }
        Ok(Value::Record(fields))
    }

    fn write_value(&self, _value: &Value) -> Result<()> {
        Err(Error::UnsupportedOperation(format!(
            "{} cannot be assigned as a whole, set its members instead",
            self.name()
        )))
    }

    fn read_raw(&self) -> Result<Vec<u8>> {
        self.assemble(false)
    }

    fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    fn snapshot_mut(&mut self) -> &mut Option<Snapshot> {
        &mut self.snapshot
    }

    fn freeze(&mut self) -> Result<()> {
        for view in self.members.values_mut() {
            view.freeze()?;
        }
        let value = self.frozen_value()?;
        let bytes = self.assemble(true)?;
        self.snapshot = Some(Snapshot { value, bytes });
        Ok(())
    }

    fn restore(&mut self, snapshot: Snapshot) {
        for member in self.layout.members() {
            let start = member.offset as usize;
            let value = snapshot.value.field(&member.name).cloned();
            let bytes = snapshot.bytes.get(start..start + member.size);
            if let (Some(value), Some(bytes), Some(view)) =
                (value, bytes, self.members.get_mut(&member.name))
            {
                view.restore(Snapshot {
                    value,
                    bytes: bytes.to_vec(),
                });
            }
        }
        self.snapshot = Some(snapshot);
    }

    fn to_str(&self, indent: usize) -> Result<String> {
        let pad = " ".repeat(indent + 4);
        let mut out = format!("{} {{\n", self.name());
        for (name, view) in &self.members {
            out.push_str(&format!("{}{}: {},\n", pad, name, view.to_str(indent + 4)?));
        }
        out.push_str(&" ".repeat(indent));
        out.push('}');
        Ok(out)
    }

    fn equals(&self, other: &dyn Obj) -> Result<bool> {
        Ok(self.size()? == other.size()? && self.get()? == other.get()?)
    }
}
