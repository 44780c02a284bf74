// Wed Oct 14 2026 - Alex

use crate::error::{Error, Result};
use crate::memory::Resolver;
use crate::types::{Endianness, IntEnumField, Value};
use crate::view::{Obj, PrimitiveView, Snapshot};

/// An integer of fixed width read through a tag mapping.
#[derive(Debug, Clone)]
pub struct EnumView {
    backing: PrimitiveView,
    field: IntEnumField,
    snapshot: Option<Snapshot>,
}

impl EnumView {
    pub fn new(resolver: Resolver, field: IntEnumField, endianness: Endianness) -> Self {
        Self {
            backing: PrimitiveView::new(resolver, field.backing(), endianness),
            field,
            snapshot: None,
        }
    }

    pub fn field(&self) -> &IntEnumField {
        &self.field
    }

    pub fn raw(&self) -> Result<i64> {
        self.backing
            .read_value()?
            .as_i64()
            .ok_or_else(|| Error::TypeMismatch("enum backing is not an integer".to_string()))
    }

    pub fn tag(&self) -> Result<Option<String>> {
        Ok(self.get()?.tag().map(str::to_string))
    }
}

impl Obj for EnumView {
    fn resolver(&self) -> &Resolver {
        self.backing.resolver()
    }

    fn size(&self) -> Result<usize> {
        Ok(self.field.width())
    }

    fn type_name(&self) -> String {
        format!("enum({})", self.field.backing())
    }

    fn read_value(&self) -> Result<Value> {
        let raw = self.raw()?;
        let tag = self.field.mapping().tag_for(raw).map(str::to_string);
        if tag.is_none() && !self.field.is_lenient() {
            return Err(Error::InvalidEnumValue(raw));
        }
        Ok(Value::Enum { tag, raw })
    }

    /// Accepts a tag (`Value::tagged`), an untagged enum value or a plain
    /// integer.
    fn write_value(&self, value: &Value) -> Result<()> {
        let raw = match value {
            Value::Enum { tag: Some(tag), .. } => self
                .field
                .mapping()
                .value_for(tag)
                .ok_or_else(|| Error::TypeMismatch(format!("unknown enum tag {}", tag)))?,
            other => other
                .as_i64()
                .ok_or_else(|| Error::TypeMismatch(format!("enum cannot hold {}", other)))?,
        };
        self.backing.write_value(&Value::Int(raw))
    }

    fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    fn snapshot_mut(&mut self) -> &mut Option<Snapshot> {
        &mut self.snapshot
    }
}
