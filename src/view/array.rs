// Wed Oct 14 2026 - Alex

use crate::error::{Error, Result};
use crate::memory::Resolver;
use crate::registry::{Inflater, TypeRegistry};
use crate::types::Value;
use crate::view::{Obj, Snapshot, View};
use std::sync::Arc;

/// `count` contiguous elements of one fixed-size type.
#[derive(Clone)]
pub struct ArrayView {
    resolver: Resolver,
    element: Inflater,
    element_size: usize,
    count: usize,
    byte_len: usize,
    registry: Arc<TypeRegistry>,
    snapshot: Option<Snapshot>,
}

impl ArrayView {
    pub fn new(
        resolver: Resolver,
        element: Inflater,
        count: usize,
        registry: Arc<TypeRegistry>,
    ) -> Result<Self> {
        let element_size = element.size().ok_or_else(|| {
            Error::InvalidFieldConfig(format!("array element {} has no fixed size", element.name()))
        })?;
        let byte_len = element_size.checked_mul(count).ok_or_else(|| {
            Error::InvalidFieldConfig(format!("[{}; {}] overflows the address space", element.name(), count))
        })?;
        Ok(Self {
            resolver,
            element,
            element_size,
            count,
            byte_len,
            registry,
            snapshot: None,
        })
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn element(&self) -> &Inflater {
        &self.element
    }

    /// Inflates element `index`. Elements of a frozen array come back frozen
    /// with their slice of the array's snapshot.
    pub fn at(&self, index: usize) -> Result<View> {
        if index >= self.count {
            let address = (index as u64)
                .checked_mul(self.element_size as u64)
                .and_then(|offset| self.address().checked_offset(offset))
                .map_or(u64::MAX, |address| address.as_u64());
            return Err(Error::OutOfBounds {
                address,
                len: self.element_size,
            });
        }
        let offset = (index * self.element_size) as u64;
        let mut view = self
            .element
            .inflate(&self.registry, self.resolver.relative_from_own(offset))?;
        if let Some(snapshot) = &self.snapshot {
            let start = index * self.element_size;
            let value = match &snapshot.value {
                Value::Array(values) => values.get(index).cloned(),
                _ => None,
            };
            if let (Some(value), Some(bytes)) =
                (value, snapshot.bytes.get(start..start + self.element_size))
            {
                view.restore(Snapshot {
                    value,
                    bytes: bytes.to_vec(),
                });
            }
        }
        Ok(view)
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<View>> + '_ {
        (0..self.count).map(move |index| self.at(index))
    }

    pub fn contains(&self, value: &Value) -> Result<bool> {
        for element in self.iter() {
            if element?.get()? == *value {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Obj for ArrayView {
    fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    fn size(&self) -> Result<usize> {
        Ok(self.byte_len)
    }

    fn type_name(&self) -> String {
        format!("[{}; {}]", self.element.name(), self.count)
    }

    fn read_value(&self) -> Result<Value> {
        let mut values = Vec::with_capacity(self.count);
        for index in 0..self.count {
            let offset = (index * self.element_size) as u64;
            let view = self
                .element
                .inflate(&self.registry, self.resolver.relative_from_own(offset))?;
            values.push(view.read_value()?);
        }
        Ok(Value::Array(values))
    }

    fn write_value(&self, _value: &Value) -> Result<()> {
        Err(Error::UnsupportedOperation(
            "arrays cannot be assigned as a whole, set elements instead".to_string(),
        ))
    }

    fn read_raw(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.byte_len);
        for index in 0..self.count {
            let offset = (index * self.element_size) as u64;
            let view = self
                .element
                .inflate(&self.registry, self.resolver.relative_from_own(offset))?;
            bytes.extend(view.read_raw()?);
        }
        Ok(bytes)
    }

    fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    fn snapshot_mut(&mut self) -> &mut Option<Snapshot> {
        &mut self.snapshot
    }

    fn to_str(&self, indent: usize) -> Result<String> {
        let pad = " ".repeat(indent + 4);
        let mut out = String::from("[\n");
        for element in self.iter() {
            out.push_str(&pad);
            out.push_str(&element?.to_str(indent + 4)?);
            out.push_str(",\n");
        }
        out.push_str(&" ".repeat(indent));
        out.push(']');
        Ok(out)
    }
}

impl std::fmt::Debug for ArrayView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayView")
            .field("resolver", &self.resolver)
            .field("element", &self.element.name())
            .field("count", &self.count)
            .field("frozen", &self.is_frozen())
            .finish()
    }
}
