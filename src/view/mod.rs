// Wed Oct 14 2026 - Alex

pub mod array;
pub mod enumeration;
pub mod obj;
pub mod pointer;
pub mod primitive;
pub mod record;
pub mod string;

pub use array::ArrayView;
pub use enumeration::EnumView;
pub use obj::{Obj, Snapshot};
pub use pointer::{PointerView, Unwrapped};
pub use primitive::PrimitiveView;
pub use record::RecordView;
pub use string::StringView;

use crate::error::{Error, Result};
use crate::memory::{Address, Resolver};
use crate::types::Value;
use std::fmt;

/// Any inflated view.
#[derive(Debug, Clone)]
pub enum View {
    Primitive(PrimitiveView),
    String(StringView),
    Pointer(PointerView),
    Array(ArrayView),
    Enum(EnumView),
    Record(RecordView),
}

impl View {
    fn inner(&self) -> &dyn Obj {
        match self {
            Self::Primitive(view) => view,
            Self::String(view) => view,
            Self::Pointer(view) => view,
            Self::Array(view) => view,
            Self::Enum(view) => view,
            Self::Record(view) => view,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Obj {
        match self {
            Self::Primitive(view) => view,
            Self::String(view) => view,
            Self::Pointer(view) => view,
            Self::Array(view) => view,
            Self::Enum(view) => view,
            Self::Record(view) => view,
        }
    }

    pub fn as_record(&self) -> Option<&RecordView> {
        match self {
            Self::Record(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_record_mut(&mut self) -> Option<&mut RecordView> {
        match self {
            Self::Record(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_pointer(&self) -> Option<&PointerView> {
        match self {
            Self::Pointer(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayView> {
        match self {
            Self::Array(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&StringView> {
        match self {
            Self::String(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumView> {
        match self {
            Self::Enum(view) => Some(view),
            _ => None,
        }
    }

    /// Shorthand for `as_record()?.member(name)`.
    pub fn member(&self, name: &str) -> Result<&View> {
        match self {
            Self::Record(view) => view.member(name),
            other => Err(Error::TypeMismatch(format!(
                "{} has no members",
                other.type_name()
            ))),
        }
    }
}

impl Obj for View {
    fn resolver(&self) -> &Resolver {
        self.inner().resolver()
    }

    fn size(&self) -> Result<usize> {
        self.inner().size()
    }

    fn type_name(&self) -> String {
        self.inner().type_name()
    }

    fn read_value(&self) -> Result<Value> {
        self.inner().read_value()
    }

    fn write_value(&self, value: &Value) -> Result<()> {
        self.inner().write_value(value)
    }

    fn snapshot(&self) -> Option<&Snapshot> {
        self.inner().snapshot()
    }

    fn snapshot_mut(&mut self) -> &mut Option<Snapshot> {
        self.inner_mut().snapshot_mut()
    }

    fn address(&self) -> Address {
        self.inner().address()
    }

    fn get(&self) -> Result<Value> {
        self.inner().get()
    }

    fn set(&self, value: &Value) -> Result<()> {
        self.inner().set(value)
    }

    fn read_raw(&self) -> Result<Vec<u8>> {
        self.inner().read_raw()
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        self.inner().to_bytes()
    }

    fn freeze(&mut self) -> Result<()> {
        self.inner_mut().freeze()
    }

    fn update(&mut self) -> Result<()> {
        self.inner_mut().update()
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.inner_mut().restore(snapshot)
    }

    fn diff(&self) -> Result<(Value, Value)> {
        self.inner().diff()
    }

    fn reset(&self) -> Result<()> {
        self.inner().reset()
    }

    fn to_str(&self, indent: usize) -> Result<String> {
        self.inner().to_str(indent)
    }

    fn equals(&self, other: &dyn Obj) -> Result<bool> {
        self.inner().equals(other)
    }
}

impl PartialEq for View {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other).unwrap_or(false)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_str(0) {
            Ok(text) => f.write_str(&text),
            Err(err) => write!(f, "<{} at {}: {}>", self.type_name(), self.address(), err),
        }
    }
}
