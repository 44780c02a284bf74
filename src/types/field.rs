// Tue Oct 13 2026 - Alex

use crate::error::{Error, Result};
use crate::types::{PrimitiveType, TypeDesc};
use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Pointer,
    Array,
    Enum,
    Offset,
}

/// A configured member blueprint. Declarative only: it becomes a view once
/// the registry resolves it and the result is bound to a resolver.
#[derive(Debug, Clone)]
pub enum FieldDesc {
    Pointer(PointerField),
    Array(LinearArrayField),
    Enum(IntEnumField),
    Offset(OffsetOverride),
}

impl FieldDesc {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Pointer(_) => FieldKind::Pointer,
            Self::Array(_) => FieldKind::Array,
            Self::Enum(_) => FieldKind::Enum,
            Self::Offset(_) => FieldKind::Offset,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Pointee {
    /// The record that declares the member; bound at layout time.
    OwnRecord,
    /// Unknown pointee; unwrapping yields raw bytes.
    Opaque,
    Of(Box<TypeDesc>),
}

#[derive(Debug, Clone)]
pub struct PointerField {
    pointee: Pointee,
}

impl PointerField {
    pub fn new(pointee: Pointee) -> Self {
        Self { pointee }
    }

    pub fn pointee(&self) -> &Pointee {
        &self.pointee
    }
}

#[derive(Debug, Clone)]
pub struct LinearArrayField {
    element: Box<TypeDesc>,
    count: usize,
}

impl LinearArrayField {
    pub fn new(element: TypeDesc, count: usize) -> Self {
        Self {
            element: Box::new(element),
            count,
        }
    }

    pub fn element(&self) -> &TypeDesc {
        &self.element
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// Integer value to symbolic tag, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumMapping {
    tags: IndexMap<i64, String>,
}

impl EnumMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tag: &str, value: i64) -> Self {
        self.tags.insert(value, tag.to_string());
        self
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        Self {
            tags: pairs.into_iter().map(|(tag, value)| (value, tag.into())).collect(),
        }
    }

    pub fn tag_for(&self, value: i64) -> Option<&str> {
        self.tags.get(&value).map(String::as_str)
    }

    pub fn value_for(&self, tag: &str) -> Option<i64> {
        self.tags.iter().find(|(_, t)| t.as_str() == tag).map(|(value, _)| *value)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.tags.iter().map(|(value, tag)| (tag.as_str(), *value))
    }
}

#[derive(Debug, Clone)]
pub struct IntEnumField {
    mapping: Arc<EnumMapping>,
    backing: PrimitiveType,
    lenient: bool,
}

impl IntEnumField {
    /// Lenient by default: unknown values decode to their raw integer.
    pub fn new(mapping: EnumMapping, width: usize) -> Result<Self> {
        let backing = PrimitiveType::signed_of_width(width).ok_or_else(|| {
            Error::InvalidFieldConfig(format!("enum width must be 1, 2, 4 or 8 bytes, got {}", width))
        })?;
        Ok(Self {
            mapping: Arc::new(mapping),
            backing,
            lenient: true,
        })
    }

    pub fn with_lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    pub fn strict(self) -> Self {
        self.with_lenient(false)
    }

    pub fn mapping(&self) -> &EnumMapping {
        &self.mapping
    }

    pub fn backing(&self) -> PrimitiveType {
        self.backing
    }

    pub fn width(&self) -> usize {
        self.backing.size()
    }

    pub fn is_lenient(&self) -> bool {
        self.lenient
    }
}

#[derive(Debug, Clone)]
pub struct OffsetOverride {
    offset: u64,
    inner: Box<TypeDesc>,
}

impl OffsetOverride {
    pub fn new(offset: u64, inner: TypeDesc) -> Self {
        Self {
            offset,
            inner: Box::new(inner),
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn inner(&self) -> &TypeDesc {
        &self.inner
    }
}

pub fn ptr_to(target: impl Into<TypeDesc>) -> TypeDesc {
    TypeDesc::Field(FieldDesc::Pointer(PointerField::new(Pointee::Of(Box::new(target.into())))))
}

pub fn ptr_to_self() -> TypeDesc {
    TypeDesc::Field(FieldDesc::Pointer(PointerField::new(Pointee::OwnRecord)))
}

pub fn opaque_ptr() -> TypeDesc {
    TypeDesc::Field(FieldDesc::Pointer(PointerField::new(Pointee::Opaque)))
}

pub fn array_of(element: impl Into<TypeDesc>, count: usize) -> TypeDesc {
    TypeDesc::Field(FieldDesc::Array(LinearArrayField::new(element.into(), count)))
}

pub fn enum_of(mapping: EnumMapping, width: usize) -> Result<TypeDesc> {
    Ok(TypeDesc::Field(FieldDesc::Enum(IntEnumField::new(mapping, width)?)))
}

/// Places `inner` at an explicit byte offset inside the enclosing record.
pub fn offset(offset: u64, inner: impl Into<TypeDesc>) -> TypeDesc {
    TypeDesc::Field(FieldDesc::Offset(OffsetOverride::new(offset, inner.into())))
}
