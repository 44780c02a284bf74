// Thu Oct 15 2026 - Alex

use crate::error::Result;
use crate::memory::Resolver;
use crate::registry::TypeRegistry;
use crate::structure::{RecordId, RecordLayout};
use crate::types::{Endianness, IntEnumField, PrimitiveType, TypeKind, POINTER_SIZE};
use crate::view::{ArrayView, EnumView, PointerView, PrimitiveView, RecordView, StringView, View};
use std::fmt;
use std::sync::Arc;

/// What a pointer dereferences to.
#[derive(Debug, Clone)]
pub enum PointerTarget {
    /// Untyped; unwrapping yields raw bytes.
    Opaque,
    /// Looked up in the registry when the pointer is followed, so a record
    /// may point at itself.
    Record { id: RecordId, name: String },
    Inflater(Box<Inflater>),
}

impl PointerTarget {
    pub fn name(&self) -> String {
        match self {
            Self::Opaque => "ptr".to_string(),
            Self::Record { name, .. } => name.clone(),
            Self::Inflater(inflater) => inflater.name(),
        }
    }
}

/// A resolved recipe that turns a resolver into a view.
#[derive(Debug, Clone)]
pub enum Inflater {
    Primitive { ty: PrimitiveType, endianness: Endianness },
    CString,
    Record(Arc<RecordLayout>),
    Pointer { target: PointerTarget, endianness: Endianness },
    Array { element: Box<Inflater>, count: usize },
    Enum { field: IntEnumField, endianness: Endianness },
}

impl Inflater {
    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Primitive { .. } => TypeKind::Primitive,
            Self::CString => TypeKind::CString,
            Self::Record(_) => TypeKind::Record,
            Self::Pointer { .. } => TypeKind::Pointer,
            Self::Array { .. } => TypeKind::Array,
            Self::Enum { .. } => TypeKind::Enum,
        }
    }

    /// Static size in bytes; `None` for strings, whose size depends on the
    /// bytes they cover, and for arrays too large to address.
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::Primitive { ty, .. } => Some(ty.size()),
            Self::CString => None,
            Self::Record(layout) => Some(layout.size()),
            Self::Pointer { .. } => Some(POINTER_SIZE),
            Self::Array { element, count } => element.size().and_then(|size| size.checked_mul(*count)),
            Self::Enum { field, .. } => Some(field.width()),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Primitive { ty, .. } => ty.to_string(),
            Self::CString => "cstring".to_string(),
            Self::Record(layout) => layout.name().to_string(),
            Self::Pointer { target, .. } => format!("*{}", target.name()),
            Self::Array { element, count } => format!("[{}; {}]", element.name(), count),
            Self::Enum { field, .. } => format!("enum({})", field.backing()),
        }
    }

    pub fn inflate(&self, registry: &Arc<TypeRegistry>, resolver: Resolver) -> Result<View> {
        let view = match self {
            Self::Primitive { ty, endianness } => {
                View::Primitive(PrimitiveView::new(resolver, *ty, *endianness))
            }
            Self::CString => View::String(StringView::new(resolver)),
            Self::Record(layout) => View::Record(RecordView::new(resolver, Arc::clone(layout), registry)?),
            Self::Pointer { target, endianness } => View::Pointer(PointerView::new(
                resolver,
                target.clone(),
                *endianness,
                Arc::clone(registry),
            )),
            Self::Array { element, count } => View::Array(ArrayView::new(
                resolver,
                element.as_ref().clone(),
                *count,
                Arc::clone(registry),
            )?),
            Self::Enum { field, endianness } => {
                View::Enum(EnumView::new(resolver, field.clone(), *endianness))
            }
        };
        Ok(view)
    }
}

impl fmt::Display for Inflater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
