// Tue Oct 13 2026 - Alex

use crate::registry::Inflater;
use crate::structure::RecordId;
use crate::types::{FieldDesc, PrimitiveType};
use std::fmt;

/// What a member (or a pointee, or an array element) is.
///
/// Plain types (`Primitive`, `CString`, `Record`) are nominal and resolve
/// through the registry's type handlers; `Field` carries a configured
/// blueprint and resolves through the instance handlers. `Resolved` wraps an
/// inflater the registry already produced and passes through unchanged.
#[derive(Debug, Clone)]
pub enum TypeDesc {
    Primitive(PrimitiveType),
    CString,
    Record(RecordId),
    Field(FieldDesc),
    Resolved(Inflater),
}

/// Memoisation key for plain types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nominal {
    Primitive(PrimitiveType),
    CString,
    Record(RecordId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive,
    CString,
    Record,
    Pointer,
    Array,
    Enum,
}

impl TypeDesc {
    pub fn nominal(&self) -> Option<Nominal> {
        match self {
            Self::Primitive(ty) => Some(Nominal::Primitive(*ty)),
            Self::CString => Some(Nominal::CString),
            Self::Record(id) => Some(Nominal::Record(*id)),
            _ => None,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Primitive(_) => TypeKind::Primitive,
            Self::CString => TypeKind::CString,
            Self::Record(_) => TypeKind::Record,
            Self::Field(FieldDesc::Pointer(_)) => TypeKind::Pointer,
            Self::Field(FieldDesc::Array(_)) => TypeKind::Array,
            Self::Field(FieldDesc::Enum(_)) => TypeKind::Enum,
            Self::Field(FieldDesc::Offset(field)) => field.inner().kind(),
            Self::Resolved(inflater) => inflater.kind(),
        }
    }

    /// Splits an offset override from the type it applies to.
    pub fn split_offset(&self) -> (Option<u64>, &TypeDesc) {
        match self {
            Self::Field(FieldDesc::Offset(field)) => (Some(field.offset()), field.inner()),
            other => (None, other),
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Primitive => "primitive",
            Self::CString => "cstring",
            Self::Record => "record",
            Self::Pointer => "pointer",
            Self::Array => "array",
            Self::Enum => "enum",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Nominal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(ty) => write!(f, "{}", ty),
            Self::CString => f.write_str("cstring"),
            Self::Record(id) => write!(f, "{}", id),
        }
    }
}

impl From<PrimitiveType> for TypeDesc {
    fn from(ty: PrimitiveType) -> Self {
        Self::Primitive(ty)
    }
}

impl From<RecordId> for TypeDesc {
    fn from(id: RecordId) -> Self {
        Self::Record(id)
    }
}

impl From<FieldDesc> for TypeDesc {
    fn from(field: FieldDesc) -> Self {
        Self::Field(field)
    }
}

impl From<Inflater> for TypeDesc {
    fn from(inflater: Inflater) -> Self {
        Self::Resolved(inflater)
    }
}
