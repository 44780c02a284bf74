// Wed Oct 14 2026 - Alex

use crate::error::{Error, Result};
use crate::types::TypeDesc;
use once_cell::sync::OnceCell;
use std::fmt;

/// Index of a record type in its registry's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u32);

impl RecordId {
    pub(crate) fn from_index(index: usize) -> Result<Self> {
        u32::try_from(index)
            .map(Self)
            .map_err(|_| Error::InvalidFieldConfig(format!("record arena is full at {} records", index)))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct MemberDecl {
    name: String,
    ty: TypeDesc,
}

impl MemberDecl {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeDesc>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeDesc {
        &self.ty
    }
}

/// The declared body of a record: an optional base and its own members in
/// declaration order.
#[derive(Debug, Clone, Default)]
pub struct RecordShape {
    base: Option<RecordId>,
    members: Vec<MemberDecl>,
}

impl RecordShape {
    pub fn new(base: Option<RecordId>, members: Vec<MemberDecl>) -> Self {
        Self { base, members }
    }

    pub fn base(&self) -> Option<RecordId> {
        self.base
    }

    pub fn members(&self) -> &[MemberDecl] {
        &self.members
    }
}

/// A named record slot. The name is fixed when the slot is reserved; the
/// shape is set exactly once when the record is defined, which lets records
/// refer to each other (or themselves) before they are complete.
#[derive(Debug)]
pub struct RecordType {
    id: RecordId,
    name: String,
    shape: OnceCell<RecordShape>,
}

impl RecordType {
    pub(crate) fn reserved(id: RecordId, name: String) -> Self {
        Self {
            id,
            name,
            shape: OnceCell::new(),
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_defined(&self) -> bool {
        self.shape.get().is_some()
    }

    pub fn shape(&self) -> Result<&RecordShape> {
        self.shape
            .get()
            .ok_or_else(|| Error::NoInflaterFound(format!("{} (declared but never defined)", self.name)))
    }

    pub(crate) fn define(&self, shape: RecordShape) -> Result<()> {
        self.shape
            .set(shape)
            .map_err(|_| Error::InvalidFieldConfig(format!("record {} is already defined", self.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_from_index() {
        assert_eq!(RecordId::from_index(7).unwrap().index(), 7);
        assert_eq!(RecordId::from_index(7).unwrap().to_string(), "record#7");
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_record_id_past_arena_limit() {
        assert!(matches!(
            RecordId::from_index(u32::MAX as usize + 1),
            Err(Error::InvalidFieldConfig(_))
        ));
    }
}
