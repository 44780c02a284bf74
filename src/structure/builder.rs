// Wed Oct 14 2026 - Alex

use crate::structure::{MemberDecl, RecordId, RecordShape};
use crate::types::TypeDesc;

/// A record declaration ready to hand to `TypeRegistry::declare_record`.
#[derive(Debug, Clone)]
pub struct RecordDecl {
    pub name: String,
    pub shape: RecordShape,
}

pub struct RecordBuilder {
    name: String,
    base: Option<RecordId>,
    members: Vec<MemberDecl>,
}

impl RecordBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            members: Vec::new(),
        }
    }

    pub fn base(mut self, base: RecordId) -> Self {
        self.base = Some(base);
        self
    }

    pub fn member(mut self, name: impl Into<String>, ty: impl Into<TypeDesc>) -> Self {
        self.members.push(MemberDecl::new(name, ty));
        self
    }

    pub fn shape(self) -> RecordShape {
        RecordShape::new(self.base, self.members)
    }

    pub fn build(self) -> RecordDecl {
        RecordDecl {
            name: self.name.clone(),
            shape: self.shape(),
        }
    }
}
