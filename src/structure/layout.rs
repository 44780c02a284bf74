// Wed Oct 14 2026 - Alex

use crate::error::{Error, Result};
use crate::registry::{Inflater, Resolution};
use crate::structure::RecordId;
use indexmap::IndexMap;

#[derive(Debug, Clone)]
pub struct MemberLayout {
    pub name: String,
    pub offset: u64,
    pub size: usize,
    pub inflater: Inflater,
    /// Record that declared the member; differs from the layout's record for
    /// inherited members.
    pub declared_in: String,
}

/// Resolved placement of every member of a record, base members first.
#[derive(Debug, Clone)]
pub struct RecordLayout {
    id: RecordId,
    name: String,
    size: usize,
    members: IndexMap<String, MemberLayout>,
}

impl RecordLayout {
    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member(&self, name: &str) -> Option<&MemberLayout> {
        self.members.get(name)
    }

    pub fn members(&self) -> impl Iterator<Item = &MemberLayout> {
        self.members.values()
    }

    /// `(offset, len)` of every byte range skipped by an offset override.
    pub fn gaps(&self) -> Vec<(u64, usize)> {
        let mut gaps = Vec::new();
        let mut cursor = 0u64;
        for member in self.members.values() {
            if member.offset > cursor {
                gaps.push((cursor, (member.offset - cursor) as usize));
            }
            cursor = member.offset + member.size as u64;
        }
        gaps
    }
}

/// Lays out `id`: walks the base chain base-first, places members
/// contiguously, honours offset overrides and resolves every member with
/// `id` as the owning record.
pub(crate) fn compute_layout(resolution: &mut Resolution<'_>, id: RecordId) -> Result<RecordLayout> {
    let chain = resolution.registry().record_chain(id)?;
    let name = resolution.registry().record(id)?.name().to_string();

    let mut members: IndexMap<String, MemberLayout> = IndexMap::new();
    let mut current = 0u64;

    for record in &chain {
        for decl in record.shape()?.members() {
            if members.contains_key(decl.name()) {
                return Err(Error::InvalidFieldConfig(format!(
                    "{} declares member {} twice",
                    name,
                    decl.name()
                )));
            }

            let (requested, ty) = decl.ty().split_offset();
            if let Some(requested) = requested {
                if ty.split_offset().0.is_some() {
                    return Err(Error::InvalidFieldConfig(format!(
                        "{}.{} has more than one offset override",
                        name,
                        decl.name()
                    )));
                }
                if requested < current {
                    return Err(Error::InvalidOffsetOverride {
                        record: name,
                        requested,
                        current,
                    });
                }
                current = requested;
            }

            let inflater = resolution.resolve(ty, Some(id))?;
            let size = inflater.size().ok_or_else(|| {
                Error::InvalidFieldConfig(format!(
                    "{}.{} ({}) has no fixed size",
                    name,
                    decl.name(),
                    inflater.name()
                ))
            })?;

            let end = current
                .checked_add(size as u64)
                .filter(|end| usize::try_from(*end).is_ok())
                .ok_or_else(|| {
                    Error::InvalidFieldConfig(format!("{}.{} overflows the address space", name, decl.name()))
                })?;
            members.insert(
                decl.name().to_string(),
                MemberLayout {
                    name: decl.name().to_string(),
                    offset: current,
                    size,
                    inflater,
                    declared_in: record.name().to_string(),
                },
            );
            current = end;
        }
    }

    log::debug!("laid out {}: {} members, {} bytes", name, members.len(), current);

    Ok(RecordLayout {
        id,
        name,
        size: current as usize,
        members,
    })
}
