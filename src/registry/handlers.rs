// Thu Oct 15 2026 - Alex

use crate::error::{Error, Result};
use crate::registry::{Inflater, PointerTarget, Resolution};
use crate::structure::{compute_layout, RecordId};
use crate::types::{FieldDesc, Pointee, TypeDesc, TypeKind};
use std::sync::Arc;

/// Resolves a plain type. Returns `Ok(None)` to let the next handler try.
pub type TypeHandler =
    Arc<dyn Fn(&mut Resolution<'_>, &TypeDesc) -> Result<Option<Inflater>> + Send + Sync>;

/// Resolves a field blueprint. `owner` is the record being laid out, if any.
pub type InstanceHandler = Arc<
    dyn Fn(&mut Resolution<'_>, &FieldDesc, Option<RecordId>) -> Result<Option<Inflater>>
        + Send
        + Sync,
>;

/// Where a type handler is registered. A record type is looked up under its
/// own id, then each base id from nearest to farthest, then `Kind(Record)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKey {
    Kind(TypeKind),
    Record(RecordId),
}

pub(crate) fn primitive(resolution: &mut Resolution<'_>, desc: &TypeDesc) -> Result<Option<Inflater>> {
    match desc {
        TypeDesc::Primitive(ty) => Ok(Some(Inflater::Primitive {
            ty: *ty,
            endianness: resolution.registry().config().endianness,
        })),
        _ => Ok(None),
    }
}

pub(crate) fn cstring(_resolution: &mut Resolution<'_>, desc: &TypeDesc) -> Result<Option<Inflater>> {
    match desc {
        TypeDesc::CString => Ok(Some(Inflater::CString)),
        _ => Ok(None),
    }
}

pub(crate) fn record(resolution: &mut Resolution<'_>, desc: &TypeDesc) -> Result<Option<Inflater>> {
    match desc {
        TypeDesc::Record(id) => {
            let layout = resolution.enter(*id, |resolution| compute_layout(resolution, *id))?;
            Ok(Some(Inflater::Record(Arc::new(layout))))
        }
        _ => Ok(None),
    }
}

pub(crate) fn pointer(
    resolution: &mut Resolution<'_>,
    field: &FieldDesc,
    owner: Option<RecordId>,
) -> Result<Option<Inflater>> {
    let FieldDesc::Pointer(field) = field else {
        return Ok(None);
    };
    let target = match field.pointee() {
        Pointee::Opaque => PointerTarget::Opaque,
        Pointee::OwnRecord => {
            let id = owner.ok_or_else(|| {
                Error::InvalidFieldConfig("self pointer used outside a record".to_string())
            })?;
            record_target(resolution, id)?
        }
        Pointee::Of(desc) => match desc.as_ref() {
            TypeDesc::Record(id) => record_target(resolution, *id)?,
            other => PointerTarget::Inflater(Box::new(resolution.resolve(other, owner)?)),
        },
    };
    Ok(Some(Inflater::Pointer {
        target,
        endianness: resolution.registry().config().endianness,
    }))
}

fn record_target(resolution: &Resolution<'_>, id: RecordId) -> Result<PointerTarget> {
    let name = resolution.registry().record(id)?.name().to_string();
    Ok(PointerTarget::Record { id, name })
}

pub(crate) fn array(
    resolution: &mut Resolution<'_>,
    field: &FieldDesc,
    owner: Option<RecordId>,
) -> Result<Option<Inflater>> {
    let FieldDesc::Array(field) = field else {
        return Ok(None);
    };
    let element = resolution.resolve(field.element(), owner)?;
    let Some(size) = element.size() else {
        return Err(Error::InvalidFieldConfig(format!(
            "array element {} has no fixed size",
            element.name()
        )));
    };
    if size.checked_mul(field.count()).is_none() {
        return Err(Error::InvalidFieldConfig(format!(
            "[{}; {}] overflows the address space",
            element.name(),
            field.count()
        )));
    }
    Ok(Some(Inflater::Array {
        element: Box::new(element),
        count: field.count(),
    }))
}

pub(crate) fn enumeration(
    resolution: &mut Resolution<'_>,
    field: &FieldDesc,
    _owner: Option<RecordId>,
) -> Result<Option<Inflater>> {
    match field {
        FieldDesc::Enum(field) => Ok(Some(Inflater::Enum {
            field: field.clone(),
            endianness: resolution.registry().config().endianness,
        })),
        _ => Ok(None),
    }
}

/// Offsets only mean something to the layout engine; anywhere else the
/// override is transparent.
pub(crate) fn offset(
    resolution: &mut Resolution<'_>,
    field: &FieldDesc,
    owner: Option<RecordId>,
) -> Result<Option<Inflater>> {
    match field {
        FieldDesc::Offset(field) => resolution.resolve(field.inner(), owner).map(Some),
        _ => Ok(None),
    }
}
