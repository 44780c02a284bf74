// Thu Oct 15 2026 - Alex

use crate::error::Error;
use crate::registry::TypeRegistry;
use crate::schema::{CompositeSpec, RecordSpec, SchemaDocument, TypeSpec};
use crate::structure::{MemberDecl, RecordId, RecordShape};
use crate::types::{
    array_of, offset, opaque_ptr, ptr_to, ptr_to_self, EnumMapping, FieldDesc, IntEnumField,
    PrimitiveType, TypeDesc,
};
use ahash::AHashMap;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    #[error("Failed to read schema: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse schema: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown type {0}")]
    UnknownType(String),
    #[error("Record {0} is defined more than once")]
    DuplicateRecord(String),
    #[error(transparent)]
    Engine(#[from] Error),
}

pub fn load_file<P: AsRef<Path>>(
    registry: &TypeRegistry,
    path: P,
) -> Result<Vec<RecordId>, SchemaError> {
    let text = std::fs::read_to_string(path)?;
    load_str(registry, &text)
}

pub fn load_str(registry: &TypeRegistry, text: &str) -> Result<Vec<RecordId>, SchemaError> {
    let document: SchemaDocument = serde_json::from_str(text)?;
    declare(registry, &document)
}

/// Declares every record in `document`. All names are reserved before any
/// record is defined, so records may refer to each other in any order.
pub fn declare(
    registry: &TypeRegistry,
    document: &SchemaDocument,
) -> Result<Vec<RecordId>, SchemaError> {
    let mut local: AHashMap<&str, RecordId> = AHashMap::new();
    for record in &document.records {
        if local.contains_key(record.name.as_str()) || registry.record_by_name(&record.name).is_some() {
            return Err(SchemaError::DuplicateRecord(record.name.clone()));
        }
        local.insert(&record.name, registry.reserve_record(&record.name)?);
    }

    let mut ids = Vec::with_capacity(document.records.len());
    for record in &document.records {
        let id = local[record.name.as_str()];
        let shape = shape_of(registry, record, id)?;
        registry.define_record(id, shape)?;
        ids.push(id);
    }
    log::debug!("declared {} records from schema", ids.len());
    Ok(ids)
}

fn shape_of(registry: &TypeRegistry, record: &RecordSpec, id: RecordId) -> Result<RecordShape, SchemaError> {
    let base = match &record.base {
        Some(name) => Some(lookup_record(registry, name)?),
        None => None,
    };
    let mut members = Vec::with_capacity(record.members.len());
    for member in &record.members {
        let mut ty = type_of(registry, &member.ty, id)?;
        if let Some(at) = member.offset {
            ty = offset(at, ty);
        }
        members.push(MemberDecl::new(member.name.clone(), ty));
    }
    Ok(RecordShape::new(base, members))
}

fn lookup_record(registry: &TypeRegistry, name: &str) -> Result<RecordId, SchemaError> {
    registry
        .record_by_name(name)
        .ok_or_else(|| SchemaError::UnknownType(name.to_string()))
}

fn type_of(registry: &TypeRegistry, spec: &TypeSpec, owner: RecordId) -> Result<TypeDesc, SchemaError> {
    match spec {
        TypeSpec::Named(name) => named(registry, name.trim()),
        TypeSpec::Composite(CompositeSpec::Pointer(None)) => Ok(ptr_to_self()),
        TypeSpec::Composite(CompositeSpec::Pointer(Some(target))) => {
            Ok(ptr_to(type_of(registry, target, owner)?))
        }
        TypeSpec::Composite(CompositeSpec::Array { element, count }) => {
            Ok(array_of(type_of(registry, element, owner)?, *count))
        }
        TypeSpec::Composite(CompositeSpec::Enum {
            width,
            lenient,
            variants,
        }) => {
            let mapping = EnumMapping::from_pairs(variants.iter().map(|(tag, value)| (tag.clone(), *value)));
            let field = IntEnumField::new(mapping, *width)?
                .with_lenient(lenient.unwrap_or(registry.config().lenient_enums));
            Ok(TypeDesc::Field(FieldDesc::Enum(field)))
        }
    }
}

fn named(registry: &TypeRegistry, name: &str) -> Result<TypeDesc, SchemaError> {
    if let Some(target) = name.strip_suffix('*') {
        let target = target.trim_end();
        match target {
            "void" => return Ok(opaque_ptr()),
            "char" | "const char" => return Ok(ptr_to(TypeDesc::CString)),
            _ => {}
        }
        return Ok(ptr_to(named(registry, target)?));
    }
    if name == "cstring" {
        return Ok(TypeDesc::CString);
    }
    if let Some(ty) = PrimitiveType::from_c_name(name) {
        return Ok(TypeDesc::Primitive(ty));
    }
    Ok(TypeDesc::Record(lookup_record(registry, name)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Address, BufferMemory};
    use crate::registry::ViewFactory;
    use crate::types::Value;
    use crate::view::Obj;
    use std::sync::Arc;

    const LIST: &str = r#"{
        "records": [
            { "name": "list", "members": [
                { "name": "head", "type": "item*" },
                { "name": "count", "type": "unsigned int" }
            ] },
            { "name": "item", "members": [
                { "name": "value", "type": "int" },
                { "name": "next", "type": { "pointer": null } },
                { "name": "label", "type": "char*", "offset": 16 },
                { "name": "state", "type": { "enum": { "width": 1, "variants": { "FREE": 0, "USED": 1 } } } },
                { "name": "pad", "type": { "array": { "element": "u8", "count": 3 } } }
            ] }
        ]
    }"#;

    #[test]
    fn test_forward_references() {
        let registry = TypeRegistry::new();
        let ids = load_str(&registry, LIST).unwrap();
        assert_eq!(ids.len(), 2);
        let item = registry.record_by_name("item").unwrap();
        let layout = registry.record_layout(item).unwrap();
        assert_eq!(layout.member("next").unwrap().offset, 4);
        assert_eq!(layout.member("label").unwrap().offset, 16);
        assert_eq!(layout.member("state").unwrap().offset, 24);
        assert_eq!(layout.size(), 28);
        assert_eq!(registry.size_of(&TypeDesc::Record(ids[0])).unwrap(), 12);
    }

    #[test]
    fn test_loaded_record_reads() {
        let registry = TypeRegistry::new();
        load_str(&registry, LIST).unwrap();
        let item = registry.record_by_name("item").unwrap();

        let mut blob = vec![0u8; 40];
        blob[0..4].copy_from_slice(&(-5i32).to_le_bytes());
        blob[16..24].copy_from_slice(&32u64.to_le_bytes());
        blob[24] = 1;
        blob[32..35].copy_from_slice(b"hi\0");

        let factory = ViewFactory::with_registry(Arc::new(BufferMemory::new(blob)), Arc::clone(&registry));
        let view = factory.inflate(&TypeDesc::Record(item), Address::zero()).unwrap();
        assert_eq!(view.member("value").unwrap().get().unwrap(), Value::Int(-5));
        assert_eq!(view.member("state").unwrap().get().unwrap().tag(), Some("USED"));
        let label = view
            .member("label")
            .unwrap()
            .as_pointer()
            .unwrap()
            .unwrap(None)
            .unwrap()
            .into_view()
            .unwrap();
        assert_eq!(label.get().unwrap(), Value::Bytes(b"hi".to_vec()));
    }

    #[test]
    fn test_base_record() {
        let registry = TypeRegistry::new();
        let text = r#"{ "records": [
            { "name": "shape", "members": [ { "name": "kind", "type": "u16" } ] },
            { "name": "circle", "base": "shape", "members": [ { "name": "radius", "type": "double" } ] }
        ] }"#;
        load_str(&registry, text).unwrap();
        let circle = registry.record_by_name("circle").unwrap();
        let layout = registry.record_layout(circle).unwrap();
        assert_eq!(layout.member("radius").unwrap().offset, 2);
        assert_eq!(layout.member("kind").unwrap().declared_in, "shape");
    }

    #[test]
    fn test_unknown_type() {
        let registry = TypeRegistry::new();
        let text = r#"{ "records": [ { "name": "a", "members": [ { "name": "x", "type": "widget" } ] } ] }"#;
        assert!(matches!(load_str(&registry, text), Err(SchemaError::UnknownType(name)) if name == "widget"));
    }

    #[test]
    fn test_duplicate_record() {
        let registry = TypeRegistry::new();
        let text = r#"{ "records": [ { "name": "a" }, { "name": "a" } ] }"#;
        assert!(matches!(load_str(&registry, text), Err(SchemaError::DuplicateRecord(_))));
    }

    #[test]
    fn test_bad_enum_width() {
        let registry = TypeRegistry::new();
        let text = r#"{ "records": [ { "name": "a", "members": [
            { "name": "e", "type": { "enum": { "width": 3, "variants": {} } } }
        ] } ] }"#;
        assert!(matches!(
            load_str(&registry, text),
            Err(SchemaError::Engine(Error::InvalidFieldConfig(_)))
        ));
    }

    #[test]
    fn test_strict_enums_from_config() {
        let registry = TypeRegistry::with_config(crate::config::Config::new().with_lenient_enums(false));
        let text = r#"{ "records": [ { "name": "a", "members": [
            { "name": "e", "type": { "enum": { "variants": { "ON": 1 } } } }
        ] } ] }"#;
        let id = load_str(&registry, text).unwrap()[0];
        let err = registry.from_bytes(&TypeDesc::Record(id), &[0; 4]).unwrap_err();
        assert!(matches!(err, Error::InvalidEnumValue(0)));
    }
}
