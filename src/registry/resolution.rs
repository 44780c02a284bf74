// Thu Oct 15 2026 - Alex

use crate::error::{Error, Result};
use crate::registry::{Inflater, TypeRegistry};
use crate::structure::RecordId;
use crate::types::{FieldDesc, Nominal, TypeDesc};

/// One resolution pass. Tracks the records currently being laid out so a
/// record that contains itself by value is reported instead of recursing.
pub struct Resolution<'a> {
    registry: &'a TypeRegistry,
    laying_out: Vec<RecordId>,
}

impl<'a> Resolution<'a> {
    pub(crate) fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            laying_out: Vec::new(),
        }
    }

    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    pub fn resolve(&mut self, desc: &TypeDesc, owner: Option<RecordId>) -> Result<Inflater> {
        match desc {
            TypeDesc::Resolved(inflater) => Ok(inflater.clone()),
            TypeDesc::Field(field) => self.resolve_field(field, owner),
            TypeDesc::Primitive(ty) => self.resolve_nominal(Nominal::Primitive(*ty), desc),
            TypeDesc::CString => self.resolve_nominal(Nominal::CString, desc),
            TypeDesc::Record(id) => self.resolve_nominal(Nominal::Record(*id), desc),
        }
    }

    /// Runs `f` with `id` marked as being laid out.
    pub fn enter<T>(&mut self, id: RecordId, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.laying_out.push(id);
        let result = f(self);
        self.laying_out.pop();
        result
    }

    fn resolve_nominal(&mut self, nominal: Nominal, desc: &TypeDesc) -> Result<Inflater> {
        if let Some(inflater) = self.registry.memoized(&nominal) {
            return Ok(inflater);
        }
        if let Nominal::Record(id) = nominal {
            if self.laying_out.contains(&id) {
                return Err(Error::InvalidFieldConfig(format!(
                    "{} contains itself by value",
                    self.registry.describe(desc)
                )));
            }
        }

        for key in self.registry.handler_chain(nominal)? {
            for handler in self.registry.type_handlers(key) {
                if let Some(inflater) = handler(self, desc)? {
                    log::debug!("resolved {} through {:?}", self.registry.describe(desc), key);
                    return Ok(self.registry.memoize(nominal, inflater));
                }
            }
        }
        Err(Error::NoInflaterFound(self.registry.describe(desc)))
    }

    fn resolve_field(&mut self, field: &FieldDesc, owner: Option<RecordId>) -> Result<Inflater> {
        for handler in self.registry.instance_handlers(field.kind()) {
            if let Some(inflater) = handler(self, field, owner)? {
                return Ok(inflater);
            }
        }
        Err(Error::NoInflaterFound(format!("{:?} field", field.kind())))
    }
}
