// Wed Oct 14 2026 - Alex

use crate::error::{Error, Result};
use crate::memory::Resolver;
use crate::types::Value;
use crate::view::{Obj, Snapshot};

/// A null-terminated byte string. The terminator is never part of the value.
#[derive(Debug, Clone)]
pub struct StringView {
    resolver: Resolver,
    snapshot: Option<Snapshot>,
}

impl StringView {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver,
            snapshot: None,
        }
    }

    /// Scans byte by byte for the terminator. Running off the store is
    /// reported as an unterminated string.
    fn scan(&self) -> Result<usize> {
        let mut len = 0u64;
        loop {
            match self.resolver.relative_from_own(len).resolve(1) {
                Ok(byte) if byte[0] == 0 => return Ok(len as usize),
                Ok(_) => len += 1,
                Err(err) if err.is_out_of_bounds() => {
                    return Err(Error::UnterminatedString(self.address().as_u64()))
                }
                Err(err) => return Err(err),
            }
        }
    }

    pub fn len(&self) -> Result<usize> {
        match &self.snapshot {
            Some(snapshot) => Ok(snapshot.bytes.len()),
            None => self.scan(),
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn index_error(&self, index: usize) -> Error {
        Error::OutOfBounds {
            address: self.address().offset(index as u64).as_u64(),
            len: 1,
        }
    }

    pub fn char_at(&self, index: usize) -> Result<u8> {
        if let Some(snapshot) = &self.snapshot {
            return snapshot
                .bytes
                .get(index)
                .copied()
                .ok_or_else(|| self.index_error(index));
        }
        if index >= self.scan()? {
            return Err(self.index_error(index));
        }
        Ok(self.resolver.relative_from_own(index as u64).resolve(1)?[0])
    }

    pub fn set_char_at(&self, index: usize, byte: u8) -> Result<()> {
        if self.is_frozen() {
            return Err(Error::FrozenWrite);
        }
        if index >= self.scan()? {
            return Err(self.index_error(index));
        }
        self.resolver.relative_from_own(index as u64).modify(1, &[byte])
    }

    pub fn chars(&self) -> Result<Vec<u8>> {
        self.to_bytes()
    }
}

impl Obj for StringView {
    fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    fn size(&self) -> Result<usize> {
        self.scan()
    }

    fn type_name(&self) -> String {
        "cstring".to_string()
    }

    fn read_value(&self) -> Result<Value> {
        let len = self.scan()?;
        Ok(Value::Bytes(self.resolver.resolve(len)?))
    }

    /// Writes the raw bytes only; no terminator is appended.
    fn write_value(&self, value: &Value) -> Result<()> {
        let bytes = value
            .as_bytes()
            .ok_or_else(|| Error::TypeMismatch(format!("cstring cannot hold {}", value)))?;
        self.resolver.modify(bytes.len(), bytes)
    }

    fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    fn snapshot_mut(&mut self) -> &mut Option<Snapshot> {
        &mut self.snapshot
    }

    fn to_str(&self, _indent: usize) -> Result<String> {
        let value = self.get()?;
        let bytes = value.as_bytes().unwrap_or_default();
        Ok(format!("{:?}", String::from_utf8_lossy(bytes)))
    }
}
