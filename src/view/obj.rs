// Wed Oct 14 2026 - Alex

use crate::error::{Error, Result};
use crate::memory::{Address, Resolver};
use crate::types::Value;

/// What a view captured when it was frozen: the decoded value and the exact
/// bytes it serialised to.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub value: Value,
    pub bytes: Vec<u8>,
}

/// The contract every inflated view implements.
///
/// Views are lazy: `get` re-reads the backing store on every call unless the
/// view is frozen, in which case it returns the snapshot and refuses writes.
pub trait Obj {
    fn resolver(&self) -> &Resolver;

    fn size(&self) -> Result<usize>;

    fn type_name(&self) -> String;

    /// Decodes the current bytes, ignoring any snapshot.
    fn read_value(&self) -> Result<Value>;

    fn write_value(&self, value: &Value) -> Result<()>;

    fn snapshot(&self) -> Option<&Snapshot>;

    fn snapshot_mut(&mut self) -> &mut Option<Snapshot>;

    fn address(&self) -> Address {
        self.resolver().resolve_address()
    }

    fn is_frozen(&self) -> bool {
        self.snapshot().is_some()
    }

    fn get(&self) -> Result<Value> {
        match self.snapshot() {
            Some(snapshot) => Ok(snapshot.value.clone()),
            None => self.read_value(),
        }
    }

    fn set(&self, value: &Value) -> Result<()> {
        if self.is_frozen() {
            return Err(Error::FrozenWrite);
        }
        self.write_value(value)
    }

    /// Serialises the live bytes, ignoring any snapshot.
    fn read_raw(&self) -> Result<Vec<u8>> {
        let size = self.size()?;
        self.resolver().resolve(size)
    }

    fn to_bytes(&self) -> Result<Vec<u8>> {
        match self.snapshot() {
            Some(snapshot) => Ok(snapshot.bytes.clone()),
            None => self.read_raw(),
        }
    }

    fn freeze(&mut self) -> Result<()> {
        let value = self.read_value()?;
        let bytes = self.read_raw()?;
        *self.snapshot_mut() = Some(Snapshot { value, bytes });
        Ok(())
    }

    /// Re-snapshots from the live value.
    fn update(&mut self) -> Result<()> {
        self.freeze()
    }

    /// Freezes the view with a snapshot taken elsewhere (e.g. by a frozen
    /// container).
    fn restore(&mut self, snapshot: Snapshot) {
        *self.snapshot_mut() = Some(snapshot);
    }

    /// `(frozen, live)`.
    fn diff(&self) -> Result<(Value, Value)> {
        let snapshot = self
            .snapshot()
            .ok_or_else(|| Error::UnsupportedOperation("diff needs a frozen view".to_string()))?;
        Ok((snapshot.value.clone(), self.read_value()?))
    }

    /// Writes the snapshot back over the live bytes.
    fn reset(&self) -> Result<()> {
        let snapshot = self
            .snapshot()
            .ok_or_else(|| Error::UnsupportedOperation("reset needs a frozen view".to_string()))?;
        self.resolver().modify(snapshot.bytes.len(), &snapshot.bytes)
    }

    fn to_str(&self, _indent: usize) -> Result<String> {
        Ok(self.get()?.to_string())
    }

    /// Structural equality: compares decoded values, never addresses.
    fn equals(&self, other: &dyn Obj) -> Result<bool> {
        Ok(self.get()? == other.get()?)
    }
}
