// Mon Oct 12 2026 - Alex

use crate::memory::{Address, MemoryError};

/// Byte-level read access to an address space.
///
/// Implementations must report accesses outside the addressable range as
/// [`MemoryError::OutOfBounds`]; the resolver relies on that variant to tell
/// dangling pointers apart from transport failures.
pub trait MemoryReader: Send + Sync {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError>;

    fn name(&self) -> &str;
}

/// Byte-level write access. Takes `&self`: stores are shared between many
/// resolvers and synchronise internally.
pub trait MemoryWriter: Send + Sync {
    fn write_bytes(&self, addr: Address, data: &[u8]) -> Result<(), MemoryError>;
}

pub trait BackingStore: MemoryReader + MemoryWriter {}

impl<T: MemoryReader + MemoryWriter> BackingStore for T {}
