// Tue Oct 13 2026 - Alex

use crate::error::Result;
use crate::memory::{Address, BackingStore, PagedMemory};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverKind {
    Live,
    Simulated,
}

#[derive(Clone)]
enum Backing {
    Live(Arc<dyn BackingStore>),
    Simulated(Arc<PagedMemory>),
}

#[derive(Debug)]
enum Anchor {
    Absolute(Address),
    Relative { parent: Arc<Anchor>, offset: u64 },
}

impl Anchor {
    fn resolve(&self) -> Address {
        match self {
            Self::Absolute(address) => *address,
            Self::Relative { parent, offset } => parent.resolve().offset(*offset),
        }
    }

    fn depth(&self) -> usize {
        match self {
            Self::Absolute(_) => 0,
            Self::Relative { parent, .. } => parent.depth() + 1,
        }
    }
}

/// An address plus the store it lives in.
///
/// A resolver is either rooted at an absolute address or anchored at an
/// offset from a parent resolver. Anchors are immutable and only ever point
/// at resolvers created before them, so the parent chain is acyclic. Cloning
/// is cheap; the backing store is shared.
#[derive(Clone)]
pub struct Resolver {
    backing: Backing,
    anchor: Arc<Anchor>,
}

impl Resolver {
    pub fn live(store: Arc<dyn BackingStore>, address: Address) -> Self {
        Self {
            backing: Backing::Live(store),
            anchor: Arc::new(Anchor::Absolute(address)),
        }
    }

    pub fn simulated(memory: Arc<PagedMemory>, address: Address) -> Self {
        Self {
            backing: Backing::Simulated(memory),
            anchor: Arc::new(Anchor::Absolute(address)),
        }
    }

    /// A simulated resolver at address 0 over a fresh, empty address space.
    pub fn offline() -> Self {
        Self::simulated(Arc::new(PagedMemory::new()), Address::zero())
    }

    pub fn kind(&self) -> ResolverKind {
        match self.backing {
            Backing::Live(_) => ResolverKind::Live,
            Backing::Simulated(_) => ResolverKind::Simulated,
        }
    }

    pub fn relative_from_own(&self, offset: u64) -> Self {
        Self {
            backing: self.backing.clone(),
            anchor: Arc::new(Anchor::Relative {
                parent: Arc::clone(&self.anchor),
                offset,
            }),
        }
    }

    pub fn absolute_from_own(&self, address: Address) -> Self {
        Self {
            backing: self.backing.clone(),
            anchor: Arc::new(Anchor::Absolute(address)),
        }
    }

    pub fn resolve_address(&self) -> Address {
        self.anchor.resolve()
    }

    /// Offset from the parent resolver, or `None` for a root.
    pub fn parent_offset(&self) -> Option<u64> {
        match self.anchor.as_ref() {
            Anchor::Absolute(_) => None,
            Anchor::Relative { offset, .. } => Some(*offset),
        }
    }

    pub fn depth(&self) -> usize {
        self.anchor.depth()
    }

    pub fn resolve(&self, size: usize) -> Result<Vec<u8>> {
        let address = self.resolve_address();
        log::trace!("read {} bytes at {}", size, address);
        match &self.backing {
            Backing::Live(store) => Ok(store.read_bytes(address, size)?),
            Backing::Simulated(memory) => Ok(memory.read(address, size)),
        }
    }

    /// Writes exactly `size` bytes: `bytes` is truncated or zero-padded.
    pub fn modify(&self, size: usize, bytes: &[u8]) -> Result<()> {
        let address = self.resolve_address();
        log::trace!("write {} bytes at {}", size, address);
        let mut data = bytes[..bytes.len().min(size)].to_vec();
        data.resize(size, 0);
        match &self.backing {
            Backing::Live(store) => Ok(store.write_bytes(address, &data)?),
            Backing::Simulated(memory) => {
                memory.write(address, &data);
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("kind", &self.kind())
            .field("address", &self.resolve_address())
            .field("depth", &self.depth())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::memory::BufferMemory;

    #[test]
    fn test_relative_chain() {
        let root = Resolver::offline().absolute_from_own(Address::new(0x100));
        let child = root.relative_from_own(0x10);
        let grandchild = child.relative_from_own(4);
        assert_eq!(grandchild.resolve_address(), Address::new(0x114));
        assert_eq!(grandchild.depth(), 2);
        assert_eq!(grandchild.parent_offset(), Some(4));
        assert_eq!(root.parent_offset(), None);
    }

    #[test]
    fn test_absolute_from_own_shares_store() {
        let store = Arc::new(BufferMemory::zeroed(64));
        let root = Resolver::live(store.clone(), Address::new(8));
        let other = root.relative_from_own(4).absolute_from_own(Address::new(32));
        assert_eq!(other.resolve_address(), Address::new(32));
        assert_eq!(other.depth(), 0);

        other.modify(2, &[0xaa, 0xbb]).unwrap();
        assert_eq!(root.absolute_from_own(Address::new(32)).resolve(2).unwrap(), vec![0xaa, 0xbb]);
    }

    #[test]
    fn test_modify_pads_and_truncates() {
        let resolver = Resolver::offline();
        resolver.modify(4, &[1, 2]).unwrap();
        assert_eq!(resolver.resolve(4).unwrap(), vec![1, 2, 0, 0]);
        resolver.modify(2, &[7, 8, 9]).unwrap();
        assert_eq!(resolver.resolve(4).unwrap(), vec![7, 8, 0, 0]);
    }

    #[test]
    fn test_live_out_of_bounds() {
        let store = Arc::new(BufferMemory::zeroed(4));
        let resolver = Resolver::live(store, Address::new(2));
        assert_eq!(resolver.kind(), ResolverKind::Live);
        assert!(matches!(resolver.resolve(4), Err(Error::OutOfBounds { address: 2, len: 4 })));
    }

    #[test]
    fn test_simulated_never_out_of_bounds() {
        let resolver = Resolver::offline().absolute_from_own(Address::new(u64::MAX - 1));
        assert_eq!(resolver.resolve(1).unwrap(), vec![0]);
    }
}
