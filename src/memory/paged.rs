// Mon Oct 12 2026 - Alex

use crate::memory::address::PAGE_SIZE;
use crate::memory::{Address, MemoryError, MemoryReader, MemoryWriter};
use ahash::AHashMap;
use parking_lot::RwLock;

const PAGE: usize = PAGE_SIZE as usize;

/// Simulated address space made of 4K pages keyed by page-aligned address.
///
/// Unmapped pages read as zeroes and are allocated on first write, so no
/// access to a `PagedMemory` can ever be out of bounds.
pub struct PagedMemory {
    pages: RwLock<AHashMap<u64, Box<[u8; PAGE]>>>,
}

impl PagedMemory {
    pub fn new() -> Self {
        Self {
            pages: RwLock::new(AHashMap::new()),
        }
    }

    pub fn from_bytes(base: Address, blob: &[u8]) -> Self {
        let memory = Self::new();
        memory.write(base, blob);
        memory
    }

    pub fn page_count(&self) -> usize {
        self.pages.read().len()
    }

    pub fn read(&self, addr: Address, len: usize) -> Vec<u8> {
        let pages = self.pages.read();
        let mut result = Vec::with_capacity(len);
        let mut page_address = addr.page().as_u64();
        let mut page_offset = addr.page_offset();
        let mut remaining = len;

        while remaining > 0 {
            let chunk = remaining.min(PAGE - page_offset);
            match pages.get(&page_address) {
                Some(page) => result.extend_from_slice(&page[page_offset..page_offset + chunk]),
                None => result.resize(result.len() + chunk, 0),
            }
            remaining -= chunk;
            page_address = page_address.wrapping_add(PAGE_SIZE);
            page_offset = 0;
        }

        result
    }

    pub fn write(&self, addr: Address, data: &[u8]) {
        let mut pages = self.pages.write();
        let mut page_address = addr.page().as_u64();
        let mut page_offset = addr.page_offset();
        let mut rest = data;

        while !rest.is_empty() {
            let chunk = rest.len().min(PAGE - page_offset);
            let page = pages
                .entry(page_address)
                .or_insert_with(|| Box::new([0u8; PAGE]));
            page[page_offset..page_offset + chunk].copy_from_slice(&rest[..chunk]);
            rest = &rest[chunk..];
            page_address = page_address.wrapping_add(PAGE_SIZE);
            page_offset = 0;
        }
    }
}

impl Default for PagedMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryReader for PagedMemory {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        Ok(self.read(addr, len))
    }

    fn name(&self) -> &str {
        "paged"
    }
}

impl MemoryWriter for PagedMemory {
    fn write_bytes(&self, addr: Address, data: &[u8]) -> Result<(), MemoryError> {
        self.write(addr, data);
        Ok(())
    }
}
