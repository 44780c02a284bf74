// Mon Oct 12 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryReader, MemoryWriter};
use memmap2::{MmapMut, MmapOptions};
use parking_lot::RwLock;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A file mapped copy-on-write at a chosen base address. Writes only land in
/// the private mapping, never in the file.
pub struct MappedMemory {
    mmap: RwLock<MmapMut>,
    base: Address,
    path: PathBuf,
}

impl MappedMemory {
    pub fn open<P: AsRef<Path>>(path: P, base: Address) -> Result<Self, MemoryError> {
        let file = File::open(path.as_ref())?;
        // SAFETY: private mapping; the file must not be truncated while mapped.
        let mmap = unsafe { MmapOptions::new().map_copy(&file) }?;
        log::debug!("mapped {} ({} bytes) at {}", path.as_ref().display(), mmap.len(), base);
        Ok(Self {
            mmap: RwLock::new(mmap),
            base,
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn len(&self) -> usize {
        self.mmap.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn offset(&self, addr: Address, len: usize, total: usize) -> Result<usize, MemoryError> {
        let offset = addr
            .as_u64()
            .checked_sub(self.base.as_u64())
            .ok_or_else(|| MemoryError::out_of_bounds(addr.as_u64(), len))? as usize;
        match offset.checked_add(len) {
            Some(end) if end <= total => Ok(offset),
            _ => Err(MemoryError::out_of_bounds(addr.as_u64(), len)),
        }
    }
}

impl MemoryReader for MappedMemory {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        let mmap = self.mmap.read();
        let offset = self.offset(addr, len, mmap.len())?;
        Ok(mmap[offset..offset + len].to_vec())
    }

    fn name(&self) -> &str {
        "mapped"
    }
}

impl MemoryWriter for MappedMemory {
    fn write_bytes(&self, addr: Address, data: &[u8]) -> Result<(), MemoryError> {
        let mut mmap = self.mmap.write();
        let total = mmap.len();
        let offset = self.offset(addr, data.len(), total)?;
        mmap[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_map_file_copy_on_write() {
        let path = std::env::temp_dir().join(format!("memstruct-mapped-{}.bin", std::process::id()));
        {
            let mut file = File::create(&path).unwrap();
            file.write_all(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        }

        let mem = MappedMemory::open(&path, Address::new(0x1000)).unwrap();
        assert_eq!(mem.len(), 8);
        assert_eq!(mem.read_bytes(Address::new(0x1002), 2).unwrap(), vec![3, 4]);

        mem.write_bytes(Address::new(0x1000), &[9]).unwrap();
        assert_eq!(mem.read_bytes(Address::new(0x1000), 1).unwrap(), vec![9]);
        assert_eq!(std::fs::read(&path).unwrap()[0], 1);

        assert!(mem.read_bytes(Address::new(0x1006), 4).unwrap_err().is_out_of_bounds());
        std::fs::remove_file(&path).ok();
    }
}
