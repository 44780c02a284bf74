// Mon Oct 12 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryReader, MemoryWriter};
use parking_lot::RwLock;

/// A flat, fixed-length byte buffer mapped at `base`.
pub struct BufferMemory {
    data: RwLock<Vec<u8>>,
    base: Address,
}

impl BufferMemory {
    pub fn new(data: Vec<u8>) -> Self {
        Self::with_base(data, Address::zero())
    }

    pub fn with_base(data: Vec<u8>, base: Address) -> Self {
        Self {
            data: RwLock::new(data),
            base,
        }
    }

    pub fn zeroed(len: usize) -> Self {
        Self::new(vec![0; len])
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    pub fn snapshot(&self) -> Vec<u8> {
        self.data.read().clone()
    }

    fn range(&self, addr: Address, len: usize, total: usize) -> Result<(usize, usize), MemoryError> {
        let start = addr
            .as_u64()
            .checked_sub(self.base.as_u64())
            .ok_or_else(|| MemoryError::out_of_bounds(addr.as_u64(), len))? as usize;
        let end = start
            .checked_add(len)
            .filter(|end| *end <= total)
            .ok_or_else(|| MemoryError::out_of_bounds(addr.as_u64(), len))?;
        Ok((start, end))
    }
}

impl MemoryReader for BufferMemory {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        let data = self.data.read();
        let (start, end) = self.range(addr, len, data.len())?;
        Ok(data[start..end].to_vec())
    }

    fn name(&self) -> &str {
        "buffer"
    }
}

impl MemoryWriter for BufferMemory {
    fn write_bytes(&self, addr: Address, bytes: &[u8]) -> Result<(), MemoryError> {
        let mut data = self.data.write();
        let total = data.len();
        let (start, end) = self.range(addr, bytes.len(), total)?;
        data[start..end].copy_from_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write() {
        let mem = BufferMemory::zeroed(16);
        mem.write_bytes(Address::new(4), &[1, 2, 3]).unwrap();
        assert_eq!(mem.read_bytes(Address::new(3), 5).unwrap(), vec![0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_out_of_bounds() {
        let mem = BufferMemory::with_base(vec![0; 8], Address::new(0x100));
        assert!(mem.read_bytes(Address::new(0x100), 8).is_ok());
        assert!(matches!(
            mem.read_bytes(Address::new(0x104), 8),
            Err(MemoryError::OutOfBounds { address: 0x104, len: 8 })
        ));
        assert!(mem.read_bytes(Address::new(0xff), 1).unwrap_err().is_out_of_bounds());
        assert!(mem.write_bytes(Address::new(0x108), &[1]).unwrap_err().is_out_of_bounds());
    }
}
