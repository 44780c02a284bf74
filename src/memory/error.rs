// Mon Oct 12 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Out of bounds: {len} bytes at 0x{address:x}")]
    OutOfBounds { address: u64, len: usize },
    #[error("Write failed at address 0x{0:x}")]
    WriteFailed(u64),
    #[error("Process not found: {0}")]
    ProcessNotFound(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl MemoryError {
    pub fn out_of_bounds(address: u64, len: usize) -> Self {
        Self::OutOfBounds { address, len }
    }

    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}
