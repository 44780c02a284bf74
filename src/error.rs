// Mon Oct 12 2026 - Alex

use crate::memory::MemoryError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Out of bounds: {len} bytes at 0x{address:x}")]
    OutOfBounds { address: u64, len: usize },
    #[error("String at 0x{0:x} is not null-terminated")]
    UnterminatedString(u64),
    #[error("Cannot write through a frozen view")]
    FrozenWrite,
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
    #[error("Invalid field configuration: {0}")]
    InvalidFieldConfig(String),
    #[error("Offset override 0x{requested:x} moves back from current offset 0x{current:x} in {record}")]
    InvalidOffsetOverride {
        record: String,
        requested: u64,
        current: u64,
    },
    #[error("No inflater found for {0}")]
    NoInflaterFound(String),
    #[error("Size mismatch: {record} is {expected} bytes, got {actual}")]
    SizeMismatch {
        record: String,
        expected: usize,
        actual: usize,
    },
    #[error("Value {0} has no matching enum tag")]
    InvalidEnumValue(i64),
    #[error("Record has no member named {0}")]
    UnknownMember(String),
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),
    #[error("Transport error: {0}")]
    Transport(MemoryError),
}

impl From<MemoryError> for Error {
    fn from(err: MemoryError) -> Self {
        match err {
            MemoryError::OutOfBounds { address, len } => Self::OutOfBounds { address, len },
            other => Self::Transport(other),
        }
    }
}

impl Error {
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}
