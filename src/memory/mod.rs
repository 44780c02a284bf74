// Mon Oct 12 2026 - Alex

pub mod address;
pub mod buffer;
pub mod error;
pub mod mapped;
pub mod paged;
pub mod process;
pub mod resolver;
pub mod traits;

pub use address::Address;
pub use buffer::BufferMemory;
pub use error::MemoryError;
pub use mapped::MappedMemory;
pub use paged::PagedMemory;
pub use process::ProcessMemory;
pub use resolver::{Resolver, ResolverKind};
pub use traits::{BackingStore, MemoryReader, MemoryWriter};
