// Thu Oct 15 2026 - Alex

pub mod document;
pub mod loader;

pub use document::{CompositeSpec, MemberSpec, RecordSpec, SchemaDocument, TypeSpec};
pub use loader::{declare, load_file, load_str, SchemaError};
