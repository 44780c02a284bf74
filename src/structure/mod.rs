// Wed Oct 14 2026 - Alex

pub mod builder;
pub mod layout;
pub mod record;

pub use builder::{RecordBuilder, RecordDecl};
pub use layout::{MemberLayout, RecordLayout};
pub use record::{MemberDecl, RecordId, RecordShape, RecordType};

pub(crate) use layout::compute_layout;
