// Mon Oct 12 2026 - Alex

pub mod config;
pub mod error;
pub mod memory;
pub mod registry;
pub mod schema;
pub mod structure;
pub mod types;
pub mod ui;
pub mod utils;
pub mod view;

pub use config::Config;
pub use error::{Error, Result};
pub use memory::{Address, Resolver};
pub use registry::{Inflater, RegistryBuilder, TypeRegistry, ViewFactory};
pub use structure::{RecordBuilder, RecordId, RecordLayout};
pub use types::{PrimitiveType, TypeDesc, Value};
pub use view::{Obj, View};
