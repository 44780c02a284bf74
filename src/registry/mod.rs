// Thu Oct 15 2026 - Alex

pub mod builder;
pub mod factory;
pub mod handlers;
pub mod inflater;
pub mod resolution;
pub mod type_registry;

pub use builder::RegistryBuilder;
pub use factory::ViewFactory;
pub use handlers::{HandlerKey, InstanceHandler, TypeHandler};
pub use inflater::{Inflater, PointerTarget};
pub use resolution::Resolution;
pub use type_registry::TypeRegistry;
