// Tue Oct 13 2026 - Alex

pub mod desc;
pub mod field;
pub mod primitive;
pub mod value;

pub use desc::{Nominal, TypeDesc, TypeKind};
pub use field::{
    array_of, enum_of, offset, opaque_ptr, ptr_to, ptr_to_self, EnumMapping, FieldDesc, FieldKind,
    IntEnumField, LinearArrayField, OffsetOverride, Pointee, PointerField,
};
pub use primitive::{Endianness, PrimitiveType, POINTER_SIZE};
pub use value::Value;
