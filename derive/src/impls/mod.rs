//! Per-kind code generation.

mod enum_kind;
mod struct_kind;

pub(crate) use enum_kind::impl_enum;
pub(crate) use struct_kind::impl_struct;
