//! Derive macro for `jsonbind`.
//!
//! `#[derive(Reflect)]` wires a type into the codec: it generates the
//! [`Typed`] shape descriptor (cached in a static cell), the `Reflect`
//! access impl and the kind-specific ops impl.
//!
//! Supported shapes:
//! - structs with named fields (including generics),
//! - fieldless enums with optional explicit discriminants.
//!
//! Members annotated `#[json(ignore)]` are left out of the shape entirely:
//! never written, and input members of that name fall into the
//! skip-but-parse path. `#[serde(skip)]` and `#[serde(skip_serializing)]`
//! are honored the same way, by attribute name, so types shared with a
//! serde stack behave consistently.
//!
//! [`Typed`]: ../jsonbind/info/trait.Typed.html

mod derive_data;
mod impls;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

use derive_data::ReflectDerive;

#[proc_macro_derive(Reflect, attributes(json))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match ReflectDerive::from_input(&input) {
        Ok(ReflectDerive::Struct(data)) => impls::impl_struct(&data).into(),
        Ok(ReflectDerive::Enum(data)) => impls::impl_enum(&data).into(),
        Err(error) => error.into_compile_error().into(),
    }
}
