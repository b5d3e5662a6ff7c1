//! Code generation for fieldless enums.

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectEnum;

/// Implements `Typed`, `Reflect` and `Enum` for the deriving type.
pub(crate) fn impl_enum(data: &ReflectEnum) -> TokenStream {
    let ident = &data.ident;

    let variant_idents: Vec<_> = data.variants.iter().map(|variant| &variant.ident).collect();
    let variant_names: Vec<_> = data
        .variants
        .iter()
        .map(|variant| variant.name.as_str())
        .collect();
    let discriminants: Vec<_> = data
        .variants
        .iter()
        .map(|variant| variant.discriminant)
        .collect();

    quote! {
        const _: () = {
            impl jsonbind::info::Typed for #ident {
                fn type_info() -> &'static jsonbind::info::TypeInfo {
                    static CELL: jsonbind::cell::NonGenericTypeInfoCell =
                        jsonbind::cell::NonGenericTypeInfoCell::new();
                    CELL.get_or_init(|| jsonbind::info::TypeInfo::Enum(
                        jsonbind::info::EnumInfo::new::<#ident>(&[
                            #(jsonbind::info::VariantInfo::new(#variant_names, #discriminants),)*
                        ]),
                    ))
                }
            }

            impl jsonbind::Reflect for #ident {
                fn reflect_type_info(&self) -> &'static jsonbind::info::TypeInfo {
                    <Self as jsonbind::info::Typed>::type_info()
                }

                fn set(
                    &mut self,
                    value: ::std::boxed::Box<dyn jsonbind::Reflect>,
                ) -> ::std::result::Result<(), ::std::boxed::Box<dyn jsonbind::Reflect>> {
                    *self = value.take::<Self>()?;
                    ::std::result::Result::Ok(())
                }

                #[inline]
                fn reflect_kind(&self) -> jsonbind::ReflectKind {
                    jsonbind::ReflectKind::Enum
                }

                #[inline]
                fn reflect_ref(&self) -> jsonbind::ReflectRef<'_> {
                    jsonbind::ReflectRef::Enum(self)
                }

                #[inline]
                fn reflect_mut(&mut self) -> jsonbind::ReflectMut<'_> {
                    jsonbind::ReflectMut::Enum(self)
                }
            }

            impl jsonbind::ops::Enum for #ident {
                fn discriminant(&self) -> i64 {
                    match self {
                        #(Self::#variant_idents => #discriminants,)*
                    }
                }

                fn set_by_discriminant(&mut self, discriminant: i64) -> bool {
                    match discriminant {
                        #(#discriminants => {
                            *self = Self::#variant_idents;
                            true
                        })*
                        _ => false,
                    }
                }
            }
        };
    }
}
