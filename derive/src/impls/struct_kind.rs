//! Code generation for named-field structs.

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectStruct;

/// Implements `Typed`, `Reflect` and `Struct` for the deriving type.
pub(crate) fn impl_struct(data: &ReflectStruct) -> TokenStream {
    let ident = &data.ident;

    let field_idents: Vec<_> = data.fields.iter().map(|field| &field.ident).collect();
    let field_names: Vec<_> = data.fields.iter().map(|field| field.name.as_str()).collect();
    let field_types: Vec<_> = data.fields.iter().map(|field| &field.ty).collect();
    let field_indices: Vec<_> = (0..data.fields.len()).collect();

    // Every active member must itself be reflectable.
    let mut generics = data.generics.clone();
    {
        let where_clause = generics.make_where_clause();
        for ty in &field_types {
            where_clause.predicates.push(syn::parse_quote! {
                #ty: jsonbind::Reflect + jsonbind::info::Typed
            });
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let info_tokens = quote! {
        jsonbind::info::TypeInfo::Struct(jsonbind::info::StructInfo::new::<Self>(&[
            #(jsonbind::info::NamedField::new::<#field_types>(#field_names),)*
        ]))
    };

    // Generic instantiations share the static cell, so they go through the
    // keyed variant.
    let typed_body = if data.generics.params.is_empty() {
        quote! {
            static CELL: jsonbind::cell::NonGenericTypeInfoCell =
                jsonbind::cell::NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| #info_tokens)
        }
    } else {
        quote! {
            static CELL: jsonbind::cell::GenericTypeInfoCell =
                jsonbind::cell::GenericTypeInfoCell::new();
            CELL.get_or_insert::<Self>(|| #info_tokens)
        }
    };

    quote! {
        const _: () = {
            impl #impl_generics jsonbind::info::Typed for #ident #ty_generics #where_clause {
                fn type_info() -> &'static jsonbind::info::TypeInfo {
                    #typed_body
                }
            }

            impl #impl_generics jsonbind::Reflect for #ident #ty_generics #where_clause {
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
                    jsonbind::ReflectKind::Struct
                }

                #[inline]
                fn reflect_ref(&self) -> jsonbind::ReflectRef<'_> {
                    jsonbind::ReflectRef::Struct(self)
                }

                #[inline]
                fn reflect_mut(&mut self) -> jsonbind::ReflectMut<'_> {
                    jsonbind::ReflectMut::Struct(self)
                }
            }

            impl #impl_generics jsonbind::ops::Struct for #ident #ty_generics #where_clause {
                fn field_at(&self, index: usize) -> ::std::option::Option<&dyn jsonbind::Reflect> {
                    match index {
                        #(#field_indices => ::std::option::Option::Some(&self.#field_idents),)*
                        _ => ::std::option::Option::None,
                    }
                }

                fn field_at_mut(
                    &mut self,
                    index: usize,
                ) -> ::std::option::Option<&mut dyn jsonbind::Reflect> {
                    match index {
                        #(#field_indices => ::std::option::Option::Some(&mut self.#field_idents),)*
                        _ => ::std::option::Option::None,
                    }
                }
            }
        };
    }
}
