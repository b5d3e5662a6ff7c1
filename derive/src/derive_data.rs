//! Input parsing: classify the deriving type and collect what codegen
//! needs from it.

use syn::{Attribute, Data, DeriveInput, Expr, ExprLit, ExprUnary, Fields, Lit, UnOp};

pub(crate) struct ActiveField {
    pub ident: syn::Ident,
    /// The declared name as it appears on the wire before any transform.
    pub name: String,
    pub ty: syn::Type,
}

pub(crate) struct ReflectStruct {
    pub ident: syn::Ident,
    pub generics: syn::Generics,
    /// Serializable members in declaration order, ignored ones excluded.
    pub fields: Vec<ActiveField>,
}

pub(crate) struct ReflectVariant {
    pub ident: syn::Ident,
    pub name: String,
    pub discriminant: i64,
}

pub(crate) struct ReflectEnum {
    pub ident: syn::Ident,
    pub variants: Vec<ReflectVariant>,
}

pub(crate) enum ReflectDerive {
    Struct(ReflectStruct),
    Enum(ReflectEnum),
}

impl ReflectDerive {
    pub(crate) fn from_input(input: &DeriveInput) -> syn::Result<Self> {
        match &input.data {
            Data::Struct(data) => Ok(Self::Struct(parse_struct(input, &data.fields)?)),
            Data::Enum(data) => Ok(Self::Enum(parse_enum(input, data)?)),
            Data::Union(_) => Err(syn::Error::new_spanned(
                input,
                "#[derive(Reflect)] does not support unions",
            )),
        }
    }
}

fn parse_struct(input: &DeriveInput, fields: &Fields) -> syn::Result<ReflectStruct> {
    let named = match fields {
        Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "#[derive(Reflect)] requires named fields",
            ));
        }
    };

    let mut active = Vec::new();
    for field in named {
        if is_ignored(&field.attrs)? {
            continue;
        }
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        active.push(ActiveField {
            name: ident.to_string(),
            ident,
            ty: field.ty.clone(),
        });
    }

    Ok(ReflectStruct {
        ident: input.ident.clone(),
        generics: input.generics.clone(),
        fields: active,
    })
}

fn parse_enum(input: &DeriveInput, data: &syn::DataEnum) -> syn::Result<ReflectEnum> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[derive(Reflect)] does not support generic enums",
        ));
    }
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            input,
            "#[derive(Reflect)] requires at least one variant",
        ));
    }

    let mut variants = Vec::new();
    let mut next = 0_i64;
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "#[derive(Reflect)] only supports fieldless enum variants",
            ));
        }
        if let Some((_, expr)) = &variant.discriminant {
            next = discriminant_value(expr)?;
        }
        variants.push(ReflectVariant {
            ident: variant.ident.clone(),
            name: variant.ident.to_string(),
            discriminant: next,
        });
        next += 1;
    }

    Ok(ReflectEnum {
        ident: input.ident.clone(),
        variants,
    })
}

fn discriminant_value(expr: &Expr) -> syn::Result<i64> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(lit), ..
        }) => lit.base10_parse(),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => Ok(-discriminant_value(expr)?),
        other => Err(syn::Error::new_spanned(
            other,
            "enum discriminants must be integer literals",
        )),
    }
}

/// `#[json(ignore)]`, or a serde skip marker recognized by name.
fn is_ignored(attrs: &[Attribute]) -> syn::Result<bool> {
    for attr in attrs {
        if attr.path().is_ident("json") {
            let mut found = false;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("ignore") {
                    found = true;
                    Ok(())
                } else {
                    Err(meta.error("unknown jsonbind field attribute"))
                }
            })?;
            if found {
                return Ok(true);
            }
        } else if attr.path().is_ident("serde") {
            let mut found = false;
            // Foreign markers are matched by name only; anything in a
            // serde attribute that does not parse our way is skipped.
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    found = true;
                }
                if let Ok(value) = meta.value() {
                    let _: proc_macro2::TokenStream = value.parse()?;
                }
                Ok(())
            });
            if found {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
