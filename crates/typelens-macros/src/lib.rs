//! Derive macro for typelens class definitions.
//!
//! `#[derive(Describe)]` on a struct with named fields implements
//! `typelens_types::Describe`, producing a `ClassDef` with one field per
//! struct field and bodies that read (by cloning) and write the field on a
//! live value.
//!
//! # Usage
//!
//! ```ignore
//! use typelens_macros::Describe;
//!
//! #[derive(Clone, Default, Describe)]
//! #[describe(default)]
//! pub struct User {
//!     pub name: String,
//!     pub tags: Vec<String>,
//!     #[describe(skip)]
//!     cache: Option<u64>,
//! }
//! ```
//!
//! Attributes:
//!
//! - `#[describe(default)]` on the struct binds a default constructor through
//!   `Default`.
//! - `#[describe(name = "...")]` on the struct renames the class.
//! - `#[describe(skip)]` on a field leaves it out.
//! - `#[describe(ty = "...")]` on a field overrides its type expression.
//!
//! Generated code refers to `::typelens_types`, so the deriving crate needs it
//! as a dependency. Described field types must be `Clone + Send + 'static`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::spanned::Spanned;
use syn::{
    Data, DeriveInput, Fields, GenericArgument, LitStr, PathArguments, Type, Visibility,
    parse_macro_input,
};

#[proc_macro_derive(Describe, attributes(describe))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

// ============================================================================
// Attributes
// ============================================================================

#[derive(Default)]
struct StructOptions {
    name: Option<String>,
    default: bool,
}

#[derive(Default)]
struct FieldOptions {
    skip: bool,
    ty: Option<String>,
}

fn struct_options(input: &DeriveInput) -> syn::Result<StructOptions> {
    let mut options = StructOptions::default();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("describe")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                options.default = true;
                Ok(())
            } else if meta.path.is_ident("name") {
                let name: LitStr = meta.value()?.parse()?;
                options.name = Some(name.value());
                Ok(())
            } else {
                Err(meta.error("expected `default` or `name = \"...\"`"))
            }
        })?;
    }
    Ok(options)
}

fn field_options(field: &syn::Field) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("describe")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                options.skip = true;
                Ok(())
            } else if meta.path.is_ident("ty") {
                let ty: LitStr = meta.value()?.parse()?;
                options.ty = Some(ty.value());
                Ok(())
            } else {
                Err(meta.error("expected `skip` or `ty = \"...\"`"))
            }
        })?;
    }
    Ok(options)
}

// ============================================================================
// Expansion
// ============================================================================

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Describe cannot be derived for generic types; describe them by hand with ClassDef",
        ));
    }
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Describe can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &data.fields,
            "Describe requires a struct with named fields",
        ));
    };

    let options = struct_options(input)?;
    let ident = &input.ident;
    let class_name = options.name.unwrap_or_else(|| ident.to_string());
    let not_target = format!("target is not a {}", ident);

    let mut members = Vec::new();
    for field in &fields.named {
        let field_opts = field_options(field)?;
        if field_opts.skip {
            continue;
        }
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let field_name = field_ident.to_string();
        let field_ty = &field.ty;
        let ty_expr = match field_opts.ty {
            Some(ty) => ty,
            None => type_expr(field_ty)?,
        };
        let visibility = visibility(&field.vis);
        let wrong_value = format!("value for {}.{} is not a {}", ident, field_name, ty_expr);

        members.push(quote! {
            .field(
                ::typelens_types::FieldDef::new(#field_name, #ty_expr)
                    .visibility(::typelens_types::Visibility::#visibility)
            )
            .bind_field(
                #field_name,
                |target: &dyn ::std::any::Any| -> ::std::result::Result<
                    ::typelens_types::Value,
                    ::typelens_types::BoxError,
                > {
                    let this = target.downcast_ref::<#ident>().ok_or(#not_target)?;
                    ::std::result::Result::Ok(::std::boxed::Box::new(
                        ::std::clone::Clone::clone(&this.#field_ident),
                    ))
                },
                ::std::option::Option::Some(::typelens_types::SetterBody::new(
                    |target: &mut dyn ::std::any::Any, value: ::typelens_types::Value| {
                        let this = target.downcast_mut::<#ident>().ok_or(#not_target)?;
                        this.#field_ident = *value.downcast::<#field_ty>().map_err(|_| #wrong_value)?;
                        ::std::result::Result::Ok(())
                    },
                )),
            )
        });
    }

    let constructor = options.default.then(|| {
        quote! {
            .default_constructor_with(|| {
                ::std::result::Result::Ok(::std::boxed::Box::new(
                    <#ident as ::std::default::Default>::default(),
                ))
            })
        }
    });

    Ok(quote! {
        impl ::typelens_types::Describe for #ident {
            fn describe() -> ::typelens_types::ClassDef {
                ::typelens_types::ClassDef::class(#class_name)
                    #(#members)*
                    #constructor
            }
        }
    })
}

fn visibility(vis: &Visibility) -> TokenStream2 {
    match vis {
        Visibility::Public(_) => quote!(Public),
        Visibility::Restricted(_) => quote!(Package),
        Visibility::Inherited => quote!(Private),
    }
}

/// Spell a Rust type in the type-expression syntax: the last path segment
/// with its type arguments, arrays and slices as `T[]`.
fn type_expr(ty: &Type) -> syn::Result<String> {
    match ty {
        Type::Path(path) if path.qself.is_none() => {
            let Some(segment) = path.path.segments.last() else {
                return Err(syn::Error::new(ty.span(), "empty type path"));
            };
            let mut out = segment.ident.to_string();
            if let PathArguments::AngleBracketed(args) = &segment.arguments {
                let args = args
                    .args
                    .iter()
                    .filter_map(|arg| match arg {
                        GenericArgument::Type(ty) => Some(type_expr(ty)),
                        _ => None,
                    })
                    .collect::<syn::Result<Vec<_>>>()?;
                if !args.is_empty() {
                    out.push('<');
                    out.push_str(&args.join(", "));
                    out.push('>');
                }
            }
            Ok(out)
        }
        Type::Array(array) => Ok(format!("{}[]", type_expr(&array.elem)?)),
        Type::Slice(slice) => Ok(format!("{}[]", type_expr(&slice.elem)?)),
        Type::Paren(inner) => type_expr(&inner.elem),
        Type::Group(inner) => type_expr(&inner.elem),
        _ => Err(syn::Error::new(
            ty.span(),
            "unsupported field type; use #[describe(ty = \"...\")] or #[describe(skip)]",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spell(src: &str) -> String {
        type_expr(&syn::parse_str::<Type>(src).unwrap()).unwrap()
    }

    #[test]
    fn test_type_expr_spelling() {
        assert_eq!(spell("String"), "String");
        assert_eq!(spell("std::collections::HashMap<String, Vec<u8>>"), "HashMap<String, Vec<u8>>");
        assert_eq!(spell("[i32; 4]"), "i32[]");
        assert_eq!(spell("Option<[String; 2]>"), "Option<String[]>");
    }

    #[test]
    fn test_unsupported_types_are_rejected() {
        let tuple: Type = syn::parse_str("(i32, i32)").unwrap();
        assert!(type_expr(&tuple).is_err());
    }

    #[test]
    fn test_generic_structs_are_rejected() {
        let input: DeriveInput = syn::parse_str("struct Wrapper<T> { value: T }").unwrap();
        let err = expand(&input).unwrap_err();
        assert!(err.to_string().contains("generic"));
    }

    #[test]
    fn test_expansion_mentions_fields_and_constructor() {
        let input: DeriveInput = syn::parse_str(
            "#[describe(default, name = \"Account\")]
             struct User { pub name: String, #[describe(skip)] cache: u64, #[describe(ty = \"Vec<String>\")] tags: Vec<String> }",
        )
        .unwrap();
        let out = expand(&input).unwrap().to_string();
        assert!(out.contains("\"Account\""));
        assert!(out.contains("\"name\""));
        assert!(out.contains("\"Vec<String>\""));
        assert!(!out.contains("\"cache\""));
        assert!(out.contains("default_constructor_with"));
    }
}
