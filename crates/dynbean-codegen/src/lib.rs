// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields, Ident, LitStr, Type, Visibility};

/// Struct-level `#[bean(...)]` options.
#[derive(Default)]
struct BeanOptions {
    /// Register a `Default`-backed constructor.
    default_ctor: bool,
    /// Register a `clone` method and a strict `FromValue` bridge.
    cloneable: bool,
}

/// Field-level `#[bean(...)]` options.
#[derive(Default)]
struct FieldOptions {
    skip: bool,
    rename: Option<String>,
    read_only: bool,
}

/// `#[derive(Bean)]` macro: generates the capability table of a struct
/// plus its `Typed` and `IntoValue` bridges.
///
/// Public fields become fields; other fields become private fields reached
/// through generated `get_x`/`is_x` and `set_x` accessors.
///
/// Attributes:
/// - `#[bean(default)]` on the struct: constructor from `Default`
/// - `#[bean(clone)]` on the struct: `clone` method and `FromValue`
/// - `#[bean(skip)]` on a field: not described
/// - `#[bean(rename = "x")]` on a field: property name
/// - `#[bean(read_only)]` on a field: no assignment without `force`
///
/// Every described field type must be `Clone`.
///
/// Example:
/// ```ignore
/// use dynbean::Bean;
///
/// #[derive(Bean, Clone, Default)]
/// #[bean(default, clone)]
/// struct Account {
///     pub id: i64,
///     owner: String,       // private, via get_owner / set_owner
///     #[bean(read_only)]
///     pub created: u64,
/// }
/// ```
#[proc_macro_derive(Bean, attributes(bean))]
pub fn derive_bean(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_bean(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// `#[derive(BeanEnum)]` macro: variant table and value bridges for a
/// fieldless enum.
///
/// Example:
/// ```ignore
/// use dynbean::BeanEnum;
///
/// #[derive(BeanEnum, Clone, Copy)]
/// enum Status { Active, Suspended }
/// ```
#[proc_macro_derive(BeanEnum)]
pub fn derive_bean_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_enum(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_bean(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[derive(Bean)] does not support generic structs",
        ));
    }

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            name,
            "#[derive(Bean)] only supports structs",
        ));
    };
    let fields = match &data.fields {
        Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "#[derive(Bean)] requires named fields",
            ))
        }
    };

    let options = struct_options(input)?;

    let mut registrations = Vec::new();
    for field in fields {
        let field_opts = field_options(&field.attrs)?;
        if field_opts.skip {
            continue;
        }
        let Some(ident) = &field.ident else {
            continue;
        };
        let ty = &field.ty;
        let property = field_opts
            .rename
            .clone()
            .unwrap_or_else(|| ident.to_string().trim_start_matches("r#").to_string());

        let get = quote! { |bean: &Self| ::core::clone::Clone::clone(&bean.#ident) };
        let set = quote! { |bean: &mut Self, value: #ty| bean.#ident = value };

        if matches!(field.vis, Visibility::Public(_)) {
            let register = if field_opts.read_only {
                format_ident!("final_field")
            } else {
                format_ident!("field")
            };
            registrations.push(quote! { .#register(#property, #get, #set) });
            continue;
        }

        registrations.push(quote! { .private_field(#property, #get, #set) });

        let getter_name = if is_bool(ty) {
            format!("is_{}", property)
        } else {
            format!("get_{}", property)
        };
        let getter_lit = LitStr::new(&getter_name, Span::call_site());
        registrations.push(quote! { .getter(#getter_lit, #get) });

        if !field_opts.read_only {
            let setter_lit = LitStr::new(&format!("set_{}", property), Span::call_site());
            registrations.push(quote! { .setter(#setter_lit, #set) });
        }
    }

    if options.default_ctor {
        registrations.push(quote! { .default_constructor() });
    }
    if options.cloneable {
        registrations.push(quote! { .cloneable() });
    }

    let from_value = if options.cloneable {
        quote! {
            impl ::dynbean::FromValue for #name {
                fn from_value(value: ::dynbean::Value) -> ::core::option::Option<Self> {
                    match value {
                        ::dynbean::Value::Object(object) => object.get::<#name>(),
                        _ => ::core::option::Option::None,
                    }
                }
            }
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        impl ::dynbean::Bean for #name {
            fn describe(
                desc: ::dynbean::DescriptorBuilder<Self>,
            ) -> ::dynbean::DescriptorBuilder<Self> {
                desc #(#registrations)*
            }
        }

        impl ::dynbean::Typed for #name {
            fn value_type() -> ::dynbean::ValueType {
                ::dynbean::ValueType::Object(::dynbean::BeanType::of::<#name>())
            }
        }

        impl ::dynbean::IntoValue for #name {
            fn into_value(self) -> ::dynbean::Value {
                ::dynbean::Value::Object(::dynbean::ObjectRef::new(self))
            }
        }

        #from_value
    })
}

fn expand_enum(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            name,
            "#[derive(BeanEnum)] only supports enums",
        ));
    };
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[derive(BeanEnum)] does not support generic enums",
        ));
    }

    let mut variants: Vec<&Ident> = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "#[derive(BeanEnum)] requires fieldless variants",
            ));
        }
        variants.push(&variant.ident);
    }

    let type_name = name.to_string();
    let variant_names: Vec<String> = variants.iter().map(ToString::to_string).collect();
    let ordinals: Vec<usize> = (0..variants.len()).collect();

    Ok(quote! {
        impl ::dynbean::BeanEnum for #name {
            const NAME: &'static str = #type_name;
            const VARIANTS: &'static [&'static str] = &[#(#variant_names),*];

            fn ordinal(&self) -> usize {
                match self {
                    #(Self::#variants => #ordinals,)*
                }
            }

            fn from_ordinal(ordinal: usize) -> ::core::option::Option<Self> {
                match ordinal {
                    #(#ordinals => ::core::option::Option::Some(Self::#variants),)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl ::dynbean::Typed for #name {
            fn value_type() -> ::dynbean::ValueType {
                ::dynbean::ValueType::Enum(<#name as ::dynbean::BeanEnum>::NAME.into())
            }
        }

        impl ::dynbean::IntoValue for #name {
            fn into_value(self) -> ::dynbean::Value {
                ::dynbean::Value::Enum(::dynbean::BeanEnum::to_enum_value(&self))
            }
        }

        impl ::dynbean::FromValue for #name {
            fn from_value(value: ::dynbean::Value) -> ::core::option::Option<Self> {
                <#name as ::dynbean::BeanEnum>::from_enum_value(&value)
            }
        }
    })
}

fn struct_options(input: &DeriveInput) -> syn::Result<BeanOptions> {
    let mut options = BeanOptions::default();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("bean")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                options.default_ctor = true;
                Ok(())
            } else if meta.path.is_ident("clone") {
                options.cloneable = true;
                Ok(())
            } else {
                Err(meta.error("unknown #[bean] option, expected `default` or `clone`"))
            }
        })?;
    }
    Ok(options)
}

fn field_options(attrs: &[syn::Attribute]) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("bean")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                options.skip = true;
                Ok(())
            } else if meta.path.is_ident("read_only") {
                options.read_only = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let lit: LitStr = meta.value()?.parse()?;
                options.rename = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error(
                    "unknown #[bean] field option, expected `skip`, `rename` or `read_only`",
                ))
            }
        })?;
    }
    Ok(options)
}

fn is_bool(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path.qself.is_none() && path.path.is_ident("bool"),
        _ => false,
    }
}
