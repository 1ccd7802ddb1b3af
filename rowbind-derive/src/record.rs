//! Record derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

use crate::attrs::{self, DefaultValue, FieldConfig};

fn construct_field(config: &FieldConfig) -> TokenStream {
    let ident = &config.ident;
    let name = &config.name;
    let ty = &config.ty;

    if config.skip {
        return quote! { #ident: <#ty as std::default::Default>::default() };
    }

    let fallback = match &config.default {
        Some(DefaultValue::Trait) => quote! { .unwrap_or_default() },
        Some(DefaultValue::Function(path)) => quote! { .unwrap_or_else(#path) },
        None => quote! { .unwrap_or_default() },
    };

    match (&config.nullable_inner, &config.default) {
        // an absent nullable is always passed an explicit null
        (Some(inner), _) => quote! {
            #ident: args.nullable::<#inner>(#name)? #fallback
        },
        (None, Some(_)) => quote! {
            #ident: args.defaulted::<#ty>(#name)? #fallback
        },
        (None, None) => quote! {
            #ident: args.required::<#ty>(#name)?
        },
    }
}

pub fn derive_record_impl(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let type_name = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let (container, fields) = attrs::parse(&input)?;

    let parameters: Vec<TokenStream> = fields
        .iter()
        .filter(|c| !c.skip)
        .map(|c| {
            let ty = &c.ty;
            let name = &c.name;
            let nullable = c.nullable();
            let has_default = c.default.is_some();
            quote! {
                rowbind::ParameterDescriptor::of::<#ty>(#name, #nullable, #has_default)
            }
        })
        .collect();

    let field_values: Vec<TokenStream> = fields.iter().map(construct_field).collect();

    let validate = container.validate.as_ref().map(|path| {
        quote! {
            if let Err(e) = #path(&value) {
                return Err(rowbind::Error::Constructor(e.into()));
            }
        }
    });

    let expanded = quote! {
        impl #impl_generics rowbind::Record for #name #ty_generics #where_clause {
            fn describe() -> rowbind::TypeDescriptor {
                rowbind::TypeDescriptor::with_constructor(
                    #type_name,
                    vec![#(#parameters),*],
                )
            }

            #[allow(unused_mut, unused_variables)]
            fn construct(mut args: rowbind::ConstructorArguments) -> rowbind::Result<Self> {
                let value = Self {
                    #(#field_values),*
                };
                #validate
                Ok(value)
            }
        }
    };

    Ok(expanded)
}
