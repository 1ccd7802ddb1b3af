//! Composite derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

use crate::attrs;

pub fn derive_composite_impl(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let (_, fields) = attrs::parse(&input)?;
    let bound: Vec<_> = fields.iter().filter(|c| !c.skip).collect();

    let binds: Vec<TokenStream> = bound
        .iter()
        .map(|c| {
            let ident = &c.ident;
            let ty = &c.ty;
            let name = &c.name;
            quote! {
                binder.bind_property::<#ty>(path, #name, value.map(|v| &v.#ident))?;
            }
        })
        .collect();

    let properties: Vec<TokenStream> = bound
        .iter()
        .map(|c| {
            let ty = &c.ty;
            let name = &c.name;
            let nullable = c.nullable();
            quote! {
                rowbind::PropertyDescriptor::of::<#ty>(#name, #nullable)
            }
        })
        .collect();

    let expanded = quote! {
        impl #impl_generics rowbind::BindValue for #name #ty_generics #where_clause {
            const COMPOSITE: bool = true;

            #[allow(unused_variables)]
            fn bind_at(
                value: Option<&Self>,
                path: Option<&rowbind::BindingPath>,
                binder: &mut rowbind::Binder<'_>,
            ) -> rowbind::Result<()> {
                #(#binds)*
                Ok(())
            }
        }

        impl #impl_generics rowbind::Composite for #name #ty_generics #where_clause {
            fn properties() -> Vec<rowbind::PropertyDescriptor> {
                vec![#(#properties),*]
            }
        }
    };

    Ok(expanded)
}
