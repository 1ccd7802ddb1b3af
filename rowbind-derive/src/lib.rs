//! Derive macros for the rowbind binder and row mapper
//!
//! This crate provides the following derive macros:
//! - `Record` - Describes a struct's fields as constructor parameters so rows
//!   can be mapped into it
//! - `Composite` - Binds a struct's fields as dotted statement parameters
//!
//! These macros are re-exported from the `rowbind` crate, so users typically
//! don't need to depend on this crate directly.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod attrs;
mod composite;
mod record;

/// Derive macro for mapping rows into a struct through its fields.
///
/// Every field becomes a constructor parameter matched to a column by
/// case-insensitive name. `Option<_>` fields are nullable: an absent column
/// maps to `None`.
///
/// # Attributes
///
/// - `#[rowbind(rename_all = "camelCase")]` - Rename every field (also
///   `snake_case`, `PascalCase`, `SCREAMING_SNAKE_CASE`, `lowercase`)
/// - `#[rowbind(validate = "path::to_fn")]` - Run `fn(&Self) -> Result<(), E>`
///   after construction
/// - `#[rowbind(rename = "column_name")]` - Use a different name for this field
/// - `#[rowbind(default)]` / `#[rowbind(default = "path::to_fn")]` - Value used
///   when the column is absent
/// - `#[rowbind(skip)]` - Never read; always `Default::default()`
///
/// # Example
///
/// ```ignore
/// use rowbind::Record;
///
/// #[derive(Record)]
/// #[rowbind(rename_all = "camelCase")]
/// pub struct Summary {
///     pub id: i32,
///     pub nullable_note: Option<String>,
///     #[rowbind(default = "default_label")]
///     pub label: String,
/// }
/// ```
#[proc_macro_derive(Record, attributes(rowbind))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::derive_record_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive macro for binding a struct as a composite parameter.
///
/// A value bound as `thing` binds each field as `thing.<field>`; nested
/// composites extend the path further. A `None` anywhere above a field
/// binds it as null.
///
/// # Attributes
///
/// - `#[rowbind(rename_all = "...")]` / `#[rowbind(rename = "...")]` - As for `Record`
/// - `#[rowbind(skip)]` - Not bound
///
/// # Example
///
/// ```ignore
/// use rowbind::Composite;
///
/// #[derive(Composite)]
/// pub struct Thing {
///     pub id: i32,
///     pub name: String,
/// }
/// ```
#[proc_macro_derive(Composite, attributes(rowbind))]
pub fn derive_composite(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    composite::derive_composite_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
