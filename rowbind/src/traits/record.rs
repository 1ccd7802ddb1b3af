//! Record trait for types reconstructed from result rows

use crate::error::Result;
use crate::introspect::TypeDescriptor;
use crate::mapper::ConstructorArguments;

/// A target type that rows are mapped into.
///
/// This trait is typically implemented via `#[derive(Record)]`, which
/// describes the struct's fields as the parameters of its designated
/// constructor and builds the struct from the mapper's arguments.
///
/// # Manual Implementation
///
/// ```ignore
/// use rowbind::{ConstructorArguments, ParameterDescriptor, Record, Result, TypeDescriptor};
///
/// pub struct Thing {
///     pub id: i32,
///     pub name: Option<String>,
/// }
///
/// impl Record for Thing {
///     fn describe() -> TypeDescriptor {
///         TypeDescriptor::with_constructor(
///             "Thing",
///             vec![
///                 ParameterDescriptor::of::<i32>("id", false, false),
///                 ParameterDescriptor::of::<Option<String>>("name", true, false),
///             ],
///         )
///     }
///
///     fn construct(mut args: ConstructorArguments) -> Result<Self> {
///         Ok(Self {
///             id: args.required::<i32>("id")?,
///             name: args.nullable::<String>("name")?.unwrap_or(None),
///         })
///     }
/// }
/// ```
pub trait Record: Sized + 'static {
    /// Static metadata of this type and its designated constructor.
    fn describe() -> TypeDescriptor;

    /// Invoke the designated constructor with the assembled arguments.
    fn construct(args: ConstructorArguments) -> Result<Self>;
}
