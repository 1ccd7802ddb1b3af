//! Core traits for rowbind

mod bind_value;
mod executor;
mod from_value;
mod record;
mod row;
mod to_value;

pub use bind_value::{BatchElements, BindValue, Composite};
pub use executor::{ExecuteResult, Executor};
pub use from_value::FromValue;
pub use record::Record;
pub use row::{Row, RowExt, ValueRow};
pub use to_value::ToValue;
