//! MySQL implementation for rowbind

mod handle;
mod row;
mod types;

pub use handle::{MySqlHandle, MySqlHandleBuilder};
pub use row::MySqlRow;
