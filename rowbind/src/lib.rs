//! rowbind - named parameter binding and constructor-based row mapping
//!
//! A thin layer over `mysql_async` that binds method arguments to
//! statements by name (walking composite values into dotted paths such as
//! `thing.id`) and maps result rows into types through their designated
//! constructor, matching columns to parameters by case-insensitive name.
//!
//! # Features
//!
//! - **Named binding**: `:thing.id` placeholders bound from `#[derive(Composite)]` values
//! - **Constructor mapping**: `#[derive(Record)]` with nullable and defaulted parameters
//! - **Pluggable decoders**: per-type column decoders registered through plugins
//! - **Batches**: container arguments bound one element per batch part
//!
//! # Example
//!
//! ```ignore
//! use rowbind::{Composite, MySqlHandle, Record};
//!
//! #[derive(Record, Composite)]
//! pub struct Thing {
//!     pub id: i32,
//!     pub name: String,
//! }
//!
//! async fn insert(handle: &MySqlHandle, thing: &Thing) -> rowbind::Result<()> {
//!     handle
//!         .update("insert into something (id, name) values (:thing.id, :thing.name)")
//!         .bind("thing", thing)
//!         .execute(handle)
//!         .await?;
//!     Ok(())
//! }
//!
//! async fn find_by_id(handle: &MySqlHandle, id: i32) -> rowbind::Result<Option<Thing>> {
//!     handle
//!         .query("select id, name from something where id = :id")
//!         .bind("id", &id)
//!         .fetch_optional(handle)
//!         .await
//! }
//! ```

pub mod batch;
pub mod binder;
pub mod config;
pub mod decoder;
pub mod error;
pub mod introspect;
pub mod mapper;
pub mod mysql;
pub mod plugin;
pub mod query;
pub mod statement;
pub mod traits;
pub mod value;

// Re-export the derive macros
pub use rowbind_derive::{Composite, Record};

// Re-export main types
pub use batch::PreparedBatch;
pub use binder::{bind_argument, bind_batch_element, Binder, BindingPath, Parameter};
pub use config::{Settings, UnnamedParameterPolicy};
pub use decoder::{ColumnDecoder, Decoded, DecoderRegistry, FromValueDecoder, StatementContext};
pub use error::{BoxError, Error, Result};
pub use introspect::{
    DescriptorCache, ParameterDescriptor, PropertyDescriptor, TypeDescriptor, TypeKey,
};
pub use mapper::{Argument, ConstructorArguments, RowMapper};
pub use mysql::{MySqlHandle, MySqlHandleBuilder, MySqlRow};
pub use plugin::{Plugin, RecordPlugin};
pub use query::{SqlBatch, SqlQuery, SqlUpdate};
pub use statement::{Binding, NamedStatement, Statement};
pub use traits::{
    BatchElements, BindValue, Composite, ExecuteResult, Executor, FromValue, Record, Row, RowExt,
    ToValue, ValueRow,
};
pub use value::{Value, ValueKind};
