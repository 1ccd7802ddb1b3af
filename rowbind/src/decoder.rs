//! Column decoders, looked up by declared parameter type

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::introspect::TypeKey;
use crate::traits::{FromValue, Row};

/// A decoded column value, downcast by the constructor to its declared type.
pub type Decoded = Box<dyn Any + Send>;

/// Reads one column of a row as a value of some declared type.
pub trait ColumnDecoder: Send + Sync {
    /// Decode the value of `column` in `row`.
    fn decode(&self, row: &dyn Row, column: &str, ctx: &StatementContext) -> Result<Decoded>;
}

impl<F> ColumnDecoder for F
where
    F: Fn(&dyn Row, &str, &StatementContext) -> Result<Decoded> + Send + Sync,
{
    fn decode(&self, row: &dyn Row, column: &str, ctx: &StatementContext) -> Result<Decoded> {
        self(row, column, ctx)
    }
}

/// Decoder for any [`FromValue`] type.
pub struct FromValueDecoder<T>(PhantomData<fn() -> T>);

impl<T> FromValueDecoder<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for FromValueDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FromValue + Send + 'static> ColumnDecoder for FromValueDecoder<T> {
    fn decode(&self, row: &dyn Row, column: &str, _ctx: &StatementContext) -> Result<Decoded> {
        let value = row.get_value(column)?;
        Ok(Box::new(T::from_value(value)?))
    }
}

/// Decodes `Option<T>` through the decoder registered for `T`.
struct NullableDecoder<T> {
    inner: Arc<dyn ColumnDecoder>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send> ColumnDecoder for NullableDecoder<T> {
    fn decode(&self, row: &dyn Row, column: &str, ctx: &StatementContext) -> Result<Decoded> {
        if row.get_value(column)?.is_null() {
            return Ok(Box::new(None::<T>));
        }
        let value = self
            .inner
            .decode(row, column, ctx)?
            .downcast::<T>()
            .map_err(|_| Error::TypeConversion {
                expected: type_name::<T>(),
                actual: format!("decoded value of another type for `{}`", column),
            })?;
        Ok(Box::new(Some(*value)))
    }
}

/// Column decoders keyed by declared type.
#[derive(Clone, Default)]
pub struct DecoderRegistry {
    decoders: HashMap<TypeKey, Arc<dyn ColumnDecoder>>,
}

impl DecoderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding decoders for every built-in value type and its
    /// `Option`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }

    pub fn register_builtins(&mut self) -> &mut Self {
        self.register_value::<bool>()
            .register_value::<i8>()
            .register_value::<i16>()
            .register_value::<i32>()
            .register_value::<i64>()
            .register_value::<u8>()
            .register_value::<u16>()
            .register_value::<u32>()
            .register_value::<u64>()
            .register_value::<f32>()
            .register_value::<f64>()
            .register_value::<String>()
            .register_value::<Vec<u8>>()
            .register_value::<NaiveDate>()
            .register_value::<NaiveDateTime>()
            .register_value::<NaiveTime>()
            .register_value::<Decimal>()
            .register_value::<serde_json::Value>()
    }

    /// Register `decoder` for parameters declared as `T` or `Option<T>`,
    /// replacing any previous ones.
    ///
    /// Under `Option<T>` a null column decodes to `None` without calling
    /// `decoder`.
    pub fn register<T: Any + Send>(&mut self, decoder: impl ColumnDecoder + 'static) -> &mut Self {
        let decoder: Arc<dyn ColumnDecoder> = Arc::new(decoder);
        self.insert::<Option<T>>(Arc::new(NullableDecoder::<T> {
            inner: decoder.clone(),
            _marker: PhantomData,
        }));
        self.insert::<T>(decoder)
    }

    /// Register [`FromValueDecoder`]s for `T` and `Option<T>`.
    pub fn register_value<T: FromValue + Send + 'static>(&mut self) -> &mut Self {
        self.insert::<T>(Arc::new(FromValueDecoder::<T>::new()))
            .insert::<Option<T>>(Arc::new(FromValueDecoder::<Option<T>>::new()))
    }

    fn insert<T: Any>(&mut self, decoder: Arc<dyn ColumnDecoder>) -> &mut Self {
        self.decoders.insert(TypeKey::of::<T>(), decoder);
        self
    }

    pub fn find_decoder_for(&self, declared: &TypeKey) -> Option<Arc<dyn ColumnDecoder>> {
        self.decoders.get(declared).cloned()
    }

    pub fn contains(&self, declared: &TypeKey) -> bool {
        self.decoders.contains_key(declared)
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.decoders.keys()).finish()
    }
}

/// Per-statement context handed to the mapper and its decoders.
#[derive(Debug, Clone)]
pub struct StatementContext {
    decoders: Arc<DecoderRegistry>,
    sql: Option<Arc<str>>,
}

impl StatementContext {
    pub fn new(decoders: Arc<DecoderRegistry>) -> Self {
        Self { decoders, sql: None }
    }

    /// Attach the SQL of the statement being mapped.
    pub fn with_sql(mut self, sql: impl Into<Arc<str>>) -> Self {
        self.sql = Some(sql.into());
        self
    }

    pub fn sql(&self) -> Option<&str> {
        self.sql.as_deref()
    }

    pub fn decoders(&self) -> &DecoderRegistry {
        &self.decoders
    }

    pub fn find_decoder_for(&self, declared: &TypeKey) -> Option<Arc<dyn ColumnDecoder>> {
        self.decoders.find_decoder_for(declared)
    }
}
