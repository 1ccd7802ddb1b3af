//! Row trait for reading result rows by column

use crate::error::{Error, Result};
use crate::value::Value;

/// A result row with ordered, labelled columns.
///
/// This trait abstracts over database row implementations so that the
/// row mapper and column decoders work with any backend. Lookups by
/// column label are case-insensitive.
pub trait Row {
    /// Number of columns in the row.
    fn column_count(&self) -> usize;

    /// Label of the column at `index` (0-based).
    fn column_label(&self, index: usize) -> Option<&str>;

    /// Get a value from the row by column label as a dynamic Value.
    ///
    /// Returns an error if the column doesn't exist.
    fn get_value(&self, column: &str) -> Result<Value>;
}

/// Extension trait for typed access to row values.
pub trait RowExt: Row {
    /// Get a typed value from the row by column label.
    fn get<T: crate::FromValue>(&self, column: &str) -> Result<T> {
        let value = self.get_value(column)?;
        T::from_value(value)
    }
}

impl<R: Row + ?Sized> RowExt for R {}

/// An in-memory row of labelled values.
///
/// The MySQL backend decodes every driver row into one of these; it is
/// also handy for mapping rows that did not come from a database.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueRow {
    labels: Vec<String>,
    values: Vec<Value>,
}

impl ValueRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column.
    pub fn with(mut self, label: impl Into<String>, value: Value) -> Self {
        self.push(label, value);
        self
    }

    /// Append a column in place.
    pub fn push(&mut self, label: impl Into<String>, value: Value) {
        self.labels.push(label.into());
        self.values.push(value);
    }

    /// Value of the column at `index` (0-based).
    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.labels
            .iter()
            .position(|label| label == column)
            .or_else(|| {
                self.labels
                    .iter()
                    .position(|label| label.to_lowercase() == column.to_lowercase())
            })
    }
}

impl Row for ValueRow {
    fn column_count(&self) -> usize {
        self.labels.len()
    }

    fn column_label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    fn get_value(&self, column: &str) -> Result<Value> {
        self.position(column)
            .map(|i| self.values[i].clone())
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))
    }
}

impl<R: Row + ?Sized> Row for &R {
    fn column_count(&self) -> usize {
        (**self).column_count()
    }

    fn column_label(&self, index: usize) -> Option<&str> {
        (**self).column_label(index)
    }

    fn get_value(&self, column: &str) -> Result<Value> {
        (**self).get_value(column)
    }
}
