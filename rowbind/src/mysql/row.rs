//! MySQL row implementation

use crate::error::{Error, Result};
use crate::traits::{Row, ValueRow};
use crate::value::Value;
use mysql_async::Row as MySqlAsyncRow;

use super::types::decode;

/// A MySQL result row.
///
/// Columns keep their result-set order and labels, so rows can be mapped
/// by constructor parameter name.
#[derive(Debug, Clone)]
pub struct MySqlRow {
    columns: ValueRow,
}

impl MySqlRow {
    /// Decode a mysql_async row.
    pub fn from_mysql_row(row: MySqlAsyncRow) -> Result<Self> {
        let mut columns = ValueRow::new();
        for (i, column) in row.columns_ref().iter().enumerate() {
            let label = column.name_str();
            let raw = row
                .as_ref(i)
                .ok_or_else(|| Error::ColumnNotFound(label.to_string()))?
                .clone();
            columns.push(label.to_string(), decode(raw, column)?);
        }
        Ok(Self { columns })
    }

    /// Value of the first column, if any.
    pub fn first_value(&self) -> Option<&Value> {
        self.columns.value_at(0)
    }
}

impl Row for MySqlRow {
    fn column_count(&self) -> usize {
        self.columns.column_count()
    }

    fn column_label(&self, index: usize) -> Option<&str> {
        self.columns.column_label(index)
    }

    fn get_value(&self, column: &str) -> Result<Value> {
        self.columns.get_value(column)
    }
}
