//! Conversions between rowbind values and mysql_async values

use crate::error::{Error, Result};
use crate::value::Value;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use mysql_async::consts::ColumnType;
use mysql_async::{Column, Value as MySqlValue};

/// Collation id MySQL reports for binary string columns.
const BINARY_COLLATION: u16 = 63;

/// Encode a bound value as a statement parameter.
pub fn encode(value: &Value) -> Result<MySqlValue> {
    let encoded = match value {
        Value::Null => MySqlValue::NULL,
        Value::Bool(v) => MySqlValue::from(*v),
        Value::I8(v) => MySqlValue::Int(i64::from(*v)),
        Value::I16(v) => MySqlValue::Int(i64::from(*v)),
        Value::I32(v) => MySqlValue::Int(i64::from(*v)),
        Value::I64(v) => MySqlValue::Int(*v),
        Value::U8(v) => MySqlValue::UInt(u64::from(*v)),
        Value::U16(v) => MySqlValue::UInt(u64::from(*v)),
        Value::U32(v) => MySqlValue::UInt(u64::from(*v)),
        Value::U64(v) => MySqlValue::UInt(*v),
        Value::F32(v) => MySqlValue::Float(*v),
        Value::F64(v) => MySqlValue::Double(*v),
        Value::String(v) => MySqlValue::Bytes(v.as_bytes().to_vec()),
        Value::Bytes(v) => MySqlValue::Bytes(v.clone()),
        Value::Date(v) => MySqlValue::Date(year(v.year())?, v.month() as u8, v.day() as u8, 0, 0, 0, 0),
        Value::DateTime(v) => MySqlValue::Date(
            year(v.year())?,
            v.month() as u8,
            v.day() as u8,
            v.hour() as u8,
            v.minute() as u8,
            v.second() as u8,
            v.nanosecond() / 1000,
        ),
        Value::Time(v) => MySqlValue::Time(
            false,
            0,
            v.hour() as u8,
            v.minute() as u8,
            v.second() as u8,
            v.nanosecond() / 1000,
        ),
        Value::Decimal(v) => MySqlValue::Bytes(v.to_string().into_bytes()),
        Value::Json(v) => MySqlValue::Bytes(v.to_string().into_bytes()),
    };
    Ok(encoded)
}

fn year(year: i32) -> Result<u16> {
    u16::try_from(year).map_err(|_| Error::TypeConversion {
        expected: "year (0 to 65535)",
        actual: format!("year {} out of range", year),
    })
}

/// Decode a result value using the metadata of the column it came from.
pub fn decode(value: MySqlValue, column: &Column) -> Result<Value> {
    match value {
        MySqlValue::NULL => Ok(Value::Null),
        MySqlValue::Bytes(bytes) => decode_bytes(bytes, column),
        MySqlValue::Int(v) => Ok(Value::I64(v)),
        MySqlValue::UInt(v) => Ok(Value::U64(v)),
        MySqlValue::Float(v) => Ok(Value::F32(v)),
        MySqlValue::Double(v) => Ok(Value::F64(v)),
        MySqlValue::Date(year, month, day, hour, min, sec, micro) => {
            let date = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
                .ok_or_else(|| Error::TypeConversion {
                    expected: "date",
                    actual: format!("{}-{}-{}", year, month, day),
                })?;
            if column.column_type() == ColumnType::MYSQL_TYPE_DATE {
                return Ok(Value::Date(date));
            }
            let time = NaiveTime::from_hms_micro_opt(hour as u32, min as u32, sec as u32, micro)
                .ok_or_else(|| Error::TypeConversion {
                    expected: "time",
                    actual: format!("{}:{}:{}.{}", hour, min, sec, micro),
                })?;
            Ok(Value::DateTime(NaiveDateTime::new(date, time)))
        }
        MySqlValue::Time(is_neg, days, hours, mins, secs, micro) => {
            // NaiveTime covers a single day only
            if is_neg || days > 0 || hours >= 24 {
                return Err(Error::TypeConversion {
                    expected: "time (00:00:00 to 23:59:59)",
                    actual: format!(
                        "{}{}:{:02}:{:02}",
                        if is_neg { "-" } else { "" },
                        days * 24 + hours as u32,
                        mins,
                        secs
                    ),
                });
            }
            NaiveTime::from_hms_micro_opt(hours as u32, mins as u32, secs as u32, micro)
                .map(Value::Time)
                .ok_or_else(|| Error::TypeConversion {
                    expected: "time",
                    actual: format!("{}:{}:{}.{}", hours, mins, secs, micro),
                })
        }
    }
}

fn decode_bytes(bytes: Vec<u8>, column: &Column) -> Result<Value> {
    match column.column_type() {
        ColumnType::MYSQL_TYPE_JSON => serde_json::from_slice(&bytes)
            .map(Value::Json)
            .map_err(|e| Error::TypeConversion {
                expected: "json",
                actual: format!("invalid json in column {}: {}", column.name_str(), e),
            }),
        ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
            let text = String::from_utf8_lossy(&bytes);
            text.parse().map(Value::Decimal).map_err(|_| Error::TypeConversion {
                expected: "decimal",
                actual: format!("invalid decimal in column {}: {}", column.name_str(), text),
            })
        }
        _ if column.character_set() == BINARY_COLLATION => Ok(Value::Bytes(bytes)),
        _ => match String::from_utf8(bytes) {
            Ok(s) => Ok(Value::String(s)),
            Err(e) => Ok(Value::Bytes(e.into_bytes())),
        },
    }
}
