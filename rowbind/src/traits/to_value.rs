//! ToValue trait for converting Rust types to database values

use crate::value::{Value, ValueKind};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

/// Trait for types that can be converted to a database value.
///
/// Implemented for the built-in scalar types. Implement it for your own
/// scalar types (e.g. enums stored as strings) together with
/// [`BindValue`](crate::BindValue) to make them bindable.
pub trait ToValue {
    /// The declared kind sent along with every bound value of this type.
    const KIND: ValueKind;

    /// Convert this value to a database value.
    fn to_value(&self) -> Value;
}

macro_rules! copy_to_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ToValue for $ty {
                const KIND: ValueKind = ValueKind::$variant;

                fn to_value(&self) -> Value {
                    Value::$variant(*self)
                }
            }
        )*
    };
}

copy_to_value! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    NaiveTime => Time,
    Decimal => Decimal,
}

impl ToValue for String {
    const KIND: ValueKind = ValueKind::String;

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl ToValue for str {
    const KIND: ValueKind = ValueKind::String;

    fn to_value(&self) -> Value {
        Value::String(self.to_owned())
    }
}

impl ToValue for Vec<u8> {
    const KIND: ValueKind = ValueKind::Bytes;

    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }
}

impl ToValue for [u8] {
    const KIND: ValueKind = ValueKind::Bytes;

    fn to_value(&self) -> Value {
        Value::Bytes(self.to_vec())
    }
}

impl ToValue for serde_json::Value {
    const KIND: ValueKind = ValueKind::Json;

    fn to_value(&self) -> Value {
        Value::Json(self.clone())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    const KIND: ValueKind = T::KIND;

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    const KIND: ValueKind = T::KIND;

    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}
