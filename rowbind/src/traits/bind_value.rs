//! BindValue and Composite traits for binding values to statements

use std::collections::VecDeque;

use crate::binder::{Binder, BindingPath};
use crate::error::Result;
use crate::introspect::PropertyDescriptor;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

/// Trait for types whose values can be bound to statement parameters.
///
/// Scalars bind themselves as a single value; composites (see
/// [`Composite`]) bind each of their properties under a dotted path.
/// `value` is `None` when the value, or any value enclosing it, is null.
pub trait BindValue {
    /// Whether this type binds sub-properties instead of a single value.
    const COMPOSITE: bool = false;

    /// Bind `value` at `path`, or positionally when `path` is `None`.
    fn bind_at(
        value: Option<&Self>,
        path: Option<&BindingPath>,
        binder: &mut Binder<'_>,
    ) -> Result<()>;
}

/// Explicit opt-in for composite types.
///
/// Implemented by `#[derive(Composite)]`. Only implementors are recursed
/// into by the binder; every other type is bound as a scalar.
pub trait Composite: BindValue {
    /// The declared properties, in declaration order.
    fn properties() -> Vec<PropertyDescriptor>;
}

macro_rules! scalar_bind_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl BindValue for $ty {
                fn bind_at(
                    value: Option<&Self>,
                    path: Option<&BindingPath>,
                    binder: &mut Binder<'_>,
                ) -> Result<()> {
                    binder.bind_scalar_value(path, value)
                }
            }
        )*
    };
}

scalar_bind_value!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    String,
    str,
    Vec<u8>,
    [u8],
    NaiveDate,
    NaiveDateTime,
    NaiveTime,
    Decimal,
    serde_json::Value,
);

impl<T: BindValue> BindValue for Option<T> {
    const COMPOSITE: bool = T::COMPOSITE;

    fn bind_at(
        value: Option<&Self>,
        path: Option<&BindingPath>,
        binder: &mut Binder<'_>,
    ) -> Result<()> {
        T::bind_at(value.and_then(Option::as_ref), path, binder)
    }
}

impl<T: BindValue + ?Sized> BindValue for &T {
    const COMPOSITE: bool = T::COMPOSITE;

    fn bind_at(
        value: Option<&Self>,
        path: Option<&BindingPath>,
        binder: &mut Binder<'_>,
    ) -> Result<()> {
        T::bind_at(value.map(|v| &**v), path, binder)
    }
}

impl<T: BindValue + ?Sized> BindValue for Box<T> {
    const COMPOSITE: bool = T::COMPOSITE;

    fn bind_at(
        value: Option<&Self>,
        path: Option<&BindingPath>,
        binder: &mut Binder<'_>,
    ) -> Result<()> {
        T::bind_at(value.map(|v| &**v), path, binder)
    }
}

/// Containers whose elements are bound one per batch part.
///
/// A batch parameter is declared with the container type, but each part of
/// the batch binds a single [`Element`](BatchElements::Element).
pub trait BatchElements {
    type Element: BindValue;

    /// Visit every element in order.
    fn for_each_element<F>(&self, f: F) -> Result<()>
    where
        F: FnMut(usize, &Self::Element) -> Result<()>;
}

fn visit_all<'a, E: 'a, F>(items: impl Iterator<Item = &'a E>, mut f: F) -> Result<()>
where
    F: FnMut(usize, &E) -> Result<()>,
{
    for (i, item) in items.enumerate() {
        f(i, item)?;
    }
    Ok(())
}

impl<E: BindValue> BatchElements for [E] {
    type Element = E;

    fn for_each_element<F>(&self, f: F) -> Result<()>
    where
        F: FnMut(usize, &E) -> Result<()>,
    {
        visit_all(self.iter(), f)
    }
}

impl<E: BindValue, const N: usize> BatchElements for [E; N] {
    type Element = E;

    fn for_each_element<F>(&self, f: F) -> Result<()>
    where
        F: FnMut(usize, &E) -> Result<()>,
    {
        visit_all(self.iter(), f)
    }
}

impl<E: BindValue> BatchElements for Vec<E> {
    type Element = E;

    fn for_each_element<F>(&self, f: F) -> Result<()>
    where
        F: FnMut(usize, &E) -> Result<()>,
    {
        visit_all(self.iter(), f)
    }
}

impl<E: BindValue> BatchElements for VecDeque<E> {
    type Element = E;

    fn for_each_element<F>(&self, f: F) -> Result<()>
    where
        F: FnMut(usize, &E) -> Result<()>,
    {
        visit_all(self.iter(), f)
    }
}

impl<E: BindValue> BatchElements for std::vec::IntoIter<E> {
    type Element = E;

    fn for_each_element<F>(&self, f: F) -> Result<()>
    where
        F: FnMut(usize, &E) -> Result<()>,
    {
        visit_all(self.as_slice().iter(), f)
    }
}
