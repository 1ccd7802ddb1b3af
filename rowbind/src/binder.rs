//! Parameter binder
//!
//! Binds a method argument to a [`Statement`]. Composite values are walked
//! property by property, each leaf bound under its dotted [`BindingPath`]
//! (`something.id`); scalars go straight to the statement's typed bind.

use std::fmt;

use tracing::{trace, warn};

use crate::config::UnnamedParameterPolicy;
use crate::error::{Error, Result};
use crate::statement::Statement;
use crate::traits::{BatchElements, BindValue, ToValue};
use crate::value::{Value, ValueKind};

/// Dotted chain of names identifying a nested bind target.
///
/// Segments are ordered outer-to-inner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingPath {
    joined: String,
}

impl BindingPath {
    /// A path with a single segment.
    pub fn root(name: &str) -> Self {
        Self {
            joined: name.to_string(),
        }
    }

    /// This path extended by `segment`.
    pub fn child(&self, segment: &str) -> Self {
        Self {
            joined: format!("{}.{}", self.joined, segment),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.joined
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.joined.split('.')
    }

    pub fn depth(&self) -> usize {
        self.segments().count()
    }
}

impl fmt::Display for BindingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined)
    }
}

/// A method parameter: its position in the call and its declared name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter<'a> {
    pub index: usize,
    pub name: Option<&'a str>,
}

impl<'a> Parameter<'a> {
    pub const fn named(index: usize, name: &'a str) -> Self {
        Self {
            index,
            name: Some(name),
        }
    }

    pub const fn unnamed(index: usize) -> Self {
        Self { index, name: None }
    }
}

/// Forwards leaf values of one argument to a statement.
pub struct Binder<'s> {
    statement: &'s mut dyn Statement,
    index: usize,
}

impl<'s> Binder<'s> {
    fn new(statement: &'s mut dyn Statement, index: usize) -> Self {
        Self { statement, index }
    }

    /// Bind a leaf value by name, or by the argument's position when there
    /// is no path.
    pub fn bind_scalar(
        &mut self,
        path: Option<&BindingPath>,
        value: Value,
        kind: ValueKind,
    ) -> Result<()> {
        match path {
            Some(path) => {
                trace!(name = %path, %kind, null = value.is_null(), "bind by name");
                self.statement.bind_by_name(path.as_str(), value, kind)
            }
            None => {
                trace!(index = self.index, %kind, null = value.is_null(), "bind by position");
                self.statement.bind_by_position(self.index, value, kind)
            }
        }
    }

    /// Bind a [`ToValue`] leaf; `None` binds a NULL of `T`'s kind.
    pub fn bind_scalar_value<T: ToValue + ?Sized>(
        &mut self,
        path: Option<&BindingPath>,
        value: Option<&T>,
    ) -> Result<()> {
        let value = value.map(ToValue::to_value).unwrap_or(Value::Null);
        self.bind_scalar(path, value, T::KIND)
    }

    /// Bind one property of a composite value under `parent.name`.
    pub fn bind_property<T: BindValue + ?Sized>(
        &mut self,
        parent: Option<&BindingPath>,
        name: &str,
        value: Option<&T>,
    ) -> Result<()> {
        match parent {
            Some(parent) => T::bind_at(value, Some(&parent.child(name)), self),
            // sub-items can't be bound by order
            None => Ok(()),
        }
    }
}

/// Bind one method argument to `statement`.
///
/// A named parameter binds at its name (recursing through composites). An
/// unnamed one fails with [`Error::Naming`] under
/// [`UnnamedParameterPolicy::Reject`]; under
/// [`UnnamedParameterPolicy::Positional`] it binds by index. Nothing is bound
/// when naming fails.
pub fn bind_argument<T: BindValue + ?Sized>(
    statement: &mut dyn Statement,
    parameter: Parameter<'_>,
    value: Option<&T>,
    policy: UnnamedParameterPolicy,
) -> Result<()> {
    let path = resolve_path(parameter, policy)?;
    if path.is_none() && T::COMPOSITE {
        warn!(
            index = parameter.index,
            "dropping unnamed composite argument; its properties cannot be bound by position"
        );
        return Ok(());
    }
    let mut binder = Binder::new(statement, parameter.index);
    T::bind_at(value, path.as_ref(), &mut binder)
}

/// Bind one element of a batch argument declared as container `C`.
///
/// The statement must be a batch part; the element type of `C` is bound in
/// place of the container type.
pub fn bind_batch_element<C: BatchElements + ?Sized>(
    statement: &mut dyn Statement,
    parameter: Parameter<'_>,
    element: Option<&C::Element>,
    policy: UnnamedParameterPolicy,
) -> Result<()> {
    if !statement.is_batch_part() {
        return Err(Error::Query(format!(
            "batch parameter #{} bound to a statement that is not part of a batch",
            parameter.index
        )));
    }
    bind_argument::<C::Element>(statement, parameter, element, policy)
}

fn resolve_path(
    parameter: Parameter<'_>,
    policy: UnnamedParameterPolicy,
) -> Result<Option<BindingPath>> {
    match (parameter.name, policy) {
        (Some(name), _) => Ok(Some(BindingPath::root(name))),
        (None, UnnamedParameterPolicy::Positional) => Ok(None),
        (None, UnnamedParameterPolicy::Reject) => Err(Error::Naming(parameter.index)),
    }
}
