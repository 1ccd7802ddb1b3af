//! Constructor-based row mapping
//!
//! A [`RowMapper`] matches the columns of a row to the parameters of a
//! target type's designated constructor by case-insensitive name, decodes
//! each matched column with the decoder registered for the parameter's
//! declared type, and hands the collected [`ConstructorArguments`] to
//! [`Record::construct`].

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::decoder::{Decoded, StatementContext};
use crate::error::{Error, Result};
use crate::introspect::{DescriptorCache, TypeDescriptor};
use crate::traits::{Record, Row};

/// A value supplied for one constructor parameter.
pub enum Argument {
    /// A decoded column value of the parameter's declared type.
    Value(Decoded),
    /// An explicit null.
    Null,
}

/// Arguments for a designated constructor, keyed by parameter name.
///
/// Parameters that were omitted (non-nullable with a default, or simply
/// missing) have no entry.
pub struct ConstructorArguments {
    target: &'static str,
    args: HashMap<&'static str, Argument>,
}

impl ConstructorArguments {
    pub fn new(target: &'static str) -> Self {
        Self {
            target,
            args: HashMap::new(),
        }
    }

    /// Name of the type being constructed.
    pub fn target(&self) -> &'static str {
        self.target
    }

    pub fn insert(&mut self, name: &'static str, argument: Argument) {
        self.args.insert(name, argument);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.args.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn take(&mut self, name: &str) -> Option<Argument> {
        self.args.remove(name)
    }

    /// Value of a parameter that is neither nullable nor defaulted.
    pub fn required<T: Any>(&mut self, name: &str) -> Result<T> {
        match self.take(name) {
            Some(Argument::Value(value)) => downcast(name, value),
            Some(Argument::Null) => Err(Error::UnexpectedNull(name.to_string())),
            None => Err(Error::MissingArgument {
                target: self.target,
                parameter: name.to_string(),
            }),
        }
    }

    /// Value of a non-nullable defaulted parameter; `None` means the
    /// constructor's default applies.
    pub fn defaulted<T: Any>(&mut self, name: &str) -> Result<Option<T>> {
        match self.take(name) {
            Some(Argument::Value(value)) => downcast(name, value).map(Some),
            Some(Argument::Null) => Err(Error::UnexpectedNull(name.to_string())),
            None => Ok(None),
        }
    }

    /// Value of a parameter declared as `Option<I>`.
    ///
    /// The outer `None` means the argument was omitted; `Some(None)` is an
    /// explicit null.
    pub fn nullable<I: Any>(&mut self, name: &str) -> Result<Option<Option<I>>> {
        match self.take(name) {
            Some(Argument::Value(value)) => downcast::<Option<I>>(name, value).map(Some),
            Some(Argument::Null) => Ok(Some(None)),
            None => Ok(None),
        }
    }
}

fn downcast<T: Any>(name: &str, value: Decoded) -> Result<T> {
    value
        .downcast::<T>()
        .map(|v| *v)
        .map_err(|_| Error::TypeConversion {
            expected: type_name::<T>(),
            actual: format!("decoded value of another type for `{}`", name),
        })
}

/// Maps rows into instances of `T`.
pub struct RowMapper<T> {
    descriptor: Arc<TypeDescriptor>,
    by_name: HashMap<String, usize>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> RowMapper<T> {
    /// Create a mapper, describing `T` through `cache`.
    pub fn new(cache: &DescriptorCache) -> Result<Self> {
        let descriptor = cache.describe::<T>()?;
        let by_name = descriptor
            .parameters()?
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.to_lowercase(), i))
            .collect();
        debug!(
            target_type = descriptor.type_name(),
            parameters = descriptor.parameters()?.len(),
            "created row mapper"
        );
        Ok(Self {
            descriptor,
            by_name,
            _marker: PhantomData,
        })
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Map the row at `row_index` into a `T`.
    pub fn map(&self, row_index: usize, row: &dyn Row, ctx: &StatementContext) -> Result<T> {
        let target = self.descriptor.type_name();
        let parameters = self.descriptor.parameters()?;

        // right to left, so the leftmost of two columns folding to the
        // same name is the one kept
        let mut columns: Vec<Option<&str>> = vec![None; parameters.len()];
        for i in (0..row.column_count()).rev() {
            if let Some(label) = row.column_label(i) {
                if let Some(&p) = self.by_name.get(&label.to_lowercase()) {
                    columns[p] = Some(label);
                }
            }
        }

        let mut args = ConstructorArguments::new(target);
        for (parameter, column) in parameters.iter().zip(columns) {
            match column {
                Some(column) => {
                    let decoder = ctx
                        .find_decoder_for(&parameter.declared)
                        .ok_or_else(|| Error::NoDecoder(parameter.declared.name()))?;
                    let value = decoder.decode(row, column, ctx)?;
                    args.insert(parameter.name, Argument::Value(value));
                }
                None if parameter.nullable => args.insert(parameter.name, Argument::Null),
                None => {}
            }
        }

        trace!(row = row_index, target_type = target, "mapping row");
        T::construct(args).map_err(|e| match e {
            e @ Error::MissingArgument { .. } => e,
            other => Error::mapping(target, other),
        })
    }
}
