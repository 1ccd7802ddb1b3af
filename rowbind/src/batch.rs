//! Prepared batches: one statement, many bound parts

use crate::binder::{bind_argument, bind_batch_element, Parameter};
use crate::config::UnnamedParameterPolicy;
use crate::error::Result;
use crate::statement::NamedStatement;
use crate::traits::{BatchElements, BindValue};

/// A batch of parts sharing one SQL string.
///
/// Each part is a [`NamedStatement`] that reports itself as a batch part,
/// so container arguments are bound element by element.
///
/// # Example
///
/// ```ignore
/// use rowbind::{Parameter, PreparedBatch, UnnamedParameterPolicy};
///
/// let things = vec![Thing { id: 1, name: "Brian".into() }, Thing { id: 2, name: "Keith".into() }];
/// let mut batch = PreparedBatch::new("insert into something (id, name) values (:thing.id, :thing.name)");
/// batch.bind_elements(Parameter::named(0, "thing"), &things, UnnamedParameterPolicy::Reject)?;
/// assert_eq!(batch.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PreparedBatch {
    sql: String,
    parts: Vec<NamedStatement>,
}

impl PreparedBatch {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            parts: Vec::new(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parts(&self) -> &[NamedStatement] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<NamedStatement> {
        self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Append an empty part and return it.
    pub fn add_part(&mut self) -> &mut NamedStatement {
        self.parts.push(NamedStatement::batch_part(self.sql.clone()));
        let last = self.parts.len() - 1;
        &mut self.parts[last]
    }

    /// Bind the i-th element of `items` into the i-th part, adding parts as
    /// needed.
    pub fn bind_elements<C: BatchElements + ?Sized>(
        &mut self,
        parameter: Parameter<'_>,
        items: &C,
        policy: UnnamedParameterPolicy,
    ) -> Result<()> {
        items.for_each_element(|i, element| {
            if i == self.parts.len() {
                self.add_part();
            }
            bind_batch_element::<C>(&mut self.parts[i], parameter, Some(element), policy)
        })
    }

    /// Bind `value` into every part created so far.
    pub fn bind_each<T: BindValue + ?Sized>(
        &mut self,
        parameter: Parameter<'_>,
        value: &T,
        policy: UnnamedParameterPolicy,
    ) -> Result<()> {
        for part in &mut self.parts {
            bind_argument(part, parameter, Some(value), policy)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::Statement;
    use crate::value::Value;

    #[test]
    fn test_one_part_per_element() {
        let names = vec!["Brian".to_string(), "Keith".to_string()];
        let mut batch = PreparedBatch::new("insert into something (name, tenant) values (:name, :tenant)");
        batch
            .bind_elements(
                Parameter::named(0, "name"),
                &names,
                UnnamedParameterPolicy::Reject,
            )
            .unwrap();
        batch
            .bind_each(Parameter::named(1, "tenant"), &7i32, UnnamedParameterPolicy::Reject)
            .unwrap();

        assert_eq!(batch.len(), 2);
        assert!(batch.parts().iter().all(|p| p.is_batch_part()));

        let (sql, params) = batch.parts()[1].render().unwrap();
        assert_eq!(sql, "insert into something (name, tenant) values (?, ?)");
        assert_eq!(params, vec![Value::String("Keith".into()), Value::I32(7)]);
    }

    #[test]
    fn test_empty_container_adds_no_parts() {
        let mut batch = PreparedBatch::new("insert into t (v) values (:v)");
        let empty: [i64; 0] = [];
        batch
            .bind_elements(Parameter::named(0, "v"), &empty[..], UnnamedParameterPolicy::Reject)
            .unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_unnamed_batch_parameter_rejected() {
        let mut batch = PreparedBatch::new("insert into t (v) values (?)");
        let err = batch
            .bind_elements(Parameter::unnamed(0), &vec![1i32], UnnamedParameterPolicy::Reject)
            .unwrap_err();
        assert!(matches!(err, crate::Error::Naming(0)));
    }

    #[test]
    fn test_unconsumed_iterator_elements() {
        let mut ids = vec![1i64, 2, 3].into_iter();
        ids.next();
        let mut batch = PreparedBatch::new("delete from t where id = :id");
        batch
            .bind_elements(Parameter::named(0, "id"), &ids, UnnamedParameterPolicy::Reject)
            .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.parts()[0].named("id").unwrap().value, Value::I64(2));
    }
}
