//! Fluent statement builders for rowbind

use crate::batch::PreparedBatch;
use crate::binder::{bind_argument, Parameter};
use crate::config::UnnamedParameterPolicy;
use crate::error::{Error, Result};
use crate::statement::NamedStatement;
use crate::traits::{BatchElements, BindValue, ExecuteResult, Executor, FromValue, Record};

/// Bindings collected for one statement.
///
/// The first binding error is kept and reported when the statement is
/// taken; later bindings are skipped.
#[derive(Debug)]
struct Bindings {
    statement: NamedStatement,
    policy: UnnamedParameterPolicy,
    next_index: usize,
    error: Option<Error>,
}

impl Bindings {
    fn new(sql: String, policy: UnnamedParameterPolicy) -> Self {
        Self {
            statement: NamedStatement::new(sql),
            policy,
            next_index: 0,
            error: None,
        }
    }

    fn next_parameter<'a>(&mut self, name: Option<&'a str>) -> Parameter<'a> {
        let index = self.next_index;
        self.next_index += 1;
        Parameter { index, name }
    }

    fn bind<T: BindValue + ?Sized>(&mut self, parameter: Parameter<'_>, value: &T) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = bind_argument(&mut self.statement, parameter, Some(value), self.policy) {
            self.error = Some(e);
        }
    }

    fn finish(self) -> Result<NamedStatement> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.statement),
        }
    }
}

/// A query whose rows are mapped into records.
///
/// # Example
///
/// ```ignore
/// use rowbind::{MySqlHandle, SqlQuery};
///
/// async fn find_by_id(handle: &MySqlHandle, id: i32) -> rowbind::Result<Option<Thing>> {
///     SqlQuery::new("select id, name from something where id = :id")
///         .bind("id", &id)
///         .fetch_optional(handle)
///         .await
/// }
/// ```
#[derive(Debug)]
pub struct SqlQuery {
    bindings: Bindings,
}

impl SqlQuery {
    /// Create a query rejecting unnamed parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self::with_policy(sql, UnnamedParameterPolicy::default())
    }

    pub fn with_policy(sql: impl Into<String>, policy: UnnamedParameterPolicy) -> Self {
        Self {
            bindings: Bindings::new(sql.into(), policy),
        }
    }

    /// Bind the next parameter under `name`.
    ///
    /// Composite values bind each property as `name.property`.
    pub fn bind<T: BindValue + ?Sized>(mut self, name: &str, value: &T) -> Self {
        let parameter = self.bindings.next_parameter(Some(name));
        self.bindings.bind(parameter, value);
        self
    }

    /// Bind the next parameter without a name.
    pub fn bind_unnamed<T: BindValue + ?Sized>(mut self, value: &T) -> Self {
        let parameter = self.bindings.next_parameter(None);
        self.bindings.bind(parameter, value);
        self
    }

    /// Bind an explicitly described parameter.
    pub fn bind_parameter<T: BindValue + ?Sized>(
        mut self,
        parameter: Parameter<'_>,
        value: &T,
    ) -> Self {
        self.bindings.next_index = self.bindings.next_index.max(parameter.index + 1);
        self.bindings.bind(parameter, value);
        self
    }

    /// Get the SQL string.
    pub fn sql(&self) -> &str {
        self.bindings.statement.sql()
    }

    /// Take the bound statement, or the first binding error.
    pub fn into_statement(self) -> Result<NamedStatement> {
        self.bindings.finish()
    }

    /// Fetch all matching rows.
    pub async fn fetch_all<T: Record + Send, E: Executor>(self, executor: &E) -> Result<Vec<T>> {
        executor.fetch_all(self.into_statement()?).await
    }

    /// Fetch a single optional row.
    pub async fn fetch_optional<T: Record + Send, E: Executor>(
        self,
        executor: &E,
    ) -> Result<Option<T>> {
        executor.fetch_optional(self.into_statement()?).await
    }

    /// Fetch exactly one row.
    pub async fn fetch_one<T: Record + Send, E: Executor>(self, executor: &E) -> Result<T> {
        executor.fetch_one(self.into_statement()?).await
    }

    /// Fetch a scalar value (first column of first row).
    pub async fn fetch_scalar<T: FromValue + Send, E: Executor>(self, executor: &E) -> Result<T> {
        executor.fetch_scalar(self.into_statement()?).await
    }
}

/// A statement executed for its effect.
#[derive(Debug)]
pub struct SqlUpdate {
    bindings: Bindings,
}

impl SqlUpdate {
    pub fn new(sql: impl Into<String>) -> Self {
        Self::with_policy(sql, UnnamedParameterPolicy::default())
    }

    pub fn with_policy(sql: impl Into<String>, policy: UnnamedParameterPolicy) -> Self {
        Self {
            bindings: Bindings::new(sql.into(), policy),
        }
    }

    pub fn bind<T: BindValue + ?Sized>(mut self, name: &str, value: &T) -> Self {
        let parameter = self.bindings.next_parameter(Some(name));
        self.bindings.bind(parameter, value);
        self
    }

    pub fn bind_unnamed<T: BindValue + ?Sized>(mut self, value: &T) -> Self {
        let parameter = self.bindings.next_parameter(None);
        self.bindings.bind(parameter, value);
        self
    }

    pub fn bind_parameter<T: BindValue + ?Sized>(
        mut self,
        parameter: Parameter<'_>,
        value: &T,
    ) -> Self {
        self.bindings.next_index = self.bindings.next_index.max(parameter.index + 1);
        self.bindings.bind(parameter, value);
        self
    }

    pub fn sql(&self) -> &str {
        self.bindings.statement.sql()
    }

    pub fn into_statement(self) -> Result<NamedStatement> {
        self.bindings.finish()
    }

    /// Execute the statement and return the result.
    pub async fn execute<E: Executor>(self, executor: &E) -> Result<ExecuteResult> {
        executor.execute(self.into_statement()?).await
    }
}

/// A batch builder: container arguments are bound one element per part.
///
/// Bind the containers first; [`bind`](SqlBatch::bind) applies a shared
/// value to every part that exists at that point.
#[derive(Debug)]
pub struct SqlBatch {
    batch: PreparedBatch,
    policy: UnnamedParameterPolicy,
    next_index: usize,
    error: Option<Error>,
}

impl SqlBatch {
    pub fn new(sql: impl Into<String>) -> Self {
        Self::with_policy(sql, UnnamedParameterPolicy::default())
    }

    pub fn with_policy(sql: impl Into<String>, policy: UnnamedParameterPolicy) -> Self {
        Self {
            batch: PreparedBatch::new(sql),
            policy,
            next_index: 0,
            error: None,
        }
    }

    /// Bind the elements of `items` under `name`, one per part.
    pub fn bind_batch<C: BatchElements + ?Sized>(mut self, name: &str, items: &C) -> Self {
        let parameter = Parameter::named(self.next_index, name);
        self.next_index += 1;
        if self.error.is_none() {
            if let Err(e) = self.batch.bind_elements(parameter, items, self.policy) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Bind `value` under `name` into every part.
    pub fn bind<T: BindValue + ?Sized>(mut self, name: &str, value: &T) -> Self {
        let parameter = Parameter::named(self.next_index, name);
        self.next_index += 1;
        if self.error.is_none() {
            if let Err(e) = self.batch.bind_each(parameter, value, self.policy) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Take the bound batch, or the first binding error.
    pub fn into_batch(self) -> Result<PreparedBatch> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.batch),
        }
    }

    /// Execute every part of the batch.
    pub async fn execute<E: Executor>(self, executor: &E) -> Result<ExecuteResult> {
        let batch = self.into_batch()?;
        if batch.is_empty() {
            return Ok(ExecuteResult::default());
        }
        executor.execute_batch(batch).await
    }
}
