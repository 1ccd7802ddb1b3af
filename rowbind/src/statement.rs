//! Statements that accept named and positional bindings

use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};
use crate::value::{Value, ValueKind};

/// A statement that accepts typed bindings.
///
/// This is the seam the binder writes into. Implementations decide how
/// names and positions reach the database.
pub trait Statement {
    /// Bind `value` to the parameter called `name` (e.g. `something.id`).
    fn bind_by_name(&mut self, name: &str, value: Value, kind: ValueKind) -> Result<()>;

    /// Bind `value` to the positional parameter at `index` (0-based).
    fn bind_by_position(&mut self, index: usize, value: Value, kind: ValueKind) -> Result<()>;

    /// Whether this statement is one part of a batch.
    fn is_batch_part(&self) -> bool {
        false
    }
}

/// A value bound to a statement together with its declared kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub value: Value,
    pub kind: ValueKind,
}

/// SQL with `:name` placeholders (dotted names allowed) and/or `?`.
///
/// # Example
///
/// ```ignore
/// let mut stmt = NamedStatement::new("insert into something (id, name) values (:t.id, :t.name)");
/// stmt.bind_by_name("t.id", Value::I32(1), ValueKind::I32)?;
/// stmt.bind_by_name("t.name", Value::String("Brian".into()), ValueKind::String)?;
/// let (sql, params) = stmt.render()?;
/// assert_eq!(sql, "insert into something (id, name) values (?, ?)");
/// ```
#[derive(Debug, Clone)]
pub struct NamedStatement {
    sql: String,
    named: HashMap<String, Binding>,
    positional: BTreeMap<usize, Binding>,
    batch_part: bool,
}

impl NamedStatement {
    /// Create a new statement with the given SQL.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            named: HashMap::new(),
            positional: BTreeMap::new(),
            batch_part: false,
        }
    }

    /// Create a statement that is one part of a batch.
    pub(crate) fn batch_part(sql: impl Into<String>) -> Self {
        Self {
            batch_part: true,
            ..Self::new(sql)
        }
    }

    /// Get the SQL string.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The binding for `name`, if any.
    pub fn named(&self, name: &str) -> Option<&Binding> {
        self.named.get(name)
    }

    /// The binding at `index`, if any.
    pub fn positional(&self, index: usize) -> Option<&Binding> {
        self.positional.get(&index)
    }

    /// Number of bindings of either kind.
    pub fn binding_count(&self) -> usize {
        self.named.len() + self.positional.len()
    }

    /// Placeholder names in order of appearance; `?` placeholders are
    /// reported as `None`.
    pub fn placeholders(&self) -> Vec<Option<String>> {
        let mut found = Vec::new();
        scan(&self.sql, |token| {
            found.push(match token {
                Placeholder::Named(name) => Some(name.to_string()),
                Placeholder::Positional => None,
            });
        });
        found
    }

    /// Rewrite to positional `?` SQL and the ordered parameter list.
    ///
    /// Fails with [`Error::UnboundParameter`] when a placeholder has no
    /// binding. The n-th `?` takes the binding at position n.
    pub fn render(&self) -> Result<(String, Vec<Value>)> {
        let mut params = Vec::new();
        let mut missing = None;
        let mut next_position = 0;
        let sql = scan(&self.sql, |token| {
            let binding = match token {
                Placeholder::Named(name) => self
                    .named
                    .get(name)
                    .ok_or_else(|| format!(":{}", name)),
                Placeholder::Positional => {
                    let index = next_position;
                    next_position += 1;
                    self.positional
                        .get(&index)
                        .ok_or_else(|| format!("#{}", index))
                }
            };
            match binding {
                Ok(binding) => params.push(binding.value.clone()),
                Err(name) => {
                    missing.get_or_insert(name);
                }
            }
        });
        match missing {
            Some(name) => Err(Error::UnboundParameter(name)),
            None => Ok((sql, params)),
        }
    }
}

impl Statement for NamedStatement {
    fn bind_by_name(&mut self, name: &str, value: Value, kind: ValueKind) -> Result<()> {
        self.named.insert(name.to_string(), Binding { value, kind });
        Ok(())
    }

    fn bind_by_position(&mut self, index: usize, value: Value, kind: ValueKind) -> Result<()> {
        self.positional.insert(index, Binding { value, kind });
        Ok(())
    }

    fn is_batch_part(&self) -> bool {
        self.batch_part
    }
}

enum Placeholder<'a> {
    Named(&'a str),
    Positional,
}

/// Walk `sql`, replacing every placeholder outside quotes and comments with
/// `?` and reporting it to `on_placeholder`.
fn scan<'a>(sql: &'a str, mut on_placeholder: impl FnMut(Placeholder<'a>)) -> String {
    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len());
    let mut i = 0;
    let mut copied = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => {
                i += 1;
                while i < bytes.len() {
                    if bytes[i] == b'\\' {
                        i += 2;
                        continue;
                    }
                    if bytes[i] == quote {
                        // doubled quote is an escaped quote
                        if bytes.get(i + 1) == Some(&quote) {
                            i += 2;
                            continue;
                        }
                        break;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'#' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i += 2;
            }
            b':' if bytes.get(i + 1) == Some(&b':') => {
                i += 2;
            }
            b':' if bytes.get(i + 1).is_some_and(|b| is_name_start(*b)) => {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && (is_name_char(bytes[end]) || bytes[end] == b'.') {
                    end += 1;
                }
                // a trailing dot belongs to the surrounding SQL
                while bytes[end - 1] == b'.' {
                    end -= 1;
                }
                out.push_str(&sql[copied..i]);
                out.push('?');
                on_placeholder(Placeholder::Named(&sql[start..end]));
                i = end;
                copied = end;
            }
            b'?' => {
                out.push_str(&sql[copied..i]);
                out.push('?');
                on_placeholder(Placeholder::Positional);
                i += 1;
                copied = i;
            }
            _ => i += 1,
        }
    }

    out.push_str(&sql[copied.min(sql.len())..]);
    out
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_dotted_names() {
        let mut stmt = NamedStatement::new(
            "insert into something (id, name) values (:something.id, :something.name)",
        );
        stmt.bind_by_name("something.id", Value::I32(1), ValueKind::I32)
            .unwrap();
        stmt.bind_by_name(
            "something.name",
            Value::String("Brian".into()),
            ValueKind::String,
        )
        .unwrap();

        let (sql, params) = stmt.render().unwrap();
        assert_eq!(sql, "insert into something (id, name) values (?, ?)");
        assert_eq!(params, vec![Value::I32(1), Value::String("Brian".into())]);
    }

    #[test]
    fn test_repeated_name_binds_twice() {
        let mut stmt = NamedStatement::new("select * from t where a = :v or b = :v");
        stmt.bind_by_name("v", Value::I64(3), ValueKind::I64).unwrap();
        let (sql, params) = stmt.render().unwrap();
        assert_eq!(sql, "select * from t where a = ? or b = ?");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_positional_placeholders() {
        let mut stmt = NamedStatement::new("select * from t where id = ? and name = :name");
        stmt.bind_by_position(0, Value::I32(2), ValueKind::I32).unwrap();
        stmt.bind_by_name("name", Value::Null, ValueKind::String)
            .unwrap();
        let (_, params) = stmt.render().unwrap();
        assert_eq!(params, vec![Value::I32(2), Value::Null]);
    }

    #[test]
    fn test_unbound_parameter() {
        let stmt = NamedStatement::new("select * from t where id = :id");
        let err = stmt.render().unwrap_err();
        assert!(matches!(err, Error::UnboundParameter(name) if name == ":id"));

        let stmt = NamedStatement::new("select * from t where id = ?");
        assert!(matches!(
            stmt.render().unwrap_err(),
            Error::UnboundParameter(name) if name == "#0"
        ));
    }

    #[test]
    fn test_quotes_casts_and_comments_untouched() {
        let sql = "select ':nope', \"a?\", x::int, time '10:30' -- :c ?\nfrom t /* :d */ where id = :id.";
        let stmt = NamedStatement::new(sql);
        assert_eq!(stmt.placeholders(), vec![Some("id".to_string())]);

        let mut stmt = stmt;
        stmt.bind_by_name("id", Value::I32(1), ValueKind::I32).unwrap();
        let (rendered, _) = stmt.render().unwrap();
        assert_eq!(
            rendered,
            "select ':nope', \"a?\", x::int, time '10:30' -- :c ?\nfrom t /* :d */ where id = ?."
        );
    }

    #[test]
    fn test_null_binding_keeps_kind() {
        let mut stmt = NamedStatement::new("select :x");
        stmt.bind_by_name("x", Value::Null, ValueKind::Decimal).unwrap();
        assert_eq!(stmt.named("x").unwrap().kind, ValueKind::Decimal);
        assert_eq!(stmt.binding_count(), 1);
        assert!(!stmt.is_batch_part());
        assert!(NamedStatement::batch_part("select 1").is_batch_part());
    }
}
