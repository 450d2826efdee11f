//! Rendering of compiled queries as PostgreSQL fragments.
//!
//! Every argument is bound through a `$n` placeholder, numbered in the same
//! order as [`Predicate::arguments`]. Identifiers are double-quoted. Substring
//! tests use `strpos`/`starts_with`/`right` instead of `LIKE`, so arguments
//! are passed through verbatim and need no wildcard escaping.

use crate::compile::CompiledQuery;
use crate::op::SortDirection;
use crate::predicate::{Argument, Condition, FieldRef, Predicate, Test, TextMatch};
use crate::sort::SortOrder;

/// SQL fragments for one compiled query.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    /// WHERE condition, without the keyword. `None` when nothing is filtered.
    pub predicate: Option<String>,
    /// ORDER BY list, without the keyword. `None` for natural order.
    pub order_by: Option<String>,
    /// Values for `$1..$n`.
    pub arguments: Vec<Argument>,
}

impl SqlQuery {
    /// Full statement reading `take` rows of `table` after skipping `skip`.
    ///
    /// Pass the pager's fetch count as `take` to keep the lookahead row.
    pub fn to_select(&self, table: &str, skip: usize, take: usize) -> String {
        let mut sql = format!("SELECT * FROM {}", quote_identifier(table));
        if let Some(predicate) = &self.predicate {
            sql.push_str(&format!(" WHERE {predicate}"));
        }
        if let Some(order_by) = &self.order_by {
            sql.push_str(&format!(" ORDER BY {order_by}"));
        }
        sql.push_str(&format!(" LIMIT {take} OFFSET {skip}"));
        sql
    }
}

impl CompiledQuery {
    /// Renders the predicate and ordering.
    ///
    /// ```
    /// use gridpage::{compile, FilterModel, QueryOptions, Record, RowRangeRequest};
    ///
    /// #[derive(Record)]
    /// struct User {
    ///     #[grid(text)]
    ///     full_name: String,
    ///     #[grid(number)]
    ///     age: u8,
    /// }
    ///
    /// let request = RowRangeRequest::new(0, 100)
    ///     .filter("age", FilterModel::number_range(18, 30))
    ///     .sort("fullName", "asc");
    /// let sql = compile::<User>(&request, &QueryOptions::default()).unwrap().to_sql();
    ///
    /// assert_eq!(sql.predicate.as_deref(), Some(r#""age" >= $1 AND "age" <= $2"#));
    /// assert_eq!(sql.order_by.as_deref(), Some(r#""full_name" ASC NULLS FIRST"#));
    /// assert_eq!(
    ///     sql.to_select("users", 0, 101),
    ///     r#"SELECT * FROM "users" WHERE "age" >= $1 AND "age" <= $2 ORDER BY "full_name" ASC NULLS FIRST LIMIT 101 OFFSET 0"#
    /// );
    /// ```
    pub fn to_sql(&self) -> SqlQuery {
        let (predicate, arguments) = match &self.predicate {
            Some(p) => {
                let (sql, arguments) = p.to_sql();
                (Some(sql), arguments)
            }
            None => (None, Vec::new()),
        };
        SqlQuery {
            predicate,
            order_by: self.ordering.to_sql(),
            arguments,
        }
    }
}

impl Predicate {
    /// Renders this predicate as a WHERE condition plus its arguments.
    pub fn to_sql(&self) -> (String, Vec<Argument>) {
        let mut writer = SqlWriter::default();
        writer.predicate(self, false);
        (writer.sql, writer.arguments)
    }
}

impl SortOrder {
    /// Renders the ORDER BY list, or `None` when there are no keys.
    ///
    /// Nulls are placed first ascending and last descending, matching the
    /// in-memory comparator.
    pub fn to_sql(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let keys: Vec<String> = self
            .keys()
            .iter()
            .map(|key| {
                let nulls = match key.direction {
                    SortDirection::Asc => "ASC NULLS FIRST",
                    SortDirection::Desc => "DESC NULLS LAST",
                };
                format!("{} {}", quote_identifier(&key.column), nulls)
            })
            .collect();
        Some(keys.join(", "))
    }
}

/// Double-quotes an identifier, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[derive(Default)]
struct SqlWriter {
    sql: String,
    arguments: Vec<Argument>,
}

impl SqlWriter {
    fn bind(&mut self, arg: &Argument) -> String {
        self.arguments.push(arg.clone());
        format!("${}", self.arguments.len())
    }

    fn predicate(&mut self, predicate: &Predicate, nested: bool) {
        match predicate {
            Predicate::All(children) => self.connective(children, " AND ", "TRUE", nested),
            Predicate::Any(children) => self.connective(children, " OR ", "FALSE", nested),
            Predicate::Not(inner) => {
                self.sql.push_str("NOT (");
                self.predicate(inner, false);
                self.sql.push(')');
            }
            Predicate::Condition(condition) => self.condition(condition),
        }
    }

    fn connective(&mut self, children: &[Predicate], joiner: &str, empty: &str, nested: bool) {
        if children.is_empty() {
            self.sql.push_str(empty);
            return;
        }
        let parens = nested && children.len() > 1;
        if parens {
            self.sql.push('(');
        }
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(joiner);
            }
            self.predicate(child, true);
        }
        if parens {
            self.sql.push(')');
        }
    }

    fn condition(&mut self, condition: &Condition) {
        let column = quote_identifier(&condition.field.column);
        let field = field_expr(&condition.field);
        let rendered = match &condition.test {
            Test::IsNull => format!("{column} IS NULL"),
            Test::IsNotNull => format!("{column} IS NOT NULL"),
            Test::Compare(op, arg) => format!("{field} {} {}", op.as_sql(), self.bind(arg)),
            Test::Match(kind, arg) => {
                let p = self.bind(arg);
                match kind {
                    TextMatch::Contains => format!("strpos({field}, {p}) > 0"),
                    TextMatch::StartsWith => format!("starts_with({field}, {p})"),
                    TextMatch::EndsWith => format!("right({field}, length({p})) = {p}"),
                }
            }
            Test::In(arg) => {
                let p = self.bind(arg);
                let accepts_null =
                    matches!(arg, Argument::TextSet(values) if values.contains(&None));
                if accepts_null {
                    format!("({field} = ANY({p}) OR {column} IS NULL)")
                } else {
                    format!("{field} = ANY({p})")
                }
            }
        };
        self.sql.push_str(&rendered);
    }
}

fn field_expr(field: &FieldRef) -> String {
    let column = quote_identifier(&field.column);
    if field.fold_case {
        format!("LOWER({column})")
    } else {
        column
    }
}
