//! Predicate tree produced by the filter compiler.
//!
//! A [`Predicate`] is source-agnostic: the in-memory source evaluates it
//! directly with [`Predicate::matches`], and SQL-backed sources render it
//! with [`Predicate::to_sql`]. Arguments are kept in the tree;
//! their positional order is the order of a depth-first, left-to-right
//! traversal, exposed by [`Predicate::arguments`].
//!
//! Evaluation follows SQL's three-valued logic. Any test other than a null
//! test is *unknown* on a null field, `NOT unknown` stays unknown, and only
//! rows that evaluate to *true* match.

use std::borrow::Cow;
use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::record::Record;
use crate::value::{Number, Value};

/// A boolean expression over the columns of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Every child must hold.
    All(Vec<Predicate>),
    /// At least one child must hold.
    Any(Vec<Predicate>),
    Not(Box<Predicate>),
    Condition(Condition),
}

/// A single test of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: FieldRef,
    pub test: Test,
}

/// Reference to a column, optionally lower-cased before testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    pub column: String,
    pub fold_case: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Test {
    Compare(Comparison, Argument),
    /// Substring test; the argument is always [`Argument::Text`].
    Match(TextMatch, Argument),
    /// Membership; the argument is always [`Argument::TextSet`].
    In(Argument),
    IsNull,
    IsNotNull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Comparison {
    /// Evaluates a comparison given the ordering of field against argument.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Comparison::Eq => ordering == Ordering::Equal,
            Comparison::Ne => ordering != Ordering::Equal,
            Comparison::Gt => ordering == Ordering::Greater,
            Comparison::Gte => ordering != Ordering::Less,
            Comparison::Lt => ordering == Ordering::Less,
            Comparison::Lte => ordering != Ordering::Greater,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "<>",
            Comparison::Lt => "<",
            Comparison::Lte => "<=",
            Comparison::Gt => ">",
            Comparison::Gte => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextMatch {
    Contains,
    StartsWith,
    EndsWith,
}

impl TextMatch {
    fn eval(self, field: &str, pattern: &str) -> bool {
        match self {
            TextMatch::Contains => field.contains(pattern),
            TextMatch::StartsWith => field.starts_with(pattern),
            TextMatch::EndsWith => field.ends_with(pattern),
        }
    }
}

/// Owned argument value bound to a placeholder.
///
/// Serializes untagged, so the argument list can be handed to a driver or
/// logged as plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Argument {
    Text(String),
    Number(f64),
    #[serde(serialize_with = "serialize_date")]
    Date(NaiveDateTime),
    Bool(bool),
    TextSet(Vec<Option<String>>),
}

fn serialize_date<S: serde::Serializer>(
    date: &NaiveDateTime,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(crate::filter::DATE_FORMAT))
}

impl Predicate {
    /// Conjunction that collapses to its only child.
    pub fn all(mut children: Vec<Predicate>) -> Predicate {
        if children.len() == 1 {
            if let Some(only) = children.pop() {
                return only;
            }
        }
        Predicate::All(children)
    }

    pub fn condition(column: impl Into<String>, fold_case: bool, test: Test) -> Predicate {
        Predicate::Condition(Condition {
            field: FieldRef {
                column: column.into(),
                fold_case,
            },
            test,
        })
    }

    pub fn negate(self) -> Predicate {
        Predicate::Not(Box::new(self))
    }

    /// Returns `true` if the record satisfies this predicate.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.eval(record) == Some(true)
    }

    /// Three-valued evaluation: `None` is SQL's unknown.
    pub fn eval<R: Record + ?Sized>(&self, record: &R) -> Option<bool> {
        match self {
            Predicate::All(children) => {
                let mut result = Some(true);
                for child in children {
                    match child.eval(record) {
                        Some(false) => return Some(false),
                        None => result = None,
                        Some(true) => {}
                    }
                }
                result
            }
            Predicate::Any(children) => {
                let mut result = Some(false);
                for child in children {
                    match child.eval(record) {
                        Some(true) => return Some(true),
                        None => result = None,
                        Some(false) => {}
                    }
                }
                result
            }
            Predicate::Not(inner) => inner.eval(record).map(|b| !b),
            Predicate::Condition(condition) => {
                condition.eval(&record.field_value(&condition.field.column))
            }
        }
    }

    /// Positional arguments in placeholder order.
    pub fn arguments(&self) -> Vec<&Argument> {
        let mut out = Vec::new();
        self.collect_arguments(&mut out);
        out
    }

    fn collect_arguments<'a>(&'a self, out: &mut Vec<&'a Argument>) {
        match self {
            Predicate::All(children) | Predicate::Any(children) => {
                for child in children {
                    child.collect_arguments(out);
                }
            }
            Predicate::Not(inner) => inner.collect_arguments(out),
            Predicate::Condition(condition) => {
                if let Some(arg) = condition.test.argument() {
                    out.push(arg);
                }
            }
        }
    }
}

impl Test {
    /// The argument this test binds, if any.
    pub fn argument(&self) -> Option<&Argument> {
        match self {
            Test::Compare(_, arg) | Test::Match(_, arg) | Test::In(arg) => Some(arg),
            Test::IsNull | Test::IsNotNull => None,
        }
    }
}

impl Condition {
    /// Evaluates this condition against a field value.
    ///
    /// Mismatched types never match; they evaluate to `Some(false)`.
    pub fn eval(&self, value: &Value<'_>) -> Option<bool> {
        match (&self.test, value) {
            (Test::IsNull, value) => Some(value.is_null()),
            (Test::IsNotNull, value) => Some(!value.is_null()),
            (Test::In(Argument::TextSet(set)), Value::Null) => {
                set.contains(&None).then_some(true)
            }
            (_, Value::Null) => None,
            (Test::Compare(op, arg), value) => {
                Some(self.compare(value, arg).is_some_and(|o| op.eval_ordering(o)))
            }
            (Test::Match(kind, Argument::Text(pattern)), Value::Text(s)) => {
                Some(kind.eval(&self.fold(s), pattern))
            }
            (Test::In(Argument::TextSet(set)), Value::Text(s)) => {
                let field = self.fold(s);
                Some(set.iter().flatten().any(|v| *v == *field))
            }
            _ => Some(false),
        }
    }

    fn fold<'a>(&self, s: &'a str) -> Cow<'a, str> {
        if self.field.fold_case {
            Cow::Owned(s.to_lowercase())
        } else {
            Cow::Borrowed(s)
        }
    }

    fn compare(&self, value: &Value<'_>, arg: &Argument) -> Option<Ordering> {
        match (value, arg) {
            (Value::Text(s), Argument::Text(t)) => Some(self.fold(s).as_ref().cmp(t.as_str())),
            (Value::Number(n), Argument::Number(a)) => n.compare(Number::F64(*a)),
            (Value::Date(d), Argument::Date(a)) => Some(d.cmp(a)),
            (Value::Bool(b), Argument::Bool(a)) => Some(b.cmp(a)),
            _ => None,
        }
    }
}
