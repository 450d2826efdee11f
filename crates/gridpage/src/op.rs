//! Enumerated wire vocabulary: filter kinds, filter operators, combination
//! operators and sort directions.
//!
//! Each enum parses from the exact spelling the grid sends and exposes the
//! list of supported spellings for error messages.

use std::cmp::Ordering;
use std::fmt;

use crate::record::ColumnKind;

/// Kind of a column filter, the grid's `filterType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Text,
    Number,
    Date,
    Boolean,
    Set,
}

impl FilterKind {
    pub const SUPPORTED: &'static [&'static str] = &["text", "number", "date", "boolean", "set"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(FilterKind::Text),
            "number" => Some(FilterKind::Number),
            "date" => Some(FilterKind::Date),
            "boolean" => Some(FilterKind::Boolean),
            "set" => Some(FilterKind::Set),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterKind::Text => "text",
            FilterKind::Number => "number",
            FilterKind::Date => "date",
            FilterKind::Boolean => "boolean",
            FilterKind::Set => "set",
        }
    }

    /// The column kind this filter applies to. Set filters match text.
    pub fn column_kind(self) -> ColumnKind {
        match self {
            FilterKind::Text | FilterKind::Set => ColumnKind::Text,
            FilterKind::Number => ColumnKind::Number,
            FilterKind::Date => ColumnKind::Date,
            FilterKind::Boolean => ColumnKind::Boolean,
        }
    }

    /// Operator spellings accepted for this kind.
    ///
    /// Set filters carry no operator and report an empty list.
    pub fn supported_operators(self) -> &'static [&'static str] {
        match self {
            FilterKind::Text => &[
                "equals",
                "notEqual",
                "contains",
                "notContains",
                "startsWith",
                "endsWith",
                "null",
                "notNull",
            ],
            FilterKind::Number | FilterKind::Date => &[
                "equals",
                "notEqual",
                "lessThan",
                "lessThanOrEqual",
                "greaterThan",
                "greaterThanOrEqual",
                "inRange",
                "null",
                "notNull",
            ],
            FilterKind::Boolean => &["equals", "notEqual"],
            FilterKind::Set => &[],
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter operator, the grid's `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOp {
    // Universal
    Equals,
    NotEqual,

    // Text
    Contains,
    NotContains,
    StartsWith,
    EndsWith,

    // Number and date
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    InRange,

    // Null tests
    Null,
    NotNull,
}

impl FilterOp {
    /// Parses the wire spelling. `blank`/`notBlank` are the grid's newer
    /// names for the null tests.
    pub fn parse(s: &str) -> Option<Self> {
        let op = match s {
            "equals" => FilterOp::Equals,
            "notEqual" => FilterOp::NotEqual,
            "contains" => FilterOp::Contains,
            "notContains" => FilterOp::NotContains,
            "startsWith" => FilterOp::StartsWith,
            "endsWith" => FilterOp::EndsWith,
            "lessThan" => FilterOp::LessThan,
            "lessThanOrEqual" => FilterOp::LessThanOrEqual,
            "greaterThan" => FilterOp::GreaterThan,
            "greaterThanOrEqual" => FilterOp::GreaterThanOrEqual,
            "inRange" => FilterOp::InRange,
            "null" | "blank" => FilterOp::Null,
            "notNull" | "notBlank" => FilterOp::NotNull,
            _ => return None,
        };
        Some(op)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterOp::Equals => "equals",
            FilterOp::NotEqual => "notEqual",
            FilterOp::Contains => "contains",
            FilterOp::NotContains => "notContains",
            FilterOp::StartsWith => "startsWith",
            FilterOp::EndsWith => "endsWith",
            FilterOp::LessThan => "lessThan",
            FilterOp::LessThanOrEqual => "lessThanOrEqual",
            FilterOp::GreaterThan => "greaterThan",
            FilterOp::GreaterThanOrEqual => "greaterThanOrEqual",
            FilterOp::InRange => "inRange",
            FilterOp::Null => "null",
            FilterOp::NotNull => "notNull",
        }
    }

    /// Returns `true` if this operator is valid for the given filter kind.
    pub fn applies_to(self, kind: FilterKind) -> bool {
        match kind {
            FilterKind::Text => matches!(
                self,
                FilterOp::Equals
                    | FilterOp::NotEqual
                    | FilterOp::Contains
                    | FilterOp::NotContains
                    | FilterOp::StartsWith
                    | FilterOp::EndsWith
                    | FilterOp::Null
                    | FilterOp::NotNull
            ),
            FilterKind::Number | FilterKind::Date => matches!(
                self,
                FilterOp::Equals
                    | FilterOp::NotEqual
                    | FilterOp::LessThan
                    | FilterOp::LessThanOrEqual
                    | FilterOp::GreaterThan
                    | FilterOp::GreaterThanOrEqual
                    | FilterOp::InRange
                    | FilterOp::Null
                    | FilterOp::NotNull
            ),
            FilterKind::Boolean => matches!(self, FilterOp::Equals | FilterOp::NotEqual),
            FilterKind::Set => false,
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator joining the two conditions of a combined filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    pub const SUPPORTED: &'static [&'static str] = &["AND", "OR"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "AND" => Some(Combinator::And),
            "OR" => Some(Combinator::Or),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Combinator::And => "AND",
            Combinator::Or => "OR",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const SUPPORTED: &'static [&'static str] = &["asc", "desc"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    /// Applies this direction to an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
