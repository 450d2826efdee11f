//! Record shapes.
//!
//! The [`Record`] trait describes what columns a row type exposes and how to
//! read them. It is typically derived with `#[derive(Record)]`, but can be
//! implemented by hand.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::value::Value;

/// The type of value a column holds.
///
/// Filters are checked against it: a `text` filter on a number column is
/// rejected instead of matching nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Text,
    Number,
    Date,
    Boolean,
}

impl ColumnKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Number => "number",
            ColumnKind::Date => "date",
            ColumnKind::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed column of a record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column<'a> {
    /// Canonical (snake_case) name.
    pub name: &'a str,
    pub kind: ColumnKind,
}

impl<'a> Column<'a> {
    pub const fn new(name: &'a str, kind: ColumnKind) -> Self {
        Column { name, kind }
    }

    pub const fn text(name: &'a str) -> Self {
        Column::new(name, ColumnKind::Text)
    }

    pub const fn number(name: &'a str) -> Self {
        Column::new(name, ColumnKind::Number)
    }

    pub const fn date(name: &'a str) -> Self {
        Column::new(name, ColumnKind::Date)
    }

    pub const fn boolean(name: &'a str) -> Self {
        Column::new(name, ColumnKind::Boolean)
    }
}

/// A row type the grid can page over.
///
/// # Derive Usage
///
/// ```
/// use gridpage::{Column, Record, Value};
///
/// #[derive(Record)]
/// struct User {
///     #[grid(number)]
///     id: i64,
///     #[grid(text)]
///     full_name: Option<String>,
///     #[grid(boolean)]
///     is_verified: bool,
///     password_hash: String,
/// }
///
/// let user = User {
///     id: 1,
///     full_name: None,
///     is_verified: true,
///     password_hash: String::new(),
/// };
///
/// assert_eq!(
///     User::COLUMNS,
///     &[
///         Column::number("id"),
///         Column::text("full_name"),
///         Column::boolean("is_verified"),
///     ]
/// );
/// assert_eq!(user.field_value(User::FULL_NAME), Value::Null);
/// ```
///
/// # Manual Implementation
///
/// ```
/// use gridpage::{Column, Number, Record, Value};
///
/// struct User {
///     full_name: String,
///     age: u8,
/// }
///
/// impl Record for User {
///     const COLUMNS: &'static [Column<'static>] = &[Column::text("full_name"), Column::number("age")];
///
///     fn field_value(&self, column: &str) -> Value<'_> {
///         match column {
///             "full_name" => Value::Text(&self.full_name),
///             "age" => Value::Number(Number::from(self.age)),
///             _ => Value::Null,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// The filterable and sortable columns, by canonical (snake_case) name.
    const COLUMNS: &'static [Column<'static>];

    /// Returns the value of a column, or [`Value::Null`] for unknown columns.
    fn field_value(&self, column: &str) -> Value<'_>;
}

/// Conversion of date-like field types into the wall-clock date-time filters
/// are compared against.
///
/// Used by the derive macro for `#[grid(date)]` fields.
pub trait GridDate {
    fn grid_date(&self) -> NaiveDateTime;
}

impl GridDate for NaiveDateTime {
    fn grid_date(&self) -> NaiveDateTime {
        *self
    }
}

/// Dates compare as midnight of that day.
impl GridDate for NaiveDate {
    fn grid_date(&self) -> NaiveDateTime {
        self.and_time(NaiveTime::MIN)
    }
}

/// Zoned date-times compare by their local wall-clock time, which is what the
/// grid displays and sends back in filters.
impl<Tz: TimeZone> GridDate for DateTime<Tz> {
    fn grid_date(&self) -> NaiveDateTime {
        self.naive_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Number;
    use chrono::{FixedOffset, Utc};

    struct TestItem {
        name: String,
        count: i32,
    }

    impl Record for TestItem {
        const COLUMNS: &'static [Column<'static>] = &[Column::text("name"), Column::number("count")];

        fn field_value(&self, column: &str) -> Value<'_> {
            match column {
                "name" => Value::Text(&self.name),
                "count" => Value::Number(Number::from(self.count)),
                _ => Value::Null,
            }
        }
    }

    #[test]
    fn manual_impl() {
        let item = TestItem {
            name: "test".to_string(),
            count: 42,
        };

        assert_eq!(item.field_value("name"), Value::Text("test"));
        assert_eq!(item.field_value("count"), Value::Number(Number::I64(42)));
        assert_eq!(item.field_value("unknown"), Value::Null);
    }

    #[test]
    fn column_constructors() {
        assert_eq!(Column::date("on"), Column::new("on", ColumnKind::Date));
        assert_eq!(TestItem::COLUMNS[1].kind, ColumnKind::Number);
        assert_eq!(ColumnKind::Boolean.to_string(), "boolean");
    }

    #[test]
    fn naive_date_is_midnight() {
        let day = NaiveDate::from_ymd_opt(2019, 7, 4).unwrap();
        assert_eq!(
            day.grid_date(),
            day.and_hms_opt(0, 0, 0).unwrap()
        );
    }

    #[test]
    fn zoned_date_uses_local_time() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let local = NaiveDate::from_ymd_opt(2021, 11, 15)
            .unwrap()
            .and_hms_opt(4, 11, 44)
            .unwrap();
        let zoned = offset.from_local_datetime(&local).unwrap();
        assert_eq!(zoned.grid_date(), local);

        let utc = Utc.from_utc_datetime(&local);
        assert_eq!(utc.grid_date(), local);
    }
}
