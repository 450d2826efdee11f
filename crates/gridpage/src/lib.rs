//! Gridpage - server-side row blocks for infinite-scrolling data grids.
//!
//! A grid in infinite mode asks its server for one block of rows at a time:
//! a row range, the user's sort order and a filter per column. Gridpage
//! turns such a request into a source-agnostic [`CompiledQuery`], runs it
//! against any [`RowSource`] with one row of lookahead, and answers with a
//! [`PageResult`] whose `lastRow` tells the grid when it has seen the end.
//!
//! # Quick Start
//!
//! ```rust
//! use gridpage::{fetch_block, FilterModel, MemorySource, QueryOptions, Record, RowRangeRequest};
//!
//! #[derive(Debug, Clone, Record)]
//! struct User {
//!     #[grid(number)]
//!     id: u32,
//!     #[grid(text)]
//!     full_name: String,
//!     #[grid(number)]
//!     age: u8,
//! }
//!
//! let users = vec![
//!     User { id: 1, full_name: "Ala Kowalska".into(), age: 22 },
//!     User { id: 2, full_name: "Jan Kowalski".into(), age: 55 },
//!     User { id: 3, full_name: "Ala Nowak".into(), age: 18 },
//! ];
//!
//! let request = RowRangeRequest::new(0, 2)
//!     .filter("fullName", FilterModel::text("startsWith", "Ala"))
//!     .sort("age", "asc");
//!
//! let page = fetch_block(&MemorySource::new(&users), &request, &QueryOptions::default()).unwrap();
//! let ids: Vec<u32> = page.rows_this_block.iter().map(|u| u.id).collect();
//! assert_eq!(ids, vec![3, 1]);
//! assert_eq!(page.last_row, Some(2));
//! ```
//!
//! # Pipeline
//!
//! ```text
//! request ─▶ validate ─▶ compile filters + sort ─▶ source.fetch(skip, take + 1)
//!                                                        │
//!                          PageResult ◀─ assemble ◀─ settle lookahead
//! ```
//!
//! - **Validation** rejects unknown columns (all of them at once), unsupported
//!   sort directions and unsupported combination operators.
//! - **Filters** of different columns are AND-ed. A column's filter is either
//!   one condition or two joined by `AND`/`OR`.
//! - **Lookahead**: the source is asked for one more row than requested. If
//!   it comes back, more data exists and `lastRow` stays `null`; otherwise
//!   `lastRow = startRow + rows received`.
//!
//! # Filter Kinds and Operators
//!
//! | Kind | Operators |
//! |------|-----------|
//! | `text` | `equals`, `notEqual`, `contains`, `notContains`, `startsWith`, `endsWith`, `null`, `notNull` |
//! | `number` | `equals`, `notEqual`, `lessThan`, `lessThanOrEqual`, `greaterThan`, `greaterThanOrEqual`, `inRange`, `null`, `notNull` |
//! | `date` | as `number`, with dates as `YYYY-MM-DD HH:mm:ss` |
//! | `boolean` | `equals`, `notEqual` |
//! | `set` | membership in `values` |
//!
//! Null handling follows SQL: apart from `null`/`notNull`, no test matches a
//! null field, negated ones included.
//!
//! # Options
//!
//! [`QueryOptions`] switches text and set filters to case-insensitive
//! matching and chooses whether `inRange` bounds are inclusive (the default)
//! or exclusive.
//!
//! # SQL Sources
//!
//! [`CompiledQuery::to_sql`] renders the plan as PostgreSQL fragments with
//! `$n` placeholders, for sources backed by a database.

mod compile;
mod engine;
mod error;
mod filter;
mod op;
mod options;
mod pager;
mod predicate;
mod record;
mod request;
mod result;
mod sort;
mod source;
mod sql;
mod validate;
mod value;

pub use compile::{compile, compile_for_columns, compile_node, CompiledQuery};
pub use engine::{fetch_block, fetch_block_async, fetch_block_json};
pub use error::{FetchError, GridError, Result, ValidationError};
pub use filter::{
    parse_date, BooleanFilter, FilterLeaf, FilterNode, RangeFilter, SetFilter, TextFilter,
    DATE_FORMAT,
};
pub use op::{Combinator, FilterKind, FilterOp, SortDirection};
pub use options::QueryOptions;
pub use pager::PageWindow;
pub use predicate::{Argument, Comparison, Condition, FieldRef, Predicate, Test, TextMatch};
pub use record::{Column, ColumnKind, GridDate, Record};
pub use request::{FilterModel, RowRangeRequest, SortModel};
pub use result::PageResult;
pub use sort::{compare_values, SortKey, SortOrder};
pub use source::{AsyncRowSource, MemorySource, RowSource};
pub use sql::{quote_identifier, SqlQuery};
pub use validate::{resolve_column, to_snake_case, validate};
pub use value::{Number, Value};

#[cfg(feature = "derive")]
pub use gridpage_macros::Record;
