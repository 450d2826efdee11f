//! Derive macros for gridpage.
//!
//! This crate provides [`Record`], which exposes a struct's fields as grid
//! columns so that gridpage can filter and sort in-memory rows.
//!
//! It is re-exported by `gridpage` behind the default `derive` feature and is
//! not meant to be used directly.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod record;

/// Derives the `Record` trait for grid rows.
///
/// Only fields carrying a column kind become columns. Everything else is
/// invisible to requests: naming it in a sort or filter model fails
/// validation with an unknown-column error.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `text` | Text field (`String`, `&str`, anything `AsRef<str>`) |
/// | `number` | Primitive numeric field |
/// | `date` | Field implementing `GridDate` (`NaiveDateTime`, `NaiveDate`, `DateTime<Tz>`) |
/// | `boolean` | `bool` field |
/// | `skip` | Exclude this field |
/// | `rename = "..."` | Use a custom column id |
///
/// Any of the kinds may wrap the type in `Option`; `None` reads as null.
///
/// # Generated Code
///
/// 1. Column id constants (e.g., `User::FULL_NAME`, `User::AGE`)
/// 2. `Record::COLUMNS`, listing each column id with its kind in declaration
///    order
/// 3. `Record::field_value()`
///
/// # Example
///
/// ```ignore
/// use gridpage::{Column, Record, RowRangeRequest};
///
/// #[derive(Clone, Record)]
/// struct User {
///     #[grid(text)]
///     full_name: Option<String>,
///
///     #[grid(number, rename = "years")]
///     age: u8,
///
///     #[grid(skip)]
///     password_hash: String,
/// }
///
/// assert_eq!(User::COLUMNS, &[Column::text("full_name"), Column::number("years")]);
///
/// let request = RowRangeRequest::new(0, 50).sort(User::YEARS, "desc");
/// ```
#[proc_macro_derive(Record, attributes(grid))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
