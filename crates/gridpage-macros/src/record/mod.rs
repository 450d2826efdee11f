//! Implementation of the `#[derive(Record)]` macro.
//!
//! Maps annotated struct fields to grid columns and generates the field
//! accessor the filter and sort engines read through.

mod attrs;
mod derive;

pub use derive::record_derive_impl;
