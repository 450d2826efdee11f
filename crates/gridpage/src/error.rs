//! Error types for the gridpage crate.
//!
//! Failures are split by stage: [`ValidationError`] for requests that name
//! unknown columns or carry unsupported enumerated values, [`GridError`] for
//! anything that stops a request from compiling, and [`FetchError`] for the
//! full paging pipeline, which also surfaces the data source's own error.

use thiserror::Error;

use crate::op::{Combinator, SortDirection};

/// Errors that can occur when building or compiling a row-range query.
#[derive(Debug, Error)]
pub enum GridError {
    /// The request failed validation against the record shape.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A filter is structurally malformed (missing or ill-typed operand,
    /// unparseable date, mismatched combination kinds) or its kind does not
    /// fit the column.
    #[error("invalid filter for column '{column}': {reason}")]
    InvalidFilter { column: String, reason: String },

    /// A filter names a kind or operator outside the supported set.
    #[error(
        "unsupported {field} value ({value}) for column '{column}'. Supported values: {}",
        .supported.join(", ")
    )]
    UnsupportedFilter {
        column: String,
        field: &'static str,
        value: String,
        supported: &'static [&'static str],
    },

    /// The request was not valid JSON for the wire model.
    #[error("malformed row range request: {0}")]
    Json(#[from] serde_json::Error),
}

impl GridError {
    pub(crate) fn invalid_filter(column: &str, reason: impl Into<String>) -> Self {
        GridError::InvalidFilter {
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}

/// Problems detected before any compilation takes place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Every filter or sort column id that is not part of the record shape.
    #[error("invalid colIds: {}", .0.join(", "))]
    UnknownColumns(Vec<String>),

    #[error(
        "unsupported sort value ({value}). Supported values: {}",
        SortDirection::SUPPORTED.join(", ")
    )]
    UnsupportedSortDirection { value: String },

    #[error(
        "unsupported operator value ({value}) for column '{column}'. Supported values: {}",
        Combinator::SUPPORTED.join(", ")
    )]
    UnsupportedOperator { column: String, value: String },

    /// `endRow` must be strictly greater than `startRow`.
    #[error("empty row range: endRow ({end_row}) must exceed startRow ({start_row})")]
    EmptyRange { start_row: usize, end_row: usize },
}

/// Error returned by the paging entry points.
///
/// The data source's error is carried through unmodified.
#[derive(Debug, Error)]
pub enum FetchError<E> {
    #[error(transparent)]
    Query(#[from] GridError),

    #[error(transparent)]
    Source(E),
}

impl<E> From<ValidationError> for FetchError<E> {
    fn from(err: ValidationError) -> Self {
        FetchError::Query(GridError::Validation(err))
    }
}

impl<E> FetchError<E> {
    /// Returns the query error, if the request never reached the source.
    pub fn query_error(&self) -> Option<&GridError> {
        match self {
            FetchError::Query(err) => Some(err),
            FetchError::Source(_) => None,
        }
    }

    /// Returns the source error, if the data source failed.
    pub fn source_error(&self) -> Option<&E> {
        match self {
            FetchError::Query(_) => None,
            FetchError::Source(err) => Some(err),
        }
    }
}

/// Result type for gridpage operations.
pub type Result<T> = std::result::Result<T, GridError>;
