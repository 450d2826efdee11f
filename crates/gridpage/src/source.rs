//! Data-source capabilities.
//!
//! A source receives the compiled query plus a skip/take window and returns
//! at most `take` rows. It never sees the lookahead logic: the pager asks
//! for one more row than the caller wants.

use std::convert::Infallible;
use std::future::{self, Future};

use crate::compile::CompiledQuery;
use crate::record::{Column, Record};

/// Blocking data source.
pub trait RowSource {
    type Row;
    type Error;

    /// Canonical columns requests are validated against.
    fn columns(&self) -> &[Column<'_>];

    /// Returns rows `[skip, skip + take)` of the filtered, ordered data.
    fn fetch(&self, query: &CompiledQuery, skip: usize, take: usize)
        -> Result<Vec<Self::Row>, Self::Error>;
}

/// Asynchronous data source, for stores reached over I/O.
pub trait AsyncRowSource {
    type Row;
    type Error;

    fn columns(&self) -> &[Column<'_>];

    fn fetch(
        &self,
        query: &CompiledQuery,
        skip: usize,
        take: usize,
    ) -> impl Future<Output = Result<Vec<Self::Row>, Self::Error>> + Send;
}

/// In-memory source over a slice of records.
///
/// Filters with the query's predicate, stable-sorts by its ordering (rows
/// that tie keep their slice order), then applies the window.
///
/// ```
/// use gridpage::{fetch_block, MemorySource, QueryOptions, Record, RowRangeRequest};
///
/// #[derive(Clone, Record)]
/// struct Row {
///     #[grid(number)]
///     n: u32,
/// }
///
/// let rows: Vec<Row> = (1..=5).map(|n| Row { n }).collect();
/// let source = MemorySource::new(&rows);
///
/// let page = fetch_block(&source, &RowRangeRequest::new(3, 6), &QueryOptions::default()).unwrap();
/// assert_eq!(page.rows_this_block.len(), 2);
/// assert_eq!(page.last_row, Some(5));
/// ```
#[derive(Debug)]
pub struct MemorySource<'a, R> {
    records: &'a [R],
}

impl<R> Clone for MemorySource<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for MemorySource<'_, R> {}

impl<'a, R: Record> MemorySource<'a, R> {
    pub fn new(records: &'a [R]) -> Self {
        MemorySource { records }
    }

    /// Matching records in query order, borrowed from the slice.
    pub fn select(&self, query: &CompiledQuery) -> Vec<&'a R> {
        let mut matched: Vec<&'a R> = self
            .records
            .iter()
            .filter(|record| query.matches(*record))
            .collect();
        query.ordering.sort(&mut matched);
        matched
    }
}

impl<R: Record + Clone> RowSource for MemorySource<'_, R> {
    type Row = R;
    type Error = Infallible;

    fn columns(&self) -> &[Column<'_>] {
        R::COLUMNS
    }

    fn fetch(&self, query: &CompiledQuery, skip: usize, take: usize) -> Result<Vec<R>, Infallible> {
        Ok(self
            .select(query)
            .into_iter()
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }
}

impl<R: Record + Clone + Send + Sync> AsyncRowSource for MemorySource<'_, R> {
    type Row = R;
    type Error = Infallible;

    fn columns(&self) -> &[Column<'_>] {
        R::COLUMNS
    }

    fn fetch(
        &self,
        query: &CompiledQuery,
        skip: usize,
        take: usize,
    ) -> impl Future<Output = Result<Vec<R>, Infallible>> + Send {
        future::ready(RowSource::fetch(self, query, skip, take))
    }
}
