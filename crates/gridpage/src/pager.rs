//! Lookahead pagination.
//!
//! A block of `take` rows is served by asking the source for `take + 1`.
//! Getting the extra row back proves more data exists; getting `take` or
//! fewer proves the end of the data was reached, which fixes `lastRow`.

use crate::error::ValidationError;
use crate::request::RowRangeRequest;
use crate::result::PageResult;

/// The row window of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    start_row: usize,
    take_count: usize,
}

impl PageWindow {
    /// Window `[start_row, end_row)`. Fails when the range is empty.
    pub fn new(start_row: usize, end_row: usize) -> Result<Self, ValidationError> {
        if end_row <= start_row {
            return Err(ValidationError::EmptyRange { start_row, end_row });
        }
        Ok(PageWindow {
            start_row,
            take_count: end_row - start_row,
        })
    }

    pub fn from_request(request: &RowRangeRequest) -> Result<Self, ValidationError> {
        PageWindow::new(request.start_row, request.end_row)
    }

    /// Rows to skip at the source.
    pub fn skip(&self) -> usize {
        self.start_row
    }

    /// Rows the caller asked for.
    pub fn take_count(&self) -> usize {
        self.take_count
    }

    /// Rows to request from the source, one more than asked for.
    pub fn fetch_count(&self) -> usize {
        self.take_count.saturating_add(1)
    }

    /// Trims the lookahead row and works out `lastRow`.
    ///
    /// Sources returning more than `fetch_count` rows are tolerated; the
    /// surplus is dropped like the lookahead row.
    pub fn settle<R>(&self, mut rows: Vec<R>) -> (Vec<R>, Option<usize>) {
        if rows.len() <= self.take_count {
            let last_row = self.start_row.saturating_add(rows.len());
            (rows, Some(last_row))
        } else {
            rows.truncate(self.take_count);
            (rows, None)
        }
    }

    /// Settles `rows` and packages them as a [`PageResult`].
    pub fn assemble<R>(&self, rows: Vec<R>) -> PageResult<R> {
        let (rows, last_row) = self.settle(rows);
        PageResult::new(rows, last_row)
    }
}
