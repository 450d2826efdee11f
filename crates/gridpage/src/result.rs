//! Paging response.

use serde::{Deserialize, Serialize};

/// One block of rows, in the shape the grid's datasource callback expects.
///
/// `last_row` is the total row count once the end of the data is known and
/// `None` while more rows may follow. It serializes as `null`, never omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<R> {
    pub rows_this_block: Vec<R>,
    pub last_row: Option<usize>,
}

impl<R> PageResult<R> {
    pub fn new(rows_this_block: Vec<R>, last_row: Option<usize>) -> Self {
        PageResult {
            rows_this_block,
            last_row,
        }
    }

    /// Returns `true` once the end of the data has been reached.
    pub fn is_last_block(&self) -> bool {
        self.last_row.is_some()
    }

    /// Converts every row, e.g. from an entity into a view model.
    pub fn map<T>(self, f: impl FnMut(R) -> T) -> PageResult<T> {
        PageResult {
            rows_this_block: self.rows_this_block.into_iter().map(f).collect(),
            last_row: self.last_row,
        }
    }
}
