//! Paging entry points: validate, compile, fetch with lookahead, assemble.

use tracing::{debug, trace};

use crate::compile::{compile_for_columns, CompiledQuery};
use crate::error::FetchError;
use crate::options::QueryOptions;
use crate::pager::PageWindow;
use crate::record::Column;
use crate::request::RowRangeRequest;
use crate::result::PageResult;
use crate::source::{AsyncRowSource, RowSource};

/// Serves one block of rows from a blocking source.
///
/// Nothing is fetched when the request fails validation or compilation.
/// A source error is returned unchanged as [`FetchError::Source`].
pub fn fetch_block<S: RowSource>(
    source: &S,
    request: &RowRangeRequest,
    options: &QueryOptions,
) -> Result<PageResult<S::Row>, FetchError<S::Error>> {
    let (query, window) = prepare(source.columns(), request, options)?;
    let rows = source
        .fetch(&query, window.skip(), window.fetch_count())
        .map_err(FetchError::Source)?;
    Ok(finish(window, rows))
}

/// Serves one block of rows from an asynchronous source.
///
/// The source fetch is the only suspension point.
pub async fn fetch_block_async<S: AsyncRowSource>(
    source: &S,
    request: &RowRangeRequest,
    options: &QueryOptions,
) -> Result<PageResult<S::Row>, FetchError<S::Error>> {
    let (query, window) = prepare(source.columns(), request, options)?;
    let rows = source
        .fetch(&query, window.skip(), window.fetch_count())
        .await
        .map_err(FetchError::Source)?;
    Ok(finish(window, rows))
}

/// Serves one block of rows for a request given as the grid's JSON body.
pub fn fetch_block_json<S: RowSource>(
    source: &S,
    json: &str,
    options: &QueryOptions,
) -> Result<PageResult<S::Row>, FetchError<S::Error>> {
    let request = RowRangeRequest::from_json(json)?;
    fetch_block(source, &request, options)
}

fn prepare<E>(
    columns: &[Column<'_>],
    request: &RowRangeRequest,
    options: &QueryOptions,
) -> Result<(CompiledQuery, PageWindow), FetchError<E>> {
    let query = compile_for_columns(request, columns, options)?;
    let window = PageWindow::from_request(request)?;
    debug!(
        start_row = request.start_row,
        end_row = request.end_row,
        fetch_count = window.fetch_count(),
        "fetching row block"
    );
    if tracing::enabled!(tracing::Level::TRACE) {
        if let Some(predicate) = &query.predicate {
            let (sql, arguments) = predicate.to_sql();
            trace!(%sql, arguments = arguments.len(), "compiled predicate");
        }
    }
    Ok((query, window))
}

fn finish<R>(window: PageWindow, rows: Vec<R>) -> PageResult<R> {
    let received = rows.len();
    let page = window.assemble(rows);
    debug!(received, last_row = ?page.last_row, "assembled row block");
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GridError, ValidationError};
    use crate::record::Record;
    use crate::source::MemorySource;
    use crate::value::Value;
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(u32);

    impl Record for Row {
        const COLUMNS: &'static [Column<'static>] = &[Column::number("n")];

        fn field_value(&self, column: &str) -> Value<'_> {
            match column {
                "n" => self.0.into(),
                _ => Value::Null,
            }
        }
    }

    /// Records every window it is asked for.
    struct Spy {
        calls: Cell<Vec<(usize, usize)>>,
    }

    impl RowSource for Spy {
        type Row = Row;
        type Error = String;

        fn columns(&self) -> &[Column<'_>] {
            Row::COLUMNS
        }

        fn fetch(&self, _: &CompiledQuery, skip: usize, take: usize) -> Result<Vec<Row>, String> {
            let mut calls = self.calls.take();
            calls.push((skip, take));
            self.calls.set(calls);
            Err("unavailable".to_string())
        }
    }

    #[test]
    fn source_is_asked_for_one_extra_row() {
        let spy = Spy {
            calls: Cell::new(Vec::new()),
        };
        let err = fetch_block(&spy, &RowRangeRequest::new(100, 200), &QueryOptions::default())
            .unwrap_err();
        assert_eq!(err.source_error().map(String::as_str), Some("unavailable"));
        assert_eq!(spy.calls.take(), vec![(100, 101)]);
    }

    #[test]
    fn invalid_request_never_reaches_the_source() {
        let spy = Spy {
            calls: Cell::new(Vec::new()),
        };
        let request = RowRangeRequest::new(0, 10).sort("missing", "asc");
        let err = fetch_block(&spy, &request, &QueryOptions::default()).unwrap_err();
        assert!(matches!(
            err.query_error(),
            Some(GridError::Validation(ValidationError::UnknownColumns(_)))
        ));
        assert!(spy.calls.take().is_empty());
    }

    #[test]
    fn json_entry_point() {
        let rows: Vec<Row> = (1..=5).map(Row).collect();
        let source = MemorySource::new(&rows);
        let page = fetch_block_json(
            &source,
            r#"{"startRow": 0, "endRow": 2, "sortModel": [{"colId": "n", "sort": "desc"}]}"#,
            &QueryOptions::default(),
        )
        .unwrap();
        assert_eq!(page.rows_this_block, vec![Row(5), Row(4)]);
        assert_eq!(page.last_row, None);

        let err = fetch_block_json(&source, "not json", &QueryOptions::default()).unwrap_err();
        assert!(matches!(err.query_error(), Some(GridError::Json(_))));
    }
}
