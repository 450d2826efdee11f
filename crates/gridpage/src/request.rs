//! Wire model of a row-range request, as posted by the grid.
//!
//! Enumerated fields stay plain strings here so the validator can report
//! the exact offending value; the typed view lives in [`crate::filter`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One block request from an infinite-scrolling grid.
///
/// Rows `[start_row, end_row)` of the filtered, sorted data set are wanted.
///
/// # Example
///
/// ```
/// use gridpage::{FilterModel, RowRangeRequest};
///
/// let request = RowRangeRequest::new(0, 100)
///     .sort("fullName", "asc")
///     .filter("age", FilterModel::number("greaterThan", 18));
///
/// let json = r#"{
///     "startRow": 0,
///     "endRow": 100,
///     "sortModel": [{ "colId": "fullName", "sort": "asc" }],
///     "filterModel": {
///         "age": { "filterType": "number", "type": "greaterThan", "filter": 18 }
///     }
/// }"#;
/// assert_eq!(RowRangeRequest::from_json(json).unwrap(), request);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowRangeRequest {
    pub start_row: usize,
    pub end_row: usize,
    #[serde(default)]
    pub sort_model: Vec<SortModel>,
    #[serde(default)]
    pub filter_model: BTreeMap<String, FilterModel>,
}

impl RowRangeRequest {
    /// Creates a request for rows `[start_row, end_row)` with no sorting or
    /// filtering.
    pub fn new(start_row: usize, end_row: usize) -> Self {
        RowRangeRequest {
            start_row,
            end_row,
            ..Default::default()
        }
    }

    /// Parses the JSON body the grid posts.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Appends a sort key. Earlier keys take precedence.
    pub fn sort(mut self, col_id: impl Into<String>, sort: impl Into<String>) -> Self {
        self.sort_model.push(SortModel {
            col_id: col_id.into(),
            sort: sort.into(),
        });
        self
    }

    /// Sets the filter of one column, replacing any previous one.
    pub fn filter(mut self, col_id: impl Into<String>, model: FilterModel) -> Self {
        self.filter_model.insert(col_id.into(), model);
        self
    }

    /// Number of rows requested, `end_row - start_row`.
    pub fn take_count(&self) -> usize {
        self.end_row.saturating_sub(self.start_row)
    }
}

/// One entry of the grid's sort model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortModel {
    pub col_id: String,
    pub sort: String,
}

/// Filter of one column, either a single condition or two conditions joined
/// by `operator`.
///
/// Which fields are meaningful depends on `filter_type` and `type`:
/// text and number filters use `filter` (and `filter_to` for ranges), date
/// filters use `date_from`/`date_to`, set filters use `values`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_type: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_to: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition1: Option<Box<FilterModel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition2: Option<Box<FilterModel>>,
}

impl FilterModel {
    fn leaf(filter_type: &str, op: &str) -> Self {
        FilterModel {
            filter_type: Some(filter_type.to_string()),
            r#type: Some(op.to_string()),
            ..Default::default()
        }
    }

    // ========================================================================
    // Leaf builders
    // ========================================================================

    /// Text filter, e.g. `FilterModel::text("contains", "Kowal")`.
    pub fn text(op: &str, filter: &str) -> Self {
        FilterModel {
            filter: Some(filter.into()),
            ..Self::leaf("text", op)
        }
    }

    /// Number filter, e.g. `FilterModel::number("lessThan", 22.5)`.
    pub fn number(op: &str, filter: impl Into<serde_json::Value>) -> Self {
        FilterModel {
            filter: Some(filter.into()),
            ..Self::leaf("number", op)
        }
    }

    /// Number `inRange` filter.
    pub fn number_range(from: impl Into<serde_json::Value>, to: impl Into<serde_json::Value>) -> Self {
        FilterModel {
            filter: Some(from.into()),
            filter_to: Some(to.into()),
            ..Self::leaf("number", "inRange")
        }
    }

    /// Date filter; `date` uses the `YYYY-MM-DD HH:mm:ss` format.
    pub fn date(op: &str, date: &str) -> Self {
        FilterModel {
            date_from: Some(date.to_string()),
            ..Self::leaf("date", op)
        }
    }

    /// Date `inRange` filter.
    pub fn date_range(from: &str, to: &str) -> Self {
        FilterModel {
            date_from: Some(from.to_string()),
            date_to: Some(to.to_string()),
            ..Self::leaf("date", "inRange")
        }
    }

    /// Boolean filter.
    pub fn boolean(op: &str, filter: bool) -> Self {
        FilterModel {
            filter: Some(filter.into()),
            ..Self::leaf("boolean", op)
        }
    }

    /// Operand-less filter such as `null` or `notNull`.
    pub fn of_type(filter_type: &str, op: &str) -> Self {
        Self::leaf(filter_type, op)
    }

    /// Set filter accepting any of `values`; `None` accepts null fields.
    pub fn set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        FilterModel {
            filter_type: Some("set".to_string()),
            values: Some(values.into_iter().map(|v| v.map(Into::into)).collect()),
            ..Default::default()
        }
    }

    // ========================================================================
    // Combination builder
    // ========================================================================

    /// Joins two conditions with `operator` (`"AND"` or `"OR"`).
    ///
    /// The combination takes its `filterType` from the first condition.
    pub fn combine(operator: &str, condition1: FilterModel, condition2: FilterModel) -> Self {
        FilterModel {
            filter_type: condition1.filter_type.clone(),
            operator: Some(operator.to_string()),
            condition1: Some(Box::new(condition1)),
            condition2: Some(Box::new(condition2)),
            ..Default::default()
        }
    }

    /// The combination operator, if this model joins two conditions.
    ///
    /// An empty `operator` is treated as absent.
    pub fn combinator(&self) -> Option<&str> {
        self.operator.as_deref().filter(|op| !op.is_empty())
    }

    /// Returns `true` if this model joins two conditions.
    pub fn is_combination(&self) -> bool {
        self.combinator().is_some()
    }
}
