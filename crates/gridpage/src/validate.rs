//! Request validation against a record shape.
//!
//! Column ids arrive in the grid's camelCase (`fullName`) while record
//! columns are snake_case (`full_name`); [`resolve_column`] maps one onto the
//! other. An id that already matches a column exactly is accepted as is.

use crate::error::ValidationError;
use crate::op::{Combinator, SortDirection};
use crate::record::Column;
use crate::request::RowRangeRequest;

/// Converts a camelCase or PascalCase column id to snake_case.
///
/// ```
/// assert_eq!(gridpage::to_snake_case("fullName"), "full_name");
/// assert_eq!(gridpage::to_snake_case("IsVerified"), "is_verified");
/// assert_eq!(gridpage::to_snake_case("age"), "age");
/// ```
pub fn to_snake_case(col_id: &str) -> String {
    let mut result = String::with_capacity(col_id.len() + 4);
    let mut prev_was_lower = false;

    for c in col_id.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.extend(c.to_lowercase());
            prev_was_lower = false;
        } else {
            result.push(c);
            prev_was_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }

    result
}

/// Finds the record column a grid column id refers to.
pub fn resolve_column<'a, 'c>(col_id: &str, columns: &'a [Column<'c>]) -> Option<&'a Column<'c>> {
    if let Some(exact) = columns.iter().find(|c| c.name == col_id) {
        return Some(exact);
    }
    let snake = to_snake_case(col_id);
    columns.iter().find(|c| c.name == snake)
}

/// Checks a request before compilation.
///
/// Reports, in order:
/// 1. every filter and sort column id that is not in `columns`, in one error
/// 2. the first unsupported sort direction
/// 3. the first unsupported combination operator
/// 4. an empty row range
pub fn validate(request: &RowRangeRequest, columns: &[Column<'_>]) -> Result<(), ValidationError> {
    let mut unknown: Vec<String> = Vec::new();
    let ids = request
        .filter_model
        .keys()
        .chain(request.sort_model.iter().map(|s| &s.col_id));
    for id in ids {
        if resolve_column(id, columns).is_none() && !unknown.contains(id) {
            unknown.push(id.clone());
        }
    }
    if !unknown.is_empty() {
        return Err(ValidationError::UnknownColumns(unknown));
    }

    if let Some(bad) = request
        .sort_model
        .iter()
        .find(|s| SortDirection::parse(&s.sort).is_none())
    {
        return Err(ValidationError::UnsupportedSortDirection {
            value: bad.sort.clone(),
        });
    }

    for (column, model) in &request.filter_model {
        if let Some(op) = model.combinator() {
            if Combinator::parse(op).is_none() {
                return Err(ValidationError::UnsupportedOperator {
                    column: column.clone(),
                    value: op.to_string(),
                });
            }
        }
    }

    if request.end_row <= request.start_row {
        return Err(ValidationError::EmptyRange {
            start_row: request.start_row,
            end_row: request.end_row,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ColumnKind;
    use crate::request::FilterModel;

    const COLUMNS: &[Column<'static>] = &[
        Column::number("id"),
        Column::text("full_name"),
        Column::date("registered_on"),
        Column::number("age"),
        Column::boolean("is_verified"),
    ];

    fn resolved(col_id: &str) -> Option<&'static str> {
        resolve_column(col_id, COLUMNS).map(|c| c.name)
    }

    #[test]
    fn snake_case_conversion() {
        assert_eq!(to_snake_case("fullName"), "full_name");
        assert_eq!(to_snake_case("registeredOn"), "registered_on");
        assert_eq!(to_snake_case("FullName"), "full_name");
        assert_eq!(to_snake_case("full_name"), "full_name");
        assert_eq!(to_snake_case("address2Line"), "address2_line");
        assert_eq!(to_snake_case("id"), "id");
    }

    #[test]
    fn resolves_exact_and_camel_case_ids() {
        assert_eq!(resolved("full_name"), Some("full_name"));
        assert_eq!(resolved("fullName"), Some("full_name"));
        assert_eq!(resolved("isVerified"), Some("is_verified"));
        assert_eq!(resolved("fullname"), None);
        assert_eq!(
            resolve_column("registeredOn", COLUMNS).map(|c| c.kind),
            Some(ColumnKind::Date)
        );
    }

    #[test]
    fn collects_every_unknown_column_once() {
        let request = RowRangeRequest::new(0, 10)
            .filter("nope", FilterModel::text("equals", "x"))
            .filter("fullName", FilterModel::text("equals", "x"))
            .sort("nope", "asc")
            .sort("other", "desc");

        assert_eq!(
            validate(&request, COLUMNS),
            Err(ValidationError::UnknownColumns(vec![
                "nope".to_string(),
                "other".to_string()
            ]))
        );
    }

    #[test]
    fn rejects_first_bad_sort_direction() {
        let request = RowRangeRequest::new(0, 10)
            .sort("age", "asc")
            .sort("fullName", "ascending")
            .sort("id", "up");

        assert_eq!(
            validate(&request, COLUMNS),
            Err(ValidationError::UnsupportedSortDirection {
                value: "ascending".to_string()
            })
        );
    }

    #[test]
    fn rejects_bad_combination_operator() {
        let request = RowRangeRequest::new(0, 10).filter(
            "fullName",
            FilterModel::combine(
                "XOR",
                FilterModel::text("contains", "a"),
                FilterModel::text("contains", "b"),
            ),
        );

        assert_eq!(
            validate(&request, COLUMNS),
            Err(ValidationError::UnsupportedOperator {
                column: "fullName".to_string(),
                value: "XOR".to_string()
            })
        );
    }

    #[test]
    fn empty_operator_is_a_plain_filter() {
        let mut model = FilterModel::text("contains", "a");
        model.operator = Some(String::new());
        let request = RowRangeRequest::new(0, 10).filter("fullName", model);
        assert_eq!(validate(&request, COLUMNS), Ok(()));
    }

    #[test]
    fn column_errors_take_precedence() {
        let request = RowRangeRequest::new(10, 10).sort("missing", "sideways");
        assert!(matches!(
            validate(&request, COLUMNS),
            Err(ValidationError::UnknownColumns(_))
        ));
    }

    #[test]
    fn rejects_empty_range() {
        assert_eq!(
            validate(&RowRangeRequest::new(10, 10), COLUMNS),
            Err(ValidationError::EmptyRange {
                start_row: 10,
                end_row: 10
            })
        );
        assert!(validate(&RowRangeRequest::new(10, 11), COLUMNS).is_ok());
    }
}
