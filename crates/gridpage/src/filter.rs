//! Typed filter tree.
//!
//! [`FilterNode::from_model`] turns the grid's loosely-typed
//! [`FilterModel`] into a tree whose leaves carry operands of the right type,
//! so that compiling it can no longer fail.

use chrono::NaiveDateTime;

use crate::error::{GridError, Result, ValidationError};
use crate::op::{Combinator, FilterKind, FilterOp};
use crate::request::FilterModel;

/// Format of every date the grid sends.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Filter of one column: a single condition, or two joined by AND/OR.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    Leaf(FilterLeaf),
    Combination {
        operator: Combinator,
        left: FilterLeaf,
        right: FilterLeaf,
    },
}

/// A single condition with its operands.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterLeaf {
    Text(TextFilter),
    Number(RangeFilter<f64>),
    Date(RangeFilter<NaiveDateTime>),
    Boolean(BooleanFilter),
    Set(SetFilter),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextFilter {
    Equals(String),
    NotEqual(String),
    Contains(String),
    NotContains(String),
    StartsWith(String),
    EndsWith(String),
    Null,
    NotNull,
}

/// Condition over an ordered domain (numbers and dates).
#[derive(Debug, Clone, PartialEq)]
pub enum RangeFilter<T> {
    Equals(T),
    NotEqual(T),
    LessThan(T),
    LessThanOrEqual(T),
    GreaterThan(T),
    GreaterThanOrEqual(T),
    InRange(T, T),
    Null,
    NotNull,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BooleanFilter {
    Equals(bool),
    NotEqual(bool),
}

/// Membership in a list of accepted values. `None` accepts null fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SetFilter {
    pub values: Vec<Option<String>>,
}

impl FilterNode {
    /// Parses the filter of `column`.
    pub fn from_model(column: &str, model: &FilterModel) -> Result<Self> {
        let Some(operator) = model.combinator() else {
            return Ok(FilterNode::Leaf(FilterLeaf::from_model(column, model, None)?));
        };

        let operator =
            Combinator::parse(operator).ok_or_else(|| ValidationError::UnsupportedOperator {
                column: column.to_string(),
                value: operator.to_string(),
            })?;
        let parent = model
            .filter_type
            .as_deref()
            .map(|kind| parse_kind(column, kind))
            .transpose()?;

        let condition = |model: &Option<Box<FilterModel>>, name: &str| -> Result<FilterLeaf> {
            let model = model.as_deref().ok_or_else(|| {
                GridError::invalid_filter(column, format!("{operator} filter is missing {name}"))
            })?;
            if model.is_combination() {
                return Err(GridError::invalid_filter(
                    column,
                    format!("{name} cannot itself be a combination"),
                ));
            }
            FilterLeaf::from_model(column, model, parent)
        };

        Ok(FilterNode::Combination {
            operator,
            left: condition(&model.condition1, "condition1")?,
            right: condition(&model.condition2, "condition2")?,
        })
    }

    /// The conditions of this node, left to right.
    pub fn leaves(&self) -> Vec<&FilterLeaf> {
        match self {
            FilterNode::Leaf(leaf) => vec![leaf],
            FilterNode::Combination { left, right, .. } => vec![left, right],
        }
    }
}

impl FilterLeaf {
    /// The filter kind this condition was parsed as.
    pub fn kind(&self) -> FilterKind {
        match self {
            FilterLeaf::Text(_) => FilterKind::Text,
            FilterLeaf::Number(_) => FilterKind::Number,
            FilterLeaf::Date(_) => FilterKind::Date,
            FilterLeaf::Boolean(_) => FilterKind::Boolean,
            FilterLeaf::Set(_) => FilterKind::Set,
        }
    }

    /// Parses a single condition. `inherited` is the kind of the enclosing
    /// combination, used when the condition does not name its own.
    pub fn from_model(
        column: &str,
        model: &FilterModel,
        inherited: Option<FilterKind>,
    ) -> Result<Self> {
        let kind = match (model.filter_type.as_deref(), inherited) {
            (Some(own), inherited) => {
                let own = parse_kind(column, own)?;
                if let Some(parent) = inherited.filter(|parent| *parent != own) {
                    return Err(GridError::invalid_filter(
                        column,
                        format!("condition of kind {own} inside a {parent} filter"),
                    ));
                }
                own
            }
            (None, Some(parent)) => parent,
            (None, None) => {
                return Err(GridError::invalid_filter(column, "missing filterType"));
            }
        };

        let operands = Operands { column, model };
        let op = || parse_op(column, kind, model.r#type.as_deref());

        // Operators are checked against the kind by `parse_op`, so the
        // catch-all arms below only see the remaining valid operator.
        let leaf = match kind {
            FilterKind::Set => FilterLeaf::Set(SetFilter {
                values: operands.values()?,
            }),
            FilterKind::Text => FilterLeaf::Text(match op()? {
                FilterOp::Equals => TextFilter::Equals(operands.text()?),
                FilterOp::NotEqual => TextFilter::NotEqual(operands.text()?),
                FilterOp::Contains => TextFilter::Contains(operands.text()?),
                FilterOp::NotContains => TextFilter::NotContains(operands.text()?),
                FilterOp::StartsWith => TextFilter::StartsWith(operands.text()?),
                FilterOp::EndsWith => TextFilter::EndsWith(operands.text()?),
                FilterOp::Null => TextFilter::Null,
                _ => TextFilter::NotNull,
            }),
            FilterKind::Number => FilterLeaf::Number(range_filter(
                op()?,
                || operands.number(),
                || operands.number_to(),
            )?),
            FilterKind::Date => FilterLeaf::Date(range_filter(
                op()?,
                || operands.date_from(),
                || operands.date_to(),
            )?),
            FilterKind::Boolean => FilterLeaf::Boolean(match op()? {
                FilterOp::Equals => BooleanFilter::Equals(operands.boolean()?),
                _ => BooleanFilter::NotEqual(operands.boolean()?),
            }),
        };
        Ok(leaf)
    }
}

fn parse_kind(column: &str, kind: &str) -> Result<FilterKind> {
    FilterKind::parse(kind).ok_or_else(|| GridError::UnsupportedFilter {
        column: column.to_string(),
        field: "filterType",
        value: kind.to_string(),
        supported: FilterKind::SUPPORTED,
    })
}

fn parse_op(column: &str, kind: FilterKind, op: Option<&str>) -> Result<FilterOp> {
    let op = op.ok_or_else(|| GridError::invalid_filter(column, format!("{kind} filter is missing type")))?;
    FilterOp::parse(op)
        .filter(|parsed| parsed.applies_to(kind))
        .ok_or_else(|| GridError::UnsupportedFilter {
            column: column.to_string(),
            field: "type",
            value: op.to_string(),
            supported: kind.supported_operators(),
        })
}

fn range_filter<T>(
    op: FilterOp,
    from: impl Fn() -> Result<T>,
    to: impl Fn() -> Result<T>,
) -> Result<RangeFilter<T>> {
    Ok(match op {
        FilterOp::Equals => RangeFilter::Equals(from()?),
        FilterOp::NotEqual => RangeFilter::NotEqual(from()?),
        FilterOp::LessThan => RangeFilter::LessThan(from()?),
        FilterOp::LessThanOrEqual => RangeFilter::LessThanOrEqual(from()?),
        FilterOp::GreaterThan => RangeFilter::GreaterThan(from()?),
        FilterOp::GreaterThanOrEqual => RangeFilter::GreaterThanOrEqual(from()?),
        FilterOp::InRange => RangeFilter::InRange(from()?, to()?),
        FilterOp::Null => RangeFilter::Null,
        _ => RangeFilter::NotNull,
    })
}

/// Typed access to the operand fields of a wire filter.
struct Operands<'a> {
    column: &'a str,
    model: &'a FilterModel,
}

impl Operands<'_> {
    fn values(&self) -> Result<Vec<Option<String>>> {
        self.model
            .values
            .clone()
            .ok_or_else(|| self.invalid("set filter is missing values"))
    }

    fn text(&self) -> Result<String> {
        match &self.model.filter {
            Some(serde_json::Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(self.invalid(format!("expected a text filter value, got {other}"))),
            None => Err(self.invalid("text filter is missing filter")),
        }
    }

    fn number(&self) -> Result<f64> {
        self.as_number(self.model.filter.as_ref(), "filter")
    }

    fn number_to(&self) -> Result<f64> {
        self.as_number(self.model.filter_to.as_ref(), "filterTo")
    }

    fn as_number(&self, value: Option<&serde_json::Value>, name: &str) -> Result<f64> {
        match value {
            Some(v) => v
                .as_f64()
                .ok_or_else(|| self.invalid(format!("expected a number in {name}, got {v}"))),
            None => Err(self.invalid(format!("number filter is missing {name}"))),
        }
    }

    fn boolean(&self) -> Result<bool> {
        match &self.model.filter {
            Some(serde_json::Value::Bool(b)) => Ok(*b),
            Some(other) => Err(self.invalid(format!("expected a boolean filter value, got {other}"))),
            None => Err(self.invalid("boolean filter is missing filter")),
        }
    }

    fn date_from(&self) -> Result<NaiveDateTime> {
        self.as_date(self.model.date_from.as_deref(), "dateFrom")
    }

    fn date_to(&self) -> Result<NaiveDateTime> {
        self.as_date(self.model.date_to.as_deref(), "dateTo")
    }

    fn as_date(&self, value: Option<&str>, name: &str) -> Result<NaiveDateTime> {
        let value = value.ok_or_else(|| self.invalid(format!("date filter is missing {name}")))?;
        parse_date(value).ok_or_else(|| {
            self.invalid(format!(
                "cannot parse {name} '{value}', expected YYYY-MM-DD HH:mm:ss"
            ))
        })
    }

    fn invalid(&self, reason: impl Into<String>) -> GridError {
        GridError::invalid_filter(self.column, reason)
    }
}

/// Parses a date in the grid's `YYYY-MM-DD HH:mm:ss` format.
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDateTime {
        parse_date(s).unwrap()
    }

    #[test]
    fn text_leaf() {
        let node = FilterNode::from_model("fullName", &FilterModel::text("contains", "Kowal")).unwrap();
        assert_eq!(
            node,
            FilterNode::Leaf(FilterLeaf::Text(TextFilter::Contains("Kowal".into())))
        );
    }

    #[test]
    fn number_range_leaf() {
        let node = FilterNode::from_model("age", &FilterModel::number_range(16, 22)).unwrap();
        assert_eq!(
            node,
            FilterNode::Leaf(FilterLeaf::Number(RangeFilter::InRange(16.0, 22.0)))
        );
    }

    #[test]
    fn date_leaf() {
        let node =
            FilterNode::from_model("registeredOn", &FilterModel::date("lessThan", "2019-07-04 00:00:00"))
                .unwrap();
        assert_eq!(
            node,
            FilterNode::Leaf(FilterLeaf::Date(RangeFilter::LessThan(date(
                "2019-07-04 00:00:00"
            ))))
        );
    }

    #[test]
    fn null_tests_need_no_operand() {
        let node = FilterNode::from_model("age", &FilterModel::of_type("number", "notNull")).unwrap();
        assert_eq!(node, FilterNode::Leaf(FilterLeaf::Number(RangeFilter::NotNull)));

        let node = FilterNode::from_model("fullName", &FilterModel::of_type("text", "blank")).unwrap();
        assert_eq!(node, FilterNode::Leaf(FilterLeaf::Text(TextFilter::Null)));
    }

    #[test]
    fn combination_children_inherit_the_kind() {
        let model = FilterModel {
            filter_type: Some("text".into()),
            operator: Some("OR".into()),
            condition1: Some(Box::new(FilterModel {
                r#type: Some("contains".into()),
                filter: Some("Ada".into()),
                ..Default::default()
            })),
            condition2: Some(Box::new(FilterModel::text("endsWith", "czyk"))),
            ..Default::default()
        };

        assert_eq!(
            FilterNode::from_model("fullName", &model).unwrap(),
            FilterNode::Combination {
                operator: Combinator::Or,
                left: FilterLeaf::Text(TextFilter::Contains("Ada".into())),
                right: FilterLeaf::Text(TextFilter::EndsWith("czyk".into())),
            }
        );
    }

    #[test]
    fn empty_operator_is_a_leaf() {
        let mut model = FilterModel::text("startsWith", "Ala");
        model.operator = Some(String::new());
        let node = FilterNode::from_model("fullName", &model).unwrap();
        assert_eq!(
            node,
            FilterNode::Leaf(FilterLeaf::Text(TextFilter::StartsWith("Ala".into())))
        );
    }

    #[test]
    fn leaves_and_kinds() {
        let model = FilterModel::combine(
            "OR",
            FilterModel::number_range(1, 2),
            FilterModel::of_type("number", "null"),
        );
        let node = FilterNode::from_model("age", &model).unwrap();
        let kinds: Vec<FilterKind> = node.leaves().iter().map(|leaf| leaf.kind()).collect();
        assert_eq!(kinds, vec![FilterKind::Number, FilterKind::Number]);

        let set = FilterNode::from_model("fullName", &FilterModel::set([Some("a")])).unwrap();
        assert_eq!(set.leaves()[0].kind(), FilterKind::Set);
    }

    #[test]
    fn combination_kind_mismatch_is_invalid() {
        let model = FilterModel::combine(
            "AND",
            FilterModel::text("contains", "a"),
            FilterModel::number("equals", 1),
        );
        let err = FilterNode::from_model("fullName", &model).unwrap_err();
        assert!(matches!(err, GridError::InvalidFilter { ref column, .. } if column == "fullName"));
    }

    #[test]
    fn combination_missing_condition_is_invalid() {
        let mut model = FilterModel::combine(
            "AND",
            FilterModel::text("contains", "a"),
            FilterModel::text("contains", "b"),
        );
        model.condition2 = None;
        let err = FilterNode::from_model("fullName", &model).unwrap_err();
        assert!(err.to_string().contains("condition2"));
    }

    #[test]
    fn unsupported_kind_and_operator() {
        let err = FilterNode::from_model("age", &FilterModel::of_type("money", "equals")).unwrap_err();
        assert!(matches!(
            err,
            GridError::UnsupportedFilter { field: "filterType", ref value, .. } if value == "money"
        ));

        let err = FilterNode::from_model("age", &FilterModel::number("contains", 1)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("(contains)"));
        assert!(msg.contains("inRange"));
    }

    #[test]
    fn ill_typed_operands_are_invalid() {
        let err = FilterNode::from_model("age", &FilterModel::number("equals", "eighteen")).unwrap_err();
        assert!(matches!(err, GridError::InvalidFilter { .. }));

        let mut range = FilterModel::number_range(1, 2);
        range.filter_to = None;
        let err = FilterNode::from_model("age", &range).unwrap_err();
        assert!(err.to_string().contains("filterTo"));

        let boolean_as_text = FilterModel {
            filter_type: Some("boolean".into()),
            r#type: Some("equals".into()),
            filter: Some("true".into()),
            ..Default::default()
        };
        let err = FilterNode::from_model("isVerified", &boolean_as_text).unwrap_err();
        assert!(matches!(err, GridError::InvalidFilter { .. }));
    }

    #[test]
    fn unparseable_date_names_column_and_value() {
        let err = FilterNode::from_model("registeredOn", &FilterModel::date("equals", "2020-05-11"))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("registeredOn"));
        assert!(msg.contains("2020-05-11"));
    }

    #[test]
    fn set_filter_keeps_nulls() {
        let node = FilterNode::from_model("fullName", &FilterModel::set([Some("Ala Nowak"), None])).unwrap();
        assert_eq!(
            node,
            FilterNode::Leaf(FilterLeaf::Set(SetFilter {
                values: vec![Some("Ala Nowak".into()), None]
            }))
        );
    }
}
