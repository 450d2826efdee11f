//! Compilation of a validated request into a [`CompiledQuery`].

use tracing::debug;

use crate::error::{GridError, Result, ValidationError};
use crate::filter::{BooleanFilter, FilterLeaf, FilterNode, RangeFilter, TextFilter};
use crate::op::Combinator;
use crate::options::QueryOptions;
use crate::predicate::{Argument, Comparison, Predicate, Test, TextMatch};
use crate::record::{Column, ColumnKind, Record};
use crate::request::RowRangeRequest;
use crate::sort::SortOrder;
use crate::validate::{resolve_column, validate};

/// Source-agnostic query plan: what to keep and in which order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledQuery {
    /// `None` when the request has no filters.
    pub predicate: Option<Predicate>,
    pub ordering: SortOrder,
}

impl CompiledQuery {
    /// Positional arguments of the predicate, in placeholder order.
    pub fn arguments(&self) -> Vec<&Argument> {
        self.predicate
            .as_ref()
            .map(Predicate::arguments)
            .unwrap_or_default()
    }

    /// Returns `true` if the record passes the filters.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.predicate.as_ref().map_or(true, |p| p.matches(record))
    }
}

/// Validates and compiles a request against the columns of `R`.
///
/// # Example
///
/// ```
/// use gridpage::{compile, FilterModel, QueryOptions, Record, RowRangeRequest};
///
/// #[derive(Record)]
/// struct User {
///     #[grid(text)]
///     full_name: String,
/// }
///
/// let request = RowRangeRequest::new(0, 10)
///     .filter("fullName", FilterModel::text("startsWith", "Ala"))
///     .sort("fullName", "desc");
///
/// let query = compile::<User>(&request, &QueryOptions::default()).unwrap();
/// assert_eq!(query.arguments().len(), 1);
/// assert_eq!(query.ordering.keys()[0].column, "full_name");
/// ```
pub fn compile<R: Record>(request: &RowRangeRequest, options: &QueryOptions) -> Result<CompiledQuery> {
    compile_for_columns(request, R::COLUMNS, options)
}

/// Validates and compiles a request against an explicit column list.
///
/// A filter whose kind does not fit its column (a text filter on a number
/// column, say) is rejected with [`GridError::InvalidFilter`].
pub fn compile_for_columns(
    request: &RowRangeRequest,
    columns: &[Column<'_>],
    options: &QueryOptions,
) -> Result<CompiledQuery> {
    validate(request, columns)?;

    let mut conjuncts = Vec::with_capacity(request.filter_model.len());
    for (col_id, model) in &request.filter_model {
        let column = canonical(col_id, columns)?;
        let node = FilterNode::from_model(col_id, model)?;
        check_kind(col_id, &node, column.kind)?;
        conjuncts.push(compile_node(column.name, &node, options));
    }
    let predicate = (!conjuncts.is_empty()).then(|| Predicate::all(conjuncts));
    let ordering = SortOrder::compile(&request.sort_model, columns)?;

    debug!(
        filters = request.filter_model.len(),
        sort_keys = ordering.keys().len(),
        case_insensitive = options.case_insensitive,
        range_inclusive = options.range_inclusive,
        "compiled row range query"
    );

    Ok(CompiledQuery {
        predicate,
        ordering,
    })
}

pub(crate) fn canonical<'a, 'c>(
    col_id: &str,
    columns: &'a [Column<'c>],
) -> std::result::Result<&'a Column<'c>, ValidationError> {
    resolve_column(col_id, columns)
        .ok_or_else(|| ValidationError::UnknownColumns(vec![col_id.to_string()]))
}

fn check_kind(col_id: &str, node: &FilterNode, kind: ColumnKind) -> Result<()> {
    for leaf in node.leaves() {
        let filter_kind = leaf.kind();
        if filter_kind.column_kind() != kind {
            return Err(GridError::invalid_filter(
                col_id,
                format!("{filter_kind} filter cannot be applied to a {kind} column"),
            ));
        }
    }
    Ok(())
}

/// Compiles the filter of one column.
pub fn compile_node(column: &str, node: &FilterNode, options: &QueryOptions) -> Predicate {
    match node {
        FilterNode::Leaf(leaf) => compile_leaf(column, leaf, options),
        FilterNode::Combination {
            operator,
            left,
            right,
        } => {
            let children = vec![
                compile_leaf(column, left, options),
                compile_leaf(column, right, options),
            ];
            match operator {
                Combinator::And => Predicate::All(children),
                Combinator::Or => Predicate::Any(children),
            }
        }
    }
}

fn compile_leaf(column: &str, leaf: &FilterLeaf, options: &QueryOptions) -> Predicate {
    match leaf {
        FilterLeaf::Text(filter) => compile_text(column, filter, options.case_insensitive),
        FilterLeaf::Number(filter) => {
            compile_range(column, filter, options.range_inclusive, |n| Argument::Number(*n))
        }
        FilterLeaf::Date(filter) => {
            compile_range(column, filter, options.range_inclusive, |d| Argument::Date(*d))
        }
        FilterLeaf::Boolean(filter) => {
            let (op, value) = match filter {
                BooleanFilter::Equals(b) => (Comparison::Eq, *b),
                BooleanFilter::NotEqual(b) => (Comparison::Ne, *b),
            };
            Predicate::condition(column, false, Test::Compare(op, Argument::Bool(value)))
        }
        FilterLeaf::Set(set) => {
            let fold = options.case_insensitive;
            let values = set
                .values
                .iter()
                .map(|v| v.as_deref().map(|s| fold_arg(s, fold)))
                .collect();
            Predicate::condition(column, fold, Test::In(Argument::TextSet(values)))
        }
    }
}

fn fold_arg(s: &str, fold: bool) -> String {
    if fold {
        s.to_lowercase()
    } else {
        s.to_string()
    }
}

fn compile_text(column: &str, filter: &TextFilter, fold: bool) -> Predicate {
    let compare = |op, s: &str| {
        Predicate::condition(column, fold, Test::Compare(op, Argument::Text(fold_arg(s, fold))))
    };
    let matching = |kind, s: &str| {
        Predicate::condition(column, fold, Test::Match(kind, Argument::Text(fold_arg(s, fold))))
    };

    match filter {
        TextFilter::Equals(s) => compare(Comparison::Eq, s),
        TextFilter::NotEqual(s) => compare(Comparison::Ne, s),
        TextFilter::Contains(s) => matching(TextMatch::Contains, s),
        TextFilter::NotContains(s) => matching(TextMatch::Contains, s).negate(),
        TextFilter::StartsWith(s) => matching(TextMatch::StartsWith, s),
        TextFilter::EndsWith(s) => matching(TextMatch::EndsWith, s),
        TextFilter::Null => Predicate::condition(column, false, Test::IsNull),
        TextFilter::NotNull => Predicate::condition(column, false, Test::IsNotNull),
    }
}

fn compile_range<T>(
    column: &str,
    filter: &RangeFilter<T>,
    inclusive: bool,
    arg: impl Fn(&T) -> Argument,
) -> Predicate {
    let compare = |op, value: &T| Predicate::condition(column, false, Test::Compare(op, arg(value)));

    match filter {
        RangeFilter::Equals(v) => compare(Comparison::Eq, v),
        RangeFilter::NotEqual(v) => compare(Comparison::Ne, v),
        RangeFilter::LessThan(v) => compare(Comparison::Lt, v),
        RangeFilter::LessThanOrEqual(v) => compare(Comparison::Lte, v),
        RangeFilter::GreaterThan(v) => compare(Comparison::Gt, v),
        RangeFilter::GreaterThanOrEqual(v) => compare(Comparison::Gte, v),
        RangeFilter::InRange(from, to) => {
            let (lower, upper) = if inclusive {
                (Comparison::Gte, Comparison::Lte)
            } else {
                (Comparison::Gt, Comparison::Lt)
            };
            Predicate::All(vec![compare(lower, from), compare(upper, to)])
        }
        RangeFilter::Null => Predicate::condition(column, false, Test::IsNull),
        RangeFilter::NotNull => Predicate::condition(column, false, Test::IsNotNull),
    }
}
