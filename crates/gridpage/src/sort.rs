//! Sort order compilation and in-memory comparison.

use std::cmp::Ordering;

use crate::compile::canonical;
use crate::error::ValidationError;
use crate::op::SortDirection;
use crate::record::{Column, Record};
use crate::request::SortModel;
use crate::value::Value;

/// A single sort key: a canonical column and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        SortKey {
            column: column.into(),
            direction,
        }
    }

    pub fn asc(column: impl Into<String>) -> Self {
        SortKey::new(column, SortDirection::Asc)
    }

    pub fn desc(column: impl Into<String>) -> Self {
        SortKey::new(column, SortDirection::Desc)
    }

    /// Compares two values according to this key's direction.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
        compare_values(a, b).map(|o| self.direction.apply(o))
    }
}

/// Multi-key ordering. The first key is primary; later keys break ties.
///
/// An empty ordering keeps the source's natural order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortOrder(Vec<SortKey>);

impl SortOrder {
    pub fn new(keys: Vec<SortKey>) -> Self {
        SortOrder(keys)
    }

    /// Compiles the grid's sort model against a column list.
    pub fn compile(sort_model: &[SortModel], columns: &[Column<'_>]) -> Result<Self, ValidationError> {
        let keys = sort_model
            .iter()
            .map(|entry| {
                let column = canonical(&entry.col_id, columns)?;
                let direction = SortDirection::parse(&entry.sort).ok_or_else(|| {
                    ValidationError::UnsupportedSortDirection {
                        value: entry.sort.clone(),
                    }
                })?;
                Ok(SortKey::new(column.name, direction))
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;
        Ok(SortOrder(keys))
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compares two records key by key.
    ///
    /// Values of different types count as equal so the next key decides.
    pub fn compare<R: Record + ?Sized>(&self, a: &R, b: &R) -> Ordering {
        for key in &self.0 {
            let val_a = a.field_value(&key.column);
            let val_b = b.field_value(&key.column);

            if let Some(ordering) = key.compare(&val_a, &val_b) {
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
        Ordering::Equal
    }

    /// Sorts records in place. The sort is stable.
    pub fn sort<R: Record>(&self, records: &mut [&R]) {
        if !self.is_empty() {
            records.sort_by(|a, b| self.compare(*a, *b));
        }
    }
}

/// Compares two values of the same type in ascending order.
///
/// Nulls sort before every other value and NaN after every other number.
/// Returns `None` if the types differ.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    match (a, b) {
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => Some(a.sort_cmp(*b)),
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),

        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, _) => Some(Ordering::Less),
        (_, Value::Null) => Some(Ordering::Greater),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    #[test]
    fn compare_strings() {
        let a = Value::Text("Ala Kowalska");
        let b = Value::Text("Ala Nowak");

        assert_eq!(compare_values(&a, &b), Some(Ordering::Less));
        assert_eq!(compare_values(&b, &a), Some(Ordering::Greater));
        assert_eq!(compare_values(&a, &a), Some(Ordering::Equal));
    }

    #[test]
    fn compare_numbers_nan() {
        let nan = Value::Number(Number::F64(f64::NAN));
        let num = Value::Number(Number::F64(1.0));

        assert_eq!(compare_values(&nan, &num), Some(Ordering::Greater));
        assert_eq!(compare_values(&num, &nan), Some(Ordering::Less));
        assert_eq!(compare_values(&nan, &nan), Some(Ordering::Equal));
        assert_eq!(
            SortKey::desc("x").compare(&nan, &num),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn nulls_sort_first() {
        let null = Value::Null;
        let some = Value::Text("a");

        assert_eq!(compare_values(&null, &some), Some(Ordering::Less));
        assert_eq!(compare_values(&some, &null), Some(Ordering::Greater));
        assert_eq!(compare_values(&null, &null), Some(Ordering::Equal));
        assert_eq!(
            SortKey::desc("x").compare(&null, &some),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn compare_type_mismatch() {
        let s = Value::Text("test");
        let n = Value::Number(Number::I64(42));

        assert_eq!(compare_values(&s, &n), None);
    }

    #[test]
    fn compile_sort_model() {
        let model = vec![
            SortModel {
                col_id: "fullName".into(),
                sort: "desc".into(),
            },
            SortModel {
                col_id: "age".into(),
                sort: "asc".into(),
            },
        ];
        let order = SortOrder::compile(&model, &[Column::text("full_name"), Column::number("age")]).unwrap();
        assert_eq!(
            order.keys(),
            &[SortKey::desc("full_name"), SortKey::asc("age")]
        );
    }

    #[test]
    fn compile_rejects_bad_direction() {
        let model = vec![SortModel {
            col_id: "age".into(),
            sort: "ASC".into(),
        }];
        assert_eq!(
            SortOrder::compile(&model, &[Column::number("age")]),
            Err(ValidationError::UnsupportedSortDirection {
                value: "ASC".into()
            })
        );
    }

    #[test]
    fn compare_by_multiple_keys() {
        struct Item {
            name: &'static str,
            priority: i64,
        }

        impl Record for Item {
            const COLUMNS: &'static [Column<'static>] =
                &[Column::text("name"), Column::number("priority")];

            fn field_value(&self, column: &str) -> Value<'_> {
                match column {
                    "name" => Value::Text(self.name),
                    "priority" => self.priority.into(),
                    _ => Value::Null,
                }
            }
        }

        let items = [
            Item { name: "a", priority: 1 },
            Item { name: "b", priority: 1 },
            Item { name: "a", priority: 2 },
        ];
        let order = SortOrder::new(vec![SortKey::asc("priority"), SortKey::desc("name")]);

        assert_eq!(order.compare(&items[0], &items[1]), Ordering::Greater);
        assert_eq!(order.compare(&items[0], &items[2]), Ordering::Less);

        let mut refs: Vec<&Item> = items.iter().collect();
        order.sort(&mut refs);
        let names: Vec<_> = refs.iter().map(|i| (i.name, i.priority)).collect();
        assert_eq!(names, vec![("b", 1), ("a", 1), ("a", 2)]);
    }

    #[test]
    fn nan_rows_sort_last_and_order_stays_consistent() {
        struct Reading {
            id: usize,
            value: f64,
        }

        impl Record for Reading {
            const COLUMNS: &'static [Column<'static>] = &[Column::number("value")];

            fn field_value(&self, column: &str) -> Value<'_> {
                match column {
                    "value" => self.value.into(),
                    _ => Value::Null,
                }
            }
        }

        let readings: Vec<Reading> = (0..300)
            .map(|id| Reading {
                id,
                value: if id % 3 == 0 {
                    f64::NAN
                } else {
                    ((id * 7919) % 211) as f64 - 100.0
                },
            })
            .collect();

        let mut refs: Vec<&Reading> = readings.iter().collect();
        SortOrder::new(vec![SortKey::asc("value")]).sort(&mut refs);

        let (numbers, nans): (Vec<&Reading>, Vec<&Reading>) =
            refs.iter().copied().partition(|r| !r.value.is_nan());
        assert_eq!(nans.len(), 100);
        assert!(refs[..200].iter().all(|r| !r.value.is_nan()));
        assert!(numbers.windows(2).all(|w| w[0].value <= w[1].value));

        // Stable: NaNs keep their input order.
        let nan_ids: Vec<usize> = nans.iter().map(|r| r.id).collect();
        assert_eq!(nan_ids, (0..300).step_by(3).collect::<Vec<_>>());
    }
}
