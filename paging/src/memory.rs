//! In-memory deferred query over a shared slice of records

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{QueryError, Result};
use crate::predicate::{CaseSensitivity, FilterPredicate, OrderClause};
use crate::sort::{SortOrder, SortSpec};
use crate::traits::{DeferredQuery, Record};
use crate::value::Value;

/// Native search predicate accepted by [`MemoryQuery::filter`].
pub type NativePredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Wrap a closure as a [`NativePredicate`].
pub fn predicate<E, F>(f: F) -> NativePredicate<E>
where
    F: Fn(&E) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

enum Step<E> {
    Native(NativePredicate<E>),
    Bound(FilterPredicate),
    Order(Vec<(String, SortOrder)>),
    Skip(usize),
    Take(usize),
}

impl<E> Clone for Step<E> {
    fn clone(&self) -> Self {
        match self {
            Step::Native(f) => Step::Native(Arc::clone(f)),
            Step::Bound(p) => Step::Bound(p.clone()),
            Step::Order(keys) => Step::Order(keys.clone()),
            Step::Skip(n) => Step::Skip(*n),
            Step::Take(n) => Step::Take(*n),
        }
    }
}

/// A deferred query over records held in memory.
///
/// Builder operations append to a plan; [`count`](DeferredQuery::count) and
/// [`materialize`](DeferredQuery::materialize) run it against the source.
/// Predicates and orderings are checked against the record schema when they
/// are added, the way a database rejects a statement before running it.
///
/// # Example
///
/// ```ignore
/// use paging::memory::{predicate, MemoryQuery};
/// use paging::DeferredQuery;
///
/// let query = MemoryQuery::new(cars)
///     .filter(predicate(|car: &Car| car.year >= 2010))
///     .take(10);
/// let page = query.materialize().await?;
/// ```
pub struct MemoryQuery<E> {
    source: Arc<[E]>,
    plan: Vec<Step<E>>,
}

impl<E> Clone for MemoryQuery<E> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            plan: self.plan.clone(),
        }
    }
}

impl<E> fmt::Debug for MemoryQuery<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryQuery")
            .field("source_len", &self.source.len())
            .field("steps", &self.plan.len())
            .finish()
    }
}

impl<E: Record> MemoryQuery<E> {
    /// Create a query selecting every element of `source`, in order.
    pub fn new(source: impl Into<Arc<[E]>>) -> Self {
        Self {
            source: source.into(),
            plan: Vec::new(),
        }
    }

    /// Number of elements in the source, ignoring the plan.
    pub fn source_len(&self) -> usize {
        self.source.len()
    }

    fn with_step(&self, step: Step<E>) -> Self {
        let mut next = self.clone();
        next.plan.push(step);
        next
    }

    fn run(&self) -> Vec<&E> {
        let mut rows: Vec<&E> = self.source.iter().collect();
        for step in &self.plan {
            rows = match step {
                Step::Native(f) => rows.into_iter().filter(|e| f(e)).collect(),
                Step::Bound(p) => rows.into_iter().filter(|e| evaluate(p, *e)).collect(),
                Step::Order(keys) => sort_rows(rows, keys),
                Step::Skip(n) => rows.into_iter().skip(*n).collect(),
                Step::Take(n) => rows.into_iter().take(*n).collect(),
            };
        }
        rows
    }

    fn bind(predicate: &FilterPredicate) -> std::result::Result<FilterPredicate, QueryError> {
        let property = predicate.property();
        let kind =
            E::field_kind(property).ok_or_else(|| QueryError::UnknownProperty(property.to_string()))?;

        let coerce = |value: &Value| {
            value.coerce_to(kind).ok_or_else(|| QueryError::TypeMismatch {
                property: property.to_string(),
                expected: kind.name(),
                actual: value.type_name().to_string(),
            })
        };

        match predicate {
            FilterPredicate::Compare {
                property,
                op,
                value,
            } => Ok(FilterPredicate::Compare {
                property: property.clone(),
                op: *op,
                value: coerce(value)?,
            }),
            FilterPredicate::ContainsText { .. } => Ok(predicate.clone()),
            FilterPredicate::In {
                property,
                values,
                case,
            } => Ok(FilterPredicate::In {
                property: property.clone(),
                values: values.iter().map(coerce).collect::<std::result::Result<_, _>>()?,
                case: *case,
            }),
        }
    }
}

fn evaluate<E: Record>(predicate: &FilterPredicate, item: &E) -> bool {
    let Some(field) = item.field(predicate.property()) else {
        return false;
    };
    match predicate {
        FilterPredicate::Compare { op, value, .. } => op.matches(field.compare(value)),
        FilterPredicate::ContainsText { needle, .. } => {
            field.to_text().to_lowercase().contains(needle.as_str())
        }
        FilterPredicate::In { values, case, .. } => {
            values.iter().any(|candidate| match (case, &field, candidate) {
                (CaseSensitivity::Insensitive, Value::String(a), Value::String(b)) => {
                    a.to_lowercase() == b.to_lowercase()
                }
                _ => field.compare(candidate) == Some(Ordering::Equal),
            })
        }
    }
}

// Nulls sort first in ascending order.
fn compare_keys(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.compare(b).unwrap_or(Ordering::Equal),
    }
}

fn sort_rows<'a, E: Record>(rows: Vec<&'a E>, keys: &[(String, SortOrder)]) -> Vec<&'a E> {
    let mut decorated: Vec<(Vec<Value>, &'a E)> = rows
        .into_iter()
        .map(|e| {
            let values = keys
                .iter()
                .map(|(key, _)| e.field(key).unwrap_or(Value::Null))
                .collect();
            (values, e)
        })
        .collect();

    decorated.sort_by(|(a, _), (b, _)| {
        keys.iter()
            .zip(a.iter().zip(b.iter()))
            .map(|((_, order), (x, y))| match order {
                SortOrder::Ascending => compare_keys(x, y),
                SortOrder::Descending => compare_keys(y, x),
            })
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });

    decorated.into_iter().map(|(_, e)| e).collect()
}

fn order_keys<E: Record>(spec: &SortSpec) -> std::result::Result<Vec<(String, SortOrder)>, QueryError> {
    spec.iter()
        .map(|(key, order)| {
            if E::has_property(key) {
                Ok((key.to_string(), order))
            } else {
                Err(QueryError::OrderBy(format!(
                    "No property or field '{key}' exists on the element type"
                )))
            }
        })
        .collect()
}

#[async_trait]
impl<E> DeferredQuery for MemoryQuery<E>
where
    E: Record + Clone + Send + Sync + 'static,
{
    type Item = E;
    type Predicate = NativePredicate<E>;

    fn filter(&self, predicate: Self::Predicate) -> Self {
        self.with_step(Step::Native(predicate))
    }

    fn filter_where(&self, predicate: &FilterPredicate) -> std::result::Result<Self, QueryError> {
        let bound = Self::bind(predicate)?;
        Ok(self.with_step(Step::Bound(bound)))
    }

    fn order_by(&self, clause: &OrderClause) -> std::result::Result<Self, QueryError> {
        match clause {
            OrderClause::Constant => Ok(self.with_step(Step::Order(Vec::new()))),
            OrderClause::By(spec) => {
                let keys = order_keys::<E>(spec)?;
                Ok(self.with_step(Step::Order(keys)))
            }
        }
    }

    fn skip(&self, count: usize) -> Self {
        self.with_step(Step::Skip(count))
    }

    fn take(&self, count: usize) -> Self {
        self.with_step(Step::Take(count))
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.run().len())
    }

    async fn materialize(&self) -> Result<Vec<E>> {
        Ok(self.run().into_iter().cloned().collect())
    }
}
