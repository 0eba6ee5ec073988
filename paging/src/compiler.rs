//! Filter compiler: turns a filter map into predicates on a deferred query

use chrono::Utc;

use crate::config::PagingOptions;
use crate::error::{Error, QueryError, Result};
use crate::filter::{FilterMap, FilterValue};
use crate::log;
use crate::predicate::{
    is_operator_leader, parse_relational, CaseSensitivity, CompareOp, FilterPredicate,
};
use crate::traits::DeferredQuery;
use crate::value::{parse_datetime, Value};

/// Applies the entries of a [`FilterMap`] to a deferred query.
///
/// Entries are ANDed in map order. A range ANDs its bounds; a set ORs its
/// elements. Malformed entries that the query engine rejects are logged and
/// dropped; structurally unsupported entries abort with an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterCompiler {
    set_case: CaseSensitivity,
}

impl FilterCompiler {
    pub fn new(options: &PagingOptions) -> Self {
        Self {
            set_case: options.set_case,
        }
    }

    /// Compiler with the given set membership case handling.
    pub fn with_set_case(set_case: CaseSensitivity) -> Self {
        Self { set_case }
    }

    /// Apply every entry of `filter` to `query`.
    pub fn apply<Q: DeferredQuery>(&self, mut query: Q, filter: &FilterMap) -> Result<Q> {
        for (property, value) in filter {
            query = self.apply_entry(query, property, value)?;
        }
        Ok(query)
    }

    fn apply_entry<Q: DeferredQuery>(
        &self,
        query: Q,
        property: &str,
        value: &FilterValue,
    ) -> Result<Q> {
        match value {
            FilterValue::Null | FilterValue::Scalar(Value::Null) => Ok(query),
            FilterValue::Scalar(Value::String(text)) => Ok(apply_text(query, property, text)),
            FilterValue::Scalar(scalar) => Ok(try_where(
                query,
                Ok(FilterPredicate::Compare {
                    property: property.to_string(),
                    op: CompareOp::Eq,
                    value: scalar.clone(),
                }),
            )),
            FilterValue::Range(bounds) => {
                let mut query = query;
                for (operator, comparand) in bounds {
                    let predicate = range_predicate(property, operator, comparand)?;
                    query = try_where(query, predicate);
                }
                Ok(query)
            }
            FilterValue::Set(values) => Ok(self.apply_set(query, property, values)),
        }
    }

    fn apply_set<Q: DeferredQuery>(&self, query: Q, property: &str, values: &[Value]) -> Q {
        let Some(first) = values.first() else {
            log::debug(&format!("Filter collection for key '{property}' is empty."));
            return query;
        };

        let values = match first.kind() {
            Some(kind) => values
                .iter()
                .map(|v| v.coerce_to(kind))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| {
                    QueryError::TypeMismatch {
                        property: property.to_string(),
                        expected: kind.name(),
                        actual: "mixed collection".to_string(),
                    }
                }),
            None => Ok(values.to_vec()),
        };

        try_where(
            query,
            values.map(|values| FilterPredicate::In {
                property: property.to_string(),
                values,
                case: self.set_case,
            }),
        )
    }
}

fn apply_text<Q: DeferredQuery>(query: Q, property: &str, text: &str) -> Q {
    if text.trim().is_empty() {
        log::warning(&format!("Filter value for key '{property}' is null or empty."));
        return query;
    }

    if text.starts_with(is_operator_leader) {
        return try_where(query, parse_relational(property, text));
    }

    try_where(
        query,
        Ok(FilterPredicate::ContainsText {
            property: property.to_string(),
            needle: text.replace('"', "").to_lowercase(),
        }),
    )
}

// The outer error aborts the whole filter; the inner one only drops this bound.
fn range_predicate(
    property: &str,
    operator: &str,
    comparand: &Value,
) -> Result<std::result::Result<FilterPredicate, QueryError>> {
    if !operator.starts_with(is_operator_leader) {
        return Err(Error::UnsupportedFilterOperator {
            property: property.to_string(),
            operator: operator.to_string(),
        });
    }

    let Some(op) = CompareOp::parse(operator) else {
        return Ok(Err(QueryError::PredicateParse(format!(
            "unknown operator '{operator}' for '{property}'"
        ))));
    };

    let value = match comparand {
        Value::String(s) => parse_datetime(s)
            .map(|dt| Value::DateTime(dt.with_timezone(&Utc)))
            .unwrap_or_else(|| comparand.clone()),
        other => other.clone(),
    };

    Ok(Ok(FilterPredicate::Compare {
        property: property.to_string(),
        op,
        value,
    }))
}

/// Restrict `query` with `predicate`, keeping `query` unchanged when the
/// predicate could not be built or the engine rejects it.
pub fn try_where<Q: DeferredQuery>(
    query: Q,
    predicate: std::result::Result<FilterPredicate, QueryError>,
) -> Q {
    let predicate = match predicate {
        Ok(predicate) => predicate,
        Err(err) => {
            log::warning(&format!("Filter dropped: {err}"));
            return query;
        }
    };

    log::debug(&format!("Applying filter predicate {predicate}"));
    match query.filter_where(&predicate) {
        Ok(filtered) => filtered,
        Err(err) => {
            log::warning(&format!("Filter predicate {predicate} dropped: {err}"));
            query
        }
    }
}

/// Apply `filter` to `query` with default options.
pub fn apply_filter<Q: DeferredQuery>(query: Q, filter: &FilterMap) -> Result<Q> {
    FilterCompiler::default().apply(query, filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{bmw_fleet, Car};
    use chrono::TimeZone;
    use crate::log::{reset_sink, set_sink, FnSink, LogLevel};
    use crate::memory::MemoryQuery;
    use serial_test::serial;
    use std::sync::{Arc, Mutex};

    async fn run(filter: FilterMap) -> Vec<Car> {
        let query = apply_filter(MemoryQuery::new(bmw_fleet()), &filter).unwrap();
        query.materialize().await.unwrap()
    }

    fn labels(cars: &[Car]) -> Vec<String> {
        cars.iter().map(Car::label).collect()
    }

    fn filter(entries: Vec<(&str, FilterValue)>) -> FilterMap {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[tokio::test]
    async fn test_string_containment_matches_text_form() {
        let cars = run(filter(vec![("Price", "5000".into())])).await;
        assert_eq!(
            labels(&cars),
            vec![
                "BMW X 0, Year 2005",
                "BMW X 1, Year 2005",
                "BMW X 2, Year 2005",
                "BMW X 0, Year 2015",
                "BMW X 1, Year 2015",
                "BMW X 2, Year 2015",
            ]
        );
    }

    #[tokio::test]
    async fn test_relational_strings_and_containment() {
        let cars = run(filter(vec![
            ("Name", "bm".into()),
            ("model", "".into()),
            ("Price", ">=5000".into()),
            ("year", "<2010".into()),
        ]))
        .await;
        assert_eq!(cars.len(), 3);
        assert!(cars.iter().all(|c| c.year == 2005));
    }

    #[tokio::test]
    async fn test_scalar_equality() {
        let cars = run(filter(vec![
            ("Name", "\"bmw\"".into()),
            ("Price", rust_decimal::Decimal::new(10000, 0).into()),
            ("year", 2010.into()),
        ]))
        .await;
        assert_eq!(cars.len(), 3);
        assert!(cars.iter().all(|c| c.year == 2010));
    }

    #[tokio::test]
    async fn test_datetime_range_parses_strings() {
        let upper = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        let cars = run(filter(vec![(
            "LastService",
            FilterValue::range([
                (">", Value::from("2012-01-01T00:00:00Z")),
                ("<=", Value::from(upper)),
            ]),
        )]))
        .await;
        assert_eq!(cars.len(), 3);
        assert!(cars.iter().all(|c| c.year == 2015));
    }

    #[tokio::test]
    async fn test_invalid_values_are_dropped() {
        let cars = run(filter(vec![
            ("Year", "> ".into()),
            ("LastService", FilterValue::range([(">", "not a date")])),
            ("Price", FilterValue::set(["wrong-type"])),
            ("Color", "red".into()),
            ("Id", FilterValue::Set(Vec::new())),
        ]))
        .await;
        assert_eq!(cars.len(), 12);
    }

    #[tokio::test]
    async fn test_set_membership() {
        let cars = run(filter(vec![("Id", FilterValue::set([7i64, 6, 9, 10]))])).await;
        let ids: Vec<_> = cars.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![6, 7, 9, 10]);

        let cars = run(filter(vec![("Name", FilterValue::set(["bmw"]))])).await;
        assert!(cars.is_empty());

        let mixed = FilterValue::Set(vec![Value::I64(2005), Value::F64(2010.5)]);
        let cars = run(filter(vec![("Year", mixed)])).await;
        assert_eq!(cars.len(), 3);
        assert!(cars.iter().all(|c| c.year == 2005));

        let query = FilterCompiler::with_set_case(CaseSensitivity::Insensitive)
            .apply(
                MemoryQuery::new(bmw_fleet()),
                &filter(vec![("Name", FilterValue::set(["bmw"]))]),
            )
            .unwrap();
        assert_eq!(query.count().await.unwrap(), 12);
    }

    #[test]
    fn test_unsupported_range_operator() {
        let result = apply_filter(
            MemoryQuery::new(bmw_fleet()),
            &filter(vec![("LastService", FilterValue::range([("", Value::Null)]))]),
        );
        assert!(matches!(
            result,
            Err(Error::UnsupportedFilterOperator { ref property, .. }) if property == "LastService"
        ));

        let result = apply_filter(
            MemoryQuery::new(bmw_fleet()),
            &filter(vec![("Year", FilterValue::range([("!=", 2010)]))]),
        );
        assert!(matches!(result, Err(Error::UnsupportedFilterOperator { .. })));
    }

    #[tokio::test]
    #[serial]
    async fn test_dropped_filters_are_logged() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = Arc::clone(&lines);
        set_sink(FnSink::new(move |level, message: &str| {
            sink_lines.lock().unwrap().push((level, message.to_string()));
        }));

        let cars = run(filter(vec![("Year", ">= soon".into()), ("Model", "  ".into())])).await;
        reset_sink();

        assert_eq!(cars.len(), 12);
        let lines = lines.lock().unwrap();
        let warnings: Vec<_> = lines
            .iter()
            .filter(|(level, _)| *level == LogLevel::Warning)
            .map(|(_, message)| message.as_str())
            .collect();
        assert!(warnings.iter().any(|m| m.contains("Filter dropped")));
        assert!(warnings.iter().any(|m| m.contains("'Model' is null or empty")));
    }
}
