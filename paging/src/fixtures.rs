//! Records shared by unit tests

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::record::{segment_matches, split_path};
use crate::traits::{Record, ToValue};
use crate::value::{FieldKind, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub id: i64,
    pub name: String,
    pub model: String,
    pub price: Option<Decimal>,
    pub year: i32,
    pub last_service: Option<DateTime<Utc>>,
}

impl Car {
    pub fn label(&self) -> String {
        format!("{} {}, Year {}", self.name, self.model, self.year)
    }
}

impl Record for Car {
    fn field_kind(path: &str) -> Option<FieldKind> {
        match split_path(path) {
            (head, None) if segment_matches(head, "id") => Some(<i64 as ToValue>::KIND),
            (head, None) if segment_matches(head, "name") => Some(<String as ToValue>::KIND),
            (head, None) if segment_matches(head, "model") => Some(<String as ToValue>::KIND),
            (head, None) if segment_matches(head, "price") => Some(<Option<Decimal> as ToValue>::KIND),
            (head, None) if segment_matches(head, "year") => Some(<i32 as ToValue>::KIND),
            (head, None) if segment_matches(head, "lastservice") => {
                Some(<Option<DateTime<Utc>> as ToValue>::KIND)
            }
            _ => None,
        }
    }

    fn field(&self, path: &str) -> Option<Value> {
        match split_path(path) {
            (head, None) if segment_matches(head, "id") => Some(self.id.to_value()),
            (head, None) if segment_matches(head, "name") => Some(self.name.to_value()),
            (head, None) if segment_matches(head, "model") => Some(self.model.to_value()),
            (head, None) if segment_matches(head, "price") => Some(self.price.to_value()),
            (head, None) if segment_matches(head, "year") => Some(self.year.to_value()),
            (head, None) if segment_matches(head, "lastservice") => {
                Some(self.last_service.to_value())
            }
            _ => None,
        }
    }

    fn property_names() -> &'static [&'static str] {
        &["id", "name", "model", "price", "year", "last_service"]
    }
}

/// Twelve BMW X cars, three per year. Prices rise with the year (the 2000
/// cars have none); only the 2010 and 2015 cars have been serviced.
pub fn bmw_fleet() -> Vec<Car> {
    let batches = [
        (2000, None, None),
        (2005, Some(5000i64), None),
        (2010, Some(10000), Utc.with_ymd_and_hms(2012, 1, 1, 0, 0, 0).single()),
        (2015, Some(15000), Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).single()),
    ];
    let mut cars = Vec::new();
    for (year, price, last_service) in batches {
        for i in 0..3 {
            cars.push(Car {
                id: cars.len() as i64,
                name: "BMW".into(),
                model: format!("X {i}"),
                price: price.map(Decimal::from),
                year,
                last_service,
            });
        }
    }
    cars
}
