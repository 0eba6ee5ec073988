//! Shared fixtures for the end-to-end tests

#![allow(dead_code)]

use std::fmt;
use std::sync::Once;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use paging::Record;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Route the crate's tracing events to the test output.
///
/// Set `RUST_LOG=paging=debug` to see every filter and ordering decision.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Clone, PartialEq, Record)]
pub struct Car {
    pub id: i64,
    pub name: Option<String>,
    pub model: Option<String>,
    pub price: Option<Decimal>,
    pub year: i32,
    pub last_service: Option<DateTime<Utc>>,
    pub last_oil_change: DateTime<FixedOffset>,
    pub is_electric: bool,
}

impl Car {
    pub fn label(&self) -> String {
        CarDto::from(self.clone()).to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarDto {
    pub id: i64,
    pub name: Option<String>,
    pub model: Option<String>,
    pub year: i32,
}

impl From<Car> for CarDto {
    fn from(car: Car) -> Self {
        Self {
            id: car.id,
            name: car.name,
            model: car.model,
            year: car.year,
        }
    }
}

impl fmt::Display for CarDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, Year {}",
            self.name.as_deref().unwrap_or_default(),
            self.model.as_deref().unwrap_or_default(),
            self.year
        )
    }
}

pub fn map_cars_to_dtos(cars: Vec<Car>) -> Vec<CarDto> {
    cars.into_iter().map(CarDto::from).collect()
}

pub fn map_cars_to_labels(cars: Vec<Car>) -> Vec<String> {
    cars.iter().map(Car::label).collect()
}

fn utc(year: i32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .expect("valid date")
}

/// Options for a batch of generated cars.
#[derive(Debug, Clone)]
pub struct Batch {
    pub name: Option<&'static str>,
    pub model: &'static str,
    pub price: Option<i64>,
    pub year: i32,
    pub last_service: Option<DateTime<Utc>>,
    pub is_electric: bool,
}

impl Batch {
    pub fn new(name: &'static str, model: &'static str) -> Self {
        Self {
            name: Some(name),
            model,
            price: None,
            year: 2019,
            last_service: None,
            is_electric: false,
        }
    }

    pub fn unnamed(model: &'static str) -> Self {
        Self {
            name: None,
            ..Self::new("", model)
        }
    }

    pub fn price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn serviced(mut self, year: i32) -> Self {
        self.last_service = Some(utc(year));
        self
    }

    pub fn electric(mut self) -> Self {
        self.is_electric = true;
        self
    }

    /// `count` cars with models `"{model} 0"` to `"{model} {count-1}"`.
    ///
    /// The oil was last changed at the last service, or at the start of the
    /// model year, recorded at UTC+1.
    pub fn cars(&self, count: usize) -> Vec<Car> {
        let oil_change = self
            .last_service
            .unwrap_or_else(|| utc(self.year))
            .with_timezone(&FixedOffset::east_opt(3600).expect("valid offset"));

        (0..count)
            .map(|i| Car {
                id: i as i64,
                name: self.name.map(str::to_string),
                model: Some(format!("{} {i}", self.model)),
                price: self.price.map(Decimal::from),
                year: self.year,
                last_service: self.last_service,
                last_oil_change: oil_change,
                is_electric: self.is_electric,
            })
            .collect()
    }
}

/// Concatenate batches, renumbering ids from zero.
pub fn with_unique_ids(batches: impl IntoIterator<Item = Vec<Car>>) -> Vec<Car> {
    batches
        .into_iter()
        .flatten()
        .enumerate()
        .map(|(id, car)| Car {
            id: id as i64,
            ..car
        })
        .collect()
}

/// `count` cars named "Car" with models "Model 1" to "Model {count}".
pub fn numbered_cars(count: usize) -> Vec<Car> {
    (1..=count)
        .map(|i| Car {
            id: i as i64,
            name: Some("Car".to_string()),
            model: Some(format!("Model {i}")),
            ..Batch::new("Car", "Model").cars(1).remove(0)
        })
        .collect()
}

/// Twelve BMW X cars, three per year from 2000 to 2015. Prices rise with the
/// year; the 2010 cars are electric and only the 2010 and 2015 cars have
/// been serviced.
pub fn bmw_fleet() -> Vec<Car> {
    with_unique_ids([
        Batch::new("BMW", "X").year(2000).cars(3),
        Batch::new("BMW", "X").price(5000).year(2005).cars(3),
        Batch::new("BMW", "X")
            .price(10000)
            .year(2010)
            .serviced(2012)
            .electric()
            .cars(3),
        Batch::new("BMW", "X")
            .price(15000)
            .year(2015)
            .serviced(2019)
            .cars(3),
    ])
}

/// BMW X, BMW M, Audi A and Mercedes G, three cars each.
pub fn mixed_fleet() -> Vec<Car> {
    with_unique_ids([
        Batch::new("BMW", "X").cars(3),
        Batch::new("BMW", "M").cars(3),
        Batch::new("Audi", "A").cars(3),
        Batch::new("Mercedes", "G").cars(3),
    ])
}

/// BMW X, Audi A and Mercedes G, three cars each, in that order.
pub fn sort_fleet() -> Vec<Car> {
    with_unique_ids([
        Batch::new("BMW", "X").cars(3),
        Batch::new("Audi", "A").cars(3),
        Batch::new("Mercedes", "G").cars(3),
    ])
}

#[derive(Debug, Clone, PartialEq, Record)]
pub struct Venue {
    pub name: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Record)]
pub struct Concert {
    pub id: i64,
    pub name: String,
    #[paging(nested)]
    pub venue: Venue,
    #[paging(rename = "Starts")]
    pub starts_at: DateTime<Utc>,
    #[paging(skip)]
    pub notes: Vec<String>,
}

pub fn concerts() -> Vec<Concert> {
    let venue = |name: &str, city: &str| Venue {
        name: name.to_string(),
        city: city.to_string(),
    };
    let at = |month: u32| {
        Utc.with_ymd_and_hms(2024, month, 1, 20, 0, 0)
            .single()
            .expect("valid date")
    };
    vec![
        Concert {
            id: 1,
            name: "Spring Gala".into(),
            venue: venue("Opera House", "Zurich"),
            starts_at: at(3),
            notes: vec!["sold out".into()],
        },
        Concert {
            id: 2,
            name: "Jazz Night".into(),
            venue: venue("Blue Note", "New York"),
            starts_at: at(5),
            notes: Vec::new(),
        },
        Concert {
            id: 3,
            name: "Autumn Gala".into(),
            venue: venue("Albert Hall", "London"),
            starts_at: at(9),
            notes: Vec::new(),
        },
        Concert {
            id: 4,
            name: "Brass Evening".into(),
            venue: venue("Opera House", "Zurich"),
            starts_at: at(11),
            notes: Vec::new(),
        },
    ]
}
