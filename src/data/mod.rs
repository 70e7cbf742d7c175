//! Data layer: core types, loading, filtering and grouping.
//!
//! Architecture:
//! ```text
//!  .xlsx / .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  parse file, keep allowed countries/topics → Dataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌─────────┐      ┌──────────┐
//!   │ Dataset │ ───▶ │  range   │  min/max date, slider offset ⇄ date
//!   └─────────┘      └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter  │  date range + country, or one exact date → subset
//!   └──────────┘
//!        │                     │
//!        ▼                     ▼
//!   ┌───────────┐        ┌─────────┐
//!   │ aggregate │        │ summary │
//!   └───────────┘        └─────────┘
//!   (date, topic) counts  topic → entries for one day
//! ```

pub mod aggregate;
pub mod dates;
pub mod filter;
pub mod loader;
pub mod model;
pub mod range;
pub mod summary;

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use super::model::{Dataset, Record};

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    pub fn record(country: &str, topic: &str, day: &str) -> Record {
        Record {
            country: country.to_string(),
            topic: topic.to_string(),
            date: date(day),
            headline: format!("{topic} in {country} on {day}"),
            snippet: format!("Snippet about {topic}"),
            link: format!("https://news.example/{country}/{day}"),
        }
    }

    /// Three mentions over two days, two countries and two topics.
    pub fn scenario_dataset() -> Dataset {
        Dataset::from_records(vec![
            record("Germany", "smart #1", "2025-01-01"),
            record("Austria", "smart #1", "2025-01-01"),
            record("Germany", "smart #2", "2025-01-02"),
        ])
    }
}
