use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Source column names
// ---------------------------------------------------------------------------

pub const COL_COUNTRY: &str = "Country";
pub const COL_TOPIC: &str = "Analysis topic";
pub const COL_DATE: &str = "Date";
pub const COL_HEADLINE: &str = "Headline";
pub const COL_SNIPPET: &str = "Snippet";
pub const COL_LINK: &str = "Original Link";
pub const COL_COUNT: &str = "count";

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// One news mention. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Analysis topic")]
    pub topic: String,
    /// Calendar date, time component already discarded by the loader.
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Headline")]
    pub headline: String,
    #[serde(rename = "Snippet")]
    pub snippet: String,
    #[serde(rename = "Original Link")]
    pub link: String,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded collection
// ---------------------------------------------------------------------------

/// Every record that survived loading, in source row order.
///
/// Built once at startup and only ever read afterwards; queries borrow
/// records out of it instead of copying them.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct countries in first-seen order.
    pub fn countries(&self) -> Vec<&str> {
        first_seen(self.records.iter().map(|r| r.country.as_str()))
    }

    /// Distinct topics in first-seen order.
    pub fn topics(&self) -> Vec<&str> {
        first_seen(self.records.iter().map(|r| r.topic.as_str()))
    }
}

fn first_seen<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for v in values {
        if !seen.contains(&v) {
            seen.push(v);
        }
    }
    seen
}

// ---------------------------------------------------------------------------
// DateRange / FilterSpec – query parameters
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` pair of calendar dates with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            DateRange { start: a, end: b }
        } else {
            DateRange { start: b, end: a }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Date range plus an optional country constraint (`None` = every country).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub date_range: DateRange,
    pub country: Option<String>,
}

impl FilterSpec {
    /// Translate a dropdown selection into a spec; the `all_label`
    /// selection removes the country constraint.
    pub fn from_selection(date_range: DateRange, selection: &str, all_label: &str) -> Self {
        let country = (selection != all_label).then(|| selection.to_string());
        FilterSpec {
            date_range,
            country,
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.date_range.contains(record.date)
            && self
                .country
                .as_deref()
                .map_or(true, |c| record.country == c)
    }
}

// ---------------------------------------------------------------------------
// Query results
// ---------------------------------------------------------------------------

/// Number of records sharing one `(date, topic)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedCount {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Analysis topic")]
    pub topic: String,
    pub count: usize,
}

/// A topic and its entries for a single-date view, in load order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicGroup<'a> {
    pub topic: &'a str,
    pub entries: Vec<&'a Record>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{date, record, scenario_dataset};

    #[test]
    fn date_range_orders_bounds() {
        let r = DateRange::new(date("2025-01-05"), date("2025-01-01"));
        assert_eq!(r.start, date("2025-01-01"));
        assert_eq!(r.end, date("2025-01-05"));
        assert!(r.contains(date("2025-01-01")));
        assert!(r.contains(date("2025-01-05")));
        assert!(!r.contains(date("2025-01-06")));
        assert_eq!(r.to_string(), "2025-01-01 to 2025-01-05");
    }

    #[test]
    fn all_label_removes_country_constraint() {
        let range = DateRange::new(date("2025-01-01"), date("2025-01-02"));
        let all = FilterSpec::from_selection(range, "All", "All");
        assert_eq!(all.country, None);

        let de = FilterSpec::from_selection(range, "Germany", "All");
        assert!(de.matches(&record("Germany", "smart #1", "2025-01-01")));
        assert!(!de.matches(&record("Austria", "smart #1", "2025-01-01")));
        assert!(!de.matches(&record("Germany", "smart #1", "2025-01-03")));
    }

    #[test]
    fn distinct_values_keep_first_seen_order() {
        let ds = scenario_dataset();
        assert_eq!(ds.countries(), vec!["Germany", "Austria"]);
        assert_eq!(ds.topics(), vec!["smart #1", "smart #2"]);
    }
}
