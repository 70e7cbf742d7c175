use chrono::NaiveDate;

use super::model::{Dataset, FilterSpec, Record};

/// Records matching `spec`, borrowed from the dataset in load order.
///
/// A record passes when:
/// * `start <= date <= end` (both bounds inclusive)
/// * the spec has no country, or the record's country equals it
///
/// Nothing matching is an ordinary empty result.
pub fn filter<'a>(dataset: &'a Dataset, spec: &FilterSpec) -> Vec<&'a Record> {
    dataset
        .records()
        .iter()
        .filter(|r| spec.matches(r))
        .collect()
}

/// Records dated exactly `date`. Dates outside the dataset's bounds simply
/// match nothing.
pub fn filter_by_exact_date(dataset: &Dataset, date: NaiveDate) -> Vec<&Record> {
    dataset
        .records()
        .iter()
        .filter(|r| r.date == date)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{date, record, scenario_dataset};
    use crate::data::model::DateRange;
    use crate::data::range::RangeIndex;

    #[test]
    fn full_range_all_countries_is_whole_dataset() {
        let ds = Dataset::from_records(vec![
            record("Switzerland", "smart #5", "2025-01-03"),
            record("Germany", "smart #1", "2025-01-01"),
            record("Belgium", "smart #6", "2025-01-02"),
        ]);
        let idx = RangeIndex::bounds(&ds).unwrap();
        let spec = FilterSpec::from_selection(idx.full_range(), "All", "All");

        let subset = filter(&ds, &spec);
        let expected: Vec<&Record> = ds.records().iter().collect();
        assert_eq!(subset, expected);
    }

    #[test]
    fn bounds_are_inclusive() {
        let ds = Dataset::from_records(vec![
            record("Germany", "smart #1", "2025-01-01"),
            record("Germany", "smart #1", "2025-01-02"),
            record("Germany", "smart #1", "2025-01-03"),
            record("Germany", "smart #1", "2025-01-04"),
        ]);
        let spec = FilterSpec {
            date_range: DateRange::new(date("2025-01-02"), date("2025-01-03")),
            country: None,
        };
        let dates: Vec<NaiveDate> = filter(&ds, &spec).iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date("2025-01-02"), date("2025-01-03")]);
    }

    #[test]
    fn country_constraint() {
        let ds = scenario_dataset();
        let spec = FilterSpec {
            date_range: DateRange::new(date("2025-01-01"), date("2025-01-02")),
            country: Some("Austria".to_string()),
        };
        let subset = filter(&ds, &spec);
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].country, "Austria");
    }

    #[test]
    fn unmatched_country_is_empty_not_error() {
        let ds = scenario_dataset();
        let spec = FilterSpec {
            date_range: DateRange::new(date("2025-01-01"), date("2025-01-02")),
            country: Some("Belgium".to_string()),
        };
        assert!(filter(&ds, &spec).is_empty());
    }

    #[test]
    fn exact_date() {
        let ds = scenario_dataset();
        let day = filter_by_exact_date(&ds, date("2025-01-01"));
        assert_eq!(day.len(), 2);
        assert!(day.iter().all(|r| r.date == date("2025-01-01")));
        assert_eq!(day[0].country, "Germany");
        assert_eq!(day[1].country, "Austria");
    }

    #[test]
    fn exact_date_outside_bounds_is_empty() {
        let ds = scenario_dataset();
        assert!(filter_by_exact_date(&ds, date("2019-07-04")).is_empty());
        assert!(filter_by_exact_date(&ds, date("2030-01-01")).is_empty());
    }
}
