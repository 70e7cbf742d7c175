use chrono::{Days, NaiveDate};

use super::model::{DateRange, Dataset};

// ---------------------------------------------------------------------------
// Date bounds of a dataset and slider-offset arithmetic
// ---------------------------------------------------------------------------

/// Earliest and latest record dates plus the number of days between them.
///
/// Offsets are whole days counted from `min_date`, so a slider running
/// `0..=span_days` covers the dataset exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeIndex {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub span_days: i64,
}

impl RangeIndex {
    /// Compute the bounds of a dataset; `None` when it holds no records.
    pub fn bounds(dataset: &Dataset) -> Option<Self> {
        let mut dates = dataset.records().iter().map(|r| r.date);
        let first = dates.next()?;
        let (min_date, max_date) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(RangeIndex {
            min_date,
            max_date,
            span_days: (max_date - min_date).num_days(),
        })
    }

    /// `min_date + offset` days. Offsets outside `[0, span_days]` are
    /// clamped to the nearest bound rather than rejected.
    pub fn offset_to_date(&self, offset: i64) -> NaiveDate {
        let offset = offset.clamp(0, self.span_days);
        self.min_date
            .checked_add_days(Days::new(offset as u64))
            .unwrap_or(self.max_date)
    }

    /// Inverse of [`offset_to_date`](Self::offset_to_date), clamped the same way.
    pub fn date_to_offset(&self, date: NaiveDate) -> i64 {
        (date - self.min_date).num_days().clamp(0, self.span_days)
    }

    /// `[min_date, max_date]`.
    pub fn full_range(&self) -> DateRange {
        DateRange::new(self.min_date, self.max_date)
    }

    /// Date range selected by a pair of slider offsets, in either order.
    pub fn range(&self, start_offset: i64, end_offset: i64) -> DateRange {
        DateRange::new(
            self.offset_to_date(start_offset),
            self.offset_to_date(end_offset),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{date, record, scenario_dataset};

    #[test]
    fn bounds_of_scenario() {
        let idx = RangeIndex::bounds(&scenario_dataset()).unwrap();
        assert_eq!(idx.min_date, date("2025-01-01"));
        assert_eq!(idx.max_date, date("2025-01-02"));
        assert_eq!(idx.span_days, 1);
    }

    #[test]
    fn bounds_ignore_load_order() {
        let ds = Dataset::from_records(vec![
            record("Germany", "smart #3", "2025-02-10"),
            record("Belgium", "smart #1", "2025-01-15"),
            record("Austria", "smart #2", "2025-03-01"),
        ]);
        let idx = RangeIndex::bounds(&ds).unwrap();
        assert_eq!(idx.min_date, date("2025-01-15"));
        assert_eq!(idx.max_date, date("2025-03-01"));
        assert_eq!(idx.span_days, 45);
    }

    #[test]
    fn single_date_has_zero_span() {
        let ds = Dataset::from_records(vec![
            record("Germany", "smart #1", "2025-01-01"),
            record("Austria", "smart #4", "2025-01-01"),
        ]);
        let idx = RangeIndex::bounds(&ds).unwrap();
        assert_eq!(idx.span_days, 0);
        assert_eq!(idx.offset_to_date(0), date("2025-01-01"));
        assert_eq!(idx.offset_to_date(5), date("2025-01-01"));
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        assert_eq!(RangeIndex::bounds(&Dataset::default()), None);
    }

    #[test]
    fn offsets_map_to_dates_and_back() {
        let idx = RangeIndex {
            min_date: date("2025-01-30"),
            max_date: date("2025-03-02"),
            span_days: 31,
        };
        assert_eq!(idx.offset_to_date(0), date("2025-01-30"));
        assert_eq!(idx.offset_to_date(3), date("2025-02-02"));
        assert_eq!(idx.offset_to_date(31), date("2025-03-02"));
        assert_eq!(idx.date_to_offset(date("2025-02-02")), 3);
        for n in 0..=idx.span_days {
            assert_eq!(idx.date_to_offset(idx.offset_to_date(n)), n);
        }
    }

    #[test]
    fn out_of_range_offsets_clamp() {
        let idx = RangeIndex::bounds(&scenario_dataset()).unwrap();
        assert_eq!(idx.offset_to_date(-4), idx.min_date);
        assert_eq!(idx.offset_to_date(99), idx.max_date);
        assert_eq!(idx.date_to_offset(date("2024-12-01")), 0);
        assert_eq!(idx.date_to_offset(date("2025-06-01")), 1);
    }

    #[test]
    fn reversed_offsets_still_give_ordered_range() {
        let idx = RangeIndex::bounds(&scenario_dataset()).unwrap();
        assert_eq!(idx.range(1, 0), idx.full_range());
    }
}
