use chrono::NaiveDate;
use serde::Serialize;

use crate::data::aggregate::aggregate;
use crate::data::dates::parse_iso_date;
use crate::data::filter::{filter, filter_by_exact_date};
use crate::data::model::{DateRange, Dataset, FilterSpec, GroupedCount, Record, TopicGroup};
use crate::data::range::RangeIndex;
use crate::data::summary::summarize;
use crate::error::QueryError;
use crate::export::{export_rows, TabularWriter, GRAPH_SHEET, NEWS_SHEET};

// ---------------------------------------------------------------------------
// Query handlers
// ---------------------------------------------------------------------------

/// Chart input for one slider position and country selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphData {
    pub title: String,
    /// `None` only when the dataset is empty.
    pub range: Option<DateRange>,
    pub counts: Vec<GroupedCount>,
}

/// Read-only view over a loaded dataset answering the dashboard's queries.
///
/// Each call is independent: nothing is cached between calls and the
/// dataset is never touched, so a `NewsQueries` can be shared freely.
#[derive(Debug, Clone, Copy)]
pub struct NewsQueries<'a> {
    dataset: &'a Dataset,
    range: Option<RangeIndex>,
    all_label: &'a str,
}

impl<'a> NewsQueries<'a> {
    pub fn new(dataset: &'a Dataset, all_label: &'a str) -> Self {
        Self {
            dataset,
            range: RangeIndex::bounds(dataset),
            all_label,
        }
    }

    pub fn all_label(&self) -> &'a str {
        self.all_label
    }

    pub fn record_count(&self) -> usize {
        self.dataset.len()
    }

    pub fn topics(&self) -> Vec<&'a str> {
        self.dataset.topics()
    }

    /// Loaded countries in first-seen order, without the "all" label.
    pub fn countries(&self) -> Vec<&'a str> {
        self.dataset.countries()
    }

    pub fn range_index(&self) -> Option<RangeIndex> {
        self.range
    }

    /// The "reset to latest" date: the dataset's maximum date.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.range.map(|r| r.max_date)
    }

    /// Country dropdown entries: the "all" label, then each loaded country.
    pub fn country_options(&self) -> Vec<&'a str> {
        std::iter::once(self.all_label)
            .chain(self.dataset.countries())
            .collect()
    }

    /// Filtered `(date, topic)` counts between two slider offsets.
    pub fn graph_data(&self, start_offset: i64, end_offset: i64, country: &str) -> GraphData {
        let Some(index) = self.range else {
            return GraphData {
                title: "No mentions loaded".to_string(),
                range: None,
                counts: Vec::new(),
            };
        };
        let range = index.range(start_offset, end_offset);
        let spec = FilterSpec::from_selection(range, country, self.all_label);
        let subset = filter(self.dataset, &spec);
        let counts = aggregate(&subset);
        log::debug!(
            "graph {range} country={country}: {} records, {} groups",
            subset.len(),
            counts.len()
        );

        GraphData {
            title: format!("Mentions from {range}"),
            range: Some(range),
            counts,
        }
    }

    /// Records dated exactly `date` (ISO-8601), in load order.
    pub fn daily_records(&self, date: &str) -> Result<Vec<&'a Record>, QueryError> {
        let day = parse_iso_date(date).ok_or_else(|| QueryError::InvalidDate(date.to_string()))?;
        let records = filter_by_exact_date(self.dataset, day);
        log::debug!("daily {day}: {} records", records.len());
        Ok(records)
    }

    /// Per-topic entries for one day; a day without mentions gives no groups.
    pub fn daily_summary(&self, date: &str) -> Result<Vec<TopicGroup<'a>>, QueryError> {
        Ok(summarize(&self.daily_records(date)?))
    }

    pub fn export_graph(
        &self,
        start_offset: i64,
        end_offset: i64,
        country: &str,
        writer: &dyn TabularWriter,
    ) -> Result<Vec<u8>, QueryError> {
        let graph = self.graph_data(start_offset, end_offset, country);
        Ok(export_rows(&graph.counts, GRAPH_SHEET, writer)?)
    }

    pub fn export_daily(&self, date: &str, writer: &dyn TabularWriter) -> Result<Vec<u8>, QueryError> {
        let records = self.daily_records(date)?;
        Ok(export_rows(&records, NEWS_SHEET, writer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{date, record, scenario_dataset};
    use crate::export::CsvWriter;

    #[test]
    fn graph_over_full_slider() {
        let ds = scenario_dataset();
        let q = NewsQueries::new(&ds, "All");
        let graph = q.graph_data(0, 1, "All");
        assert_eq!(graph.title, "Mentions from 2025-01-01 to 2025-01-02");
        assert_eq!(graph.counts.len(), 2);
        assert_eq!(graph.counts[0].count, 2);

        let de = q.graph_data(0, 1, "Germany");
        assert_eq!(de.counts.iter().map(|g| g.count).sum::<usize>(), 2);
    }

    #[test]
    fn graph_narrowed_to_one_day() {
        let ds = scenario_dataset();
        let q = NewsQueries::new(&ds, "All");
        let graph = q.graph_data(1, 1, "All");
        assert_eq!(graph.range, Some(DateRange::new(date("2025-01-02"), date("2025-01-02"))));
        assert_eq!(graph.counts.len(), 1);
        assert_eq!(graph.counts[0].topic, "smart #2");
    }

    #[test]
    fn empty_dataset_answers_with_empty_results() {
        let ds = Dataset::default();
        let q = NewsQueries::new(&ds, "All");
        assert_eq!(q.latest_date(), None);
        let graph = q.graph_data(0, 10, "All");
        assert!(graph.counts.is_empty());
        assert_eq!(graph.range, None);
        assert!(q.daily_summary("2025-01-01").unwrap().is_empty());
    }

    #[test]
    fn latest_date_feeds_the_daily_summary() {
        let ds = Dataset::from_records(vec![
            record("Germany", "smart #1", "2025-01-01"),
            record("Belgium", "smart #3", "2025-01-31"),
            record("Austria", "smart #3", "2025-01-31"),
        ]);
        let q = NewsQueries::new(&ds, "All");
        let latest = q.latest_date().unwrap();
        assert_eq!(latest, date("2025-01-31"));

        let groups = q.daily_summary(&latest.to_string()).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].topic, "smart #3");
        assert_eq!(groups[0].entries.len(), 2);

        let with_time = q.daily_summary("2025-01-31T00:00:00").unwrap();
        assert_eq!(with_time, groups);
    }

    #[test]
    fn stale_date_is_soft_but_garbage_is_rejected() {
        let ds = scenario_dataset();
        let q = NewsQueries::new(&ds, "All");
        assert!(q.daily_summary("1999-12-31").unwrap().is_empty());
        assert!(matches!(
            q.daily_summary("yesterday"),
            Err(QueryError::InvalidDate(s)) if s == "yesterday"
        ));
    }

    #[test]
    fn country_options_start_with_all() {
        let ds = scenario_dataset();
        let q = NewsQueries::new(&ds, "All");
        assert_eq!(q.country_options(), vec!["All", "Germany", "Austria"]);
        assert_eq!(q.countries(), vec!["Germany", "Austria"]);
    }

    #[test]
    fn exports_use_the_requested_writer() {
        let ds = scenario_dataset();
        let q = NewsQueries::new(&ds, "All");

        let graph = String::from_utf8(q.export_graph(0, 1, "Austria", &CsvWriter).unwrap()).unwrap();
        assert_eq!(graph, "Date,Analysis topic,count\n2025-01-01,smart #1,1\n");

        let daily = String::from_utf8(q.export_daily("2025-01-02", &CsvWriter).unwrap()).unwrap();
        assert_eq!(daily.lines().count(), 2);
        assert!(daily.lines().nth(1).unwrap().starts_with("Germany,smart #2,2025-01-02,"));
    }
}
