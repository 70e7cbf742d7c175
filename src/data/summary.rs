use super::model::{Record, TopicGroup};

/// Group a (usually single-day) subset by topic.
///
/// Topics appear in first-seen order and each topic keeps its records in
/// their original relative order. An empty subset gives no groups.
pub fn summarize<'a>(subset: &[&'a Record]) -> Vec<TopicGroup<'a>> {
    let mut groups: Vec<TopicGroup<'a>> = Vec::new();
    for &record in subset {
        match groups.iter_mut().find(|g| g.topic == record.topic) {
            Some(group) => group.entries.push(record),
            None => groups.push(TopicGroup {
                topic: &record.topic,
                entries: vec![record],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::filter_by_exact_date;
    use crate::data::fixtures::{date, record, scenario_dataset};

    #[test]
    fn groups_by_topic_in_first_seen_order() {
        let records = vec![
            record("Germany", "smart #3", "2025-01-05"),
            record("Austria", "smart #1", "2025-01-05"),
            record("Belgium", "smart #3", "2025-01-05"),
            record("Switzerland", "smart #1", "2025-01-05"),
            record("Germany", "smart #6", "2025-01-05"),
        ];
        let subset: Vec<&Record> = records.iter().collect();
        let groups = summarize(&subset);

        let topics: Vec<&str> = groups.iter().map(|g| g.topic).collect();
        assert_eq!(topics, vec!["smart #3", "smart #1", "smart #6"]);

        let countries: Vec<&str> = groups[0].entries.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(countries, vec!["Germany", "Belgium"]);
        let countries: Vec<&str> = groups[1].entries.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(countries, vec!["Austria", "Switzerland"]);
        assert_eq!(groups[2].entries.len(), 1);
    }

    #[test]
    fn entries_borrow_from_dataset() {
        let ds = scenario_dataset();
        let day = filter_by_exact_date(&ds, date("2025-01-01"));
        let groups = summarize(&day);
        assert_eq!(groups.len(), 1);
        assert!(std::ptr::eq(groups[0].entries[0], &ds.records()[0]));
        assert!(std::ptr::eq(groups[0].entries[1], &ds.records()[1]));
    }

    #[test]
    fn missing_day_summarizes_to_nothing() {
        let ds = scenario_dataset();
        let day = filter_by_exact_date(&ds, date("2025-03-01"));
        assert!(day.is_empty());
        assert!(summarize(&day).is_empty());
    }
}
