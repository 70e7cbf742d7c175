use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::model::{GroupedCount, Record};

/// Count records per `(date, topic)` pair.
///
/// Rows come out ordered by date ascending, then by the order in which each
/// topic first appears in `subset`. Every pair present in the subset yields
/// exactly one row, so the counts always sum to `subset.len()`.
pub fn aggregate(subset: &[&Record]) -> Vec<GroupedCount> {
    let mut topic_rank: Vec<&str> = Vec::new();
    let mut groups: BTreeMap<(NaiveDate, usize), usize> = BTreeMap::new();

    for record in subset {
        let rank = match topic_rank.iter().position(|t| *t == record.topic) {
            Some(rank) => rank,
            None => {
                topic_rank.push(&record.topic);
                topic_rank.len() - 1
            }
        };
        *groups.entry((record.date, rank)).or_default() += 1;
    }

    groups
        .into_iter()
        .map(|((date, rank), count)| GroupedCount {
            date,
            topic: topic_rank[rank].to_string(),
            count,
        })
        .collect()
}
