//! Derived index-set statistics.
//!
//! Nothing here is stored. Every figure is recomputed from the current index
//! sets and inputs; the mock ingests no messages so `documents` and `size`
//! stay at zero and `indices` counts the inputs writing to a set.
use glmock_model::{IndexSet, IndexSetStats, Input};
use std::collections::BTreeMap;

pub fn stats_for_index_set(
    index_sets: &[IndexSet],
    inputs: &[Input],
    id: &str,
) -> Option<IndexSetStats> {
    index_sets.iter().find(|set| set.id == id)?;
    Some(IndexSetStats {
        indices: inputs
            .iter()
            .filter(|input| input.index_set_id.as_deref() == Some(id))
            .count() as u64,
        ..IndexSetStats::default()
    })
}

/// Stats for every existing index set, keyed by id.
pub fn stats_by_index_set(
    index_sets: &[IndexSet],
    inputs: &[Input],
) -> BTreeMap<String, IndexSetStats> {
    let mut stats: BTreeMap<String, IndexSetStats> = index_sets
        .iter()
        .map(|set| (set.id.clone(), IndexSetStats::default()))
        .collect();
    for input in inputs {
        if let Some(entry) = input
            .index_set_id
            .as_deref()
            .and_then(|id| stats.get_mut(id))
        {
            entry.indices += 1;
        }
    }
    stats
}

/// Sum over all existing index sets. Inputs pointing at a missing set are not
/// counted.
pub fn total_stats(index_sets: &[IndexSet], inputs: &[Input]) -> IndexSetStats {
    let mut total = IndexSetStats::default();
    for stats in stats_by_index_set(index_sets, inputs).into_values() {
        total += stats;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(id: &str) -> IndexSet {
        let mut set = IndexSet::new(id, format!("prefix-{id}"));
        set.id = id.to_string();
        set
    }

    fn input(index_set_id: Option<&str>) -> Input {
        Input {
            title: "syslog".to_string(),
            kind: "org.graylog2.inputs.syslog.udp.SyslogUDPInput".to_string(),
            index_set_id: index_set_id.map(str::to_owned),
            ..Input::default()
        }
    }

    #[test]
    fn per_set_stats_count_inputs() {
        let sets = vec![set("a"), set("b")];
        let inputs = vec![input(Some("a")), input(Some("a")), input(None)];
        let a = stats_for_index_set(&sets, &inputs, "a").expect("a");
        assert_eq!(a.indices, 2);
        assert_eq!(a.documents, 0);
        assert_eq!(stats_for_index_set(&sets, &inputs, "b").map(|s| s.indices), Some(0));
        assert!(stats_for_index_set(&sets, &inputs, "missing").is_none());
    }

    #[test]
    fn total_ignores_dangling_references() {
        let sets = vec![set("a"), set("b")];
        let inputs = vec![input(Some("a")), input(Some("b")), input(Some("gone"))];
        assert_eq!(total_stats(&sets, &inputs).indices, 2);
        assert_eq!(total_stats(&[], &inputs), IndexSetStats::default());
        assert_eq!(stats_by_index_set(&sets, &inputs).len(), 2);
    }
}
