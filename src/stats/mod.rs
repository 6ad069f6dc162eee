use crate::models::{group_label, Resident};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Voting completion for a single group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStats {
    pub total: u64,
    pub voted: u64,
    pub percentage: u8,
}

impl GroupStats {
    pub fn from_counts(total: u64, voted: u64) -> Self {
        let voted = voted.min(total);
        Self {
            total,
            voted,
            percentage: percentage(voted, total),
        }
    }
}

/// Per-group summary keyed by group label. Keys iterate in lexicographic
/// order, so two snapshots built from the same residents compare and
/// serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsSnapshot {
    groups: BTreeMap<String, GroupStats>,
}

impl StatsSnapshot {
    pub fn get(&self, group: &str) -> Option<&GroupStats> {
        self.groups.get(group)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GroupStats)> {
        self.groups.iter().map(|(group, stats)| (group.as_str(), stats))
    }
}

impl FromIterator<(String, GroupStats)> for StatsSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, GroupStats)>>(iter: I) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}

/// Rounds `voted / total * 100` half-up. Integer arithmetic only, so the
/// boundaries are exact: 1/3 is 33, 2/3 is 67, 1/8 is 13.
pub fn percentage(voted: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let voted = voted.min(total) as u128;
    let total = total as u128;
    ((voted * 200 + total) / (total * 2)) as u8
}

/// Aggregates `(unit, has_voted)` rows into a fresh snapshot.
pub fn recompute_rows<'a, I>(rows: I) -> StatsSnapshot
where
    I: IntoIterator<Item = (Option<&'a str>, bool)>,
{
    let mut counts: BTreeMap<String, (u64, u64)> = BTreeMap::new();

    for (unit, has_voted) in rows {
        let entry = counts.entry(group_label(unit).to_string()).or_insert((0, 0));
        entry.0 += 1;
        if has_voted {
            entry.1 += 1;
        }
    }

    counts
        .into_iter()
        .map(|(group, (total, voted))| (group, GroupStats::from_counts(total, voted)))
        .collect()
}

pub fn recompute<'a, I>(residents: I) -> StatsSnapshot
where
    I: IntoIterator<Item = &'a Resident>,
{
    recompute_rows(
        residents
            .into_iter()
            .map(|r| (r.unit.as_deref(), r.has_voted)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_GROUP;

    fn scenario() -> Vec<Resident> {
        vec![
            Resident::new("1", Some("A"), false),
            Resident::new("2", Some("A"), true),
            Resident::new("3", Some("B"), false),
        ]
    }

    #[test]
    fn aggregates_per_group() {
        let snapshot = recompute(&scenario());

        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            snapshot.get("A"),
            Some(&GroupStats { total: 2, voted: 1, percentage: 50 })
        );
        assert_eq!(
            snapshot.get("B"),
            Some(&GroupStats { total: 1, voted: 0, percentage: 0 })
        );
    }

    #[test]
    fn empty_input_gives_empty_snapshot() {
        let snapshot = recompute(&Vec::<Resident>::new());
        assert!(snapshot.is_empty());
    }

    #[test]
    fn result_does_not_depend_on_input_order() {
        let residents = scenario();
        let expected = recompute(&residents);
        let expected_json = serde_json::to_string(&expected).unwrap();

        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for order in orders {
            let permuted: Vec<Resident> = order.iter().map(|&i| residents[i].clone()).collect();
            let snapshot = recompute(&permuted);
            assert_eq!(snapshot, expected);
            assert_eq!(serde_json::to_string(&snapshot).unwrap(), expected_json);
        }
    }

    #[test]
    fn ungrouped_residents_are_counted_in_default_bucket() {
        let residents = vec![
            Resident::new("1", None, true),
            Resident::new("2", Some(""), false),
            Resident::new("3", Some("A"), true),
        ];
        let snapshot = recompute(&residents);

        assert_eq!(
            snapshot.get(DEFAULT_GROUP),
            Some(&GroupStats { total: 2, voted: 1, percentage: 50 })
        );
        assert_eq!(snapshot.get("A").map(|s| s.total), Some(1));
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(3, 8), 38);
        assert_eq!(percentage(1, 200), 1);
        assert_eq!(percentage(1, 201), 0);
        assert_eq!(percentage(199, 200), 100);
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn voted_never_exceeds_total() {
        let residents: Vec<Resident> = (0..50)
            .map(|i| {
                let unit = format!("Tổ {}", i % 4);
                Resident::new(i.to_string(), Some(unit.as_str()), i % 3 == 0)
            })
            .collect();

        for (_, stats) in recompute(&residents).iter() {
            assert!(stats.voted <= stats.total);
            assert_eq!(stats.percentage, percentage(stats.voted, stats.total));
        }
    }

    #[test]
    fn groups_are_keyed_in_lexicographic_order() {
        let residents = vec![
            Resident::new("1", Some("C"), false),
            Resident::new("2", Some("A"), false),
            Resident::new("3", Some("B"), false),
            Resident::new("4", Some("A"), false),
        ];
        let snapshot = recompute(&residents);
        let groups: Vec<&str> = snapshot.iter().map(|(g, _)| g).collect();
        assert_eq!(groups, vec!["A", "B", "C"]);
    }
}
