pub mod table;

use crate::models::DEFAULT_GROUP;
use crate::stats::{percentage, GroupStats, StatsSnapshot};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref NON_DIGITS: Regex = Regex::new(r"\D").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompletionTier {
    High,
    Medium,
    Low,
}

impl CompletionTier {
    pub fn for_percentage(percentage: u8) -> Self {
        match percentage {
            80.. => CompletionTier::High,
            50..=79 => CompletionTier::Medium,
            _ => CompletionTier::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OverallSummary {
    pub total: u64,
    pub voted: u64,
    pub not_voted: u64,
    pub percentage: u8,
}

/// Totals across every group, the default bucket included.
pub fn overall(snapshot: &StatsSnapshot) -> OverallSummary {
    let (total, voted) = snapshot
        .iter()
        .fold((0u64, 0u64), |(t, v), (_, s)| (t + s.total, v + s.voted));
    OverallSummary {
        total,
        voted,
        not_voted: total - voted,
        percentage: percentage(voted, total),
    }
}

/// Groups for the inline summary bar: default bucket dropped, label order.
pub fn summary_groups(snapshot: &StatsSnapshot) -> Vec<(&str, &GroupStats)> {
    snapshot
        .iter()
        .filter(|(group, _)| *group != DEFAULT_GROUP)
        .collect()
}

/// Groups for the overview panel and the group filter: default bucket and
/// empty groups dropped, ordered by the number in the label.
pub fn overview_groups(snapshot: &StatsSnapshot) -> Vec<(&str, &GroupStats)> {
    let mut groups: Vec<(&str, &GroupStats)> = snapshot
        .iter()
        .filter(|(group, stats)| *group != DEFAULT_GROUP && stats.total > 0)
        .collect();
    groups.sort_by(|(a, _), (b, _)| group_number(a).cmp(&group_number(b)).then_with(|| a.cmp(b)));
    groups
}

/// Digits of the label read as one number, 0 when there are none.
pub fn group_number(group: &str) -> u64 {
    NON_DIGITS.replace_all(group, "").parse().unwrap_or(0)
}

pub fn display_name(group: &str) -> String {
    if group.to_lowercase().starts_with("tổ") {
        group.to_string()
    } else {
        format!("Tổ {}", group)
    }
}

/// One line per group, e.g. `Tổ 1: 3/4 (75%)`.
pub fn format_summary(snapshot: &StatsSnapshot) -> String {
    let mut summary = String::new();
    for (group, stats) in summary_groups(snapshot) {
        summary.push_str(&format!(
            "{}: {}/{} ({}%)\n",
            display_name(group),
            stats.voted,
            stats.total,
            stats.percentage
        ));
    }

    let overall = overall(snapshot);
    summary.push_str(&format!(
        "\n{} of {} residents voted ({}%), {} remaining.",
        overall.voted, overall.total, overall.percentage, overall.not_voted
    ));
    summary
}
