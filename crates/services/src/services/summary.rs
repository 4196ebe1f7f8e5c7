//! Roll-ups of activity hours, with and without activity metadata.

use std::collections::{BTreeMap, HashMap};

use db::models::{activity::Activity, quarter::Quarter};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::timesheet::ActivitySummary;

const UNKNOWN_TITLE: &str = "Unknown";
const UNKNOWN_COLOR: &str = "#ccc";

/// One row of a day summary as shown next to the time sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct SummaryEntry {
    pub id: i64,
    pub title: String,
    pub color: String,
    /// Hours with two decimals, e.g. `"1.25"`
    pub sum: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct SheetSummary {
    pub summary: Vec<SummaryEntry>,
    pub total: String,
}

/// Merges summaries that share an activity id by summing their amounts.
/// The result is ordered by id.
pub fn merge_activity_summaries<I>(summaries: I) -> Vec<ActivitySummary>
where
    I: IntoIterator<Item = ActivitySummary>,
{
    let mut merged: BTreeMap<i64, f64> = BTreeMap::new();
    for summary in summaries {
        *merged.entry(summary.id).or_default() += summary.amount;
    }

    merged
        .into_iter()
        .map(|(id, amount)| ActivitySummary::new(id, amount))
        .collect()
}

/// Indexes activities by id.
pub fn activity_lookup(activities: Vec<Activity>) -> HashMap<i64, Activity> {
    activities.into_iter().map(|a| (a.id, a)).collect()
}

/// Summarizes quarters with the title and color of each activity.
pub fn summarize_quarters(
    quarters: &[Quarter],
    activities: &HashMap<i64, Activity>,
) -> SheetSummary {
    let mut counts: BTreeMap<i64, u32> = BTreeMap::new();
    for activity_id in quarters.iter().filter_map(|q| q.activity_id) {
        *counts.entry(activity_id).or_default() += 1;
    }

    let mut total = 0.0;
    let summary = counts
        .into_iter()
        .map(|(id, count)| {
            let hours = f64::from(count) / 4.0;
            total += hours;

            let (title, color) = match activities.get(&id) {
                Some(activity) => (activity.title.clone(), activity.color.clone()),
                None => (UNKNOWN_TITLE.to_string(), UNKNOWN_COLOR.to_string()),
            };

            SummaryEntry {
                id,
                title,
                color,
                sum: format!("{:.2}", hours),
            }
        })
        .collect();

    SheetSummary {
        summary,
        total: format!("{:.2}", total),
    }
}
