use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate};
use db::models::quarter::{QUARTERS_PER_DAY, Quarter};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use utils::date::format_date;

use super::time_range::{TimeRange, TimeRangeError};

#[derive(Debug, Error, PartialEq)]
pub enum TimeSheetError {
    #[error("a day holds at most 96 quarters, got {0}")]
    TooManyQuarters(usize),
    #[error("quarter offset {0} is outside 0..96")]
    OffsetOutOfRange(i32),
    #[error("quarter offset {0} appears more than once")]
    DuplicateOffset(i32),
}

/// Hours spent on one activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
pub struct ActivitySummary {
    pub id: i64,
    pub amount: f64,
}

impl ActivitySummary {
    pub fn new(id: i64, amount: f64) -> Self {
        Self { id, amount }
    }
}

/// The quarters reported for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
pub struct TimeSheet {
    date: NaiveDate,
    quarters: Vec<Quarter>,
    summary: Vec<ActivitySummary>,
}

impl TimeSheet {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            quarters: Vec::new(),
            summary: Vec::new(),
        }
    }

    /// Builds a summarized sheet. Offsets must be unique and inside the day.
    pub fn from_quarters(date: NaiveDate, quarters: Vec<Quarter>) -> Result<Self, TimeSheetError> {
        if quarters.len() > QUARTERS_PER_DAY as usize {
            return Err(TimeSheetError::TooManyQuarters(quarters.len()));
        }

        let mut seen = HashSet::with_capacity(quarters.len());
        for quarter in &quarters {
            if !(0..QUARTERS_PER_DAY).contains(&quarter.offset) {
                return Err(TimeSheetError::OffsetOutOfRange(quarter.offset));
            }
            if !seen.insert(quarter.offset) {
                return Err(TimeSheetError::DuplicateOffset(quarter.offset));
            }
        }

        let mut sheet = Self {
            date,
            quarters,
            summary: Vec::new(),
        };
        sheet.summarize();
        Ok(sheet)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Monday is 0.
    pub fn weekday(&self) -> usize {
        self.date.weekday().num_days_from_monday() as usize
    }

    pub fn date_string(&self) -> String {
        format_date(self.date)
    }

    pub fn quarters(&self) -> &[Quarter] {
        &self.quarters
    }

    pub fn summary(&self) -> &[ActivitySummary] {
        &self.summary
    }

    /// Recomputes the per-activity hours: quarters per activity divided by
    /// four, unassigned quarters skipped, ordered by activity id.
    pub fn summarize(&mut self) {
        let mut counts: BTreeMap<i64, u32> = BTreeMap::new();
        for activity_id in self.quarters.iter().filter_map(|q| q.activity_id) {
            *counts.entry(activity_id).or_default() += 1;
        }

        self.summary = counts
            .into_iter()
            .map(|(id, count)| ActivitySummary::new(id, f64::from(count) / 4.0))
            .collect();
    }

    /// Hours reported this day, across all activities.
    pub fn total(&self) -> f64 {
        self.summary.iter().map(|s| s.amount).sum()
    }

    /// Hours spent on `activity_id`, zero if it was not used.
    pub fn time(&self, activity_id: i64) -> f64 {
        self.summary
            .iter()
            .find(|s| s.id == activity_id)
            .map(|s| s.amount)
            .unwrap_or(0.0)
    }

    pub fn clear(&mut self) {
        self.quarters.clear();
        self.summary.clear();
    }

    /// Collapses consecutive quarters with the same activity into ranges,
    /// ordered by start.
    pub fn ranges(&self) -> Result<Vec<TimeRange>, TimeRangeError> {
        let mut quarters: Vec<&Quarter> = self.quarters.iter().filter(|q| q.is_assigned()).collect();
        quarters.sort_by_key(|q| q.offset);

        let mut ranges: Vec<TimeRange> = Vec::new();
        for quarter in quarters {
            let mut next = TimeRange::new(quarter.offset, 1, quarter.activity_id)?;
            if let Some(last) = ranges.last_mut() {
                if last.activity_id() == next.activity_id() && last.ends() == next.start() {
                    last.merge(&mut next)?;
                    continue;
                }
            }
            ranges.push(next);
        }

        Ok(ranges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2013, 1, 29).unwrap()
    }

    fn marked(offsets: std::ops::Range<i32>, activity_id: i64) -> Vec<Quarter> {
        offsets.map(|o| Quarter::marked(o, activity_id)).collect()
    }

    #[test]
    fn empty_sheet() {
        let sheet = TimeSheet::new(day());
        assert!(sheet.quarters().is_empty());
        assert_eq!(sheet.total(), 0.0);
        assert_eq!(sheet.weekday(), 1);
        assert_eq!(sheet.date_string(), "2013-01-29");
    }

    #[test]
    fn summarize_counts_quarters_per_activity() {
        let mut quarters = marked(32..38, 7);
        quarters.extend(marked(52..54, 3));
        quarters.push(Quarter::unassigned(60));

        let sheet = TimeSheet::from_quarters(day(), quarters).unwrap();
        assert_eq!(
            sheet.summary(),
            &[ActivitySummary::new(3, 0.5), ActivitySummary::new(7, 1.5)]
        );
        assert_eq!(sheet.total(), 2.0);
        assert_eq!(sheet.time(7), 1.5);
        assert_eq!(sheet.time(99), 0.0);
    }

    #[test]
    fn full_day_totals_twenty_four_hours() {
        let mut quarters = marked(0..30, 1);
        quarters.extend(marked(30..61, 2));
        quarters.extend(marked(61..96, 3));

        let sheet = TimeSheet::from_quarters(day(), quarters).unwrap();
        assert_eq!(sheet.total(), 24.0);
    }

    #[test]
    fn any_partition_of_a_full_day_totals_twenty_four_hours() {
        for activities in 1..=96i64 {
            // strided: activity = offset mod n
            let strided: Vec<Quarter> = (0..96)
                .map(|o| Quarter::marked(o, o as i64 % activities))
                .collect();
            // scattered: a multiplicative hash of the offset picks the activity
            let scattered: Vec<Quarter> = (0..96)
                .map(|o| Quarter::marked(o, (o as i64 * 7919 + activities * 31) % activities))
                .collect();

            for quarters in [strided, scattered] {
                let sheet = TimeSheet::from_quarters(day(), quarters).unwrap();
                assert_eq!(sheet.total(), 24.0, "{} activities", activities);
                assert!(sheet.summary().len() as i64 <= activities);
                assert!(sheet.summary().windows(2).all(|w| w[0].id < w[1].id));
            }
        }
    }

    #[test]
    fn rejects_invalid_quarters() {
        assert_eq!(
            TimeSheet::from_quarters(day(), marked(0..97, 1)),
            Err(TimeSheetError::TooManyQuarters(97))
        );
        assert_eq!(
            TimeSheet::from_quarters(day(), vec![Quarter::marked(96, 1)]),
            Err(TimeSheetError::OffsetOutOfRange(96))
        );
        assert_eq!(
            TimeSheet::from_quarters(day(), vec![Quarter::marked(4, 1), Quarter::marked(4, 2)]),
            Err(TimeSheetError::DuplicateOffset(4))
        );
    }

    #[test]
    fn clear_removes_quarters() {
        let mut sheet = TimeSheet::from_quarters(day(), marked(0..4, 1)).unwrap();
        sheet.clear();
        assert!(sheet.quarters().is_empty());
        assert_eq!(sheet.total(), 0.0);
    }

    #[test]
    fn ranges_merge_consecutive_quarters() {
        let mut quarters = marked(54..58, 2);
        quarters.extend(marked(52..54, 1));
        quarters.extend(marked(60..62, 2));

        let sheet = TimeSheet::from_quarters(day(), quarters).unwrap();
        let ranges: Vec<(i32, i32, Option<i64>)> = sheet
            .ranges()
            .unwrap()
            .iter()
            .map(|r| (r.start(), r.length(), r.activity_id()))
            .collect();
        assert_eq!(ranges, vec![(52, 2, Some(1)), (54, 4, Some(2)), (60, 2, Some(2))]);
    }
}
