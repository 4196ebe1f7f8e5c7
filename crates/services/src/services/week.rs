use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

use super::{
    summary::merge_activity_summaries,
    timesheet::{ActivitySummary, TimeSheet},
};

pub const DAYS_PER_WEEK: usize = 7;

#[derive(Debug, Error, PartialEq)]
pub enum WeekError {
    #[error("{year} has no ISO week {week}")]
    InvalidWeek { year: i32, week: u32 },
    #[error("{date} is not part of week {week} of {year}")]
    SheetOutsideWeek {
        date: NaiveDate,
        year: i32,
        week: u32,
    },
}

/// An ISO week: always seven sheets, Monday first.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
pub struct Week {
    year: i32,
    week: u32,
    sheets: Vec<TimeSheet>,
}

impl Week {
    pub fn new(year: i32, week: u32) -> Result<Self, WeekError> {
        let monday = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
            .ok_or(WeekError::InvalidWeek { year, week })?;
        Ok(Self::starting(monday))
    }

    /// The ISO week `date` falls in.
    pub fn containing(date: NaiveDate) -> Self {
        let monday = date - Days::new(u64::from(date.weekday().num_days_from_monday()));
        Self::starting(monday)
    }

    fn starting(monday: NaiveDate) -> Self {
        let iso = monday.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
            sheets: monday.iter_days().take(DAYS_PER_WEEK).map(TimeSheet::new).collect(),
        }
    }

    /// ISO year, which differs from the calendar year around new year.
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week_of_year(&self) -> u32 {
        self.week
    }

    pub fn start_date(&self) -> NaiveDate {
        self.sheets[0].date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.sheets[DAYS_PER_WEEK - 1].date()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.sheets.iter().map(TimeSheet::date).collect()
    }

    pub fn sheets(&self) -> &[TimeSheet] {
        &self.sheets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeSheet> {
        self.sheets.iter()
    }

    /// Replaces the sheet for the same day.
    pub fn update_sheet(&mut self, sheet: TimeSheet) -> Result<(), WeekError> {
        if sheet.date() < self.start_date() || sheet.date() > self.end_date() {
            return Err(WeekError::SheetOutsideWeek {
                date: sheet.date(),
                year: self.year,
                week: self.week,
            });
        }

        let weekday = sheet.weekday();
        self.sheets[weekday] = sheet;
        Ok(())
    }

    /// Hours reported during the whole week.
    pub fn total(&self) -> f64 {
        self.sheets.iter().map(TimeSheet::total).sum()
    }

    /// Per-activity hours of the week, ordered by activity id.
    pub fn activities(&self) -> Vec<ActivitySummary> {
        merge_activity_summaries(
            self.sheets
                .iter()
                .flat_map(|sheet| sheet.summary().iter().copied()),
        )
    }
}

impl<'a> IntoIterator for &'a Week {
    type Item = &'a TimeSheet;
    type IntoIter = std::slice::Iter<'a, TimeSheet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sheets.iter()
    }
}
