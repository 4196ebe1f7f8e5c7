//! Multi-week reports.

use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use db::models::quarter::Quarter;
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use ts_rs::TS;

use super::{
    summary::merge_activity_summaries,
    timesheet::{ActivitySummary, TimeSheet, TimeSheetError},
    week::{Week, WeekError},
};

/// A report may cover at most a year of ISO weeks.
pub const MAX_REPORT_WEEKS: i64 = 53;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Sheet(#[from] TimeSheetError),
    #[error(transparent)]
    Week(#[from] WeekError),
    #[error("report cannot start at {from} and end at {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },
    #[error("report spans {0} weeks, the limit is 53")]
    TooManyWeeks(i64),
}

/// Where report generation reads stored time sheets from.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn load_sheet(&self, user_id: i64, date: NaiveDate) -> Result<TimeSheet, ReportError>;
}

#[async_trait]
impl SheetSource for SqlitePool {
    async fn load_sheet(&self, user_id: i64, date: NaiveDate) -> Result<TimeSheet, ReportError> {
        let quarters = Quarter::find_by_date(self, user_id, date).await?;
        Ok(TimeSheet::from_quarters(date, quarters)?)
    }
}

/// Weeks plus the per-activity totals across all of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
pub struct Report {
    weeks: Vec<Week>,
    total_activities: Vec<ActivitySummary>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_week(&mut self, week: Week) {
        let activities = std::mem::take(&mut self.total_activities)
            .into_iter()
            .chain(week.activities());
        self.total_activities = merge_activity_summaries(activities);
        self.weeks.push(week);
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    /// Ordered by activity id.
    pub fn total_activities(&self) -> &[ActivitySummary] {
        &self.total_activities
    }

    pub fn total_hours(&self) -> f64 {
        self.total_activities.iter().map(|a| a.amount).sum()
    }
}

/// One week together with its roll-up.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
pub struct WeekOverview {
    pub week: Week,
    pub activities: Vec<ActivitySummary>,
    pub total: f64,
}

impl From<Week> for WeekOverview {
    fn from(week: Week) -> Self {
        Self {
            activities: week.activities(),
            total: week.total(),
            week,
        }
    }
}

pub struct ReportService;

impl ReportService {
    /// Builds a report over every ISO week touched by `from..=to`.
    pub async fn generate<S>(
        source: &S,
        user_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Report, ReportError>
    where
        S: SheetSource + ?Sized,
    {
        if from > to {
            return Err(ReportError::InvalidRange { from, to });
        }

        let first = Week::containing(from).start_date();
        let last = Week::containing(to).start_date();
        let weeks = (last - first).num_days() / 7 + 1;
        if weeks > MAX_REPORT_WEEKS {
            return Err(ReportError::TooManyWeeks(weeks));
        }

        info!(user_id, %from, %to, weeks, "Generating report");

        let mut report = Report::new();
        let mut monday = first;
        while monday <= last {
            let week = Self::load_week(source, user_id, Week::containing(monday)).await?;
            report.add_week(week);
            monday = monday + Days::new(7);
        }

        Ok(report)
    }

    pub async fn week<S>(
        source: &S,
        user_id: i64,
        year: i32,
        week: u32,
    ) -> Result<WeekOverview, ReportError>
    where
        S: SheetSource + ?Sized,
    {
        let week = Self::load_week(source, user_id, Week::new(year, week)?).await?;
        Ok(week.into())
    }

    async fn load_week<S>(source: &S, user_id: i64, mut week: Week) -> Result<Week, ReportError>
    where
        S: SheetSource + ?Sized,
    {
        for date in week.dates() {
            let sheet = source.load_sheet(user_id, date).await?;
            week.update_sheet(sheet)?;
        }
        Ok(week)
    }
}
