//! Service for reading and marking the quarters of a day.

use chrono::{Days, NaiveDate};
use db::models::{
    activity::Activity,
    comment::Comment,
    quarter::{QUARTERS_PER_DAY, Quarter},
};
use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;
use tracing::{debug, info};
use ts_rs::TS;

use super::{
    color::Color,
    summary::{SheetSummary, SummaryEntry, activity_lookup, summarize_quarters},
    timesheet::{TimeSheet, TimeSheetError},
};

const DEFAULT_FILL: &str = "#fff";
const DEFAULT_BORDER: &str = "#ccc";
const BORDER_LUMINANCE: f64 = -0.2;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Sheet(#[from] TimeSheetError),
    #[error("no quarters given")]
    NoQuarters,
    #[error("quarter index {0} is outside 0..96")]
    IndexOutOfRange(i32),
    #[error("activity {0} not found")]
    ActivityNotFound(i64),
    #[error("activity {0} is disabled")]
    ActivityDisabled(i64),
    #[error("quarter {0} not found")]
    QuarterNotFound(i64),
    #[error("missing value for comment")]
    EmptyComment,
}

/// Marks `indexes` with `activity`, or clears them when `activity` is null.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct SheetUpdate {
    pub indexes: Vec<i32>,
    pub activity: Option<i64>,
}

/// A quarter with the colors it is drawn with.
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
pub struct SheetSlot {
    #[serde(flatten)]
    #[ts(flatten)]
    pub quarter: Quarter,
    pub color: String,
    pub border_color: String,
}

/// Everything needed to draw one day.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct SheetView {
    pub date: NaiveDate,
    pub weekday: String,
    pub yesterday: Option<NaiveDate>,
    pub tomorrow: Option<NaiveDate>,
    pub slots: Vec<SheetSlot>,
    pub summary: Vec<SummaryEntry>,
    pub total: String,
}

pub struct SheetService;

impl SheetService {
    pub async fn timesheet(
        pool: &SqlitePool,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<TimeSheet, SheetError> {
        let quarters = Quarter::find_by_date(pool, user_id, date).await?;
        Ok(TimeSheet::from_quarters(date, quarters)?)
    }

    /// Applies the update in one transaction and returns the refreshed day summary.
    ///
    /// Changing the activity of a quarter replaces it, dropping its comment.
    pub async fn apply(
        pool: &SqlitePool,
        user_id: i64,
        date: NaiveDate,
        update: &SheetUpdate,
    ) -> Result<SheetSummary, SheetError> {
        if update.indexes.is_empty() {
            return Err(SheetError::NoQuarters);
        }
        if let Some(index) = update
            .indexes
            .iter()
            .copied()
            .find(|i| !(0..QUARTERS_PER_DAY).contains(i))
        {
            return Err(SheetError::IndexOutOfRange(index));
        }
        if let Some(activity_id) = update.activity {
            let activity = Activity::find_by_id(pool, user_id, activity_id)
                .await?
                .ok_or(SheetError::ActivityNotFound(activity_id))?;
            if !activity.enabled {
                return Err(SheetError::ActivityDisabled(activity_id));
            }
        }

        let mut tx = pool.begin().await?;
        for &offset in &update.indexes {
            let existing = Quarter::find_by_offset(&mut *tx, user_id, date, offset).await?;
            match (existing, update.activity) {
                (None, None) => {}
                (Some(quarter), None) => {
                    Self::drop_quarter(&mut tx, user_id, date, &quarter).await?;
                }
                (None, Some(activity_id)) => {
                    Quarter::insert(&mut *tx, user_id, date, offset, activity_id).await?;
                }
                (Some(quarter), Some(activity_id)) if quarter.activity_id != Some(activity_id) => {
                    Self::drop_quarter(&mut tx, user_id, date, &quarter).await?;
                    Quarter::insert(&mut *tx, user_id, date, offset, activity_id).await?;
                }
                (Some(_), Some(_)) => {}
            }
        }
        tx.commit().await?;

        debug!(
            user_id,
            %date,
            quarters = update.indexes.len(),
            activity = ?update.activity,
            "Updated time sheet"
        );

        let quarters = Quarter::find_by_date(pool, user_id, date).await?;
        let activities = activity_lookup(Activity::find_by_user(pool, user_id).await?);
        Ok(summarize_quarters(&quarters, &activities))
    }

    /// Removes a stored quarter together with its comment.
    async fn drop_quarter(
        tx: &mut Transaction<'_, Sqlite>,
        user_id: i64,
        date: NaiveDate,
        quarter: &Quarter,
    ) -> Result<(), SheetError> {
        if let Some(comment_id) = quarter.comment_id {
            Comment::delete(&mut **tx, user_id, comment_id).await?;
        }
        Quarter::delete_by_offset(&mut **tx, user_id, date, quarter.offset).await?;
        Ok(())
    }

    pub async fn view(
        pool: &SqlitePool,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<SheetView, SheetError> {
        let sheet = Self::timesheet(pool, user_id, date).await?;
        let activities = activity_lookup(Activity::find_by_user(pool, user_id).await?);

        let mut slots: Vec<SheetSlot> = (0..QUARTERS_PER_DAY)
            .map(|offset| SheetSlot {
                quarter: Quarter::unassigned(offset),
                color: DEFAULT_FILL.to_string(),
                border_color: DEFAULT_BORDER.to_string(),
            })
            .collect();

        for quarter in sheet.quarters() {
            let color = quarter
                .activity_id
                .and_then(|id| activities.get(&id))
                .and_then(|activity| Color::new(&activity.color).ok());

            let slot = &mut slots[quarter.offset as usize];
            if let Some(color) = color {
                slot.border_color = color.luminance(BORDER_LUMINANCE).to_string();
                slot.color = color.to_string();
            }
            slot.quarter = quarter.clone();
        }

        let summary = summarize_quarters(sheet.quarters(), &activities);

        Ok(SheetView {
            date,
            weekday: date.format("%A").to_string(),
            yesterday: date.checked_sub_days(Days::new(1)),
            tomorrow: date.checked_add_days(Days::new(1)),
            slots,
            summary: summary.summary,
            total: summary.total,
        })
    }

    async fn quarter(pool: &SqlitePool, user_id: i64, quarter_id: i64) -> Result<Quarter, SheetError> {
        Quarter::find_by_id(pool, user_id, quarter_id)
            .await?
            .ok_or(SheetError::QuarterNotFound(quarter_id))
    }

    pub async fn comment(
        pool: &SqlitePool,
        user_id: i64,
        quarter_id: i64,
    ) -> Result<Option<Comment>, SheetError> {
        let quarter = Self::quarter(pool, user_id, quarter_id).await?;
        match quarter.comment_id {
            Some(comment_id) => Ok(Comment::find_by_id(pool, user_id, comment_id).await?),
            None => Ok(None),
        }
    }

    /// Creates the quarter's comment, or replaces the text of the existing one.
    pub async fn save_comment(
        pool: &SqlitePool,
        user_id: i64,
        quarter_id: i64,
        text: &str,
    ) -> Result<Comment, SheetError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SheetError::EmptyComment);
        }

        let quarter = Self::quarter(pool, user_id, quarter_id).await?;
        if let Some(comment_id) = quarter.comment_id {
            if let Some(comment) = Comment::update(pool, user_id, comment_id, text).await? {
                return Ok(comment);
            }
        }

        let mut tx = pool.begin().await?;
        let comment = Comment::create(&mut *tx, user_id, text).await?;
        Quarter::set_comment(&mut *tx, user_id, quarter_id, Some(comment.id)).await?;
        tx.commit().await?;

        info!(user_id, quarter_id, comment_id = comment.id, "Added comment");
        Ok(comment)
    }

    pub async fn delete_comment(
        pool: &SqlitePool,
        user_id: i64,
        quarter_id: i64,
    ) -> Result<(), SheetError> {
        let quarter = Self::quarter(pool, user_id, quarter_id).await?;
        if let Some(comment_id) = quarter.comment_id {
            Comment::delete(pool, user_id, comment_id).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use db::{
        DBService,
        models::{
            activity::SaveActivity,
            category::Category,
            user::User,
        },
    };

    use super::*;

    struct Fixture {
        db: DBService,
        user_id: i64,
        comet: i64,
        house: i64,
    }

    async fn setup() -> Fixture {
        let db = DBService::new_in_memory().await.unwrap();
        let joe = User::create(&db.pool, "joe@example.com").await.unwrap();
        let work = Category::create(&db.pool, joe.id, "Work").await.unwrap();
        let mut ids = Vec::new();
        for (title, color) in [("Comet", "#fcaf3e"), ("House", "#3465a4")] {
            let activity = Activity::create(
                &db.pool,
                joe.id,
                &SaveActivity {
                    category_id: work.id,
                    title: title.to_string(),
                    color: color.to_string(),
                    enabled: true,
                    meta: String::new(),
                },
            )
            .await
            .unwrap();
            ids.push(activity.id);
        }
        Fixture {
            db,
            user_id: joe.id,
            comet: ids[0],
            house: ids[1],
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2013, 2, 2).unwrap()
    }

    fn update(indexes: &[i32], activity: Option<i64>) -> SheetUpdate {
        SheetUpdate {
            indexes: indexes.to_vec(),
            activity,
        }
    }

    #[tokio::test]
    async fn mark_replace_and_clear_quarters() {
        let f = setup().await;
        let pool = &f.db.pool;

        let summary = SheetService::apply(pool, f.user_id, day(), &update(&[0, 1, 2, 3, 4], Some(f.comet)))
            .await
            .unwrap();
        assert_eq!(summary.total, "1.25");

        let summary = SheetService::apply(pool, f.user_id, day(), &update(&[3, 4, 5], Some(f.house)))
            .await
            .unwrap();
        assert_eq!(summary.total, "1.50");
        assert_eq!(summary.summary[0].sum, "0.75");
        assert_eq!(summary.summary[1].title, "House");

        let summary = SheetService::apply(pool, f.user_id, day(), &update(&[0, 5], None))
            .await
            .unwrap();
        assert_eq!(summary.total, "1.00");

        let sheet = SheetService::timesheet(pool, f.user_id, day()).await.unwrap();
        assert_eq!(sheet.time(f.comet), 0.5);
        assert_eq!(sheet.time(f.house), 0.5);
    }

    #[tokio::test]
    async fn remarking_with_same_activity_keeps_quarter() {
        let f = setup().await;
        let pool = &f.db.pool;
        SheetService::apply(pool, f.user_id, day(), &update(&[10], Some(f.comet)))
            .await
            .unwrap();
        let before = SheetService::timesheet(pool, f.user_id, day()).await.unwrap();

        SheetService::apply(pool, f.user_id, day(), &update(&[10, 10], Some(f.comet)))
            .await
            .unwrap();
        let after = SheetService::timesheet(pool, f.user_id, day()).await.unwrap();
        assert_eq!(before.quarters(), after.quarters());
    }

    #[tokio::test]
    async fn rejects_invalid_updates() {
        let f = setup().await;
        let pool = &f.db.pool;

        let result = SheetService::apply(pool, f.user_id, day(), &update(&[], Some(f.comet))).await;
        assert!(matches!(result, Err(SheetError::NoQuarters)));

        let result = SheetService::apply(pool, f.user_id, day(), &update(&[95, 96], Some(f.comet))).await;
        assert!(matches!(result, Err(SheetError::IndexOutOfRange(96))));

        let result = SheetService::apply(pool, f.user_id, day(), &update(&[1], Some(999))).await;
        assert!(matches!(result, Err(SheetError::ActivityNotFound(999))));

        sqlx::query("UPDATE activities SET enabled = 0 WHERE id = $1")
            .bind(f.house)
            .execute(pool)
            .await
            .unwrap();
        let result = SheetService::apply(pool, f.user_id, day(), &update(&[1], Some(f.house))).await;
        assert!(matches!(result, Err(SheetError::ActivityDisabled(_))));

        // Nothing was written by the rejected updates.
        let sheet = SheetService::timesheet(pool, f.user_id, day()).await.unwrap();
        assert!(sheet.quarters().is_empty());
    }

    #[tokio::test]
    async fn view_has_every_slot_colored() {
        let f = setup().await;
        let pool = &f.db.pool;
        SheetService::apply(pool, f.user_id, day(), &update(&[52, 53], Some(f.comet)))
            .await
            .unwrap();

        let view = SheetService::view(pool, f.user_id, day()).await.unwrap();
        assert_eq!(view.slots.len(), 96);
        assert_eq!(view.weekday, "Saturday");
        assert_eq!(view.yesterday, NaiveDate::from_ymd_opt(2013, 2, 1));
        assert_eq!(view.tomorrow, NaiveDate::from_ymd_opt(2013, 2, 3));

        assert_eq!(view.slots[52].color, "#fcaf3e");
        assert_eq!(view.slots[52].border_color, "#ca8c32");
        assert_eq!(view.slots[52].quarter.activity_id, Some(f.comet));
        assert_eq!(view.slots[0].color, "#fff");
        assert_eq!(view.slots[0].border_color, "#ccc");
        assert_eq!(view.total, "0.50");
    }

    #[tokio::test]
    async fn comments_follow_quarters() {
        let f = setup().await;
        let pool = &f.db.pool;
        SheetService::apply(pool, f.user_id, day(), &update(&[20], Some(f.comet)))
            .await
            .unwrap();
        let quarter_id = SheetService::timesheet(pool, f.user_id, day()).await.unwrap().quarters()[0]
            .id
            .unwrap();

        assert!(SheetService::comment(pool, f.user_id, quarter_id).await.unwrap().is_none());

        let first = SheetService::save_comment(pool, f.user_id, quarter_id, "standup")
            .await
            .unwrap();
        let second = SheetService::save_comment(pool, f.user_id, quarter_id, "retro")
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(
            SheetService::comment(pool, f.user_id, quarter_id).await.unwrap().unwrap().comment,
            "retro"
        );

        let result = SheetService::save_comment(pool, f.user_id, quarter_id, " ").await;
        assert!(matches!(result, Err(SheetError::EmptyComment)));

        SheetService::delete_comment(pool, f.user_id, quarter_id).await.unwrap();
        assert!(SheetService::comment(pool, f.user_id, quarter_id).await.unwrap().is_none());

        let result = SheetService::comment(pool, f.user_id, 4242).await;
        assert!(matches!(result, Err(SheetError::QuarterNotFound(4242))));
    }

    async fn comment_rows(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM comments")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn replacing_or_clearing_a_quarter_deletes_its_comment() {
        let f = setup().await;
        let pool = &f.db.pool;
        SheetService::apply(pool, f.user_id, day(), &update(&[20, 21], Some(f.comet)))
            .await
            .unwrap();
        let sheet = SheetService::timesheet(pool, f.user_id, day()).await.unwrap();
        for quarter in sheet.quarters() {
            SheetService::save_comment(pool, f.user_id, quarter.id.unwrap(), "standup")
                .await
                .unwrap();
        }
        assert_eq!(comment_rows(pool).await, 2);

        SheetService::apply(pool, f.user_id, day(), &update(&[20], Some(f.house)))
            .await
            .unwrap();
        assert_eq!(comment_rows(pool).await, 1);
        let sheet = SheetService::timesheet(pool, f.user_id, day()).await.unwrap();
        assert_eq!(sheet.quarters()[0].comment_id, None);
        assert!(sheet.quarters()[1].comment_id.is_some());

        SheetService::apply(pool, f.user_id, day(), &update(&[21], None))
            .await
            .unwrap();
        assert_eq!(comment_rows(pool).await, 0);
    }
}
