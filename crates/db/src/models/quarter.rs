use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool};
use ts_rs::TS;

/// A day always has this many quarter-hour slots.
pub const QUARTERS_PER_DAY: i32 = 96;

/// A single quarter-hour slot of a day. Stored quarters always carry an
/// activity; an unassigned quarter only exists in memory.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS, PartialEq)]
pub struct Quarter {
    pub id: Option<i64>,
    #[sqlx(rename = "slot")]
    pub offset: i32,
    pub activity_id: Option<i64>,
    pub comment_id: Option<i64>,
}

impl Quarter {
    pub fn unassigned(offset: i32) -> Self {
        Self {
            id: None,
            offset,
            activity_id: None,
            comment_id: None,
        }
    }

    pub fn marked(offset: i32, activity_id: i64) -> Self {
        Self {
            activity_id: Some(activity_id),
            ..Self::unassigned(offset)
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.activity_id.is_some()
    }

    pub async fn find_by_date(
        pool: &SqlitePool,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Quarter>(
            r#"SELECT id, slot, activity_id, comment_id
            FROM quarters
            WHERE user_id = $1 AND date = $2
            ORDER BY slot"#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_offset<'e, E>(
        executor: E,
        user_id: i64,
        date: NaiveDate,
        offset: i32,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Quarter>(
            r#"SELECT id, slot, activity_id, comment_id
            FROM quarters
            WHERE user_id = $1 AND date = $2 AND slot = $3"#,
        )
        .bind(user_id)
        .bind(date)
        .bind(offset)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_by_id(
        pool: &SqlitePool,
        user_id: i64,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Quarter>(
            "SELECT id, slot, activity_id, comment_id FROM quarters WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn insert<'e, E>(
        executor: E,
        user_id: i64,
        date: NaiveDate,
        offset: i32,
        activity_id: i64,
    ) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Quarter>(
            r#"INSERT INTO quarters (user_id, date, slot, activity_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, slot, activity_id, comment_id"#,
        )
        .bind(user_id)
        .bind(date)
        .bind(offset)
        .bind(activity_id)
        .fetch_one(executor)
        .await
    }

    pub async fn delete_by_offset<'e, E>(
        executor: E,
        user_id: i64,
        date: NaiveDate,
        offset: i32,
    ) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM quarters WHERE user_id = $1 AND date = $2 AND slot = $3")
            .bind(user_id)
            .bind(date)
            .bind(offset)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn set_comment<'e, E>(
        executor: E,
        user_id: i64,
        id: i64,
        comment_id: Option<i64>,
    ) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE quarters SET comment_id = $3 WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .bind(comment_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
