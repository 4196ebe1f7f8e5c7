use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool};
use ts_rs::TS;

/// Marks quarters of a day. Disabled activities stay visible in reports but
/// cannot be put on new quarters.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS, PartialEq)]
pub struct Activity {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub title: String,
    pub color: String,
    pub enabled: bool,
    /// Free-form data the application itself never reads
    pub meta: String,
}

/// Request body for creating or updating an activity
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct SaveActivity {
    pub category_id: i64,
    pub title: String,
    pub color: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub meta: String,
}

fn default_enabled() -> bool {
    true
}

const ACTIVITY_COLUMNS: &str = "id, user_id, category_id, title, color, enabled, meta";

impl Activity {
    pub async fn create(
        pool: &SqlitePool,
        user_id: i64,
        data: &SaveActivity,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Activity>(&format!(
            r#"INSERT INTO activities (user_id, category_id, title, color, enabled, meta)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ACTIVITY_COLUMNS}"#
        ))
        .bind(user_id)
        .bind(data.category_id)
        .bind(&data.title)
        .bind(&data.color)
        .bind(data.enabled)
        .bind(&data.meta)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        user_id: i64,
        id: i64,
        data: &SaveActivity,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Activity>(&format!(
            r#"UPDATE activities
            SET category_id = $3, title = $4, color = $5, enabled = $6, meta = $7
            WHERE id = $1 AND user_id = $2
            RETURNING {ACTIVITY_COLUMNS}"#
        ))
        .bind(id)
        .bind(user_id)
        .bind(data.category_id)
        .bind(&data.title)
        .bind(&data.color)
        .bind(data.enabled)
        .bind(&data.meta)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &SqlitePool,
        user_id: i64,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Activity>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Activity>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_category(
        pool: &SqlitePool,
        user_id: i64,
        category_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Activity>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE category_id = $1 AND user_id = $2 ORDER BY id"
        ))
        .bind(category_id)
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Number of quarters, across all days, marked with this activity.
    pub async fn usage(pool: &SqlitePool, user_id: i64, id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM quarters WHERE activity_id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn count_for_user(pool: &SqlitePool, user_id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM activities WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Deleting an activity also removes every quarter marked with it.
    /// Quarters marked with the activity are removed by the schema.
    pub async fn delete<'e, E>(executor: E, user_id: i64, id: i64) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM activities WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
