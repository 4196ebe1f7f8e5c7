use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool};
use ts_rs::TS;

/// Free text attached to a single quarter.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS, PartialEq)]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct SaveComment {
    pub comment: String,
}

impl Comment {
    pub async fn create<'e, E>(executor: E, user_id: i64, comment: &str) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Comment>(
            r#"INSERT INTO comments (user_id, comment)
            VALUES ($1, $2)
            RETURNING id, user_id, comment"#,
        )
        .bind(user_id)
        .bind(comment)
        .fetch_one(executor)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        user_id: i64,
        id: i64,
        comment: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"UPDATE comments
            SET comment = $3
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, comment"#,
        )
        .bind(id)
        .bind(user_id)
        .bind(comment)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &SqlitePool,
        user_id: i64,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            "SELECT id, user_id, comment FROM comments WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Quarters pointing at the comment are unlinked by the schema.
    pub async fn delete<'e, E>(executor: E, user_id: i64, id: i64) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Deletes the comments of every quarter marked with the activity.
    pub async fn delete_for_activity<'e, E>(
        executor: E,
        user_id: i64,
        activity_id: i64,
    ) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"DELETE FROM comments
            WHERE user_id = $1 AND id IN (
                SELECT comment_id FROM quarters
                WHERE user_id = $1 AND activity_id = $2 AND comment_id IS NOT NULL
            )"#,
        )
        .bind(user_id)
        .bind(activity_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
