use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

/// Groups activities. Every activity belongs to exactly one category.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS, PartialEq)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
}

/// Request body for creating or renaming a category
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct SaveCategory {
    pub title: String,
}

impl Category {
    pub async fn create(pool: &SqlitePool, user_id: i64, title: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"INSERT INTO categories (user_id, title)
            VALUES ($1, $2)
            RETURNING id, user_id, title"#,
        )
        .bind(user_id)
        .bind(title)
        .fetch_one(pool)
        .await
    }

    pub async fn update_title(
        pool: &SqlitePool,
        user_id: i64,
        id: i64,
        title: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"UPDATE categories
            SET title = $3
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title"#,
        )
        .bind(id)
        .bind(user_id)
        .bind(title)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_id(
        pool: &SqlitePool,
        user_id: i64,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "SELECT id, user_id, title FROM categories WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "SELECT id, user_id, title FROM categories WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Number of activities filed under this category.
    pub async fn activity_count(pool: &SqlitePool, id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM activities WHERE category_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn count_for_user(pool: &SqlitePool, user_id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, user_id: i64, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DBService, models::user::User};

    #[tokio::test]
    async fn categories_are_scoped_by_user() {
        let db = DBService::new_in_memory().await.unwrap();
        let joe = User::create(&db.pool, "joe@example.com").await.unwrap();
        let ann = User::create(&db.pool, "ann@example.com").await.unwrap();

        let work = Category::create(&db.pool, joe.id, "Work").await.unwrap();
        Category::create(&db.pool, ann.id, "Home").await.unwrap();

        assert!(Category::find_by_id(&db.pool, ann.id, work.id).await.unwrap().is_none());
        assert_eq!(Category::find_by_user(&db.pool, joe.id).await.unwrap(), vec![work.clone()]);
        assert_eq!(Category::count_for_user(&db.pool, joe.id).await.unwrap(), 1);

        // Another user's category cannot be renamed or deleted.
        assert!(
            Category::update_title(&db.pool, ann.id, work.id, "Stolen")
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(Category::delete(&db.pool, ann.id, work.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn rename_category() {
        let db = DBService::new_in_memory().await.unwrap();
        let joe = User::create(&db.pool, "joe@example.com").await.unwrap();
        let work = Category::create(&db.pool, joe.id, "Work").await.unwrap();

        let renamed = Category::update_title(&db.pool, joe.id, work.id, "Job")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.title, "Job");
        assert_eq!(Category::activity_count(&db.pool, work.id).await.unwrap(), 0);
    }
}
