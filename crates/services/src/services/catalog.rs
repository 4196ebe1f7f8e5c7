//! Service for managing a user's categories and activities.

use db::models::{
    activity::{Activity, SaveActivity},
    category::{Category, SaveCategory},
    comment::Comment,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use ts_rs::TS;

use super::color::{Color, InvalidColor};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("missing value for title")]
    MissingTitle,
    #[error(transparent)]
    InvalidColor(#[from] InvalidColor),
    #[error("category {0} not found")]
    CategoryNotFound(i64),
    #[error("category {0} still has activities")]
    CategoryNotEmpty(i64),
    #[error("activity {0} not found")]
    ActivityNotFound(i64),
}

/// A category and whether any activity is filed under it
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
pub struct CategoryOverview {
    #[serde(flatten)]
    #[ts(flatten)]
    pub category: Category,
    pub empty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
pub struct ActivityWithUsage {
    #[serde(flatten)]
    #[ts(flatten)]
    pub activity: Activity,
    /// Quarters marked with the activity, only filled in when requested
    pub usage: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
pub struct CategoryWithActivities {
    #[serde(flatten)]
    #[ts(flatten)]
    pub category: Category,
    pub activities: Vec<ActivityWithUsage>,
}

pub struct CatalogService;

fn required_title(title: &str) -> Result<&str, CatalogError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CatalogError::MissingTitle);
    }
    Ok(title)
}

impl CatalogService {
    pub async fn create_category(
        pool: &SqlitePool,
        user_id: i64,
        data: &SaveCategory,
    ) -> Result<Category, CatalogError> {
        let title = required_title(&data.title)?;
        let category = Category::create(pool, user_id, title).await?;
        info!(user_id, category_id = category.id, "Created category");
        Ok(category)
    }

    pub async fn update_category(
        pool: &SqlitePool,
        user_id: i64,
        category_id: i64,
        data: &SaveCategory,
    ) -> Result<Category, CatalogError> {
        let title = required_title(&data.title)?;
        Category::update_title(pool, user_id, category_id, title)
            .await?
            .ok_or(CatalogError::CategoryNotFound(category_id))
    }

    pub async fn category(
        pool: &SqlitePool,
        user_id: i64,
        category_id: i64,
    ) -> Result<CategoryOverview, CatalogError> {
        let category = Category::find_by_id(pool, user_id, category_id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(category_id))?;
        Self::overview(pool, category).await
    }

    pub async fn categories(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Vec<CategoryOverview>, CatalogError> {
        let mut overviews = Vec::new();
        for category in Category::find_by_user(pool, user_id).await? {
            overviews.push(Self::overview(pool, category).await?);
        }
        Ok(overviews)
    }

    async fn overview(
        pool: &SqlitePool,
        category: Category,
    ) -> Result<CategoryOverview, CatalogError> {
        let empty = Category::activity_count(pool, category.id).await? == 0;
        Ok(CategoryOverview { category, empty })
    }

    /// Only categories without activities may be deleted.
    pub async fn delete_category(
        pool: &SqlitePool,
        user_id: i64,
        category_id: i64,
    ) -> Result<(), CatalogError> {
        let overview = Self::category(pool, user_id, category_id).await?;
        if !overview.empty {
            return Err(CatalogError::CategoryNotEmpty(category_id));
        }

        Category::delete(pool, user_id, category_id).await?;
        info!(user_id, category_id, "Deleted category");
        Ok(())
    }

    pub async fn categories_with_activities(
        pool: &SqlitePool,
        user_id: i64,
        with_usage: bool,
    ) -> Result<Vec<CategoryWithActivities>, CatalogError> {
        let mut result = Vec::new();
        for category in Category::find_by_user(pool, user_id).await? {
            let mut activities = Vec::new();
            for activity in Activity::find_by_category(pool, user_id, category.id).await? {
                let usage = if with_usage {
                    Some(Activity::usage(pool, user_id, activity.id).await?)
                } else {
                    None
                };
                activities.push(ActivityWithUsage { activity, usage });
            }
            result.push(CategoryWithActivities {
                category,
                activities,
            });
        }
        Ok(result)
    }

    async fn validate_activity(
        pool: &SqlitePool,
        user_id: i64,
        data: &SaveActivity,
    ) -> Result<SaveActivity, CatalogError> {
        let title = required_title(&data.title)?;
        let color = Color::new(data.color.trim())?;
        if Category::find_by_id(pool, user_id, data.category_id)
            .await?
            .is_none()
        {
            return Err(CatalogError::CategoryNotFound(data.category_id));
        }

        Ok(SaveActivity {
            category_id: data.category_id,
            title: title.to_string(),
            color: color.into(),
            enabled: data.enabled,
            meta: data.meta.clone(),
        })
    }

    pub async fn create_activity(
        pool: &SqlitePool,
        user_id: i64,
        data: &SaveActivity,
    ) -> Result<Activity, CatalogError> {
        let data = Self::validate_activity(pool, user_id, data).await?;
        let activity = Activity::create(pool, user_id, &data).await?;
        info!(user_id, activity_id = activity.id, "Created activity");
        Ok(activity)
    }

    pub async fn update_activity(
        pool: &SqlitePool,
        user_id: i64,
        activity_id: i64,
        data: &SaveActivity,
    ) -> Result<Activity, CatalogError> {
        let data = Self::validate_activity(pool, user_id, data).await?;
        Activity::update(pool, user_id, activity_id, &data)
            .await?
            .ok_or(CatalogError::ActivityNotFound(activity_id))
    }

    pub async fn activity(
        pool: &SqlitePool,
        user_id: i64,
        activity_id: i64,
    ) -> Result<Activity, CatalogError> {
        Activity::find_by_id(pool, user_id, activity_id)
            .await?
            .ok_or(CatalogError::ActivityNotFound(activity_id))
    }

    /// All activities, or those of one category.
    pub async fn activities(
        pool: &SqlitePool,
        user_id: i64,
        category_id: Option<i64>,
    ) -> Result<Vec<Activity>, CatalogError> {
        match category_id {
            Some(category_id) => {
                if Category::find_by_id(pool, user_id, category_id).await?.is_none() {
                    return Err(CatalogError::CategoryNotFound(category_id));
                }
                Ok(Activity::find_by_category(pool, user_id, category_id).await?)
            }
            None => Ok(Activity::find_by_user(pool, user_id).await?),
        }
    }

    /// Removes the activity and every quarter marked with it.
    pub async fn delete_activity(
        pool: &SqlitePool,
        user_id: i64,
        activity_id: i64,
    ) -> Result<(), CatalogError> {
        let mut tx = pool.begin().await?;
        let comments = Comment::delete_for_activity(&mut *tx, user_id, activity_id).await?;
        if Activity::delete(&mut *tx, user_id, activity_id).await? == 0 {
            return Err(CatalogError::ActivityNotFound(activity_id));
        }
        tx.commit().await?;
        info!(user_id, activity_id, comments, "Deleted activity");
        Ok(())
    }
}
