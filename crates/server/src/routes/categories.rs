use axum::{
    Extension, Router,
    extract::State,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{
    activity::Activity,
    category::{Category, SaveCategory},
    user::User,
};
use serde::Deserialize;
use services::services::catalog::{CatalogService, CategoryOverview, CategoryWithActivities};
use utils::response::ApiResponse;

use crate::{
    deployment::Deployment,
    error::ApiError,
    extract::{Json, Path, Query},
};

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub usage: bool,
}

pub async fn get_categories(
    State(deployment): State<Deployment>,
    Extension(user): Extension<User>,
) -> Result<ResponseJson<ApiResponse<Vec<CategoryOverview>>>, ApiError> {
    let categories = CatalogService::categories(&deployment.db().pool, user.id).await?;
    Ok(ResponseJson(ApiResponse::success(categories)))
}

pub async fn create_category(
    State(deployment): State<Deployment>,
    Extension(user): Extension<User>,
    Json(payload): Json<SaveCategory>,
) -> Result<ResponseJson<ApiResponse<Category>>, ApiError> {
    let category = CatalogService::create_category(&deployment.db().pool, user.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(category)))
}

pub async fn get_category(
    State(deployment): State<Deployment>,
    Extension(user): Extension<User>,
    Path((_, category_id)): Path<(i64, i64)>,
) -> Result<ResponseJson<ApiResponse<CategoryOverview>>, ApiError> {
    let category = CatalogService::category(&deployment.db().pool, user.id, category_id).await?;
    Ok(ResponseJson(ApiResponse::success(category)))
}

pub async fn update_category(
    State(deployment): State<Deployment>,
    Extension(user): Extension<User>,
    Path((_, category_id)): Path<(i64, i64)>,
    Json(payload): Json<SaveCategory>,
) -> Result<ResponseJson<ApiResponse<Category>>, ApiError> {
    let category =
        CatalogService::update_category(&deployment.db().pool, user.id, category_id, &payload)
            .await?;
    Ok(ResponseJson(ApiResponse::success(category)))
}

/// Only categories without activities can be deleted
pub async fn delete_category(
    State(deployment): State<Deployment>,
    Extension(user): Extension<User>,
    Path((_, category_id)): Path<(i64, i64)>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    CatalogService::delete_category(&deployment.db().pool, user.id, category_id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn get_category_activities(
    State(deployment): State<Deployment>,
    Extension(user): Extension<User>,
    Path((_, category_id)): Path<(i64, i64)>,
) -> Result<ResponseJson<ApiResponse<Vec<Activity>>>, ApiError> {
    let activities =
        CatalogService::activities(&deployment.db().pool, user.id, Some(category_id)).await?;
    Ok(ResponseJson(ApiResponse::success(activities)))
}

/// GET /api/users/{user_id}/categories-and-activities?usage=true
pub async fn get_categories_and_activities(
    State(deployment): State<Deployment>,
    Extension(user): Extension<User>,
    Query(query): Query<CatalogQuery>,
) -> Result<ResponseJson<ApiResponse<Vec<CategoryWithActivities>>>, ApiError> {
    let catalog =
        CatalogService::categories_with_activities(&deployment.db().pool, user.id, query.usage)
            .await?;
    Ok(ResponseJson(ApiResponse::success(catalog)))
}

pub fn router(_deployment: &Deployment) -> Router<Deployment> {
    Router::new()
        .route("/categories", get(get_categories).post(create_category))
        .route(
            "/categories/{category_id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route(
            "/categories/{category_id}/activities",
            get(get_category_activities),
        )
        .route(
            "/categories-and-activities",
            get(get_categories_and_activities),
        )
}
