use axum::{
    Extension, Router,
    extract::State,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{
    activity::{Activity, SaveActivity},
    user::User,
};
use services::services::catalog::CatalogService;
use utils::response::ApiResponse;

use crate::{deployment::Deployment, error::ApiError, extract::{Json, Path}};

pub async fn get_activities(
    State(deployment): State<Deployment>,
    Extension(user): Extension<User>,
) -> Result<ResponseJson<ApiResponse<Vec<Activity>>>, ApiError> {
    let activities = CatalogService::activities(&deployment.db().pool, user.id, None).await?;
    Ok(ResponseJson(ApiResponse::success(activities)))
}

pub async fn create_activity(
    State(deployment): State<Deployment>,
    Extension(user): Extension<User>,
    Json(payload): Json<SaveActivity>,
) -> Result<ResponseJson<ApiResponse<Activity>>, ApiError> {
    let activity = CatalogService::create_activity(&deployment.db().pool, user.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(activity)))
}

pub async fn get_activity(
    State(deployment): State<Deployment>,
    Extension(user): Extension<User>,
    Path((_, activity_id)): Path<(i64, i64)>,
) -> Result<ResponseJson<ApiResponse<Activity>>, ApiError> {
    let activity = CatalogService::activity(&deployment.db().pool, user.id, activity_id).await?;
    Ok(ResponseJson(ApiResponse::success(activity)))
}

pub async fn update_activity(
    State(deployment): State<Deployment>,
    Extension(user): Extension<User>,
    Path((_, activity_id)): Path<(i64, i64)>,
    Json(payload): Json<SaveActivity>,
) -> Result<ResponseJson<ApiResponse<Activity>>, ApiError> {
    let activity =
        CatalogService::update_activity(&deployment.db().pool, user.id, activity_id, &payload)
            .await?;
    Ok(ResponseJson(ApiResponse::success(activity)))
}

/// Deleting an activity also removes every quarter marked with it
pub async fn delete_activity(
    State(deployment): State<Deployment>,
    Extension(user): Extension<User>,
    Path((_, activity_id)): Path<(i64, i64)>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    CatalogService::delete_activity(&deployment.db().pool, user.id, activity_id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &Deployment) -> Router<Deployment> {
    Router::new()
        .route("/activities", get(get_activities).post(create_activity))
        .route(
            "/activities/{activity_id}",
            get(get_activity)
                .put(update_activity)
                .delete(delete_activity),
        )
}
