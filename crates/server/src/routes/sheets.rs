//! Routes for reading and marking a day's quarters.

use axum::{
    Extension, Router,
    extract::State,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::user::User;
use services::services::{
    sheet::{SheetService, SheetUpdate, SheetView},
    summary::SheetSummary,
    timesheet::TimeSheet,
};
use utils::response::ApiResponse;

use super::path_date;
use crate::{deployment::Deployment, error::ApiError, extract::{Json, Path}};

/// GET /api/users/{user_id}/sheets/{date}
pub async fn get_sheet(
    State(deployment): State<Deployment>,
    Extension(user): Extension<User>,
    Path((_, date)): Path<(i64, String)>,
) -> Result<ResponseJson<ApiResponse<TimeSheet>>, ApiError> {
    let date = path_date(&date)?;
    let sheet = SheetService::timesheet(&deployment.db().pool, user.id, date).await?;
    Ok(ResponseJson(ApiResponse::success(sheet)))
}

/// PUT /api/users/{user_id}/sheets/{date}
/// Marks the given quarters with an activity, or clears them when the activity is null
pub async fn update_sheet(
    State(deployment): State<Deployment>,
    Extension(user): Extension<User>,
    Path((_, date)): Path<(i64, String)>,
    Json(payload): Json<SheetUpdate>,
) -> Result<ResponseJson<ApiResponse<SheetSummary>>, ApiError> {
    let date = path_date(&date)?;
    let summary = SheetService::apply(&deployment.db().pool, user.id, date, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(summary)))
}

/// GET /api/users/{user_id}/sheets/{date}/view
pub async fn get_sheet_view(
    State(deployment): State<Deployment>,
    Extension(user): Extension<User>,
    Path((_, date)): Path<(i64, String)>,
) -> Result<ResponseJson<ApiResponse<SheetView>>, ApiError> {
    let date = path_date(&date)?;
    let view = SheetService::view(&deployment.db().pool, user.id, date).await?;
    Ok(ResponseJson(ApiResponse::success(view)))
}

pub fn router(_deployment: &Deployment) -> Router<Deployment> {
    Router::new()
        .route("/sheets/{date}", get(get_sheet).put(update_sheet))
        .route("/sheets/{date}/view", get(get_sheet_view))
}
