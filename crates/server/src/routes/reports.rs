//! Routes for weekly and multi-week reports.

use axum::{
    Extension, Router,
    extract::State,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::user::User;
use serde::Deserialize;
use services::services::report::{Report, ReportService, WeekOverview};
use utils::response::ApiResponse;

use super::path_date;
use crate::{deployment::Deployment, error::ApiError, extract::{Path, Query}};

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub from: String,
    pub to: String,
}

/// GET /api/users/{user_id}/reports?from=YYYY-MM-DD&to=YYYY-MM-DD
pub async fn get_report(
    State(deployment): State<Deployment>,
    Extension(user): Extension<User>,
    Query(query): Query<ReportQuery>,
) -> Result<ResponseJson<ApiResponse<Report>>, ApiError> {
    let from = path_date(&query.from)?;
    let to = path_date(&query.to)?;
    let report = ReportService::generate(&deployment.db().pool, user.id, from, to).await?;
    Ok(ResponseJson(ApiResponse::success(report)))
}

/// GET /api/users/{user_id}/weeks/{year}/{week}
pub async fn get_week(
    State(deployment): State<Deployment>,
    Extension(user): Extension<User>,
    Path((_, year, week)): Path<(i64, i32, u32)>,
) -> Result<ResponseJson<ApiResponse<WeekOverview>>, ApiError> {
    let overview = ReportService::week(&deployment.db().pool, user.id, year, week).await?;
    Ok(ResponseJson(ApiResponse::success(overview)))
}

pub fn router(_deployment: &Deployment) -> Router<Deployment> {
    Router::new()
        .route("/reports", get(get_report))
        .route("/weeks/{year}/{week}", get(get_week))
}
