use axum::{
    Extension, Router,
    extract::State,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{
    comment::{Comment, SaveComment},
    user::User,
};
use services::services::sheet::SheetService;
use utils::response::ApiResponse;

use crate::{deployment::Deployment, error::ApiError, extract::{Json, Path}};

pub async fn get_comment(
    State(deployment): State<Deployment>,
    Extension(user): Extension<User>,
    Path((_, quarter_id)): Path<(i64, i64)>,
) -> Result<ResponseJson<ApiResponse<Option<Comment>>>, ApiError> {
    let comment = SheetService::comment(&deployment.db().pool, user.id, quarter_id).await?;
    Ok(ResponseJson(ApiResponse::success(comment)))
}

pub async fn save_comment(
    State(deployment): State<Deployment>,
    Extension(user): Extension<User>,
    Path((_, quarter_id)): Path<(i64, i64)>,
    Json(payload): Json<SaveComment>,
) -> Result<ResponseJson<ApiResponse<Comment>>, ApiError> {
    let comment =
        SheetService::save_comment(&deployment.db().pool, user.id, quarter_id, &payload.comment)
            .await?;
    Ok(ResponseJson(ApiResponse::success(comment)))
}

pub async fn delete_comment(
    State(deployment): State<Deployment>,
    Extension(user): Extension<User>,
    Path((_, quarter_id)): Path<(i64, i64)>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    SheetService::delete_comment(&deployment.db().pool, user.id, quarter_id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &Deployment) -> Router<Deployment> {
    Router::new().route(
        "/comments/{quarter_id}",
        get(get_comment).put(save_comment).delete(delete_comment),
    )
}
