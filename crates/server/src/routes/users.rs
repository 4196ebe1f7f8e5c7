//! Routes for registering and removing users.

use axum::{
    Router,
    extract::State,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::user::{CreateUser, User};
use utils::response::ApiResponse;

use crate::{deployment::Deployment, error::ApiError, extract::{Json, Path}};

/// POST /api/users
pub async fn create_user(
    State(deployment): State<Deployment>,
    Json(payload): Json<CreateUser>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    let pool = &deployment.db().pool;
    let username = payload.username.trim();
    if username.is_empty() {
        return Err(ApiError::BadRequest("missing value for username".to_string()));
    }
    if User::find_by_username(pool, username).await?.is_some() {
        return Err(ApiError::Conflict(format!("user '{}' already exists", username)));
    }

    let user = User::create(pool, username).await?;
    tracing::info!(user_id = user.id, "Created user");
    Ok(ResponseJson(ApiResponse::success(user)))
}

/// GET /api/users
pub async fn get_users(
    State(deployment): State<Deployment>,
) -> Result<ResponseJson<ApiResponse<Vec<User>>>, ApiError> {
    let users = User::find_all(&deployment.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(users)))
}

/// GET /api/users/{user_id}
pub async fn get_user(
    State(deployment): State<Deployment>,
    Path(user_id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    let user = User::find_by_id(&deployment.db().pool, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user {} not found", user_id)))?;
    Ok(ResponseJson(ApiResponse::success(user)))
}

/// DELETE /api/users/{user_id}
/// Removes the user together with everything they own
pub async fn delete_user(
    State(deployment): State<Deployment>,
    Path(user_id): Path<i64>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    if User::delete(&deployment.db().pool, user_id).await? == 0 {
        return Err(ApiError::NotFound(format!("user {} not found", user_id)));
    }
    tracing::info!(user_id, "Deleted user");
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(_deployment: &Deployment) -> Router<Deployment> {
    Router::new()
        .route("/users", get(get_users).post(create_user))
        .route("/users/{user_id}", get(get_user).delete(delete_user))
}
