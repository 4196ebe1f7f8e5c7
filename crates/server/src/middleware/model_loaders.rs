use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use db::models::user::User;
use serde::Deserialize;

use crate::{deployment::Deployment, error::ApiError, extract::Path};

#[derive(Debug, Deserialize)]
pub struct UserPath {
    pub user_id: i64,
}

/// Loads the user named in the path and stores it as a request extension.
pub async fn load_user_middleware(
    State(deployment): State<Deployment>,
    Path(UserPath { user_id }): Path<UserPath>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = User::find_by_id(&deployment.db().pool, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user {} not found", user_id)))?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
