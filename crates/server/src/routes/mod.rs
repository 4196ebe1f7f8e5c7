use axum::{
    Router,
    http::{HeaderValue, header},
    middleware::from_fn_with_state,
};
use chrono::NaiveDate;
use tower_http::{
    compression::CompressionLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use utils::date::extract_date;

use crate::{
    deployment::Deployment, error::ApiError, middleware::model_loaders::load_user_middleware,
};

pub mod activities;
pub mod categories;
pub mod comments;
pub mod health;
pub mod reports;
pub mod sheets;
pub mod users;

/// Parses a `YYYY-MM-DD` date taken from a path or query string.
pub(crate) fn path_date(raw: &str) -> Result<NaiveDate, ApiError> {
    extract_date(raw).ok_or_else(|| ApiError::InvalidDate(raw.to_string()))
}

pub fn router(deployment: Deployment) -> Router {
    // Everything below /users/{user_id} acts on behalf of that user
    let user_routes = Router::new()
        .merge(categories::router(&deployment))
        .merge(activities::router(&deployment))
        .merge(sheets::router(&deployment))
        .merge(comments::router(&deployment))
        .merge(reports::router(&deployment))
        .route_layer(from_fn_with_state(deployment.clone(), load_user_middleware));

    let api_routes = Router::new()
        .merge(health::router())
        .merge(users::router(&deployment))
        .nest("/users/{user_id}", user_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, must-revalidate"),
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(deployment)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use db::DBService;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    async fn app() -> Router {
        let db = DBService::new_in_memory().await.unwrap();
        router(Deployment::new(db))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn create_user(app: &Router, username: &str) -> i64 {
        let (status, json) = send(app, Method::POST, "/api/users", Some(json!({ "username": username }))).await;
        assert_eq!(status, StatusCode::OK);
        json["data"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn health_sets_cache_headers() {
        let app = app().await;
        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-cache, must-revalidate"
        );
    }

    #[tokio::test]
    async fn users_are_unique_and_scoped() {
        let app = app().await;
        let user_id = create_user(&app, "joe@example.com").await;

        let (status, json) = send(&app, Method::POST, "/api/users", Some(json!({ "username": "joe@example.com" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["success"], false);

        let (status, json) = send(&app, Method::GET, "/api/users/4242/categories", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error_code"], 404);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/users/{}", user_id), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, Method::GET, &format!("/api/users/{}", user_id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn track_a_day_and_report_on_it() {
        let app = app().await;
        let user_id = create_user(&app, "joe@example.com").await;
        let base = format!("/api/users/{}", user_id);

        let (_, json) = send(&app, Method::POST, &format!("{}/categories", base), Some(json!({ "title": "Work" }))).await;
        let category_id = json["data"]["id"].as_i64().unwrap();

        let (status, json) = send(
            &app,
            Method::POST,
            &format!("{}/activities", base),
            Some(json!({ "category_id": category_id, "title": "Comet", "color": "#fcaf3e" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", json);
        let activity_id = json["data"]["id"].as_i64().unwrap();

        let (status, json) = send(
            &app,
            Method::PUT,
            &format!("{}/sheets/2013-02-02", base),
            Some(json!({ "indexes": [36, 37, 38, 39, 40, 41], "activity": activity_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", json);
        assert_eq!(json["data"]["total"], "1.50");
        assert_eq!(json["data"]["summary"][0]["title"], "Comet");

        let (_, json) = send(&app, Method::GET, &format!("{}/sheets/2013-02-02/view", base), None).await;
        assert_eq!(json["data"]["weekday"], "Saturday");
        assert_eq!(json["data"]["slots"].as_array().unwrap().len(), 96);
        assert_eq!(json["data"]["slots"][36]["color"], "#fcaf3e");

        let (status, json) = send(&app, Method::GET, &format!("{}/reports?from=2013-01-28&to=2013-02-10", base), None).await;
        assert_eq!(status, StatusCode::OK, "{}", json);
        assert_eq!(json["data"]["weeks"].as_array().unwrap().len(), 2);
        assert_eq!(json["data"]["total_activities"][0]["amount"], 1.5);

        let (_, json) = send(&app, Method::GET, &format!("{}/weeks/2013/5", base), None).await;
        assert_eq!(json["data"]["total"], 1.5);

        let (status, json) = send(&app, Method::DELETE, &format!("{}/categories/{}", base, category_id), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error_code"], 502);
    }

    #[tokio::test]
    async fn comments_on_marked_quarters() {
        let app = app().await;
        let user_id = create_user(&app, "joe@example.com").await;
        let base = format!("/api/users/{}", user_id);

        let (_, json) = send(&app, Method::POST, &format!("{}/categories", base), Some(json!({ "title": "Work" }))).await;
        let category_id = json["data"]["id"].as_i64().unwrap();
        let (_, json) = send(
            &app,
            Method::POST,
            &format!("{}/activities", base),
            Some(json!({ "category_id": category_id, "title": "Comet", "color": "#fcaf3e" })),
        )
        .await;
        let activity_id = json["data"]["id"].as_i64().unwrap();
        send(
            &app,
            Method::PUT,
            &format!("{}/sheets/2013-02-02", base),
            Some(json!({ "indexes": [40], "activity": activity_id })),
        )
        .await;

        let (_, json) = send(&app, Method::GET, &format!("{}/sheets/2013-02-02", base), None).await;
        let quarter_id = json["data"]["quarters"][0]["id"].as_i64().unwrap();
        let uri = format!("{}/comments/{}", base, quarter_id);

        let (status, json) = send(&app, Method::PUT, &uri, Some(json!({ "comment": "planning" }))).await;
        assert_eq!(status, StatusCode::OK, "{}", json);

        let (_, json) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(json["data"]["comment"], "planning");

        let (status, json) = send(&app, Method::PUT, &uri, Some(json!({ "comment": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error_code"], 800);
    }

    #[tokio::test]
    async fn rejects_bad_input() {
        let app = app().await;
        let user_id = create_user(&app, "joe@example.com").await;
        let base = format!("/api/users/{}", user_id);

        let (status, json) = send(&app, Method::GET, &format!("{}/sheets/2013-9-1", base), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error_code"], 702);

        let (status, json) = send(&app, Method::POST, &format!("{}/categories", base), Some(json!({ "title": " " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error_code"], 500);

        let (status, json) = send(
            &app,
            Method::PUT,
            &format!("{}/sheets/2013-02-02", base),
            Some(json!({ "indexes": [], "activity": null })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error_code"], 700);

        let (status, json) = send(&app, Method::GET, &format!("{}/reports?from=2013-02-10&to=2013-01-28", base), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error_code"], 704);

        let (status, json) = send(&app, Method::GET, &format!("{}/weeks/2013/54", base), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error_code"], 704);
    }

    #[tokio::test]
    async fn extractor_failures_use_the_envelope() {
        let app = app().await;
        let user_id = create_user(&app, "joe@example.com").await;
        let base = format!("/api/users/{}", user_id);

        let (status, json) = send(&app, Method::GET, &format!("{}/categories/abc", base), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error_code"], 100);

        let (status, json) = send(&app, Method::GET, &format!("{}/reports?from=2013-01-28", base), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error_code"], 100);

        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("{}/categories", base))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"title\":"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().unwrap().contains("JSON"));
    }
}
