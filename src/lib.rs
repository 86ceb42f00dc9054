// Library exports for the binaries and integration tests
pub mod client;
pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<Config>,
}

/// Allow the configured dashboard origin; localhost is always allowed for
/// development.
fn cors(base_url: &str) -> CorsLayer {
    let base = base_url.trim_end_matches('/').to_string();
    let origin = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let o = match origin.to_str() {
            Ok(s) => s,
            Err(_) => return false,
        };
        o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") || o == base
    });

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]))
        .allow_origin(origin)
}

/// The REST API under `/api`, plus `/health` and `/metrics` at the root.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/dashboard/stats", get(routes::dashboard::dashboard_stats))
        .route("/reports", get(routes::reports::get_reports))
        // Orphans
        .route("/orphans", get(routes::orphans::list_orphans).post(routes::orphans::create_orphan))
        .route(
            "/orphans/{id}",
            get(routes::orphans::get_orphan)
                .put(routes::orphans::update_orphan)
                .delete(routes::orphans::delete_orphan),
        )
        // Donations
        .route("/donations/stats", get(routes::dashboard::donation_stats))
        .route("/donations", get(routes::donations::list_donations).post(routes::donations::create_donation))
        .route(
            "/donations/{id}",
            get(routes::donations::get_donation)
                .put(routes::donations::update_donation)
                .delete(routes::donations::delete_donation),
        )
        // Members
        .route("/members", get(routes::members::list_members).post(routes::members::create_member))
        .route(
            "/members/{id}",
            get(routes::members::get_member)
                .put(routes::members::update_member)
                .delete(routes::members::delete_member),
        )
        // Expenses
        .route("/expenses", get(routes::expenses::list_expenses).post(routes::expenses::create_expense))
        .route(
            "/expenses/{id}",
            get(routes::expenses::get_expense)
                .put(routes::expenses::update_expense)
                .delete(routes::expenses::delete_expense),
        );

    let cors = cors(&state.config.app_base_url);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::metrics::metrics_handler))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    async fn state() -> AppState {
        let pool = db::create_memory_pool().await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        AppState {
            db: pool,
            config: Arc::new(Config {
                database_url: "sqlite::memory:".into(),
                host: "127.0.0.1".into(),
                port: 0,
                app_base_url: "http://localhost".into(),
                admin_username: "admin".into(),
                admin_password_hash: bcrypt::hash("admin123", 4).unwrap(),
            }),
        }
    }

    async fn call(state: &AppState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let state = state().await;
        let (status, body) = call(&state, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["db"], "connected");
    }

    #[tokio::test]
    async fn test_login_status_codes() {
        let state = state().await;
        let (status, body) = call(
            &state,
            "POST",
            "/api/login",
            Some(json!({ "username": "admin", "password": "admin123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["username"], "admin");

        let (status, body) = call(
            &state,
            "POST",
            "/api/login",
            Some(json!({ "username": "admin", "password": "nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);

        let (status, _) = call(
            &state,
            "POST",
            "/api/login",
            Some(json!({ "username": "admin", "password": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_orphan_crud_status_codes() {
        let state = state().await;
        let draft = json!({
            "name": "Sarah Johnson",
            "age": 8,
            "gender": "Female",
            "medical_condition": "Healthy",
            "is_adopted": false,
        });

        let (status, created) = call(&state, "POST", "/api/orphans", Some(draft.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "active");
        assert_eq!(created["is_adopted"], false);
        let id = created["id"].as_i64().unwrap();

        let mut adopted = draft.clone();
        adopted["is_adopted"] = json!(true);
        let (status, updated) = call(&state, "PUT", &format!("/api/orphans/{id}"), Some(adopted)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "adopted");

        let (status, body) = call(&state, "DELETE", &format!("/api/orphans/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Orphan deleted successfully");

        let (status, _) = call(&state, "GET", &format!("/api/orphans/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&state, "DELETE", &format!("/api/orphans/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_draft_is_unprocessable() {
        let state = state().await;
        let (status, body) = call(
            &state,
            "POST",
            "/api/donations",
            Some(json!({ "donor_name": "John Smith", "type": "money" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "amount");

        let (status, body) = call(
            &state,
            "POST",
            "/api/orphans",
            Some(json!({ "name": "Sarah Johnson", "age": 8, "gender": "Female" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "medical_condition");

        let (status, _) = call(
            &state,
            "PUT",
            "/api/members/1",
            Some(json!({ "name": "", "role": "Cook", "phone": "1", "email": "a@b.c" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_list_filters_via_query_string() {
        let state = state().await;
        for (name, kind) in [("A", "money"), ("B", "supplies")] {
            let body = json!({ "donor_name": name, "type": kind, "amount": 10.0, "items": "Rice" });
            let (status, _) = call(&state, "POST", "/api/donations", Some(body)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (_, all) = call(&state, "GET", "/api/donations", None).await;
        assert_eq!(all.as_array().unwrap().len(), 2);
        assert_eq!(all[0]["donor_name"], "B");

        let (_, money) = call(&state, "GET", "/api/donations?type=money&search=a", None).await;
        let money = money.as_array().unwrap();
        assert_eq!(money.len(), 1);
        assert_eq!(money[0]["amount"], 10.0);

        let (_, supplies) = call(&state, "GET", "/api/donations?type=supplies", None).await;
        assert_eq!(supplies[0]["amount"], 0.0);
    }

    #[tokio::test]
    async fn test_huge_page_window_returns_empty_page() {
        let state = state().await;
        let body = json!({ "name": "Sarah", "age": 8, "gender": "Female", "medical_condition": "Healthy" });
        let (status, _) = call(&state, "POST", "/api/orphans", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);

        for uri in [
            "/api/orphans?page=100000&limit=100000",
            "/api/orphans?page=4294967295&limit=4294967295",
        ] {
            let (status, page) = call(&state, "GET", uri, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(page.as_array().unwrap().len(), 0);
        }
    }

    #[tokio::test]
    async fn test_metrics_exposes_text() {
        let state = state().await;
        let response = app(state)
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
