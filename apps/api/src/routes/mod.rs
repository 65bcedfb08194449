pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/settings", get(handlers::handle_settings))
        // Pack API
        .route("/api/v1/packs", post(handlers::handle_create_pack))
        .route("/api/v1/packs/bulk", post(handlers::handle_create_bulk))
        .route("/api/v1/packs/files/:name", get(handlers::handle_download))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::generation::generator::PackGenerator;

    fn app(daily_limit: u32) -> (Router, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::for_tests(dir.path().to_path_buf());
        config.daily_limit = daily_limit;
        let state = AppState::new(config, PackGenerator::offline());
        (build_router(state), dir)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn json_body(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _dir) = app(10);
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["status"], "ok");
    }

    #[tokio::test]
    async fn test_settings_report_offline_mode() {
        let (app, _dir) = app(7);
        let (status, body) = send(&app, get("/api/v1/settings")).await;
        assert_eq!(status, StatusCode::OK);
        let body = json_body(&body);
        assert_eq!(body["daily_limit"], 7);
        assert_eq!(body["ai_mode"], false);
        assert!(body["model"].is_null());
    }

    #[tokio::test]
    async fn test_create_pack_then_download_pdf() {
        let (app, _dir) = app(10);
        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/packs",
                json!({"topic": "fall makeup trends 2025", "niche": "beauty", "platform": "tiktok"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = json_body(&body);
        assert_eq!(body["mode"], "Offline");
        assert_eq!(body["ai_used"], false);
        assert_eq!(body["fallback_reason"]["kind"], "no_credential");
        assert_eq!(body["pack"]["hooks"].as_array().unwrap().len(), 10);
        assert_eq!(body["pack"]["hashtags"].as_array().unwrap().len(), 30);
        assert_eq!(
            body["markdown_file"],
            "TrendForge_tiktok_fall_makeup_trends_2025.md"
        );

        let pdf_url = body["pdf_url"].as_str().unwrap().to_string();
        let response = app.clone().oneshot(get(&pdf_url)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_blocked_topic_is_422() {
        let (app, _dir) = app(10);
        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/packs",
                json!({"topic": "Self-Harm stories", "platform": "instagram"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(&body)["error"]["code"], "CONTENT_BLOCKED");
    }

    #[tokio::test]
    async fn test_quota_exceeded_is_429() {
        let (app, _dir) = app(1);
        let request = || post_json("/api/v1/packs", json!({"topic": "study hacks", "platform": "youtube"}));
        let (status, _) = send(&app, request()).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, request()).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        let body = json_body(&body);
        assert_eq!(body["error"]["code"], "DAILY_LIMIT");
        assert_eq!(body["error"]["message"], "Daily limit reached. Upgrade for more.");
    }

    #[tokio::test]
    async fn test_unknown_platform_is_rejected() {
        let (app, _dir) = app(10);
        let (status, _) = send(
            &app,
            post_json("/api/v1/packs", json!({"topic": "x", "platform": "myspace"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_bulk_builds_archive() {
        let (app, _dir) = app(10);
        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/packs/bulk",
                json!({
                    "topics": ["morning gym routines", "  ", "hate raids"],
                    "niche": "fitness",
                    "platform": "tiktok"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = json_body(&body);
        assert_eq!(body["built"], 1);
        assert_eq!(body["archive_entries"], 2);
        let rows = body["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["status"], "ok");
        assert_eq!(rows[1]["status"], "blocked");

        let archive_url = body["archive_url"].as_str().unwrap().to_string();
        let (status, bytes) = send(&app, get(&archive_url)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_bulk_without_topics_is_400() {
        let (app, _dir) = app(10);
        let (status, body) = send(
            &app,
            post_json("/api/v1/packs/bulk", json!({"topics": [], "platform": "tiktok"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&body)["error"]["message"], "No topics provided.");
    }

    #[tokio::test]
    async fn test_download_rejects_unknown_and_unsafe_names() {
        let (app, dir) = app(10);
        std::fs::write(dir.path().join("notes.md"), "# hi").unwrap();

        for uri in [
            "/api/v1/packs/files/missing.pdf",
            "/api/v1/packs/files/notes.md",
            "/api/v1/packs/files/..%2Fsecret.pdf",
        ] {
            let (status, _) = send(&app, get(uri)).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        }
    }
}
