//! Built-in HTTP target server for exercising the engine end-to-end.
//!
//! Never imported by the core engine — a separate surface for manual and
//! integration testing against controllable delay/error/random behavior.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Router, Json};
use rand::Rng;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

#[derive(Debug, Deserialize)]
struct SlowParams {
    ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ErrorParams {
    status: Option<u16>,
}

const RANDOM_DELAY_MIN_MS: u64 = 10;
const RANDOM_DELAY_MAX_MS: u64 = 500;
const RANDOM_ERROR_POOL: [u16; 5] = [200, 200, 404, 500, 503];

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn alive() -> StatusCode {
    StatusCode::OK
}

async fn ready() -> StatusCode {
    StatusCode::OK
}

async fn slow(Query(params): Query<SlowParams>) -> Json<serde_json::Value> {
    let ms = params.ms.unwrap_or(2000);
    tokio::time::sleep(Duration::from_millis(ms)).await;
    Json(json!({ "status": "ok", "slept_ms": ms }))
}

async fn error(Query(params): Query<ErrorParams>) -> (StatusCode, Json<serde_json::Value>) {
    let status = params.status.unwrap_or(500);
    let code = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (code, Json(json!({ "status": "error", "code": status })))
}

async fn random_delay() -> Json<serde_json::Value> {
    let ms = rand::thread_rng().gen_range(RANDOM_DELAY_MIN_MS..=RANDOM_DELAY_MAX_MS);
    tokio::time::sleep(Duration::from_millis(ms)).await;
    Json(json!({ "status": "ok", "slept_ms": ms }))
}

async fn random_error() -> (StatusCode, Json<serde_json::Value>) {
    let idx = rand::thread_rng().gen_range(0..RANDOM_ERROR_POOL.len());
    let status = RANDOM_ERROR_POOL[idx];
    let code = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (code, Json(json!({ "status": "ok", "code": status })))
}

async fn echo(body: axum::body::Bytes) -> axum::body::Bytes {
    body
}

fn app() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/alive", get(alive))
        .route("/ready", get(ready))
        .route("/slow", get(slow))
        .route("/error", get(error))
        .route("/random-delay", get(random_delay))
        .route("/random-error", get(random_error))
        .route("/echo", post(echo))
}

/// Bind and serve the test target server until the process is interrupted.
pub async fn serve(listen: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen).await?;
    info!(%listen, "test target server listening");
    axum::serve(listener, app()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn root_returns_ok() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn error_endpoint_honors_status_param() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/error?status=404")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn echo_round_trips_body() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/echo")
                    .body(Body::from("hello"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
