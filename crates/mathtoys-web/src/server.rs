use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::handlers;
use crate::protocol::ApiError;
use crate::settings::ComputeSettings;

/// All API routes with tracing, CORS and panic recovery applied.
pub fn router(settings: ComputeSettings) -> Router {
    Router::new()
        .route("/api/functions", get(handlers::functions))
        .route("/api/derivatives", post(handlers::derivatives))
        .route("/api/tangent", post(handlers::tangent))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(Arc::new(settings))
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("handler panicked: {detail}");
    ApiError::internal().into_response()
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn run_server(addr: SocketAddr, settings: ComputeSettings) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;
    info!(
        addr = %listener.local_addr()?,
        num_points = settings.num_points,
        max_span = settings.max_span,
        "mathtoys web service listening"
    );

    axum::serve(listener, router(settings))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("mathtoys web service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("cannot listen for shutdown signal: {e}");
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    async fn call(req: Request<Body>) -> (StatusCode, Value) {
        let app = router(ComputeSettings::default());
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_functions_catalog() {
        let req = Request::builder()
            .uri("/api/functions")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let functions = body["functions"].as_object().unwrap();
        assert_eq!(functions.len(), 10);
        assert_eq!(functions["power"]["params"][1]["id"], "n");
    }

    #[tokio::test]
    async fn test_derivatives_defaults_to_sin() {
        let (status, body) = call(post_json("/api/derivatives", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["view_mode"], "separate");
        assert_eq!(body["func_data"]["x"].as_array().unwrap().len(), 500);
        assert_eq!(body["derivative_data"]["y"].as_array().unwrap().len(), 500);
        assert!(body["derivative_formula"].as_str().unwrap().contains("cos"));
        assert_eq!(body["y_range_combined"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_derivatives_undefined_points_are_null() {
        let body = json!({
            "func": "sqrt",
            "params": {"a": 1, "b": 1, "c": 0},
            "view_mode": "combined",
            "x_min": -1,
            "x_max": 1
        });
        let (status, body) = call(post_json("/api/derivatives", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view_mode"], "combined");
        assert!(body["func_data"]["y"][0].is_null());
        assert_eq!(body["func_data"]["y"][499], 1.0);
        assert!(body["derivative_data"]["y"][0].is_null());
    }

    #[tokio::test]
    async fn test_derivatives_unknown_function() {
        let (status, body) =
            call(post_json("/api/derivatives", json!({"func": "sinh"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "unknown function: sinh");
    }

    #[tokio::test]
    async fn test_derivatives_bad_param_type() {
        let body = json!({"func": "linear", "params": {"a": "abc"}});
        let (status, body) = call(post_json("/api/derivatives", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("invalid parameter a"));
    }

    #[tokio::test]
    async fn test_tangent_defaults() {
        let (status, body) = call(post_json("/api/tangent", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tangent_point"], json!({"x": 0.0, "y": 0.0}));
        assert_eq!(body["slope"], 0.0);
        assert_eq!(body["tangent_equation"], "y = 0");
    }

    #[tokio::test]
    async fn test_tangent_null_x0() {
        let (status, body) = call(post_json("/api/tangent", json!({"x0": null}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "x0 is required");
    }

    #[tokio::test]
    async fn test_null_x_min_rejected() {
        let body = json!({"func": "sin", "x_min": null});
        let (status, body) = call(post_json("/api/derivatives", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("x_min"));

        let body = json!({"x_max": null});
        let (status, _) = call(post_json("/api/tangent", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/tangent")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = call(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_missing_body() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/derivatives")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let req = Request::builder()
            .uri("/api/nothing")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }
}
