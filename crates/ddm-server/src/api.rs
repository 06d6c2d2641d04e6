//! HTTP handlers

use axum::{
    body::{Body, Bytes},
    extract::{Path, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ddm_core::sanitize_request_path;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, warn};

use crate::state::AppState;

/// API error response
#[derive(Serialize)]
struct ApiError {
    error: String,
}

impl ApiError {
    fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

fn error_response(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(ApiError::new(msg))).into_response()
}

/// Health check
pub async fn ping() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "ok" }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EchoBody {
    pub message: String,
}

/// Echo a `{"message": ...}` body back to the caller
pub async fn echo(body: Bytes) -> Response {
    match serde_json::from_slice::<EchoBody>(&body) {
        Ok(body) => Json(body).into_response(),
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

/// Serve a file from the asset root
pub async fn serve_asset(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    request: Request,
) -> Response {
    let Some(relative) = sanitize_request_path(&path) else {
        warn!(path = %path, "Rejected asset path");
        return error_response(StatusCode::BAD_REQUEST, "invalid asset path");
    };

    let full_path = state.asset_root.join(&relative);
    match tokio::fs::metadata(&full_path).await {
        Ok(meta) if meta.is_dir() => {
            return error_response(StatusCode::NOT_FOUND, "Asset not found");
        }
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %full_path.display(), "Asset not found");
            return error_response(StatusCode::NOT_FOUND, "Asset not found");
        }
        Err(e) => {
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    }

    match ServeFile::new(&full_path).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}
