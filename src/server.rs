//! HTTP boundary for the recommendation service.
//!
//! Thin layer over `Recommender`: request parsing, error-to-status
//! mapping, CORS, and the liveness probe. No decision logic lives here.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::catalog::Assessment;
use crate::error::RecommendError;
use crate::recommend::Recommender;

/// Builds the service router with permissive CORS, matching the
/// original deployment which serves a static frontend from another origin.
pub fn router(recommender: Arc<Recommender>) -> Router {
    Router::new()
        .route("/recommend", post(recommend))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(recommender)
}

/// Serves the router on the configured bind address until the process
/// is terminated.
pub async fn serve(recommender: Arc<Recommender>, bind: &str) -> anyhow::Result<()> {
    let app = router(recommender);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(%bind, "recommendation service listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: i64,
}

fn default_top_k() -> i64 {
    10
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommended_assessments: Vec<Assessment>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

/// Wrapper so `RecommendError` can flow out of handlers with `?`.
enum ApiError {
    Recommend(RecommendError),
    Worker(String),
}

impl From<RecommendError> for ApiError {
    fn from(err: RecommendError) -> Self {
        Self::Recommend(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, code) = match self {
            Self::Recommend(err) => {
                let status = if err.is_client_error() {
                    StatusCode::BAD_REQUEST
                } else {
                    tracing::error!(error = %err, "request failed");
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, err.to_string(), err.status_code())
            }
            Self::Worker(message) => {
                tracing::error!(error = %message, "worker task failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message, "WORKER_FAILED")
            }
        };

        let body = ErrorBody { error, code };
        (status, Json(body)).into_response()
    }
}

async fn recommend(
    State(recommender): State<Arc<Recommender>>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, ApiError> {
    // Encoding is CPU-bound and synchronous; keep it off the async workers.
    let results = tokio::task::spawn_blocking(move || {
        recommender.recommend(&request.query, request.top_k)
    })
    .await
    .map_err(|e| ApiError::Worker(e.to_string()))??;

    Ok(Json(RecommendResponse {
        recommended_assessments: results,
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}
