//! HTTP boundary
//!
//! `POST /execute` takes an `ExecutionRequest` and answers with a JSON string:
//! the program output (200), a fixed message for unknown languages (400), or
//! `"Internal server error: ..."` for any execution failure (500).

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use axum::Router;
use tracing::{debug, error, warn};

use crate::core::{ExecutionOutcome, ExecutionRequest, FailureKind};
use crate::dispatcher::Dispatcher;

pub const UNSUPPORTED_LANGUAGE_MESSAGE: &str = "Unsupported language!";

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/execute", post(execute).options(preflight))
        .with_state(state)
}

/// POST /execute
async fn execute(
    State(state): State<AppState>,
    body: Result<Json<ExecutionRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(error = %rejection, "Malformed execution request");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(format!("Internal server error: {}", rejection)),
            )
                .into_response();
        }
    };

    // one task per request
    let dispatcher = state.dispatcher.clone();
    let handle = tokio::spawn(async move {
        let result = dispatcher.execute(&request).await;
        if let Err(e) = &result {
            debug!(kind = %e.kind(), phase = ?e.phase(), "Request failed");
        }
        ExecutionOutcome::from(result)
    });

    match handle.await {
        Ok(outcome) => outcome.into_response(),
        Err(e) => {
            error!("Execution task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(format!("Internal server error: {}", e)),
            )
                .into_response()
        }
    }
}

/// OPTIONS /execute - CORS preflight
async fn preflight() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
        ],
        Json(serde_json::json!({})),
    )
}

impl IntoResponse for ExecutionOutcome {
    fn into_response(self) -> Response {
        match self {
            ExecutionOutcome::Success(output) => (StatusCode::OK, Json(output)).into_response(),
            ExecutionOutcome::Failure {
                kind: FailureKind::UnsupportedLanguage,
                ..
            } => (StatusCode::BAD_REQUEST, Json(UNSUPPORTED_LANGUAGE_MESSAGE)).into_response(),
            ExecutionOutcome::Failure { message, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(format!("Internal server error: {}", message)),
            )
                .into_response(),
        }
    }
}
