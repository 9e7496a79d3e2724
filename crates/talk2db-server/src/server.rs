use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use talk2db_core::model::Record;
use talk2db_core::{Pipeline, SchemaStyle, Talk2DbError};
use tower_http::trace::TraceLayer;

/// Shared application state
pub type AppState = Arc<Pipeline>;

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub sql_query: String,
    pub results: Vec<Record>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

/// Any core failure surfaces as a 500 with `{"detail": "Error: ..."}`.
pub struct ApiError(Talk2DbError);

impl From<Talk2DbError> for ApiError {
    fn from(e: Talk2DbError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: format!("Error: {}", self.0),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub fn router(pipeline: AppState) -> Router {
    Router::new()
        .route("/question", post(ask_question))
        .route("/schema", get(get_schema))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(pipeline)
}

/// Bind and serve until ctrl-c.
pub async fn serve(addr: &str, pipeline: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {addr}: {e}"))?;
    tracing::info!(event = "server_listening", addr = %listener.local_addr()?);

    axum::serve(listener, router(pipeline))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!(event = "server_stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(event = "signal_error", error = %e);
    }
}

async fn ask_question(
    State(pipeline): State<AppState>,
    Json(req): Json<QuestionRequest>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let started = Instant::now();
    let answer = pipeline.ask(&req.question).await.inspect_err(|e| {
        tracing::error!(
            event = "question_failed",
            kind = e.kind(),
            question = %req.question,
            error = %e
        );
    })?;

    tracing::info!(
        event = "question_answered",
        question = %answer.question,
        rows = answer.result.row_count(),
        duration_ms = started.elapsed().as_millis() as u64
    );
    Ok(Json(QuestionResponse {
        results: answer.records(),
        sql_query: answer.sql_query,
    }))
}

async fn get_schema(State(pipeline): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let schema = pipeline.load_schema(SchemaStyle::Compact).await?;
    Ok(Json(serde_json::json!({ "schema": schema })))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
