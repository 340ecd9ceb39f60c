use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{HealthResponse, HistoryEntry, PlayRequest, PlayResponse, ResetResponse, StatsSnapshot},
};
use storage::Storage;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

mod api;
mod config;

use api::ApiContext;
use config::{load_settings, normalize_database_url};

#[derive(Clone)]
struct AppState {
    api: ApiContext,
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let database_url = normalize_database_url(&settings.database_url);
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;
    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/stats", get(http_stats))
        .route("/api/play", post(http_play))
        .route("/api/reset", post(http_reset))
        .route("/api/history", get(http_history))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

async fn http_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsSnapshot>, (StatusCode, Json<ApiError>)> {
    let stats = api::stats(&state.api).await.map_err(error_status)?;
    Ok(Json(stats))
}

async fn http_play(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PlayRequest>, JsonRejection>,
) -> Result<Json<PlayResponse>, (StatusCode, Json<ApiError>)> {
    let Json(request) = payload.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(ErrorCode::Validation, rejection.body_text())),
        )
    })?;

    let response = api::play(&state.api, request.choice)
        .await
        .map_err(error_status)?;
    Ok(Json(response))
}

async fn http_reset(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ResetResponse>, (StatusCode, Json<ApiError>)> {
    let response = api::reset(&state.api).await.map_err(error_status)?;
    Ok(Json(response))
}

async fn http_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryEntry>>, (StatusCode, Json<ApiError>)> {
    let entries = api::history(&state.api, query.limit)
        .await
        .map_err(error_status)?;
    Ok(Json(entries))
}

fn error_status(error: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match error.code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!(%error, "request failed");
    }
    (status, Json(error))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
