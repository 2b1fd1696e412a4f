use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use server_api::{list_races, list_results, parse_year, parse_year_and_round, ErgastContext};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{RaceSummary, ResultRow},
};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::load_settings;

#[derive(Debug, Deserialize)]
struct RacesQuery {
    year: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResultsQuery {
    year: Option<String>,
    round: Option<String>,
}

type HttpError = (StatusCode, Json<ApiError>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let ergast = ErgastContext::new(
        settings.ergast_base_url.clone(),
        settings.ergast_accept_invalid_certs,
    )?;
    info!(ergast_base_url = %ergast.base_url, "using upstream results api");

    let app = build_router(Arc::new(AppState { ergast }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/races", get(http_list_races))
        .route("/api/results", get(http_list_results))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_races(
    State(state): State<Arc<AppState>>,
    Query(q): Query<RacesQuery>,
) -> Result<Json<Vec<RaceSummary>>, HttpError> {
    let year = parse_year(q.year.as_deref()).map_err(error_response)?;
    let races = list_races(&state.ergast, year)
        .await
        .map_err(error_response)?;
    Ok(Json(races))
}

async fn http_list_results(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ResultsQuery>,
) -> Result<Json<Vec<ResultRow>>, HttpError> {
    let (year, round) =
        parse_year_and_round(q.year.as_deref(), q.round.as_deref()).map_err(error_response)?;
    let results = list_results(&state.ergast, year, round)
        .await
        .map_err(error_response)?;
    Ok(Json(results))
}

fn error_response(err: ApiError) -> HttpError {
    let status = match err.code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Upstream => StatusCode::BAD_GATEWAY,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
