use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_derive::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::client::ApiClient;
use crate::constants::DEFAULT_LAST_DAYS;
use crate::error::Result;
use crate::metrics::CovidMetrics;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) metrics: Arc<CovidMetrics>,
    pub(crate) client: ApiClient,
}

#[derive(Serialize, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize, Deserialize)]
struct HistoricalQuery {
    lastdays: Option<String>,
}

async fn index() -> &'static str {
    "COVID-19 exporter\n\nMetrics are served at /metrics\n"
}

async fn healthz() -> &'static str {
    "ok"
}

async fn metrics_endpoint(State(state): State<AppState>) -> Response {
    match state.metrics.encode() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, state.metrics.content_type())],
            text,
        )
            .into_response(),
        Err(e) => {
            error!("failed to encode metrics: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn historical_endpoint(
    State(state): State<AppState>,
    Path(country): Path<String>,
    Query(query): Query<HistoricalQuery>,
) -> Response {
    let last_days = query.lastdays.as_deref().unwrap_or(DEFAULT_LAST_DAYS);
    match state.client.fetch_historical_data(&country, last_days).await {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            warn!(country = %country, "historical fetch failed: {e}");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics_endpoint))
        .route("/historical/:country", get(historical_endpoint))
        .with_state(state)
}

/// Serves the router on `addr` until `shutdown` completes.
pub(crate) async fn serve(
    addr: SocketAddr,
    state: AppState,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let server = axum::Server::try_bind(&addr)?.serve(router(state).into_make_service());
    info!("metrics available at http://{}/metrics", server.local_addr());

    server.with_graceful_shutdown(shutdown).await?;
    info!("server stopped");
    Ok(())
}
