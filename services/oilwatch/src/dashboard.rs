//! Web dashboard with server-rendered HTML and JSON API endpoints

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::Router;

use crate::poller::{PollOutcome, Poller};
use crate::render::render_page;

/// Dashboard application state
#[derive(Clone)]
pub struct DashboardContext {
    pub poller: Arc<Poller>,
    pub reload_interval_ms: u64,
}

/// Page reload period for a polling interval, saturating at `u64::MAX`
pub fn reload_interval_ms(interval: Duration) -> u64 {
    u64::try_from(interval.as_millis()).unwrap_or(u64::MAX)
}

/// Build the dashboard axum router
pub fn build_router(poller: Arc<Poller>, reload_interval_ms: u64) -> Router {
    let context = DashboardContext {
        poller,
        reload_interval_ms,
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/api/buoys", get(buoys_handler))
        .route("/api/summary", get(summary_handler))
        .route("/api/state", get(state_handler))
        .route("/api/refresh", post(refresh_handler))
        .route("/health", get(health_handler))
        .with_state(context)
}

async fn index_handler(State(ctx): State<DashboardContext>) -> impl IntoResponse {
    let state = ctx.poller.state().read().await;
    Html(render_page(&state, ctx.reload_interval_ms))
}

async fn buoys_handler(State(ctx): State<DashboardContext>) -> impl IntoResponse {
    let state = ctx.poller.state().read().await;
    axum::Json(state.buoys.clone())
}

async fn summary_handler(State(ctx): State<DashboardContext>) -> impl IntoResponse {
    let state = ctx.poller.state().read().await;
    axum::Json(state.summary())
}

async fn state_handler(State(ctx): State<DashboardContext>) -> impl IntoResponse {
    let state = ctx.poller.state().read().await;
    axum::Json(serde_json::json!({
        "buoys": state.buoys,
        "loading": state.loading,
        "error": state.error,
        "last_refreshed": state.last_refreshed,
        "summary": state.summary(),
    }))
}

async fn refresh_handler(State(ctx): State<DashboardContext>) -> impl IntoResponse {
    tracing::debug!("Manual refresh requested");
    match ctx.poller.refresh().await {
        Ok(outcome) => {
            let status = match outcome {
                PollOutcome::Skipped => StatusCode::CONFLICT,
                _ => StatusCode::OK,
            };
            (status, axum::Json(serde_json::json!(outcome)))
        }
        Err(e) => {
            tracing::error!("Manual refresh failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(serde_json::json!({ "error": e.to_string() })),
            )
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
