use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    pub name: &'static str,
    /// "live" when credentials are configured, otherwise "synthetic".
    pub mode: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub providers: Providers,
}

#[derive(Debug, Serialize)]
pub struct Providers {
    pub volume: ProviderStatus,
    pub difficulty: ProviderStatus,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime_seconds = Utc::now()
        .signed_duration_since(state.startup_time)
        .num_seconds()
        .max(0) as u64;
    let creds = state.pipeline.credentials();
    let gateway = state.pipeline.gateway();
    let mode = |live: bool| if live { "live" } else { "synthetic" };

    Json(HealthResponse {
        status: "ok",
        service: "rankforge",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds,
        providers: Providers {
            volume: ProviderStatus {
                name: gateway.volume_provider_name(),
                mode: mode(creds.has_volume()),
            },
            difficulty: ProviderStatus {
                name: gateway.difficulty_provider_name(),
                mode: mode(creds.has_difficulty()),
            },
        },
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
