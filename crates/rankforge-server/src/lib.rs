//! RankForge HTTP service: research pipeline orchestration and the axum API.

pub mod api;
pub mod error;
pub mod pipeline;

pub use crate::error::{ApiError, ApiResult};
pub use crate::pipeline::{Pipeline, PipelineError};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use rankforge_store::JobStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub jobs: Arc<dyn JobStore>,
    /// For uptime reporting.
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(pipeline: Arc<Pipeline>, jobs: Arc<dyn JobStore>) -> Self {
        Self {
            pipeline,
            jobs,
            startup_time: Utc::now(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::research_routes())
        .merge(api::plan_routes())
        .merge(api::job_routes())
        .merge(api::intake_routes())
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, build_router(state)).await
}
