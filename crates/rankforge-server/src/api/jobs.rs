use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use rankforge_store::Job;

use crate::AppState;
use crate::error::ApiResult;

/// GET /api/jobs
pub async fn list_jobs(State(state): State<AppState>) -> ApiResult<Json<Vec<Job>>> {
    Ok(Json(state.jobs.list().await?))
}

/// GET /api/jobs/{id}
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Job>> {
    Ok(Json(state.jobs.get(&id).await?))
}

pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/api/jobs", get(list_jobs))
        .route("/api/jobs/:id", get(get_job))
}
