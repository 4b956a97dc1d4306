//! Plan endpoints.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use rankforge_core::{PlanRequest, ResearchRequest, ResearchResult, SeoPlan};
use serde::Serialize;

use crate::AppState;
use crate::error::ApiResult;

/// POST /api/plans/create
pub async fn create_plan(
    State(state): State<AppState>,
    body: Result<Json<PlanRequest>, JsonRejection>,
) -> ApiResult<Json<SeoPlan>> {
    let Json(request) = body?;
    Ok(Json(state.pipeline.plan(request)?))
}

#[derive(Debug, Serialize)]
pub struct AutoPlanResponse {
    pub research: ResearchResult,
    pub plan: SeoPlan,
}

/// POST /api/plans/auto
///
/// Research and plan in one call.
pub async fn auto_plan(
    State(state): State<AppState>,
    body: Result<Json<ResearchRequest>, JsonRejection>,
) -> ApiResult<Json<AutoPlanResponse>> {
    let Json(request) = body?;
    let research = state.pipeline.research(request).await?;
    let plan = state.pipeline.plan_for(&research);
    Ok(Json(AutoPlanResponse { research, plan }))
}

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/api/plans/create", post(create_plan))
        .route("/api/plans/auto", post(auto_plan))
}
