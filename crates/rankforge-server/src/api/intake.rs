//! Keyword intake: cluster a raw keyword list without fetching metrics.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use rankforge_core::Cluster;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct IntakeRequest {
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeResponse {
    pub clusters: Vec<Cluster>,
    pub total_keywords: usize,
}

/// POST /api/keywords/intake
pub async fn intake(
    State(state): State<AppState>,
    body: Result<Json<IntakeRequest>, JsonRejection>,
) -> ApiResult<Json<IntakeResponse>> {
    let Json(request) = body?;
    let keywords: Vec<String> = request
        .keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        return Err(ApiError::BadRequest("Keywords array is required".into()));
    }
    let outcome = state.pipeline.intake(&keywords);
    Ok(Json(IntakeResponse {
        clusters: outcome.clusters,
        total_keywords: keywords.len(),
    }))
}

pub fn intake_routes() -> Router<AppState> {
    Router::new().route("/api/keywords/intake", post(intake))
}
