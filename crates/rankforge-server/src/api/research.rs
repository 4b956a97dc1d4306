//! Research endpoints: synchronous run and background job.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use rankforge_core::{ResearchRequest, ResearchResult};
use rankforge_metrics::BatchProgress;
use rankforge_store::{Job, JobKind, JobUpdate};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::{ApiResult, RESEARCH_FAILED};
use crate::{AppState, PipelineError};

/// Share of job progress covered by metric collection; the rest is
/// clustering and scoring.
const FETCH_PROGRESS_SHARE: u32 = 90;

/// POST /api/research/run
pub async fn run_research(
    State(state): State<AppState>,
    body: Result<Json<ResearchRequest>, JsonRejection>,
) -> ApiResult<Json<ResearchResult>> {
    let Json(request) = body?;
    let result = state.pipeline.research(request).await?;
    Ok(Json(result))
}

/// POST /api/research/jobs
///
/// Validates, registers a job, and runs the research in the background.
/// Poll `GET /api/jobs/{id}` for progress and the final result.
pub async fn start_research_job(
    State(state): State<AppState>,
    body: Result<Json<ResearchRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Job>)> {
    let Json(request) = body?;
    let request = request.validate().map_err(PipelineError::from)?;

    let title = format!("{} in {}", request.niche, request.country);
    let job = state.jobs.create(JobKind::Research, title).await?;
    info!(job_id = %job.id, keywords = request.keywords.len(), "research job queued");

    tokio::spawn(run_job(state, job.id.clone(), request));
    Ok((StatusCode::ACCEPTED, Json(job)))
}

async fn run_job(state: AppState, job_id: String, request: ResearchRequest) {
    let (tx, mut rx) = mpsc::unbounded_channel::<BatchProgress>();

    let jobs = state.jobs.clone();
    let progress_id = job_id.clone();
    let forwarder = tokio::spawn(async move {
        while let Some(p) = rx.recv().await {
            let pct = (u32::from(p.percent()) * FETCH_PROGRESS_SHARE / 100).max(1) as u8;
            let update = JobUpdate::progress(pct)
                .with_log(format!("Fetched batch {} of {}", p.batch, p.total_batches));
            if let Err(e) = jobs.update(&progress_id, update).await {
                warn!(job_id = %progress_id, error = %e, "job progress update failed");
            }
        }
    });

    let outcome = state
        .pipeline
        .research_with_progress(request, Some(tx))
        .await;
    // The sender is dropped with the collection task, which ends the forwarder.
    let _ = forwarder.await;

    let update = match outcome.map(|r| serde_json::to_value(&r)) {
        Ok(Ok(value)) => JobUpdate::completed(value).with_log("Research complete"),
        Ok(Err(e)) => {
            warn!(job_id = %job_id, error = %e, "failed to encode research result");
            JobUpdate::failed(RESEARCH_FAILED)
        }
        Err(e) => {
            warn!(job_id = %job_id, error = %e, "research job failed");
            JobUpdate::failed(RESEARCH_FAILED)
        }
    };
    if let Err(e) = state.jobs.update(&job_id, update).await {
        warn!(job_id = %job_id, error = %e, "job final update failed");
    }
}

pub fn research_routes() -> Router<AppState> {
    Router::new()
        .route("/api/research/run", post(run_research))
        .route("/api/research/jobs", post(start_research_job))
}
