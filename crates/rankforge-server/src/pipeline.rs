//! Research pipeline: metrics → clusters → score, and plan synthesis.

use std::sync::Arc;

use chrono::Utc;
use rankforge_analysis::{ClusterOutcome, Clusterer, score};
use rankforge_core::{
    AppConfig, Credentials, DataQuality, PlanRequest, ResearchRequest, ResearchResult,
    ResearchStatus, SeoPlan, ValidationError,
};
use rankforge_metrics::{BatchProgress, BatchScheduler, MetricsGateway};
use rankforge_plan::{PlanCatalogue, PlanError, PlanInput, Synthesizer};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;
use tokio_util::task::AbortOnDropHandle;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Metrics collection broke outside the per-keyword fallback.
    #[error("scheduler failure: {0}")]
    Scheduler(String),

    #[error(transparent)]
    Catalogue(#[from] PlanError),
}

/// Owns every stage of a research run. Shared behind an `Arc`; holds no
/// per-request state.
pub struct Pipeline {
    gateway: Arc<MetricsGateway>,
    clusterer: Clusterer,
    synthesizer: Synthesizer,
    config: AppConfig,
    credentials: Credentials,
}

impl Pipeline {
    pub fn new(
        config: AppConfig,
        credentials: Credentials,
        gateway: MetricsGateway,
        synthesizer: Synthesizer,
    ) -> Self {
        Self {
            gateway: Arc::new(gateway),
            clusterer: Clusterer::new(&config.cluster),
            synthesizer,
            config,
            credentials,
        }
    }

    /// Live providers, with the plan catalogue loaded from
    /// `plan.catalogue_path` when set.
    pub fn from_config(config: AppConfig, credentials: Credentials) -> Result<Self, PipelineError> {
        let catalogue = match &config.plan.catalogue_path {
            Some(path) => PlanCatalogue::load(path)?,
            None => PlanCatalogue::default(),
        };
        let synthesizer = Synthesizer::new(catalogue, config.plan.clone());
        let gateway = MetricsGateway::live(&config.batch);
        Ok(Self::new(config, credentials, gateway, synthesizer))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn gateway(&self) -> &MetricsGateway {
        &self.gateway
    }

    pub async fn research(
        &self,
        request: ResearchRequest,
    ) -> Result<ResearchResult, PipelineError> {
        self.research_with_progress(request, None).await
    }

    /// Run research, sending a [`BatchProgress`] per finished batch to
    /// `progress` when given.
    pub async fn research_with_progress(
        &self,
        request: ResearchRequest,
        progress: Option<UnboundedSender<BatchProgress>>,
    ) -> Result<ResearchResult, PipelineError> {
        let request = request.validate()?;
        let created_at = Utc::now();
        let credentials = match &request.api_keys {
            Some(keys) => self.credentials.with_overrides(keys),
            None => self.credentials.clone(),
        };
        if !credentials.has_volume() || !credentials.has_difficulty() {
            info!(
                volume = credentials.has_volume(),
                difficulty = credentials.has_difficulty(),
                "provider credentials missing, using synthetic data"
            );
        }

        info!(
            country = %request.country,
            niche = %request.niche,
            keywords = request.keywords.len(),
            "starting research"
        );

        let scheduler = BatchScheduler::from_config(&self.config.batch)
            .with_deadline(Instant::now() + self.config.batch.research_timeout());
        let gateway = Arc::clone(&self.gateway);
        let keywords = request.keywords.clone();
        let country = request.country.clone();

        // Collection runs on its own task so a panic in a provider adapter
        // surfaces here as a JoinError instead of taking the caller down.
        // Dropping this future (client disconnect) aborts the task.
        let collection = AbortOnDropHandle::new(tokio::spawn(async move {
            gateway
                .collect(&keywords, &country, &credentials, &scheduler, |p| {
                    if let Some(tx) = &progress {
                        let _ = tx.send(p);
                    }
                })
                .await
        }));
        let outcome = collection
            .await
            .map_err(|e| PipelineError::Scheduler(e.to_string()))?;

        if !outcome.partial && outcome.metrics.len() != request.keywords.len() {
            return Err(PipelineError::Scheduler(format!(
                "expected {} metrics, got {}",
                request.keywords.len(),
                outcome.metrics.len()
            )));
        }

        let mut metrics = outcome.metrics;
        let status = if outcome.partial {
            warn!(
                fetched = metrics.len(),
                requested = request.keywords.len(),
                "research deadline reached, returning partial result"
            );
            ResearchStatus::Partial
        } else {
            ResearchStatus::Completed
        };

        let clusters = self.clusterer.cluster_metrics(&mut metrics);
        let scores = score(&metrics, &request.country, &self.config.scoring);
        let data_quality = DataQuality::from_metrics(&metrics);

        let result = ResearchResult {
            id: uuid::Uuid::new_v4().to_string(),
            country: request.country,
            niche: request.niche,
            keywords: metrics,
            clusters,
            scores,
            opportunity_score: scores.total_score,
            status,
            data_quality,
            created_at,
            updated_at: Utc::now(),
        };

        info!(
            research_id = %result.id,
            total_score = result.scores.total_score,
            clusters = result.clusters.len(),
            status = result.status.as_str(),
            synthetic = result.data_quality.synthetic_keywords,
            "research complete"
        );
        Ok(result)
    }

    /// Plan from a dashboard request. Clusters are derived from the keyword
    /// strings when the request has none.
    pub fn plan(&self, request: PlanRequest) -> Result<SeoPlan, PipelineError> {
        let request = request.validate()?;
        let input = PlanInput::from_request(
            request,
            uuid::Uuid::new_v4().to_string(),
            &self.clusterer,
            Utc::now(),
        );
        Ok(self.synthesizer.synthesize(&input))
    }

    /// Plan straight from a research result.
    pub fn plan_for(&self, result: &ResearchResult) -> SeoPlan {
        self.synthesizer.synthesize(&PlanInput::from_result(result))
    }

    /// Cluster keyword strings without fetching metrics.
    pub fn intake(&self, keywords: &[String]) -> ClusterOutcome {
        self.clusterer.cluster(keywords)
    }
}
