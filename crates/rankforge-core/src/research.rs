//! Research results: the output of one research invocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::keyword::{Cluster, KeywordMetric, MetricSource};

/// Five sub-scores and the composite, all in 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub volume_score: f64,
    pub competition_score: f64,
    pub cpc_rpm_score: f64,
    pub saturation_score: f64,
    pub localization_penalty: f64,
    pub total_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchStatus {
    Pending,
    Running,
    Completed,
    /// The request deadline cut off remaining batches.
    Partial,
    Failed,
}

impl ResearchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }
}

/// How many keywords were backed by live, synthetic or defaulted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
    pub live_keywords: usize,
    pub synthetic_keywords: usize,
    pub defaulted_keywords: usize,
}

impl DataQuality {
    pub fn from_metrics(metrics: &[KeywordMetric]) -> Self {
        let mut q = Self::default();
        for m in metrics {
            if m.is_synthetic {
                q.synthetic_keywords += 1;
            } else if m.source == MetricSource::NeutralDefault {
                q.defaulted_keywords += 1;
            } else {
                q.live_keywords += 1;
            }
        }
        q
    }

    /// True when no keyword was backed by live provider data.
    pub fn fully_synthetic(&self) -> bool {
        self.live_keywords == 0 && self.synthetic_keywords > 0
    }
}

/// Result of one research run. Owned by the caller; never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchResult {
    pub id: String,
    pub country: String,
    pub niche: String,
    pub keywords: Vec<KeywordMetric>,
    pub clusters: Vec<Cluster>,
    #[serde(flatten)]
    pub scores: ScoreBreakdown,
    /// Mirrors `totalScore` for dashboard consumers.
    pub opportunity_score: f64,
    pub status: ResearchStatus,
    pub data_quality: DataQuality,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
