//! Per-keyword metrics and topical clusters.

use serde::{Deserialize, Serialize};

/// Competition reported when no provider supplied one.
pub const NEUTRAL_COMPETITION: f64 = 50.0;
/// Difficulty reported when no provider supplied one.
pub const NEUTRAL_DIFFICULTY: f64 = 50.0;

/// Which entry of the fallback chain produced a metric's volume figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricSource {
    /// The search-volume provider answered with live data.
    LiveVolume,
    /// The volume provider failed; the difficulty provider's volume was used.
    LiveDifficulty,
    /// No credentials: values came from the synthetic generator.
    Synthetic,
    /// Every provider failed; zero/neutral values.
    #[default]
    NeutralDefault,
}

/// Market metrics for a single keyword.
///
/// Built by the batch scheduler, tagged with a cluster name by the
/// clusterer, and read-only once scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMetric {
    pub keyword: String,
    pub volume: u64,
    /// 0-100.
    pub competition: f64,
    pub cpc: f64,
    /// 0-100.
    pub difficulty: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    /// True when any field came from the synthetic generator.
    #[serde(default)]
    pub is_synthetic: bool,
    #[serde(default)]
    pub source: MetricSource,
}

impl KeywordMetric {
    /// The zero/neutral metric used when every provider call failed.
    pub fn neutral(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            volume: 0,
            competition: NEUTRAL_COMPETITION,
            cpc: 0.0,
            difficulty: NEUTRAL_DIFFICULTY,
            cluster: None,
            is_synthetic: false,
            source: MetricSource::NeutralDefault,
        }
    }

    /// Clamp percentage fields into 0-100 and CPC to non-negative.
    pub fn clamped(mut self) -> Self {
        self.competition = clamp_pct(self.competition);
        self.difficulty = clamp_pct(self.difficulty);
        self.cpc = if self.cpc.is_finite() { self.cpc.max(0.0) } else { 0.0 };
        self
    }
}

fn clamp_pct(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) }
}

/// Search intent inferred from a cluster's keyword modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchIntent {
    #[default]
    Informational,
    Commercial,
    Transactional,
    Navigational,
}

impl SearchIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Informational => "informational",
            Self::Commercial => "commercial",
            Self::Transactional => "transactional",
            Self::Navigational => "navigational",
        }
    }
}

/// A group of keywords sharing a topic token; the unit of content planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// e.g. "Running Cluster".
    pub name: String,
    /// First keyword assigned to this cluster in input order.
    pub primary_keyword: String,
    pub supporting_keywords: Vec<String>,
    pub total_volume: u64,
    pub avg_difficulty: f64,
    /// Always at least 2.
    pub estimated_weeks: u32,
    /// 1 or 2.
    pub posts_per_week: u8,
    #[serde(default)]
    pub intent: SearchIntent,
}

impl Cluster {
    /// All member keywords, primary first.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary_keyword.as_str())
            .chain(self.supporting_keywords.iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        1 + self.supporting_keywords.len()
    }

    /// Never true: a cluster always holds its primary keyword.
    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_metric_values() {
        let m = KeywordMetric::neutral("running shoes");
        assert_eq!(m.volume, 0);
        assert_eq!(m.cpc, 0.0);
        assert_eq!(m.competition, 50.0);
        assert_eq!(m.difficulty, 50.0);
        assert!(!m.is_synthetic);
        assert_eq!(m.source, MetricSource::NeutralDefault);
    }

    #[test]
    fn clamped_bounds_percentages() {
        let m = KeywordMetric {
            competition: 140.0,
            difficulty: -3.0,
            cpc: -1.0,
            ..KeywordMetric::neutral("x")
        }
        .clamped();
        assert_eq!(m.competition, 100.0);
        assert_eq!(m.difficulty, 0.0);
        assert_eq!(m.cpc, 0.0);
    }

    #[test]
    fn metric_serializes_camel_case() {
        let mut m = KeywordMetric::neutral("running shoes");
        m.is_synthetic = true;
        m.source = MetricSource::Synthetic;
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["isSynthetic"], true);
        assert_eq!(json["source"], "synthetic");
        assert!(json.get("cluster").is_none());
    }

    #[test]
    fn metric_accepts_dashboard_shape() {
        let json = r#"{"keyword":"k","volume":10,"competition":1.5,"cpc":0.2,"difficulty":30,"cluster":"K Cluster"}"#;
        let m: KeywordMetric = serde_json::from_str(json).unwrap();
        assert_eq!(m.cluster.as_deref(), Some("K Cluster"));
        assert!(!m.is_synthetic);
    }

    #[test]
    fn cluster_keywords_primary_first() {
        let c = Cluster {
            name: "Running Cluster".into(),
            primary_keyword: "best running shoes".into(),
            supporting_keywords: vec!["running shoes".into()],
            total_volume: 0,
            avg_difficulty: 0.0,
            estimated_weeks: 2,
            posts_per_week: 1,
            intent: SearchIntent::Commercial,
        };
        let kws: Vec<&str> = c.keywords().collect();
        assert_eq!(kws, vec!["best running shoes", "running shoes"]);
        assert_eq!(c.len(), 2);
    }
}
