//! Tunable configuration shared across the pipeline.
//!
//! Every section has a `Default` carrying the production constants, and the
//! whole [`AppConfig`] can be overridden from a TOML file:
//!
//! ```toml
//! [batch]
//! batch_size = 3
//! inter_batch_delay_ms = 2000
//!
//! [scoring.weights]
//! volume = 0.4
//!
//! [scoring.penalties]
//! tier2_countries = ["United Kingdom", "Canada"]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::market::normalize_country;
use crate::request::ApiKeys;

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub batch: BatchConfig,
    pub scoring: ScoringConfig,
    pub cluster: ClusterConfig,
    pub plan: PlanConfig,
    pub jobs: JobsConfig,
}

impl AppConfig {
    /// Load from a TOML file; missing sections and keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "batch.batch_size must be at least 1".into(),
            ));
        }
        let w = &self.scoring.weights;
        for (name, v) in [
            ("volume", w.volume),
            ("competition", w.competition),
            ("cpc_rpm", w.cpc_rpm),
            ("saturation", w.saturation),
            ("penalty", w.penalty),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "scoring.weights.{name} must be a non-negative number"
                )));
            }
        }
        if self.scoring.volume_ceiling <= 0.0 || self.scoring.cpc_ceiling <= 0.0 {
            return Err(ConfigError::Invalid(
                "scoring ceilings must be positive".into(),
            ));
        }
        Ok(())
    }
}

// ── Batch scheduling ──

/// Throttle settings for provider calls. Batch size and delay are the only
/// rate limiting, so match them to the provider quotas of the deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub batch_size: usize,
    pub inter_batch_delay_ms: u64,
    /// Timeout for a single provider HTTP call.
    pub provider_timeout_secs: u64,
    /// Overall research deadline; remaining batches are skipped after it.
    pub research_timeout_secs: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            inter_batch_delay_ms: 1000,
            provider_timeout_secs: 15,
            research_timeout_secs: 120,
        }
    }
}

impl BatchConfig {
    pub fn inter_batch_delay(&self) -> Duration {
        Duration::from_millis(self.inter_batch_delay_ms)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn research_timeout(&self) -> Duration {
        Duration::from_secs(self.research_timeout_secs)
    }
}

// ── Scoring ──

/// Weight coefficients of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub volume: f64,
    pub competition: f64,
    pub cpc_rpm: f64,
    pub saturation: f64,
    /// Multiplier on the localisation penalty.
    pub penalty: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            volume: 0.30,
            competition: 0.25,
            cpc_rpm: 0.25,
            saturation: 0.15,
            penalty: 1.0,
        }
    }
}

impl ScoringWeights {
    /// Sum of the four sub-score weights (the penalty multiplier excluded).
    pub fn sub_score_total(&self) -> f64 {
        self.volume + self.competition + self.cpc_rpm + self.saturation
    }
}

/// Country → localisation penalty, by tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyTable {
    pub domestic_countries: Vec<String>,
    pub domestic_penalty: f64,
    pub tier2_countries: Vec<String>,
    pub tier2_penalty: f64,
    pub tier3_countries: Vec<String>,
    pub tier3_penalty: f64,
    /// Everything not listed above.
    pub default_penalty: f64,
}

impl Default for PenaltyTable {
    fn default() -> Self {
        let names = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect();
        Self {
            domestic_countries: names(&["United States", "USA", "US"]),
            domestic_penalty: 0.0,
            tier2_countries: names(&[
                "United Kingdom",
                "UK",
                "Canada",
                "Australia",
                "Germany",
                "Netherlands",
                "Ireland",
                "New Zealand",
            ]),
            tier2_penalty: 5.0,
            tier3_countries: names(&["France", "Spain", "Italy", "Sweden", "Denmark", "Norway"]),
            tier3_penalty: 10.0,
            default_penalty: 15.0,
        }
    }
}

impl PenaltyTable {
    pub fn penalty_for(&self, country: &str) -> f64 {
        let needle = normalize_country(country);
        let listed = |list: &[String]| list.iter().any(|c| normalize_country(c) == needle);

        if listed(&self.domestic_countries) {
            self.domestic_penalty
        } else if listed(&self.tier2_countries) {
            self.tier2_penalty
        } else if listed(&self.tier3_countries) {
            self.tier3_penalty
        } else {
            self.default_penalty
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    /// Average monthly volume that scores 100.
    pub volume_ceiling: f64,
    /// Average CPC (USD) that scores 100.
    pub cpc_ceiling: f64,
    pub penalties: PenaltyTable,
    /// Divide the weighted sum by the sum of the four sub-score weights, so
    /// a keyword set that maxes every sub-score totals 100 before the
    /// penalty. When false the raw weighted sum is used.
    pub normalize_weights: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            volume_ceiling: 10_000.0,
            cpc_ceiling: 5.0,
            penalties: PenaltyTable::default(),
            normalize_weights: true,
        }
    }
}

// ── Clustering ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Tokens skipped when picking a keyword's main topic token.
    pub stop_words: Vec<String>,
}

pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "how", "what", "why", "when", "where", "which", "who", "is", "are", "can", "do", "does", "a",
    "an", "the", "best", "top", "online", "free", "for", "to", "of", "in", "on", "with", "and",
    "or", "vs",
];

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            stop_words: DEFAULT_STOP_WORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ── Plan synthesis ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Flat content cost per roadmap item, whole dollars.
    pub content_cost: u64,
    /// Keywords promoted to pillar pages.
    pub pillar_count: usize,
    /// Keywords after the pillars assigned to supporting posts.
    pub supporting_count: usize,
    /// Optional TOML file replacing the built-in DA target catalogue.
    pub catalogue_path: Option<PathBuf>,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            content_cost: 200,
            pillar_count: 3,
            supporting_count: 18,
            catalogue_path: None,
        }
    }
}

// ── Job retention ──

/// How long finished jobs stay queryable in the in-process job store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    /// Finished jobs kept; the least recently updated are evicted first.
    pub max_finished: usize,
    /// Finished jobs older than this are evicted.
    pub finished_ttl_secs: u64,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            max_finished: 200,
            finished_ttl_secs: 24 * 60 * 60,
        }
    }
}

impl JobsConfig {
    pub fn finished_ttl(&self) -> Duration {
        Duration::from_secs(self.finished_ttl_secs)
    }
}

// ── Provider credentials ──

/// Provider credentials, read from the environment at startup.
///
/// Empty strings count as absent. Fields are only set through
/// [`Credentials::new`] and [`Credentials::with_overrides`], so a stored key
/// is never blank. `Debug` never prints secrets.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    volume_api_key: Option<String>,
    difficulty_access_id: Option<String>,
    difficulty_secret: Option<String>,
}

impl Credentials {
    pub fn new(
        volume_api_key: Option<String>,
        difficulty_access_id: Option<String>,
        difficulty_secret: Option<String>,
    ) -> Self {
        Self {
            volume_api_key: non_blank(volume_api_key),
            difficulty_access_id: non_blank(difficulty_access_id),
            difficulty_secret: non_blank(difficulty_secret),
        }
    }

    pub fn volume_api_key(&self) -> Option<&str> {
        self.volume_api_key.as_deref()
    }

    pub fn difficulty_access_id(&self) -> Option<&str> {
        self.difficulty_access_id.as_deref()
    }

    pub fn difficulty_secret(&self) -> Option<&str> {
        self.difficulty_secret.as_deref()
    }

    pub fn has_volume(&self) -> bool {
        self.volume_api_key.is_some()
    }

    /// Both the access id and the secret are needed.
    pub fn has_difficulty(&self) -> bool {
        self.difficulty_access_id.is_some() && self.difficulty_secret.is_some()
    }

    /// Per-request keys forwarded by the dashboard take precedence.
    pub fn with_overrides(&self, keys: &ApiKeys) -> Self {
        let pick = |over: &Option<String>, base: &Option<String>| {
            non_blank(over.clone()).or_else(|| base.clone())
        };
        Self {
            volume_api_key: pick(&keys.volume_api_key, &self.volume_api_key),
            difficulty_access_id: pick(&keys.difficulty_access_id, &self.difficulty_access_id),
            difficulty_secret: pick(&keys.difficulty_secret, &self.difficulty_secret),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Credentials")
            .field("volume_api_key", &mask(&self.volume_api_key))
            .field("difficulty_access_id", &mask(&self.difficulty_access_id))
            .field("difficulty_secret", &mask(&self.difficulty_secret))
            .finish()
    }
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_production_constants() {
        let c = AppConfig::default();
        assert_eq!(c.batch.batch_size, 5);
        assert_eq!(c.batch.inter_batch_delay(), Duration::from_millis(1000));
        assert_eq!(c.scoring.weights.volume, 0.30);
        assert_eq!(c.scoring.weights.saturation, 0.15);
        assert_eq!(c.plan.content_cost, 200);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn penalty_tiers() {
        let t = PenaltyTable::default();
        assert_eq!(t.penalty_for("United States"), 0.0);
        assert_eq!(t.penalty_for("United Kingdom"), 5.0);
        assert_eq!(t.penalty_for("France"), 10.0);
        assert_eq!(t.penalty_for("Japan"), 15.0);
        assert_eq!(t.penalty_for("Atlantis"), 15.0);
    }

    #[test]
    fn penalty_lookup_ignores_case() {
        let t = PenaltyTable::default();
        assert_eq!(t.penalty_for("  germany "), 5.0);
        assert_eq!(t.penalty_for("usa"), 0.0);
    }

    #[test]
    fn toml_overrides_keep_other_defaults() {
        let c = AppConfig::from_toml(
            r#"
            [batch]
            batch_size = 2

            [scoring.weights]
            volume = 0.5

            [scoring.penalties]
            tier2_countries = ["Japan"]
            "#,
        )
        .unwrap();
        assert_eq!(c.batch.batch_size, 2);
        assert_eq!(c.batch.inter_batch_delay_ms, 1000);
        assert_eq!(c.scoring.weights.volume, 0.5);
        assert_eq!(c.scoring.weights.competition, 0.25);
        assert_eq!(c.scoring.penalties.penalty_for("Japan"), 5.0);
        assert_eq!(c.scoring.penalties.penalty_for("United States"), 0.0);
    }

    #[test]
    fn jobs_retention_from_toml() {
        let c = AppConfig::from_toml("[jobs]\nmax_finished = 10\n").unwrap();
        assert_eq!(c.jobs.max_finished, 10);
        assert_eq!(c.jobs.finished_ttl(), Duration::from_secs(86_400));
    }

    #[test]
    fn zero_batch_size_rejected() {
        let err = AppConfig::from_toml("[batch]\nbatch_size = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn negative_weight_rejected() {
        let err = AppConfig::from_toml("[scoring.weights]\npenalty = -1.0\n").unwrap_err();
        assert!(err.to_string().contains("penalty"));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = AppConfig::from_toml("[batch\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn blank_credentials_are_absent() {
        let c = Credentials::new(Some("  ".into()), Some("id".into()), Some(String::new()));
        assert!(!c.has_volume());
        assert!(!c.has_difficulty());
        assert_eq!(c.volume_api_key(), None);
        assert_eq!(c.difficulty_secret(), None);
        assert_eq!(c.difficulty_access_id(), Some("id"));
    }

    #[test]
    fn overrides_take_precedence() {
        let base = Credentials::new(Some("env-key".into()), Some("id".into()), Some("s".into()));
        let keys = ApiKeys {
            volume_api_key: Some("req-key".into()),
            difficulty_access_id: Some(String::new()),
            difficulty_secret: None,
        };
        let c = base.with_overrides(&keys);
        assert_eq!(c.volume_api_key(), Some("req-key"));
        assert_eq!(c.difficulty_access_id(), Some("id"));
        assert!(c.has_difficulty());
    }

    #[test]
    fn debug_redacts_secrets() {
        let c = Credentials::new(Some("super-secret".into()), None, None);
        let s = format!("{c:?}");
        assert!(!s.contains("super-secret"));
        assert!(s.contains("<set>"));
    }
}
