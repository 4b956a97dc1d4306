//! Metrics gateway: one keyword, both providers, never fails.
//!
//! Missing credentials produce flagged synthetic values; a failing live call
//! is logged and reported as [`Fetch::Failed`] so the [`FallbackChain`] can
//! substitute the other provider's figures or the neutral default.

use std::sync::Arc;

use rankforge_core::{BatchConfig, Credentials, KeywordMetric, market_code};
use tracing::{debug, warn};

use crate::fallback::FallbackChain;
use crate::providers::{self, DifficultyProvider, VolumeProvider};
use crate::scheduler::{BatchOutcome, BatchProgress, BatchScheduler};
use crate::synthetic::{RandomSource, SeededRandom};

/// Output of the search-volume provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeMetrics {
    pub volume: u64,
    pub cpc: f64,
    pub competition: f64,
    pub is_synthetic: bool,
}

impl VolumeMetrics {
    pub fn neutral() -> Self {
        Self {
            volume: 0,
            cpc: 0.0,
            competition: rankforge_core::keyword::NEUTRAL_COMPETITION,
            is_synthetic: false,
        }
    }
}

/// Output of the keyword-difficulty provider. Volume and CPC are optional
/// because the provider does not always report them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyMetrics {
    pub difficulty: f64,
    pub volume: Option<u64>,
    pub cpc: Option<f64>,
    pub is_synthetic: bool,
}

impl DifficultyMetrics {
    pub fn neutral() -> Self {
        Self {
            difficulty: rankforge_core::keyword::NEUTRAL_DIFFICULTY,
            volume: Some(0),
            cpc: Some(0.0),
            is_synthetic: false,
        }
    }
}

/// How a provider call resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fetch<T> {
    Live(T),
    Synthetic(T),
    Failed,
}

impl<T> Fetch<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Live(v) | Self::Synthetic(v) => Some(v),
            Self::Failed => None,
        }
    }

    pub fn live(&self) -> Option<&T> {
        match self {
            Self::Live(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic(_))
    }
}

pub struct MetricsGateway {
    volume: Arc<dyn VolumeProvider>,
    difficulty: Arc<dyn DifficultyProvider>,
    random: Arc<dyn RandomSource>,
    chain: FallbackChain,
}

impl MetricsGateway {
    pub fn new(
        volume: Arc<dyn VolumeProvider>,
        difficulty: Arc<dyn DifficultyProvider>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            volume,
            difficulty,
            random,
            chain: FallbackChain::default(),
        }
    }

    /// Live HTTP providers at their public endpoints, entropy-seeded synthetic data.
    pub fn live(config: &BatchConfig) -> Self {
        Self::new(
            Arc::new(providers::SerpApiClient::new(
                providers::serp::DEFAULT_BASE_URL.to_string(),
                config.provider_timeout(),
            )),
            Arc::new(providers::MozClient::new(
                providers::moz::DEFAULT_BASE_URL.to_string(),
                config.provider_timeout(),
            )),
            Arc::new(SeededRandom::from_entropy()),
        )
    }

    pub fn with_chain(mut self, chain: FallbackChain) -> Self {
        self.chain = chain;
        self
    }

    pub fn chain(&self) -> &FallbackChain {
        &self.chain
    }

    pub fn volume_provider_name(&self) -> &'static str {
        self.volume.name()
    }

    pub fn difficulty_provider_name(&self) -> &'static str {
        self.difficulty.name()
    }

    /// Search volume, CPC and competition for one keyword in one market.
    pub async fn fetch_volume(
        &self,
        keyword: &str,
        market: &str,
        creds: &Credentials,
    ) -> Fetch<VolumeMetrics> {
        let Some(api_key) = creds.volume_api_key() else {
            return Fetch::Synthetic(self.synthetic_volume());
        };
        match self.volume.fetch(keyword, market, api_key).await {
            Ok(m) => Fetch::Live(m),
            Err(e) => {
                warn!(keyword, provider = self.volume.name(), error = %e, "volume provider failed");
                Fetch::Failed
            }
        }
    }

    /// Keyword difficulty (plus the provider's own volume/CPC) for one keyword.
    pub async fn fetch_difficulty(
        &self,
        keyword: &str,
        creds: &Credentials,
    ) -> Fetch<DifficultyMetrics> {
        let (Some(id), Some(secret)) = (creds.difficulty_access_id(), creds.difficulty_secret())
        else {
            return Fetch::Synthetic(self.synthetic_difficulty());
        };
        match self.difficulty.fetch(keyword, id, secret).await {
            Ok(m) => Fetch::Live(m),
            Err(e) => {
                warn!(
                    keyword,
                    provider = self.difficulty.name(),
                    error = %e,
                    "difficulty provider failed"
                );
                Fetch::Failed
            }
        }
    }

    /// [`fetch_volume`](Self::fetch_volume) with the neutral default on failure.
    pub async fn fetch_volume_metrics(
        &self,
        keyword: &str,
        market: &str,
        creds: &Credentials,
    ) -> VolumeMetrics {
        self.fetch_volume(keyword, market, creds)
            .await
            .value()
            .copied()
            .unwrap_or_else(VolumeMetrics::neutral)
    }

    /// [`fetch_difficulty`](Self::fetch_difficulty) with the neutral default on failure.
    pub async fn fetch_difficulty_metrics(
        &self,
        keyword: &str,
        creds: &Credentials,
    ) -> DifficultyMetrics {
        self.fetch_difficulty(keyword, creds)
            .await
            .value()
            .copied()
            .unwrap_or_else(DifficultyMetrics::neutral)
    }

    /// Query both providers concurrently and merge through the fallback chain.
    pub async fn fetch_keyword(
        &self,
        keyword: &str,
        market: &str,
        creds: &Credentials,
    ) -> KeywordMetric {
        // futures::join polls in argument order, so synthetic draws stay
        // reproducible under a seeded source.
        let (volume, difficulty) = futures::future::join(
            self.fetch_volume(keyword, market, creds),
            self.fetch_difficulty(keyword, creds),
        )
        .await;
        let metric = self.chain.resolve(keyword, &volume, &difficulty);
        debug!(
            keyword,
            volume = metric.volume,
            difficulty = metric.difficulty,
            source = ?metric.source,
            synthetic = metric.is_synthetic,
            "keyword metrics resolved"
        );
        metric
    }

    /// Fetch metrics for every keyword through the batch scheduler.
    pub async fn collect(
        &self,
        keywords: &[String],
        country: &str,
        creds: &Credentials,
        scheduler: &BatchScheduler,
        on_batch: impl FnMut(BatchProgress),
    ) -> BatchOutcome {
        let market = market_code(country);
        scheduler
            .run_batched(
                keywords,
                |kw| async move { self.fetch_keyword(&kw, market, creds).await },
                on_batch,
            )
            .await
    }

    fn synthetic_volume(&self) -> VolumeMetrics {
        VolumeMetrics {
            volume: self.random.in_range(100.0, 10_100.0).floor() as u64,
            cpc: round_to(self.random.in_range(0.5, 5.5), 2),
            competition: round_to(self.random.in_range(10.0, 90.0), 1),
            is_synthetic: true,
        }
    }

    fn synthetic_difficulty(&self) -> DifficultyMetrics {
        DifficultyMetrics {
            difficulty: round_to(self.random.in_range(10.0, 90.0), 1),
            volume: Some(self.random.in_range(100.0, 10_100.0).floor() as u64),
            cpc: Some(round_to(self.random.in_range(0.5, 5.5), 2)),
            is_synthetic: true,
        }
    }
}

fn round_to(v: f64, places: i32) -> f64 {
    let f = 10f64.powi(places);
    (v * f).round() / f
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ProviderError;
    use crate::synthetic::SequenceRandom;
    use async_trait::async_trait;
    use rankforge_core::MetricSource;
    use std::sync::Mutex;

    /// Volume provider double: fixed answer or failure, records markets seen.
    pub(crate) struct StubVolume {
        pub answer: Option<VolumeMetrics>,
        pub markets: Mutex<Vec<String>>,
    }

    impl StubVolume {
        pub(crate) fn ok(volume: u64, cpc: f64, competition: f64) -> Self {
            Self {
                answer: Some(VolumeMetrics {
                    volume,
                    cpc,
                    competition,
                    is_synthetic: false,
                }),
                markets: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                answer: None,
                markets: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VolumeProvider for StubVolume {
        fn name(&self) -> &'static str {
            "stub-volume"
        }

        async fn fetch(
            &self,
            _keyword: &str,
            market: &str,
            _api_key: &str,
        ) -> Result<VolumeMetrics, ProviderError> {
            self.markets.lock().unwrap().push(market.to_string());
            self.answer.ok_or(ProviderError::Server {
                status: 503,
                body: "unavailable".into(),
            })
        }
    }

    pub(crate) struct StubDifficulty {
        pub answer: Option<DifficultyMetrics>,
    }

    impl StubDifficulty {
        pub(crate) fn ok(difficulty: f64, volume: Option<u64>, cpc: Option<f64>) -> Self {
            Self {
                answer: Some(DifficultyMetrics {
                    difficulty,
                    volume,
                    cpc,
                    is_synthetic: false,
                }),
            }
        }

        pub(crate) fn failing() -> Self {
            Self { answer: None }
        }
    }

    #[async_trait]
    impl DifficultyProvider for StubDifficulty {
        fn name(&self) -> &'static str {
            "stub-difficulty"
        }

        async fn fetch(
            &self,
            _keyword: &str,
            _access_id: &str,
            _secret: &str,
        ) -> Result<DifficultyMetrics, ProviderError> {
            self.answer.ok_or(ProviderError::Rpc {
                code: 429,
                message: "rate limited".into(),
            })
        }
    }

    pub(crate) fn gateway(volume: StubVolume, difficulty: StubDifficulty) -> MetricsGateway {
        MetricsGateway::new(
            Arc::new(volume),
            Arc::new(difficulty),
            Arc::new(SequenceRandom::constant(0.5)),
        )
    }

    pub(crate) fn all_creds() -> Credentials {
        Credentials::new(
            Some("key".into()),
            Some("id".into()),
            Some("secret".into()),
        )
    }

    #[tokio::test]
    async fn absent_volume_key_is_synthetic() {
        let gw = gateway(StubVolume::failing(), StubDifficulty::failing());
        let creds = Credentials::default();
        let fetched = gw.fetch_volume("k", "us", &creds).await;
        assert_eq!(
            fetched,
            Fetch::Synthetic(VolumeMetrics {
                volume: 5100,
                cpc: 3.0,
                competition: 50.0,
                is_synthetic: true,
            })
        );
    }

    #[tokio::test]
    async fn absent_difficulty_secret_is_synthetic() {
        let gw = gateway(StubVolume::failing(), StubDifficulty::ok(10.0, None, None));
        let creds = Credentials::new(None, Some("id".into()), None);
        let m = gw.fetch_difficulty_metrics("k", &creds).await;
        assert!(m.is_synthetic);
        assert_eq!(m.difficulty, 50.0);
        assert_eq!(m.volume, Some(5100));
    }

    #[tokio::test]
    async fn missing_volume_key_with_live_difficulty() {
        let volume = Arc::new(StubVolume::ok(1900, 1.25, 42.0));
        let gw = MetricsGateway::new(
            volume.clone(),
            Arc::new(StubDifficulty::ok(37.0, Some(880), Some(1.1))),
            Arc::new(SequenceRandom::constant(0.5)),
        );
        let creds = Credentials::new(None, Some("id".into()), Some("secret".into()));
        assert!(!creds.has_volume());
        assert!(creds.has_difficulty());

        let m = gw.fetch_keyword("running shoes", "us", &creds).await;
        assert!(m.is_synthetic);
        assert_eq!(m.source, MetricSource::Synthetic);
        assert_eq!(m.difficulty, 37.0);
        assert_eq!(m.volume, 5100);
        assert_eq!(m.competition, 50.0);
        assert!(volume.markets.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn live_failure_yields_neutral_default() {
        let gw = gateway(StubVolume::failing(), StubDifficulty::failing());
        let creds = all_creds();
        assert_eq!(gw.fetch_volume("k", "us", &creds).await, Fetch::Failed);
        assert_eq!(
            gw.fetch_volume_metrics("k", "us", &creds).await,
            VolumeMetrics::neutral()
        );
        let d = gw.fetch_difficulty_metrics("k", &creds).await;
        assert_eq!(d.difficulty, 50.0);
        assert!(!d.is_synthetic);
    }

    #[tokio::test]
    async fn live_values_pass_through() {
        let gw = gateway(
            StubVolume::ok(1900, 1.25, 42.0),
            StubDifficulty::ok(37.0, Some(880), None),
        );
        let m = gw.fetch_keyword("running shoes", "gb", &all_creds()).await;
        assert_eq!(m.volume, 1900);
        assert_eq!(m.cpc, 1.25);
        assert_eq!(m.competition, 42.0);
        assert_eq!(m.difficulty, 37.0);
        assert_eq!(m.source, MetricSource::LiveVolume);
        assert!(!m.is_synthetic);
    }

    #[tokio::test]
    async fn collect_maps_country_to_market() {
        let volume = Arc::new(StubVolume::ok(10, 0.1, 5.0));
        let gw = MetricsGateway::new(
            volume.clone(),
            Arc::new(StubDifficulty::ok(20.0, None, None)),
            Arc::new(SequenceRandom::constant(0.5)),
        );
        let scheduler = BatchScheduler::new(5, std::time::Duration::ZERO);
        let keywords = vec!["a".to_string(), "b".to_string()];
        let out = gw
            .collect(&keywords, "Germany", &all_creds(), &scheduler, |_| {})
            .await;
        assert_eq!(out.metrics.len(), 2);
        assert_eq!(*volume.markets.lock().unwrap(), vec!["de", "de"]);
    }

    #[test]
    fn round_to_places() {
        assert_eq!(round_to(3.14159, 2), 3.14);
        assert_eq!(round_to(49.96, 1), 50.0);
    }
}
