//! Provider precedence for merging the two gateway answers into one metric.

use rankforge_core::keyword::{NEUTRAL_COMPETITION, NEUTRAL_DIFFICULTY};
use rankforge_core::{KeywordMetric, MetricSource};

use crate::gateway::{DifficultyMetrics, Fetch, VolumeMetrics};

/// One entry of the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackSource {
    LiveVolume,
    LiveDifficulty,
    NeutralDefault,
}

/// Ordered list of sources consulted for volume and CPC.
///
/// Competition only ever comes from the volume provider and difficulty only
/// from the difficulty provider; each falls back to 50 on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackChain(Vec<FallbackSource>);

impl Default for FallbackChain {
    fn default() -> Self {
        Self(vec![
            FallbackSource::LiveVolume,
            FallbackSource::LiveDifficulty,
            FallbackSource::NeutralDefault,
        ])
    }
}

/// A candidate value and where it came from.
struct Pick<T> {
    value: T,
    source: MetricSource,
    synthetic: bool,
}

impl FallbackChain {
    pub fn new(order: Vec<FallbackSource>) -> Self {
        Self(order)
    }

    pub fn sources(&self) -> &[FallbackSource] {
        &self.0
    }

    /// Merge both provider answers for `keyword`.
    pub fn resolve(
        &self,
        keyword: &str,
        volume: &Fetch<VolumeMetrics>,
        difficulty: &Fetch<DifficultyMetrics>,
    ) -> KeywordMetric {
        let vol = self.first(volume, difficulty, |v| Some(v.volume), |d| d.volume);
        let cpc = self.first(volume, difficulty, |v| Some(v.cpc), |d| d.cpc);
        let competition = volume.value().map(|v| v.competition);
        let diff = difficulty.value().map(|d| d.difficulty);

        let synthetic = vol.as_ref().is_some_and(|p| p.synthetic)
            || cpc.as_ref().is_some_and(|p| p.synthetic)
            || (competition.is_some() && volume.is_synthetic())
            || (diff.is_some() && difficulty.is_synthetic());

        let (volume_value, source) = match vol {
            Some(p) => (p.value, p.source),
            None => (0, MetricSource::NeutralDefault),
        };

        KeywordMetric {
            keyword: keyword.to_string(),
            volume: volume_value,
            competition: competition.unwrap_or(NEUTRAL_COMPETITION),
            cpc: cpc.map(|p| p.value).unwrap_or(0.0),
            difficulty: diff.unwrap_or(NEUTRAL_DIFFICULTY),
            cluster: None,
            is_synthetic: synthetic,
            source,
        }
        .clamped()
    }

    /// Walk the chain and take the first source that has the field.
    fn first<T>(
        &self,
        volume: &Fetch<VolumeMetrics>,
        difficulty: &Fetch<DifficultyMetrics>,
        from_volume: impl Fn(&VolumeMetrics) -> Option<T>,
        from_difficulty: impl Fn(&DifficultyMetrics) -> Option<T>,
    ) -> Option<Pick<T>> {
        for step in &self.0 {
            let pick = match step {
                FallbackSource::LiveVolume => {
                    volume.value().and_then(&from_volume).map(|value| Pick {
                        value,
                        source: tag(volume.is_synthetic(), MetricSource::LiveVolume),
                        synthetic: volume.is_synthetic(),
                    })
                }
                FallbackSource::LiveDifficulty => {
                    difficulty.value().and_then(&from_difficulty).map(|value| Pick {
                        value,
                        source: tag(difficulty.is_synthetic(), MetricSource::LiveDifficulty),
                        synthetic: difficulty.is_synthetic(),
                    })
                }
                FallbackSource::NeutralDefault => return None,
            };
            if pick.is_some() {
                return pick;
            }
        }
        None
    }
}

fn tag(synthetic: bool, live: MetricSource) -> MetricSource {
    if synthetic { MetricSource::Synthetic } else { live }
}
