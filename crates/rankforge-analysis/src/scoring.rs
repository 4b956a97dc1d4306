//! Composite opportunity score.
//!
//! Four sub-scores normalise the keyword averages onto 0-100 and are
//! combined with the configured weights; the country's localisation penalty
//! is then subtracted. With `normalize_weights` (the default) the weighted
//! sum is divided by the weight total, so maxed sub-scores give 100. Every
//! output field is clamped to 0-100.

use rankforge_core::{KeywordMetric, ScoreBreakdown, ScoringConfig};
use tracing::debug;

/// Score a set of keyword metrics for `country`. Empty input scores zero.
pub fn score(metrics: &[KeywordMetric], country: &str, config: &ScoringConfig) -> ScoreBreakdown {
    if metrics.is_empty() {
        return ScoreBreakdown::default();
    }

    let n = metrics.len() as f64;
    let mean = |f: fn(&KeywordMetric) -> f64| metrics.iter().map(f).sum::<f64>() / n;
    let avg_volume = mean(|m| m.volume as f64);
    let avg_competition = mean(|m| m.competition);
    let avg_cpc = mean(|m| m.cpc);
    let avg_difficulty = mean(|m| m.difficulty);

    let volume_score = clamp(avg_volume / config.volume_ceiling * 100.0);
    let competition_score = clamp(100.0 - avg_competition);
    let cpc_rpm_score = clamp(avg_cpc / config.cpc_ceiling * 100.0);
    let saturation_score = clamp(100.0 - avg_difficulty);
    let localization_penalty = clamp(config.penalties.penalty_for(country));

    let w = &config.weights;
    let mut weighted = w.volume * volume_score
        + w.competition * competition_score
        + w.cpc_rpm * cpc_rpm_score
        + w.saturation * saturation_score;
    let weight_total = w.sub_score_total();
    if config.normalize_weights && weight_total > 0.0 {
        weighted /= weight_total;
    }
    let total_score = clamp(weighted - w.penalty * localization_penalty);

    debug!(
        keywords = metrics.len(),
        country,
        total = total_score,
        penalty = localization_penalty,
        "scored keywords"
    );

    ScoreBreakdown {
        volume_score,
        competition_score,
        cpc_rpm_score,
        saturation_score,
        localization_penalty,
        total_score,
    }
}

fn clamp(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) }
}
