//! Vertical score card for a research result.

use rankforge_core::{KeywordMetric, MetricSource, ResearchResult};

const MAX_KEYWORDS: usize = 10;

// ── Public API ──

/// Print the result as a card: scores, data quality, clusters, then the
/// highest-volume keywords.
pub fn print_score_card(result: &ResearchResult) {
    println!("=== {} in {} ===", result.niche, result.country);
    println!("{}", result.id);
    println!();

    let s = &result.scores;
    println!("Scores");
    row("total_score", format!("{:.1}", s.total_score));
    row("volume_score", format!("{:.1}", s.volume_score));
    row("competition_score", format!("{:.1}", s.competition_score));
    row("cpc_rpm_score", format!("{:.1}", s.cpc_rpm_score));
    row("saturation_score", format!("{:.1}", s.saturation_score));
    row(
        "localization_penalty",
        format!("{:.1}", s.localization_penalty),
    );
    println!();

    let q = &result.data_quality;
    println!("Data Quality");
    row("status", result.status.as_str());
    row("live_keywords", q.live_keywords);
    row("synthetic_keywords", q.synthetic_keywords);
    row("defaulted_keywords", q.defaulted_keywords);
    if q.fully_synthetic() {
        println!(
            "  (no provider credentials: figures are synthetic estimates)"
        );
    }
    println!();

    if !result.clusters.is_empty() {
        println!("Clusters ({}):", result.clusters.len());
        for c in &result.clusters {
            println!(
                "    {} [{}] {} keywords, vol {}, KD {:.0}, {} weeks",
                c.name,
                c.intent.as_str(),
                c.len(),
                c.total_volume,
                c.avg_difficulty,
                c.estimated_weeks
            );
        }
        println!();
    }

    print_keywords(&result.keywords);
}

// ── Sections ──

fn row(label: &str, value: impl std::fmt::Display) {
    println!("  {:<26} {}", label, value);
}

fn print_keywords(metrics: &[KeywordMetric]) {
    if metrics.is_empty() {
        return;
    }
    let mut sorted: Vec<&KeywordMetric> = metrics.iter().collect();
    sorted.sort_by(|a, b| b.volume.cmp(&a.volume));

    println!("Keywords ({}):", metrics.len());
    for m in sorted.iter().take(MAX_KEYWORDS) {
        println!(
            "    {:<32} vol {:>7}  KD {:>3.0}  comp {:>3.0}  ${:.2}  {}",
            m.keyword,
            m.volume,
            m.difficulty,
            m.competition,
            m.cpc,
            source_label(m.source)
        );
    }
    if metrics.len() > MAX_KEYWORDS {
        println!("    ... and {} more", metrics.len() - MAX_KEYWORDS);
    }
    println!();
}

fn source_label(source: MetricSource) -> &'static str {
    match source {
        MetricSource::LiveVolume => "live",
        MetricSource::LiveDifficulty => "live (difficulty provider)",
        MetricSource::Synthetic => "synthetic",
        MetricSource::NeutralDefault => "default",
    }
}
