//! Lexical keyword clustering.
//!
//! Each keyword is reduced to its main topic token: the first whitespace
//! token that is not a stop word (or the first token when every token is a
//! stop word). Keywords sharing a topic token form one cluster, named after
//! the capitalised token. This is a lexical heuristic, not semantic
//! similarity: "sneakers" and "running shoes" land in different clusters.

use std::collections::HashSet;

use rankforge_core::{Cluster, ClusterConfig, KeywordMetric};
use tracing::debug;

use crate::intent::classify_intent;

/// Topic used for a keyword with no tokens at all.
const BLANK_TOPIC: &str = "general";

/// Clusters plus the keyword → cluster-name assignment, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOutcome {
    pub clusters: Vec<Cluster>,
    pub assignment: Vec<(String, String)>,
}

impl ClusterOutcome {
    /// Cluster name assigned to `keyword`.
    pub fn cluster_of(&self, keyword: &str) -> Option<&str> {
        self.assignment
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, c)| c.as_str())
    }
}

pub struct Clusterer {
    stop_words: HashSet<String>,
}

impl Default for Clusterer {
    fn default() -> Self {
        Self::new(&ClusterConfig::default())
    }
}

/// Per-keyword figures fed into cluster aggregates.
struct Member<'a> {
    keyword: &'a str,
    volume: u64,
    difficulty: f64,
}

impl Clusterer {
    pub fn new(config: &ClusterConfig) -> Self {
        Self {
            stop_words: config
                .stop_words
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
        }
    }

    /// Lowercased main topic token of `keyword`.
    pub fn topic_token(&self, keyword: &str) -> String {
        let tokens: Vec<String> = keyword.split_whitespace().map(str::to_lowercase).collect();
        tokens
            .iter()
            .find(|t| !self.stop_words.contains(t.as_str()))
            .or_else(|| tokens.first())
            .cloned()
            .unwrap_or_else(|| BLANK_TOPIC.to_string())
    }

    /// Cluster bare keyword strings, using a length-based proxy for volume
    /// and difficulty.
    pub fn cluster(&self, keywords: &[String]) -> ClusterOutcome {
        let members: Vec<Member<'_>> = keywords
            .iter()
            .map(|kw| {
                let (volume, difficulty) = proxy_metrics(kw);
                Member {
                    keyword: kw,
                    volume,
                    difficulty,
                }
            })
            .collect();
        self.group(&members)
    }

    /// Cluster keywords with real metrics and tag each metric with its
    /// cluster name.
    pub fn cluster_metrics(&self, metrics: &mut [KeywordMetric]) -> Vec<Cluster> {
        let members: Vec<Member<'_>> = metrics
            .iter()
            .map(|m| Member {
                keyword: &m.keyword,
                volume: m.volume,
                difficulty: m.difficulty,
            })
            .collect();
        let outcome = self.group(&members);
        for (metric, (_, name)) in metrics.iter_mut().zip(outcome.assignment) {
            metric.cluster = Some(name);
        }
        outcome.clusters
    }

    fn group(&self, members: &[Member<'_>]) -> ClusterOutcome {
        // (topic, member indexes) in order of first appearance.
        let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
        let mut assignment = Vec::with_capacity(members.len());

        for (i, m) in members.iter().enumerate() {
            let topic = self.topic_token(m.keyword);
            assignment.push((m.keyword.to_string(), cluster_name(&topic)));
            match groups.iter_mut().find(|(t, _)| *t == topic) {
                Some((_, idx)) => idx.push(i),
                None => groups.push((topic, vec![i])),
            }
        }

        let clusters: Vec<Cluster> = groups
            .into_iter()
            .map(|(topic, idx)| {
                let group: Vec<&Member<'_>> = idx.iter().map(|&i| &members[i]).collect();
                build_cluster(&topic, &group)
            })
            .collect();

        debug!(
            keywords = members.len(),
            clusters = clusters.len(),
            "clustered keywords"
        );
        ClusterOutcome {
            clusters,
            assignment,
        }
    }
}

fn build_cluster(topic: &str, members: &[&Member<'_>]) -> Cluster {
    let n = members.len();
    let total_volume = members.iter().map(|m| m.volume).sum();
    let avg_difficulty = if n == 0 {
        0.0
    } else {
        members.iter().map(|m| m.difficulty).sum::<f64>() / n as f64
    };
    let keywords: Vec<&str> = members.iter().map(|m| m.keyword).collect();

    Cluster {
        name: cluster_name(topic),
        primary_keyword: keywords.first().map(|k| k.to_string()).unwrap_or_default(),
        supporting_keywords: keywords.iter().skip(1).map(|k| k.to_string()).collect(),
        total_volume,
        avg_difficulty,
        estimated_weeks: n.div_ceil(2).max(2) as u32,
        posts_per_week: if n <= 4 { 1 } else { 2 },
        intent: classify_intent(keywords.iter().copied()),
    }
}

/// "running" → "Running Cluster".
pub fn cluster_name(topic: &str) -> String {
    let mut chars = topic.chars();
    match chars.next() {
        Some(first) => format!("{}{} Cluster", first.to_uppercase(), chars.as_str()),
        None => "Cluster".to_string(),
    }
}

/// Deterministic stand-in when only the keyword string is known: longer
/// phrases get less volume and more difficulty.
fn proxy_metrics(keyword: &str) -> (u64, f64) {
    let tokens = keyword.split_whitespace().count().max(1) as u64;
    let volume = 1000 / tokens;
    let difficulty = (20 + 5 * tokens).min(100) as f64;
    (volume, difficulty)
}
