//! SEO execution plan types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    GuestPost,
    ResourcePage,
    Directory,
    Partnership,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkDifficulty {
    Easy,
    Medium,
    Hard,
}

impl LinkDifficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// A domain to earn a backlink from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaTarget {
    pub domain: String,
    pub da: u8,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    pub difficulty: LinkDifficulty,
    /// Rendered as "$lo-$hi".
    pub estimated_cost: String,
    pub contact_info: String,
}

impl DaTarget {
    /// Low end of `estimated_cost`, or 0 if it does not parse.
    pub fn cost_low(&self) -> u64 {
        self.estimated_cost
            .trim_start_matches('$')
            .split('-')
            .next()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    PillarPage,
    SupportingPost,
    LandingPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRoadmapItem {
    pub week: u32,
    pub keyword: String,
    pub content_type: ContentType,
    pub title: String,
    pub word_count: u32,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkBuildingPhase {
    pub phase: u8,
    pub name: String,
    /// e.g. "1-4".
    pub weeks: String,
    pub targets: Vec<DaTarget>,
    pub tactics: Vec<String>,
    pub expected_links: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineMilestone {
    pub month: u32,
    pub milestone: String,
    pub deliverables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub metric: String,
    pub target: String,
    pub timeframe: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOverview {
    /// "High", "Medium-High", "Medium" or "Low".
    pub opportunity_level: String,
    pub estimated_timeframe: String,
    pub total_keywords: usize,
    pub total_clusters: usize,
    /// Whole dollars.
    pub total_budget: u64,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoPlan {
    pub id: String,
    pub research_id: String,
    pub title: String,
    pub overview: PlanOverview,
    pub da_targets: Vec<DaTarget>,
    pub content_roadmap: Vec<ContentRoadmapItem>,
    pub link_building_strategy: Vec<LinkBuildingPhase>,
    pub timeline: Vec<TimelineMilestone>,
    pub kpis: Vec<Kpi>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(cost: &str) -> DaTarget {
        DaTarget {
            domain: "medium.com".into(),
            da: 95,
            link_type: LinkType::GuestPost,
            difficulty: LinkDifficulty::Hard,
            estimated_cost: cost.into(),
            contact_info: "Editorial submission".into(),
        }
    }

    #[test]
    fn cost_low_parses_range() {
        assert_eq!(target("$960-$1920").cost_low(), 960);
        assert_eq!(target("$50-$100").cost_low(), 50);
    }

    #[test]
    fn cost_low_tolerates_garbage() {
        assert_eq!(target("free").cost_low(), 0);
        assert_eq!(target("").cost_low(), 0);
    }

    #[test]
    fn da_target_uses_type_key() {
        let json = serde_json::to_value(target("$1-$2")).unwrap();
        assert_eq!(json["type"], "guest_post");
        assert_eq!(json["difficulty"], "hard");
        assert_eq!(json["estimatedCost"], "$1-$2");
    }

    #[test]
    fn difficulty_orders_easy_first() {
        assert!(LinkDifficulty::Easy < LinkDifficulty::Medium);
        assert!(LinkDifficulty::Medium < LinkDifficulty::Hard);
    }
}
