//! Template-driven plan synthesis.

use chrono::{DateTime, Utc};
use rankforge_analysis::Clusterer;
use rankforge_core::{
    Cluster, ContentRoadmapItem, ContentType, DaTarget, Kpi, LinkBuildingPhase, LinkDifficulty,
    PlanConfig, PlanOverview, PlanRequest, Priority, ResearchResult, SeoPlan, TimelineMilestone,
};
use tracing::info;

use crate::band::OpportunityBand;
use crate::catalogue::PlanCatalogue;

const PILLAR_WORDS: u32 = 3000;
const SUPPORTING_WORDS: u32 = 1500;
const LANDING_WORDS: u32 = 1000;
/// First week available to supporting posts and landing pages.
const BUILD_OUT_WEEK: u32 = 4;
const SUPPORTING_PER_WEEK: usize = 2;

/// Everything a plan is derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanInput {
    pub research_id: String,
    pub country: String,
    pub niche: String,
    /// In priority order; the first keywords become pillar pages.
    pub keywords: Vec<String>,
    pub total_score: f64,
    pub clusters: Vec<Cluster>,
    /// Stamped on the plan as `createdAt`.
    pub created_at: DateTime<Utc>,
}

impl PlanInput {
    pub fn from_result(result: &ResearchResult) -> Self {
        Self {
            research_id: result.id.clone(),
            country: result.country.clone(),
            niche: result.niche.clone(),
            keywords: result.keywords.iter().map(|m| m.keyword.clone()).collect(),
            total_score: result.scores.total_score,
            clusters: result.clusters.clone(),
            created_at: result.updated_at,
        }
    }

    /// Build from a validated request. Clusters are derived from the
    /// keyword strings when the request carries none.
    pub fn from_request(
        request: PlanRequest,
        research_id: String,
        clusterer: &Clusterer,
        created_at: DateTime<Utc>,
    ) -> Self {
        let clusters = match request.clusters {
            Some(c) if !c.is_empty() => c,
            _ => clusterer.cluster(&request.keywords).clusters,
        };
        Self {
            research_id: request.research_id.unwrap_or(research_id),
            country: request.country,
            niche: request.niche,
            keywords: request.keywords,
            total_score: request.total_score,
            clusters,
            created_at,
        }
    }
}

pub struct Synthesizer {
    catalogue: PlanCatalogue,
    config: PlanConfig,
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new(PlanCatalogue::default(), PlanConfig::default())
    }
}

/// Static definition of one link-building phase.
struct PhaseTemplate {
    name: &'static str,
    weeks: &'static str,
    difficulty: LinkDifficulty,
    expected_links: u32,
    tactics: &'static [&'static str],
}

const PHASES: [PhaseTemplate; 3] = [
    PhaseTemplate {
        name: "Foundation",
        weeks: "1-4",
        difficulty: LinkDifficulty::Easy,
        expected_links: 10,
        tactics: &[
            "Claim business and directory profiles",
            "Publish on self-serve platforms with a profile link",
            "Answer niche questions on Q&A communities",
            "Fix broken internal links and submit sitemaps",
        ],
    },
    PhaseTemplate {
        name: "Authority",
        weeks: "5-12",
        difficulty: LinkDifficulty::Medium,
        expected_links: 15,
        tactics: &[
            "Pitch guest posts to niche publications",
            "Outreach to resource pages with pillar content",
            "Publish original data for citation",
            "Broken link building on niche sites",
        ],
    },
    PhaseTemplate {
        name: "High-Authority",
        weeks: "13-24",
        difficulty: LinkDifficulty::Hard,
        expected_links: 8,
        tactics: &[
            "Digital PR campaigns around research findings",
            "Apply to expert contributor programs",
            "Negotiate co-marketing partnerships",
        ],
    },
];

impl Synthesizer {
    pub fn new(catalogue: PlanCatalogue, config: PlanConfig) -> Self {
        Self { catalogue, config }
    }

    pub fn catalogue(&self) -> &PlanCatalogue {
        &self.catalogue
    }

    pub fn synthesize(&self, input: &PlanInput) -> SeoPlan {
        let band = OpportunityBand::from_score(input.total_score);
        let da_targets = self.catalogue.targets_for(&input.niche);
        let content_roadmap = self.roadmap(&input.keywords);
        let link_building_strategy = link_phases(&da_targets);

        let content_spend = content_roadmap.len() as u64 * self.config.content_cost;
        let link_spend: u64 = da_targets.iter().map(DaTarget::cost_low).sum();
        let total_budget = content_spend + link_spend;

        let summary = format!(
            "{} opportunity for {} in {}: {} keywords across {} clusters, {} to meaningful rankings.",
            band.label(),
            input.niche,
            input.country,
            input.keywords.len(),
            input.clusters.len(),
            band.timeframe(),
        );

        let timeline = timeline(input, &content_roadmap, &link_building_strategy);
        let kpis = kpis(
            band,
            input.keywords.len(),
            &content_roadmap,
            &link_building_strategy,
        );

        info!(
            research_id = %input.research_id,
            band = band.label(),
            roadmap = content_roadmap.len(),
            targets = da_targets.len(),
            total_budget,
            "synthesized plan"
        );

        SeoPlan {
            id: format!("plan-{}", input.research_id),
            research_id: input.research_id.clone(),
            title: format!("SEO Plan: {} in {}", input.niche, input.country),
            overview: PlanOverview {
                opportunity_level: band.label().to_string(),
                estimated_timeframe: band.timeframe().to_string(),
                total_keywords: input.keywords.len(),
                total_clusters: input.clusters.len(),
                total_budget,
                summary,
            },
            da_targets,
            content_roadmap,
            link_building_strategy,
            timeline,
            kpis,
            created_at: input.created_at,
        }
    }

    /// Pillars, then supporting posts two per week, then a landing page for
    /// every third keyword; stable-sorted by week.
    fn roadmap(&self, keywords: &[String]) -> Vec<ContentRoadmapItem> {
        let pillars = self.config.pillar_count;
        let supporting = self.config.supporting_count;
        let mut items = Vec::new();

        for (i, kw) in keywords.iter().take(pillars).enumerate() {
            items.push(ContentRoadmapItem {
                week: i as u32 + 1,
                keyword: kw.clone(),
                content_type: ContentType::PillarPage,
                title: format!("The Complete Guide to {}", title_case(kw)),
                word_count: PILLAR_WORDS,
                priority: Priority::High,
            });
        }

        for (j, kw) in keywords.iter().skip(pillars).take(supporting).enumerate() {
            items.push(ContentRoadmapItem {
                week: BUILD_OUT_WEEK + (j / SUPPORTING_PER_WEEK) as u32,
                keyword: kw.clone(),
                content_type: ContentType::SupportingPost,
                title: format!("{}: Tips and Best Practices", title_case(kw)),
                word_count: SUPPORTING_WORDS,
                priority: Priority::Medium,
            });
        }

        for (i, kw) in keywords.iter().enumerate().step_by(3) {
            items.push(ContentRoadmapItem {
                week: BUILD_OUT_WEEK + (i / 3) as u32,
                keyword: kw.clone(),
                content_type: ContentType::LandingPage,
                title: format!("{}: Compare Top Options", title_case(kw)),
                word_count: LANDING_WORDS,
                priority: Priority::Low,
            });
        }

        items.sort_by_key(|item| item.week);
        items
    }
}

fn link_phases(targets: &[DaTarget]) -> Vec<LinkBuildingPhase> {
    PHASES
        .iter()
        .enumerate()
        .map(|(i, p)| LinkBuildingPhase {
            phase: i as u8 + 1,
            name: p.name.to_string(),
            weeks: p.weeks.to_string(),
            targets: targets
                .iter()
                .filter(|t| t.difficulty == p.difficulty)
                .cloned()
                .collect(),
            tactics: p.tactics.iter().map(|t| t.to_string()).collect(),
            expected_links: p.expected_links,
        })
        .collect()
}

fn timeline(
    input: &PlanInput,
    roadmap: &[ContentRoadmapItem],
    phases: &[LinkBuildingPhase],
) -> Vec<TimelineMilestone> {
    let count = |ty: ContentType| roadmap.iter().filter(|r| r.content_type == ty).count();
    let links_by =
        |phase: usize| -> u32 { phases.iter().take(phase).map(|p| p.expected_links).sum() };
    let lead_cluster = input
        .clusters
        .first()
        .map(|c| c.name.clone())
        .unwrap_or_else(|| input.niche.clone());

    vec![
        TimelineMilestone {
            month: 1,
            milestone: "Foundation in place".into(),
            deliverables: vec![
                format!("{} pillar pages published", count(ContentType::PillarPage)),
                "Technical SEO audit complete".into(),
                format!("{} foundation links acquired", links_by(1)),
            ],
        },
        TimelineMilestone {
            month: 3,
            milestone: "Content build-out complete".into(),
            deliverables: vec![
                format!(
                    "{} supporting posts published",
                    count(ContentType::SupportingPost)
                ),
                format!("{} landing pages live", count(ContentType::LandingPage)),
                format!("{} total backlinks", links_by(2)),
            ],
        },
        TimelineMilestone {
            month: 6,
            milestone: "Authority growth".into(),
            deliverables: vec![
                format!("{} total backlinks", links_by(3)),
                "Long-tail keywords ranking on page one".into(),
            ],
        },
        TimelineMilestone {
            month: 12,
            milestone: "Market position established".into(),
            deliverables: vec![
                format!("Top-10 rankings across {lead_cluster}"),
                format!("Sustained organic growth in {}", input.country),
            ],
        },
    ]
}

fn kpis(
    band: OpportunityBand,
    keyword_count: usize,
    roadmap: &[ContentRoadmapItem],
    phases: &[LinkBuildingPhase],
) -> Vec<Kpi> {
    let top10 = (keyword_count as f64 * band.top10_share()).ceil() as usize;
    let links: u32 = phases.iter().map(|p| p.expected_links).sum();
    let last_week = roadmap.iter().map(|r| r.week).max().unwrap_or(0);

    vec![
        Kpi {
            metric: "Organic traffic".into(),
            target: band.traffic_target().into(),
            timeframe: band.timeframe().into(),
        },
        Kpi {
            metric: "Keywords in top 10".into(),
            target: format!("{top10} of {keyword_count}"),
            timeframe: "12 months".into(),
        },
        Kpi {
            metric: "Referring domains".into(),
            target: format!("{links}+"),
            timeframe: "24 weeks".into(),
        },
        Kpi {
            metric: "Content pieces published".into(),
            target: roadmap.len().to_string(),
            timeframe: format!("{last_week} weeks"),
        },
    ]
}

/// "running shoes" → "Running Shoes".
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
