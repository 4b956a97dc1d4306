pub mod config;
pub mod error;
pub mod keyword;
pub mod market;
pub mod plan;
pub mod request;
pub mod research;

pub use config::{
    AppConfig, BatchConfig, ClusterConfig, Credentials, JobsConfig, PenaltyTable, PlanConfig,
    ScoringConfig, ScoringWeights,
};
pub use error::{ConfigError, ValidationError};
pub use keyword::{Cluster, KeywordMetric, MetricSource, SearchIntent};
pub use market::{DOMESTIC_COUNTRY, DOMESTIC_MARKET, market_code};
pub use plan::{
    ContentRoadmapItem, ContentType, DaTarget, Kpi, LinkBuildingPhase, LinkDifficulty, LinkType,
    PlanOverview, Priority, SeoPlan, TimelineMilestone,
};
pub use request::{ApiKeys, PlanRequest, ResearchRequest};
pub use research::{DataQuality, ResearchResult, ResearchStatus, ScoreBreakdown};
