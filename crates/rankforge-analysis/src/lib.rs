//! Keyword clustering and opportunity scoring.
//!
//! Both stages are synchronous and pure: given the same metrics they always
//! produce the same clusters and the same score.

pub mod cluster;
pub mod intent;
pub mod scoring;

pub use cluster::{ClusterOutcome, Clusterer};
pub use intent::{classify_intent, keyword_intent};
pub use scoring::score;
