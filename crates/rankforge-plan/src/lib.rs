//! SEO plan synthesis.
//!
//! [`Synthesizer::synthesize`] is a pure function of its [`PlanInput`] and the
//! [`PlanCatalogue`]: the same input always yields an identical plan.

pub mod band;
pub mod catalogue;
pub mod error;
pub mod synthesize;

pub use band::OpportunityBand;
pub use catalogue::{CatalogueEntry, NicheTargets, PlanCatalogue, cost_range};
pub use error::PlanError;
pub use synthesize::{PlanInput, Synthesizer};
