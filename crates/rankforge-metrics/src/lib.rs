//! Metrics layer: provider adapters with synthetic fallback, the explicit
//! provider fallback chain, and the batched concurrent fetch scheduler.

mod error;
pub mod fallback;
pub mod gateway;
pub mod providers;
pub mod scheduler;
pub mod synthetic;

pub use error::ProviderError;
pub use fallback::{FallbackChain, FallbackSource};
pub use gateway::{DifficultyMetrics, Fetch, MetricsGateway, VolumeMetrics};
pub use providers::{DifficultyProvider, MozClient, SerpApiClient, VolumeProvider};
pub use scheduler::{BatchOutcome, BatchProgress, BatchScheduler};
pub use synthetic::{RandomSource, SeededRandom, SequenceRandom};
