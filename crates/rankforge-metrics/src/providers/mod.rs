//! Live keyword data providers.
//!
//! Two providers feed the pipeline: a search-volume provider (volume, CPC,
//! competition; localised by market code) and a keyword-difficulty provider
//! (difficulty plus its own volume/CPC estimates). Credentials are passed
//! per call so that per-request overrides never touch shared state.

pub mod moz;
pub mod serp;

pub use moz::MozClient;
pub use serp::SerpApiClient;

use async_trait::async_trait;

use crate::ProviderError;
use crate::gateway::{DifficultyMetrics, VolumeMetrics};

#[async_trait]
pub trait VolumeProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(
        &self,
        keyword: &str,
        market: &str,
        api_key: &str,
    ) -> Result<VolumeMetrics, ProviderError>;
}

#[async_trait]
pub trait DifficultyProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(
        &self,
        keyword: &str,
        access_id: &str,
        secret: &str,
    ) -> Result<DifficultyMetrics, ProviderError>;
}

/// Read the body of a non-2xx response into a [`ProviderError::Server`].
pub(crate) async fn server_error(resp: reqwest::Response) -> ProviderError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    ProviderError::Server { status, body }
}
