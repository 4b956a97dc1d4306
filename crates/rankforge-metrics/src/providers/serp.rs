//! Search-volume provider client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{VolumeProvider, server_error};
use crate::ProviderError;
use crate::gateway::VolumeMetrics;

pub const DEFAULT_BASE_URL: &str = "https://serpapi.com";

/// HTTP client for the keyword volume endpoint.
///
/// `GET {base}/keyword-metrics?keyword=..&gl=..&api_key=..` answering
/// `{"search_volume": 1900, "cpc": 1.25, "competition_index": 42}`.
pub struct SerpApiClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct KeywordMetricsResponse {
    #[serde(default)]
    search_volume: Option<u64>,
    #[serde(default)]
    cpc: Option<f64>,
    /// 0-100.
    #[serde(default)]
    competition_index: Option<f64>,
    #[serde(default)]
    error: Option<String>,
}

impl SerpApiClient {
    /// `base_url` should be like `https://serpapi.com` (no trailing slash).
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/keyword-metrics", self.base_url)
    }
}

#[async_trait]
impl VolumeProvider for SerpApiClient {
    fn name(&self) -> &'static str {
        "serpapi"
    }

    async fn fetch(
        &self,
        keyword: &str,
        market: &str,
        api_key: &str,
    ) -> Result<VolumeMetrics, ProviderError> {
        debug!(keyword, market, "fetching volume metrics");
        let resp = self
            .client
            .get(self.endpoint())
            .query(&[
                ("keyword", keyword),
                ("gl", market),
                ("api_key", api_key),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(server_error(resp).await);
        }
        let body = resp.text().await?;
        parse_volume(keyword, &body)
    }
}

fn parse_volume(keyword: &str, body: &str) -> Result<VolumeMetrics, ProviderError> {
    let parsed: KeywordMetricsResponse = serde_json::from_str(body)?;
    if let Some(message) = parsed.error {
        return Err(ProviderError::Rpc { code: 0, message });
    }
    if parsed.search_volume.is_none()
        && parsed.cpc.is_none()
        && parsed.competition_index.is_none()
    {
        return Err(ProviderError::Empty(keyword.to_string()));
    }
    Ok(VolumeMetrics {
        volume: parsed.search_volume.unwrap_or(0),
        cpc: parsed.cpc.unwrap_or(0.0).max(0.0),
        competition: parsed.competition_index.unwrap_or(50.0).clamp(0.0, 100.0),
        is_synthetic: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash() {
        let c = SerpApiClient::new("https://serpapi.com/".into(), Duration::from_secs(1));
        assert_eq!(c.endpoint(), "https://serpapi.com/keyword-metrics");
    }

    #[test]
    fn parses_full_response() {
        let m = parse_volume(
            "running shoes",
            r#"{"search_volume": 1900, "cpc": 1.25, "competition_index": 42}"#,
        )
        .unwrap();
        assert_eq!(m.volume, 1900);
        assert_eq!(m.cpc, 1.25);
        assert_eq!(m.competition, 42.0);
        assert!(!m.is_synthetic);
    }

    #[test]
    fn missing_competition_is_neutral() {
        let m = parse_volume("k", r#"{"search_volume": 10}"#).unwrap();
        assert_eq!(m.competition, 50.0);
        assert_eq!(m.cpc, 0.0);
    }

    #[test]
    fn competition_clamped() {
        let m = parse_volume("k", r#"{"competition_index": 250}"#).unwrap();
        assert_eq!(m.competition, 100.0);
    }

    #[test]
    fn error_field_is_failure() {
        let err = parse_volume("k", r#"{"error": "Invalid API key."}"#).unwrap_err();
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[test]
    fn empty_object_is_failure() {
        assert!(matches!(
            parse_volume("k", "{}"),
            Err(ProviderError::Empty(_))
        ));
    }

    #[test]
    fn malformed_json_is_failure() {
        assert!(matches!(
            parse_volume("k", "<html>"),
            Err(ProviderError::Json(_))
        ));
    }
}
