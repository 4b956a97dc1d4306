//! Keyword-difficulty provider client (JSON-RPC over HTTPS, basic auth).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{DifficultyProvider, server_error};
use crate::ProviderError;
use crate::gateway::DifficultyMetrics;

pub const DEFAULT_BASE_URL: &str = "https://api.moz.com";

const METHOD: &str = "data.keyword.metrics.fetch";

pub struct MozClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<RpcResult>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcResult {
    keyword_metrics: KeywordMetrics,
}

#[derive(Deserialize)]
struct KeywordMetrics {
    #[serde(default)]
    difficulty: Option<f64>,
    #[serde(default)]
    volume: Option<u64>,
    #[serde(default)]
    cpc: Option<f64>,
}

#[derive(Deserialize)]
struct RpcError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

impl MozClient {
    /// `base_url` should be like `https://api.moz.com` (no trailing slash).
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
        format!("{}/jsonrpc", self.base_url)
    }
}

fn request_body(keyword: &str) -> serde_json::Value {
    json!({
        "jsonrpc": "2.0",
        "id": keyword,
        "method": METHOD,
        "params": {
            "data": {
                "serp_query": {
                    "keyword": keyword,
                    "locale": "en-US",
                    "device": "desktop",
                    "engine": "google",
                }
            }
        }
    })
}

#[async_trait]
impl DifficultyProvider for MozClient {
    fn name(&self) -> &'static str {
        "moz"
    }

    async fn fetch(
        &self,
        keyword: &str,
        access_id: &str,
        secret: &str,
    ) -> Result<DifficultyMetrics, ProviderError> {
        debug!(keyword, "fetching difficulty metrics");
        let resp = self
            .client
            .post(self.endpoint())
            .basic_auth(access_id, Some(secret))
            .json(&request_body(keyword))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(server_error(resp).await);
        }
        let body = resp.text().await?;
        parse_difficulty(keyword, &body)
    }
}

fn parse_difficulty(keyword: &str, body: &str) -> Result<DifficultyMetrics, ProviderError> {
    let parsed: RpcResponse = serde_json::from_str(body)?;
    if let Some(err) = parsed.error {
        return Err(ProviderError::Rpc {
            code: err.code,
            message: err.message,
        });
    }
    let metrics = parsed
        .result
        .map(|r| r.keyword_metrics)
        .ok_or_else(|| ProviderError::Empty(keyword.to_string()))?;
    let difficulty = metrics
        .difficulty
        .ok_or_else(|| ProviderError::Empty(keyword.to_string()))?;
    Ok(DifficultyMetrics {
        difficulty: difficulty.clamp(0.0, 100.0),
        volume: metrics.volume,
        cpc: metrics.cpc.map(|c| c.max(0.0)),
        is_synthetic: false,
    })
}
