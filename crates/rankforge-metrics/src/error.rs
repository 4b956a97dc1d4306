use thiserror::Error;

/// A single provider call failed. Always recovered locally by the fallback
/// chain; never surfaced to API callers.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("provider error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("response carried no metrics for {0:?}")]
    Empty(String),
}
