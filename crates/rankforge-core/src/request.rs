//! Request payloads accepted from the dashboard.
//!
//! Fields are all defaulted on deserialisation so that a missing field is
//! reported by [`validate`](ResearchRequest::validate) as a
//! [`ValidationError`] rather than as a JSON decoding failure.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::keyword::Cluster;

/// Per-request provider keys optionally forwarded by the dashboard.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeys {
    #[serde(rename = "serpApiKey", default)]
    pub volume_api_key: Option<String>,
    #[serde(rename = "mozAccessId", default)]
    pub difficulty_access_id: Option<String>,
    #[serde(rename = "mozSecretKey", default)]
    pub difficulty_secret: Option<String>,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResearchRequest {
    pub country: String,
    pub niche: String,
    pub keywords: Vec<String>,
    #[serde(skip_serializing)]
    pub api_keys: Option<ApiKeys>,
}

impl ResearchRequest {
    /// Trim fields, drop blank keywords, and check required fields.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let country = required(self.country, "country")?;
        let niche = required(self.niche, "niche")?;
        let keywords = clean_keywords(self.keywords);
        if keywords.is_empty() {
            return Err(ValidationError::NoKeywords);
        }
        Ok(Self {
            country,
            niche,
            keywords,
            api_keys: self.api_keys,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanRequest {
    pub research_id: Option<String>,
    pub country: String,
    pub niche: String,
    pub keywords: Vec<String>,
    pub total_score: f64,
    pub clusters: Option<Vec<Cluster>>,
}

impl PlanRequest {
    pub fn validate(self) -> Result<Self, ValidationError> {
        let country = required(self.country, "country")?;
        let niche = required(self.niche, "niche")?;
        let keywords = clean_keywords(self.keywords);
        if keywords.is_empty() {
            return Err(ValidationError::NoKeywords);
        }
        let total_score = if self.total_score.is_finite() {
            self.total_score.clamp(0.0, 100.0)
        } else {
            0.0
        };
        Ok(Self {
            research_id: self.research_id.filter(|s| !s.trim().is_empty()),
            country,
            niche,
            keywords,
            total_score,
            clusters: self.clusters,
        })
    }
}

fn required(value: String, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn clean_keywords(keywords: Vec<String>) -> Vec<String> {
    keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_niche_rejected() {
        let req: ResearchRequest =
            serde_json::from_str(r#"{"country":"United States","keywords":["a"]}"#).unwrap();
        assert_eq!(req.validate(), Err(ValidationError::MissingField("niche")));
    }

    #[test]
    fn blank_country_rejected() {
        let req = ResearchRequest {
            country: "  ".into(),
            niche: "Travel".into(),
            keywords: vec!["a".into()],
            api_keys: None,
        };
        assert_eq!(
            req.validate(),
            Err(ValidationError::MissingField("country"))
        );
    }

    #[test]
    fn blank_keywords_dropped_then_rejected() {
        let req = ResearchRequest {
            country: "Japan".into(),
            niche: "Travel".into(),
            keywords: vec!["".into(), "   ".into()],
            api_keys: None,
        };
        assert_eq!(req.validate(), Err(ValidationError::NoKeywords));
    }

    #[test]
    fn valid_request_is_trimmed() {
        let req = ResearchRequest {
            country: " Japan ".into(),
            niche: "Travel".into(),
            keywords: vec![" tokyo hotels ".into(), "".into(), "kyoto".into()],
            api_keys: None,
        }
        .validate()
        .unwrap();
        assert_eq!(req.country, "Japan");
        assert_eq!(req.keywords, vec!["tokyo hotels", "kyoto"]);
    }

    #[test]
    fn api_keys_use_dashboard_names() {
        let req: ResearchRequest = serde_json::from_str(
            r#"{"country":"US","niche":"n","keywords":["k"],"apiKeys":{"serpApiKey":"abc"}}"#,
        )
        .unwrap();
        let keys = req.api_keys.unwrap();
        assert_eq!(keys.volume_api_key.as_deref(), Some("abc"));
        assert!(keys.difficulty_secret.is_none());
        assert!(!format!("{keys:?}").contains("abc"));
    }

    #[test]
    fn plan_request_clamps_score() {
        let req: PlanRequest = serde_json::from_str(
            r#"{"researchId":"r1","country":"US","niche":"Tech","keywords":["k"],"totalScore":140}"#,
        )
        .unwrap();
        let req = req.validate().unwrap();
        assert_eq!(req.total_score, 100.0);
        assert_eq!(req.research_id.as_deref(), Some("r1"));
        assert!(req.clusters.is_none());
    }

    #[test]
    fn plan_request_requires_keywords() {
        let req: PlanRequest =
            serde_json::from_str(r#"{"country":"US","niche":"Tech"}"#).unwrap();
        assert_eq!(req.validate(), Err(ValidationError::NoKeywords));
    }
}
