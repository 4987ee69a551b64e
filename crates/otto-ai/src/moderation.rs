//! Azure Content Safety text-analysis client

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Harm severity thresholds used by the Content Safety service.
///
/// The service reports severities on the 0-7 scale; the documented
/// output levels are 0 (safe), 2 (low), 4 (medium) and 6 (high).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Safe,
    Low,
    Medium,
    High,
}

impl Severity {
    /// Map a raw service severity level to a threshold bucket
    pub fn from_level(level: u8) -> Self {
        match level {
            0..=1 => Self::Safe,
            2..=3 => Self::Low,
            4..=5 => Self::Medium,
            _ => Self::High,
        }
    }
}

/// One harm category's analysis result
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category: String,
    #[serde(default)]
    pub severity: u8,
}

impl CategoryScore {
    /// The bucketed severity for this category
    pub fn level(&self) -> Severity {
        Severity::from_level(self.severity)
    }
}

/// Client for the Content Safety `text:analyze` operation
pub struct ContentSafetyClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl ContentSafetyClient {
    const API_VERSION: &'static str = "2023-10-01";

    /// Create a client for the given resource endpoint
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::InvalidApiKey);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
        })
    }

    /// Analyze a piece of text, returning per-category severities
    pub async fn analyze_text(&self, text: &str) -> Result<Vec<CategoryScore>> {
        let url = format!(
            "{}/contentsafety/text:analyze?api-version={}",
            self.endpoint.trim_end_matches('/'),
            Self::API_VERSION
        );

        let response = self
            .client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .json(&AnalyzeRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(status.as_u16(), body));
        }

        let analysis: AnalyzeResponse = response.json().await?;
        tracing::debug!(categories = analysis.categories_analysis.len(), "moderation analysis");
        Ok(analysis.categories_analysis)
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    #[serde(default)]
    categories_analysis: Vec<CategoryScore>,
}
