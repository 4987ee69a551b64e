//! Moderation seam and implementations

use async_trait::async_trait;
use serde::Serialize;

use otto_ai::{ContentSafetyClient, Plan, Severity};

use crate::error::Result;

/// One category that tripped the moderator
#[derive(Debug, Clone, Serialize)]
pub struct FlaggedCategory {
    pub category: String,
    pub severity: Severity,
}

/// Result of reviewing a piece of content
#[derive(Debug, Clone)]
pub enum Verdict {
    Allowed,
    Flagged { categories: Vec<FlaggedCategory> },
}

impl Verdict {
    /// Whether the content was flagged
    pub fn is_flagged(&self) -> bool {
        matches!(self, Self::Flagged { .. })
    }

    /// Human-readable flag details, for the apology message
    pub fn describe(&self) -> String {
        match self {
            Self::Allowed => String::new(),
            Self::Flagged { categories } => {
                serde_json::to_string(categories).unwrap_or_else(|_| "[]".to_string())
            }
        }
    }
}

/// Reviews user input before planning and plans before dispatch
#[async_trait]
pub trait Moderator: Send + Sync {
    /// Review an incoming user message
    async fn review_input(&self, text: &str) -> Result<Verdict>;

    /// Review a produced plan before it is executed
    async fn review_output(&self, plan: &Plan) -> Result<Verdict>;
}

/// Moderator backed by the Azure Content Safety service.
///
/// Flags content whose severity in any category reaches the configured
/// threshold (high by default, matching hate/self-harm/sexual/violence
/// at their strictest setting).
pub struct ContentSafetyModerator {
    client: ContentSafetyClient,
    threshold: Severity,
}

impl ContentSafetyModerator {
    pub fn new(client: ContentSafetyClient) -> Self {
        Self {
            client,
            threshold: Severity::High,
        }
    }

    /// Override the flagging threshold
    pub fn with_threshold(mut self, threshold: Severity) -> Self {
        self.threshold = threshold;
        self
    }

    async fn review_text(&self, text: &str) -> Result<Verdict> {
        let scores = self.client.analyze_text(text).await.map_err(crate::error::Error::Ai)?;
        let categories: Vec<FlaggedCategory> = scores
            .into_iter()
            .filter(|s| s.level() >= self.threshold)
            .map(|s| FlaggedCategory {
                severity: s.level(),
                category: s.category,
            })
            .collect();

        if categories.is_empty() {
            Ok(Verdict::Allowed)
        } else {
            tracing::warn!(?categories, "content flagged");
            Ok(Verdict::Flagged { categories })
        }
    }
}

#[async_trait]
impl Moderator for ContentSafetyModerator {
    async fn review_input(&self, text: &str) -> Result<Verdict> {
        self.review_text(text).await
    }

    async fn review_output(&self, plan: &Plan) -> Result<Verdict> {
        // Only SAY text reaches the user; DO commands carry no prose
        for command in &plan.commands {
            if let Some(text) = command.response_text() {
                let verdict = self.review_text(text).await?;
                if verdict.is_flagged() {
                    return Ok(verdict);
                }
            }
        }
        Ok(Verdict::Allowed)
    }
}

/// Moderator that allows everything (for hosts without a configured
/// content-safety resource)
pub struct NoopModerator;

#[async_trait]
impl Moderator for NoopModerator {
    async fn review_input(&self, _text: &str) -> Result<Verdict> {
        Ok(Verdict::Allowed)
    }

    async fn review_output(&self, _plan: &Plan) -> Result<Verdict> {
        Ok(Verdict::Allowed)
    }
}
