//! Chat-completion client for OpenAI and Azure OpenAI

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    types::ChatMessage,
};

/// Where completions are sent and how they are authenticated
#[derive(Debug, Clone)]
pub enum ChatEndpoint {
    /// openai.com-compatible endpoint, bearer auth
    OpenAi { base_url: String, api_key: String, model: String },
    /// Azure OpenAI deployment, `api-key` header auth
    Azure {
        endpoint: String,
        deployment: String,
        api_key: String,
        api_version: String,
    },
}

impl ChatEndpoint {
    /// Default Azure OpenAI API version
    pub const AZURE_API_VERSION: &'static str = "2024-02-01";

    /// Build the chat-completions URL for this endpoint
    fn completions_url(&self) -> String {
        match self {
            Self::OpenAi { base_url, .. } => {
                format!("{}/chat/completions", base_url.trim_end_matches('/'))
            }
            Self::Azure {
                endpoint,
                deployment,
                api_version,
                ..
            } => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                endpoint.trim_end_matches('/'),
                deployment,
                api_version
            ),
        }
    }

    fn api_key(&self) -> &str {
        match self {
            Self::OpenAi { api_key, .. } => api_key,
            Self::Azure { api_key, .. } => api_key,
        }
    }
}

/// A chat-completion request
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// Non-streaming chat-completion client
pub struct ChatClient {
    client: reqwest::Client,
    endpoint: ChatEndpoint,
}

impl ChatClient {
    /// Create a client for the given endpoint
    pub fn new(endpoint: ChatEndpoint) -> Result<Self> {
        if endpoint.api_key().trim().is_empty() {
            return Err(Error::InvalidApiKey);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
        })
    }

    /// Request a completion and return the assistant message text
    pub async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let url = self.endpoint.completions_url();
        let body = build_request_body(&self.endpoint, request);

        tracing::debug!(messages = request.messages.len(), "requesting completion");

        let mut builder = self.client.post(&url).json(&body);
        builder = match &self.endpoint {
            ChatEndpoint::OpenAi { api_key, .. } => {
                builder.header("Authorization", format!("Bearer {api_key}"))
            }
            ChatEndpoint::Azure { api_key, .. } => builder.header("api-key", api_key),
        };

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::api(status.as_u16(), text));
        }

        let completion: CompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::UnexpectedResponse("completion had no choices".into()))
    }
}

fn build_request_body(endpoint: &ChatEndpoint, request: &ChatRequest) -> RequestBody {
    RequestBody {
        // Azure routes by deployment; the model field is only meaningful
        // for openai.com-compatible endpoints
        model: match endpoint {
            ChatEndpoint::OpenAi { model, .. } => Some(model.clone()),
            ChatEndpoint::Azure { .. } => None,
        },
        messages: request.messages.clone(),
        max_tokens: request.max_tokens,
        temperature: request.temperature,
    }
}

#[derive(Debug, Serialize)]
struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}
