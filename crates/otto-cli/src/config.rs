//! Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Configuration for otto
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion provider: "openai" or "azure"
    pub provider: Option<String>,
    /// Plan-continuation retry budget
    pub max_retries: Option<u32>,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub azure: AzureConfig,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub content_safety: ContentSafetyConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureConfig {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub deployment: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Pre-acquired Microsoft Graph access token
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSafetyConfig {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("otto")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        // Check for OTTO_CONFIG_PATH env var first
        if let Ok(path) = std::env::var("OTTO_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from a file, falling back to defaults
    pub fn load_from(path: &PathBuf) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Load config from the default location
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Save config to file
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path();
        let dir = path.parent().unwrap();
        fs::create_dir_all(dir)?;

        let content = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, content)
    }

    /// Create a default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() {
            return Ok(path);
        }

        let default_config = Config {
            provider: Some("openai".to_string()),
            max_retries: Some(3),
            openai: OpenAiConfig {
                model: Some("gpt-4o-mini".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        default_config.save()?;
        Ok(path)
    }

    /// OpenAI key, checking config then env
    pub fn openai_api_key(&self) -> Option<String> {
        self.openai
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }

    /// Azure OpenAI key, checking config then env
    pub fn azure_api_key(&self) -> Option<String> {
        self.azure
            .api_key
            .clone()
            .or_else(|| std::env::var("AZURE_OPENAI_API_KEY").ok())
    }

    /// Azure OpenAI endpoint, checking config then env
    pub fn azure_endpoint(&self) -> Option<String> {
        self.azure
            .endpoint
            .clone()
            .or_else(|| std::env::var("AZURE_OPENAI_ENDPOINT").ok())
    }

    /// Azure OpenAI deployment, checking config then env
    pub fn azure_deployment(&self) -> Option<String> {
        self.azure
            .deployment
            .clone()
            .or_else(|| std::env::var("AZURE_OPENAI_DEPLOYMENT").ok())
    }

    /// Graph access token, checking config then env
    pub fn graph_token(&self) -> Option<String> {
        self.graph
            .token
            .clone()
            .or_else(|| std::env::var("GRAPH_TOKEN").ok())
    }

    /// Content Safety key, checking config then env
    pub fn content_safety_api_key(&self) -> Option<String> {
        self.content_safety
            .api_key
            .clone()
            .or_else(|| std::env::var("CONTENT_SAFETY_API_KEY").ok())
    }

    /// Content Safety endpoint, checking config then env
    pub fn content_safety_endpoint(&self) -> Option<String> {
        self.content_safety
            .endpoint
            .clone()
            .or_else(|| std::env::var("CONTENT_SAFETY_ENDPOINT").ok())
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# otto configuration file
# Place at ~/.config/otto/config.toml (Linux/Mac) or %APPDATA%\otto\config.toml (Windows)

# Completion provider: "openai" or "azure"
provider = "openai"

# Plan-continuation retry budget
max_retries = 3

[openai]
# api_key = "sk-..."         # or OPENAI_API_KEY
model = "gpt-4o-mini"
# base_url = "https://api.openai.com/v1"

[azure]
# api_key = "..."            # or AZURE_OPENAI_API_KEY
# endpoint = "https://your-resource.openai.azure.com"
# deployment = "your-deployment"

[graph]
# Pre-acquired Microsoft Graph access token
# token = "..."              # or GRAPH_TOKEN

[content_safety]
# Optional; moderation is skipped when unset
# api_key = "..."            # or CONTENT_SAFETY_API_KEY
# endpoint = "https://your-resource.cognitiveservices.azure.com"
"#
}
