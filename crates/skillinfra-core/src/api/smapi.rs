//! reqwest-backed management API client.

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;

use crate::config::Settings;

use super::{ApiResponse, ManifestApi};

/// Environment variable consulted when settings carry no token.
pub const ACCESS_TOKEN_ENV: &str = "ASK_ACCESS_TOKEN";

#[derive(Debug, Clone)]
pub struct SmapiClient {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl SmapiClient {
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("skillinfra/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let token = settings
            .api
            .token
            .clone()
            .or_else(|| std::env::var(ACCESS_TOKEN_ENV).ok());
        Self::new(settings.api_endpoint(), token)
    }

    pub fn manifest_url(&self, skill_id: &str, stage: &str) -> String {
        format!(
            "{}/v1/skills/{}/stages/{}/manifest",
            self.endpoint, skill_id, stage
        )
    }
}

#[async_trait]
impl ManifestApi for SmapiClient {
    async fn update_manifest(
        &self,
        skill_id: &str,
        stage: &str,
        manifest: &Value,
    ) -> anyhow::Result<ApiResponse> {
        let url = self.manifest_url(skill_id, stage);
        tracing::debug!(url = %url, "updating skill manifest");

        let mut request = self.client.put(&url).json(manifest);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send manifest update to {}", url))?;

        let status_code = response.status().as_u16();
        let text = response
            .text()
            .await
            .context("Failed to read manifest update response")?;
        Ok(ApiResponse::new(status_code, parse_body(&text)))
    }
}

/// JSON bodies are parsed; anything else is kept as a string.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
