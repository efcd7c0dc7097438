//! Anthropic Messages API provider
//!
//! ureq 是同步客户端，请求放在 spawn_blocking 中执行；
//! 全局超时与 `ai.timeout_secs` 一致，外层还有 tokio 超时。

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};
use ureq::Agent;

use super::provider::{CompletionProvider, ProviderError};
use crate::config::AiConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

pub struct AnthropicProvider {
    api_url: String,
    api_key: String,
    max_tokens: u32,
    agent: Agent,
}

impl AnthropicProvider {
    /// Build from `[ai]` config; `None` when no API key is configured
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        let api_key = config.api_key.clone().filter(|k| !k.trim().is_empty())?;
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();
        Some(Self {
            api_url: config.api_url.clone(),
            api_key,
            max_tokens: config.max_tokens,
            agent,
        })
    }

    fn complete_sync(
        agent: Agent,
        api_url: String,
        api_key: String,
        body: serde_json::Value,
    ) -> Result<String, ProviderError> {
        let resp = agent
            .post(&api_url)
            .header("x-api-key", &api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .send_json(&body)
            .map_err(|e| match e {
                ureq::Error::Timeout(_) => ProviderError::Timeout,
                ureq::Error::StatusCode(code) => ProviderError::Status(code),
                other => ProviderError::Network(other.to_string()),
            })?;

        let parsed: MessagesResponse = resp
            .into_body()
            .read_json()
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let text: String = parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("\n");

        trace!("Anthropic response: {} chars", text.len());
        if text.trim().is_empty() {
            return Err(ProviderError::InvalidResponse("empty completion".into()));
        }
        Ok(text)
    }
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    async fn complete(
        &self,
        prompt: &str,
        model_id: &str,
        temperature: f32,
    ) -> Result<String, ProviderError> {
        let request = MessagesRequest {
            model: model_id,
            max_tokens: self.max_tokens,
            temperature,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };
        let body = serde_json::to_value(&request)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let agent = self.agent.clone();
        let api_url = self.api_url.clone();
        let api_key = self.api_key.clone();

        tokio::task::spawn_blocking(move || Self::complete_sync(agent, api_url, api_key, body))
            .await
            .unwrap_or_else(|e| {
                warn!("Anthropic spawn_blocking failed: {}", e);
                Err(ProviderError::Network(e.to_string()))
            })
    }

    fn name(&self) -> &'static str {
        "Anthropic"
    }
}
