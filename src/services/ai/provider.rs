//! Collaborator traits for the model call and quota bookkeeping

use std::fmt;

use async_trait::async_trait;

/// Provider-side failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    Timeout,
    Network(String),
    Status(u16),
    InvalidResponse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timed out"),
            Self::Network(msg) => write!(f, "network error: {}", msg),
            Self::Status(code) => write!(f, "provider returned HTTP {}", code),
            Self::InvalidResponse(msg) => write!(f, "invalid provider response: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Text completion against a named model
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        model_id: &str,
        temperature: f32,
    ) -> Result<String, ProviderError>;

    /// 获取 provider 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// External AI-usage quota bookkeeping
///
/// Called once per model invocation, whatever its outcome.
#[async_trait]
pub trait AiUsageRecorder: Send + Sync {
    async fn record(&self, user_id: Option<&str>, model_id: &str);
}

/// Recorder used when the caller does not track usage
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopUsageRecorder;

#[async_trait]
impl AiUsageRecorder for NoopUsageRecorder {
    async fn record(&self, user_id: Option<&str>, model_id: &str) {
        tracing::trace!("AI usage not tracked: user={:?}, model={}", user_id, model_id);
    }
}
